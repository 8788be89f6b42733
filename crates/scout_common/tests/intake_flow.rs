//! End-to-end intake sessions against a scripted oracle
//!
//! Drives full conversations through `IntakeStateMachine` with a
//! `FakeLlmClient` and a file store in a temporary directory.

use scout_common::translation::TranslationError;
use scout_common::{
    CandidateRecord, FakeLlmClient, FileCandidateStore, IntakeStateMachine, Language, Localizer,
    Phase, ProfileField, SessionState, TranslationOracle, TurnOutcome,
};
use std::sync::Arc;
use tempfile::TempDir;

const ANSWERS: [&str; 7] = [
    "Jane Doe",
    "jane@example.com",
    "+91 9876543210",
    "3.5",
    "Backend Engineer",
    "Pune, India",
    "Rust, PostgreSQL, Docker",
];

const QUESTIONS: &str = "What is ownership in Rust? || How do you index a PostgreSQL table?||What is a Docker layer?|| Explain lifetimes. ||What does VACUUM do?";

/// Oracle replies for one approved profile answer: exit check, then verdict
fn approve() -> Vec<&'static str> {
    vec!["continue", "valid"]
}

fn profile_script() -> Vec<&'static str> {
    let mut script = Vec::new();
    for _ in ANSWERS {
        script.extend(approve());
    }
    script.push(QUESTIONS);
    script
}

struct Harness {
    machine: IntakeStateMachine,
    oracle: Arc<FakeLlmClient>,
    dir: TempDir,
}

fn harness(script: Vec<&'static str>) -> Harness {
    let dir = TempDir::new().unwrap();
    let oracle = Arc::new(FakeLlmClient::scripted(script));
    let store = Arc::new(FileCandidateStore::new(dir.path()));
    let machine = IntakeStateMachine::new(oracle.clone(), store);
    Harness {
        machine,
        oracle,
        dir,
    }
}

/// Walk all seven profile fields; returns the session in assessment phase
fn complete_profile(h: &Harness) -> SessionState {
    let mut session = SessionState::default();
    for answer in ANSWERS {
        let turn = h.machine.process(&session, answer).unwrap();
        assert_eq!(turn.outcome, TurnOutcome::Continue);
        session = turn.session;
    }
    session
}

fn saved_files(dir: &TempDir) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}

#[test]
fn approved_answers_advance_through_catalog_in_order() {
    let h = harness(profile_script());
    let mut session = SessionState::default();

    for (idx, answer) in ANSWERS.iter().enumerate().take(6) {
        let field = ProfileField::ALL[idx];
        assert_eq!(session.current_field(), Some(field));

        let turn = h.machine.process(&session, answer).unwrap();
        let next = ProfileField::ALL[idx + 1];
        assert_eq!(turn.session.current_field(), Some(next));
        assert_eq!(turn.reply, next.prompt());
        assert_eq!(turn.session.record.get(field), Some(*answer));
        session = turn.session;
    }
}

#[test]
fn zero_experience_redirects_without_validation() {
    let h = harness(vec!["continue"]);
    let mut session = SessionState::default();
    session.phase = Phase::Profile(ProfileField::Experience);
    let before = session.clone();

    let turn = h.machine.process(&session, "0").unwrap();

    assert_eq!(
        turn.reply,
        format!(
            "For candidates with no experience, please type 'fresher'. {}",
            ProfileField::Experience.prompt()
        )
    );
    assert_eq!(turn.session.record, before.record);
    assert_eq!(turn.session.phase, before.phase);
    // exit check only; the validator never ran
    assert_eq!(h.oracle.call_count(), 1);
}

#[test]
fn exit_during_profile_returns_farewell_and_fresh_session() {
    let mut script = approve();
    script.push("exit");
    let h = harness(script);

    let first = h.machine.process(&SessionState::default(), "Jane Doe").unwrap();
    let session = first.session;
    let record_before = session.record.clone();

    let turn = h.machine.process(&session, "I'm done, bye").unwrap();

    assert_eq!(turn.outcome, TurnOutcome::Farewell);
    assert!(turn.reply.starts_with("Thank you for your time."));
    assert_eq!(session.record, record_before);
    assert_eq!(turn.session.record, CandidateRecord::default());
    assert_eq!(turn.session.current_field(), Some(ProfileField::Name));
    assert_ne!(turn.session.session_id, session.session_id);
    assert!(saved_files(&h.dir).is_empty());
}

#[test]
fn exit_during_assessment_discards_answers() {
    let mut script = profile_script();
    script.push("continue");
    script.push("exit");
    let h = harness(script);

    let session = complete_profile(&h);
    let turn = h.machine.process(&session, "Moves and borrows").unwrap();
    assert_eq!(turn.outcome, TurnOutcome::Continue);

    let turn = h.machine.process(&turn.session, "quit").unwrap();
    assert_eq!(turn.outcome, TurnOutcome::Farewell);
    assert!(!turn.session.in_assessment());
    assert!(saved_files(&h.dir).is_empty());
}

#[test]
fn tech_stack_approval_starts_assessment_once() {
    let h = harness(profile_script());
    let session = complete_profile(&h);

    // 7 exit checks + 7 verdicts + 1 generation
    assert_eq!(h.oracle.call_count(), 15);
    let generation_prompts = h
        .oracle
        .prompts()
        .iter()
        .filter(|p| p.starts_with("Generate 5 technical interview questions"))
        .count();
    assert_eq!(generation_prompts, 1);

    assert_eq!(session.phase, Phase::TechAssessment);
    assert_eq!(session.assessment.cursor(), 0);
    assert_eq!(session.assessment.len(), 5);
    assert!(session.record.technical_answers.is_none());
    assert_eq!(session.record.filled_fields(), 7);
}

#[test]
fn transition_reply_is_intro_plus_first_question() {
    let h = harness(profile_script());
    let mut session = SessionState::default();
    let mut last_reply = String::new();
    for answer in ANSWERS {
        let turn = h.machine.process(&session, answer).unwrap();
        last_reply = turn.reply;
        session = turn.session;
    }

    assert_eq!(
        last_reply,
        "Great! Now I'll ask you a few technical questions based on your tech stack.\n\nWhat is ownership in Rust?"
    );
}

#[test]
fn full_session_persists_once_and_round_trips() {
    let mut script = profile_script();
    script.push("continue");
    let h = harness(script);

    let mut session = complete_profile(&h);
    let questions: Vec<String> = session.assessment.questions().to_vec();
    let mut expected = session.record.clone();

    for (idx, question) in questions.iter().enumerate() {
        let answer = format!("answer {}", idx + 1);
        expected.record_answer(question.clone(), answer.clone());

        let turn = h.machine.process(&session, &answer).unwrap();
        if idx + 1 < questions.len() {
            assert_eq!(turn.outcome, TurnOutcome::Continue);
            assert_eq!(&turn.reply, &questions[idx + 1]);
            assert_eq!(turn.session.assessment.cursor(), idx + 1);
            session = turn.session;
        } else {
            let file_name = match &turn.outcome {
                TurnOutcome::Completed { file_name } => file_name.clone(),
                other => panic!("expected completion, got {:?}", other),
            };
            assert!(file_name.starts_with("candidate_"));
            assert!(file_name.ends_with(".txt"));
            assert_eq!(file_name.len(), "candidate_YYYYMMDD_HHMMSS.txt".len());
            assert!(turn.reply.contains(&file_name));
            assert_eq!(turn.session.record, CandidateRecord::default());

            let files = saved_files(&h.dir);
            assert_eq!(files.len(), 1);
            let loaded = FileCandidateStore::load(&files[0]).unwrap();
            assert_eq!(loaded, expected);

            let json: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
            let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
            assert_eq!(keys.len(), 8);
            assert_eq!(json["technical_answers"]["What is a Docker layer?"], "answer 3");
        }
    }
}

#[test]
fn short_question_list_runs_fewer_rounds() {
    let mut script = Vec::new();
    for _ in ANSWERS {
        script.extend(approve());
    }
    script.push("Only this one?");
    script.push("continue");
    let h = harness(script);

    let session = complete_profile(&h);
    assert_eq!(session.assessment.len(), 1);

    let turn = h.machine.process(&session, "Yes").unwrap();
    assert!(matches!(turn.outcome, TurnOutcome::Completed { .. }));
    assert_eq!(saved_files(&h.dir).len(), 1);
}

/// Tags text with the target code so tests can see what was translated
struct TaggingTranslator;

impl TranslationOracle for TaggingTranslator {
    fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslationError> {
        if source == target {
            return Ok(text.to_string());
        }
        Ok(format!("[{}] {}", target.code(), text))
    }
}

struct BrokenTranslator;

impl TranslationOracle for BrokenTranslator {
    fn translate(&self, _: &str, _: Language, _: Language) -> Result<String, TranslationError> {
        Err(TranslationError::Empty)
    }
}

#[test]
fn french_session_translates_replies_but_not_oracle_prompts() {
    let h = harness(vec!["continue", "invalid: missing last name"]);
    let machine = h.machine.with_localizer(Localizer::new(Arc::new(TaggingTranslator)));
    let session = SessionState::new(Language::French);

    let (greeting, _) = machine.greeting(&session);
    assert!(greeting.starts_with("[fr] Hello!"));

    let turn = machine.process(&session, "Jeanne").unwrap();
    assert!(turn.reply.starts_with("[fr] Invalid input: missing last name"));
    assert!(turn.warnings.is_empty());

    let prompts = h.oracle.prompts();
    assert!(prompts[0].contains("Message: 'Jeanne'"));
    assert!(prompts[1].starts_with("Input: 'Jeanne'\nIs this a valid full name?"));
}

#[test]
fn french_farewell_is_translated() {
    let h = harness(vec!["exit"]);
    let machine = h.machine.with_localizer(Localizer::new(Arc::new(TaggingTranslator)));

    let turn = machine
        .process(&SessionState::new(Language::French), "au revoir")
        .unwrap();
    assert!(turn.reply.starts_with("[fr] Thank you for your time."));
    assert_eq!(turn.session.language, Language::French);
}

#[test]
fn english_session_is_never_translated() {
    let h = harness(approve());
    let machine = h.machine.with_localizer(Localizer::new(Arc::new(TaggingTranslator)));

    let turn = machine.process(&SessionState::default(), "Jane Doe").unwrap();
    assert_eq!(turn.reply, ProfileField::Email.prompt());
}

#[test]
fn translation_failure_falls_back_with_warning() {
    let h = harness(approve());
    let machine = h.machine.with_localizer(Localizer::new(Arc::new(BrokenTranslator)));

    let turn = machine
        .process(&SessionState::new(Language::Japanese), "Jane Doe")
        .unwrap();
    assert_eq!(turn.reply, ProfileField::Email.prompt());
    assert_eq!(turn.warnings.len(), 1);
    assert_eq!(turn.session.current_field(), Some(ProfileField::Email));
}
