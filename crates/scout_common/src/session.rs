//! Intake session - the conversation state machine
//!
//! ## Flow
//!
//! Each turn first asks the oracle whether the candidate wants to leave. If
//! not, the answer is validated against the current profile field, or, once
//! the tech stack is in, recorded against the current assessment question.
//!
//! ## Context passing
//!
//! `process` borrows the caller's `SessionState` and returns the next one in
//! the `Turn`. A failed oracle call returns `Err` and the caller simply keeps
//! the state it already has, so a turn either fully happens or not at all.
//! Terminal turns (farewell, completion, escalation) return a fresh session.

use crate::assessment::{self, AssessmentStep, TechAssessment};
use crate::catalog::{ProfileField, FRESHER_REDIRECT, PHONE_HELP};
use crate::error::IntakeError;
use crate::exit_intent;
use crate::llm_client::LanguageOracle;
use crate::persistence::CandidateStore;
use crate::record::CandidateRecord;
use crate::translation::{Language, Localizer};
use crate::validator::{self, FieldVerdict};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const GREETING: &str = "Hello! I'm the TalentScout Hiring Assistant. I'll help you submit your application by asking a few questions. ";

pub const FAREWELL: &str = "Thank you for your time. Feel free to come back when you're ready to continue the application process. Have a great day!";

pub const ASSESSMENT_INTRO: &str =
    "Great! Now I'll ask you a few technical questions based on your tech stack.";

fn completion_message(file_name: &str) -> String {
    format!(
        "Thank you for completing the technical assessment! Your details and answers have been saved to {}. Our recruitment team will review your profile and get back to you soon.",
        file_name
    )
}

fn escalation_message(file_name: &str) -> String {
    format!(
        "I wasn't able to verify your answer after several attempts. Your details so far have been saved to {} and a member of our recruitment team will follow up with you directly.",
        file_name
    )
}

/// Where the conversation currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Collecting this profile field
    Profile(ProfileField),
    /// Administering generated questions
    TechAssessment,
}

/// Per-conversation state, owned by the front end between turns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: Uuid,
    pub phase: Phase,
    pub record: CandidateRecord,
    pub assessment: TechAssessment,
    pub language: Language,
    /// Rejected answers for the current field
    pub attempts: u32,
}

impl SessionState {
    pub fn new(language: Language) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            phase: Phase::Profile(ProfileField::first()),
            record: CandidateRecord::default(),
            assessment: TechAssessment::default(),
            language,
            attempts: 0,
        }
    }

    pub fn current_field(&self) -> Option<ProfileField> {
        match self.phase {
            Phase::Profile(field) => Some(field),
            Phase::TechAssessment => None,
        }
    }

    pub fn in_assessment(&self) -> bool {
        self.phase == Phase::TechAssessment
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

/// How a turn ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue,
    /// Candidate asked to leave; nothing was saved
    Farewell,
    /// Assessment finished and the record was saved
    Completed { file_name: String },
    /// Retry limit reached; partial record saved for human review
    Escalated { file_name: String },
}

impl TurnOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TurnOutcome::Continue)
    }
}

/// Result of one successful turn
#[derive(Debug, Clone)]
pub struct Turn {
    /// State to hand back on the next turn
    pub session: SessionState,
    /// Bot reply, already localised
    pub reply: String,
    pub outcome: TurnOutcome,
    /// Non-fatal problems to surface, e.g. translation fallback
    pub warnings: Vec<String>,
}

/// Drives one candidate through profile collection and the assessment
pub struct IntakeStateMachine {
    oracle: Arc<dyn LanguageOracle>,
    store: Arc<dyn CandidateStore>,
    localizer: Localizer,
    max_attempts: Option<u32>,
}

impl IntakeStateMachine {
    pub fn new(oracle: Arc<dyn LanguageOracle>, store: Arc<dyn CandidateStore>) -> Self {
        Self {
            oracle,
            store,
            localizer: Localizer::identity(),
            max_attempts: None,
        }
    }

    pub fn with_localizer(mut self, localizer: Localizer) -> Self {
        self.localizer = localizer;
        self
    }

    /// `None` re-asks forever, which is the default
    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Opening message for a new session, with any translation warning
    pub fn greeting(&self, session: &SessionState) -> (String, Option<String>) {
        let text = format!("{}{}", GREETING, ProfileField::first().prompt());
        let localized = self.localizer.localize(&text, session.language);
        (localized.text, localized.warning)
    }

    /// Localise arbitrary bot text in the session's language
    pub fn localize(&self, session: &SessionState, text: &str) -> (String, Option<String>) {
        let localized = self.localizer.localize(text, session.language);
        (localized.text, localized.warning)
    }

    /// Process one candidate turn
    pub fn process(&self, session: &SessionState, input: &str) -> Result<Turn, IntakeError> {
        let span = tracing::info_span!("turn", session = %session.session_id);
        let _guard = span.enter();

        // exit check always sees the raw input
        if exit_intent::is_exit(self.oracle.as_ref(), input)? {
            info!(phase = ?session.phase, "candidate asked to exit");
            return Ok(self.finish_turn(session.clone(), FAREWELL.to_string(), TurnOutcome::Farewell));
        }

        let mut next = session.clone();
        let (reply, outcome) = match next.phase {
            Phase::TechAssessment => self.answer_question(&mut next, input)?,
            Phase::Profile(field) => self.answer_field(&mut next, field, input)?,
        };

        Ok(self.finish_turn(next, reply, outcome))
    }

    fn finish_turn(&self, session: SessionState, reply: String, outcome: TurnOutcome) -> Turn {
        let localized = self.localizer.localize(&reply, session.language);
        let session = if outcome.is_terminal() {
            SessionState::new(session.language)
        } else {
            session
        };

        Turn {
            session,
            reply: localized.text,
            outcome,
            warnings: localized.warning.into_iter().collect(),
        }
    }

    fn answer_field(
        &self,
        session: &mut SessionState,
        field: ProfileField,
        input: &str,
    ) -> Result<(String, TurnOutcome), IntakeError> {
        if field == ProfileField::Experience && input == "0" {
            return Ok((
                format!("{}{}", FRESHER_REDIRECT, field.prompt()),
                TurnOutcome::Continue,
            ));
        }

        let verdict = validator::validate(self.oracle.as_ref(), field, input)?;
        let retry_reply = match verdict {
            FieldVerdict::Approved => None,
            FieldVerdict::Rejected(detail) => Some(if field == ProfileField::Phone {
                format!("Invalid input: {}\n\n{}", detail, PHONE_HELP)
            } else {
                format!(
                    "Invalid input: {}\n\nPlease answer again: {}",
                    detail,
                    field.prompt()
                )
            }),
            FieldVerdict::Malformed(_) => Some(format!(
                "Sorry, I couldn't verify that answer.\n\nPlease answer again: {}",
                field.prompt()
            )),
        };

        if let Some(reply) = retry_reply {
            session.attempts += 1;
            if let Some(max) = self.max_attempts {
                if session.attempts >= max {
                    warn!(%field, attempts = session.attempts, "retry limit reached, escalating");
                    let file_name = self.store.save(&session.record)?;
                    return Ok((escalation_message(&file_name), TurnOutcome::Escalated { file_name }));
                }
            }
            return Ok((reply, TurnOutcome::Continue));
        }

        session.record.set(field, input);
        session.attempts = 0;

        match field.next() {
            Some(next_field) => {
                debug!(from = %field, to = %next_field, "field accepted");
                session.phase = Phase::Profile(next_field);
                Ok((next_field.prompt().to_string(), TurnOutcome::Continue))
            }
            None => self.start_assessment(session, input),
        }
    }

    fn start_assessment(
        &self,
        session: &mut SessionState,
        tech_stack: &str,
    ) -> Result<(String, TurnOutcome), IntakeError> {
        let questions = assessment::generate(self.oracle.as_ref(), tech_stack)?;
        info!(questions = questions.len(), "profile complete, starting assessment");

        session.assessment = TechAssessment::new(questions);
        session.phase = Phase::TechAssessment;

        match session.assessment.current() {
            Some(first) => Ok((
                format!("{}\n\n{}", ASSESSMENT_INTRO, first),
                TurnOutcome::Continue,
            )),
            None => {
                warn!("no assessment questions generated, completing without assessment");
                self.complete(session)
            }
        }
    }

    fn answer_question(
        &self,
        session: &mut SessionState,
        input: &str,
    ) -> Result<(String, TurnOutcome), IntakeError> {
        let step = session
            .assessment
            .submit_answer(&mut session.record, input);

        match step {
            AssessmentStep::Next(question) => {
                debug!(cursor = session.assessment.cursor(), "answer recorded");
                Ok((question, TurnOutcome::Continue))
            }
            AssessmentStep::Finished => self.complete(session),
        }
    }

    fn complete(&self, session: &SessionState) -> Result<(String, TurnOutcome), IntakeError> {
        let file_name = self.store.save(&session.record)?;
        info!(file = %file_name, "intake complete");
        Ok((completion_message(&file_name), TurnOutcome::Completed { file_name }))
    }
}
