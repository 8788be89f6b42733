//! Technical assessment - question generation and administration
//!
//! The oracle is asked for five questions separated by `||`. Whatever comes
//! back is split, trimmed and used as-is; a short list means a shorter
//! assessment.

use crate::llm_client::{LanguageOracle, LlmError};
use crate::record::CandidateRecord;
use serde::{Deserialize, Serialize};

/// Number of questions requested from the oracle
pub const QUESTION_COUNT: usize = 5;

pub const QUESTION_DELIMITER: &str = "||";

fn generation_prompt(tech_stack: &str) -> String {
    format!(
        "Generate {count} technical interview questions based on these technologies: {stack}.\n\
         Questions should be:\n\
         1. Specific to the mentioned technologies\n\
         2. Mix of basic and intermediate level\n\
         3. Focus on practical knowledge\n\
         4. One question at a time\n\n\
         For example, if tech_stack includes \"Python\", ask about generators, decorators, etc.\n\
         If it includes \"React\", ask about hooks, virtual DOM, etc.\n\n\
         Return exactly {count} questions separated by {delim}",
        count = QUESTION_COUNT,
        stack = tech_stack,
        delim = QUESTION_DELIMITER,
    )
}

/// Split a raw oracle reply into questions, dropping empty pieces
pub fn parse_questions(reply: &str) -> Vec<String> {
    reply
        .trim()
        .split(QUESTION_DELIMITER)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .collect()
}

/// One oracle call for the whole question list
pub fn generate(oracle: &dyn LanguageOracle, tech_stack: &str) -> Result<Vec<String>, LlmError> {
    let reply = oracle.complete(&generation_prompt(tech_stack))?;
    let questions = parse_questions(&reply);

    if questions.len() != QUESTION_COUNT {
        tracing::warn!(
            expected = QUESTION_COUNT,
            got = questions.len(),
            "oracle returned an unexpected number of assessment questions"
        );
    } else {
        tracing::debug!(count = questions.len(), "assessment questions generated");
    }

    Ok(questions)
}

/// Result of submitting one answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssessmentStep {
    /// Ask this question next
    Next(String),
    /// Every question has been answered
    Finished,
}

/// Generated questions and the cursor over them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechAssessment {
    questions: Vec<String>,
    cursor: usize,
}

impl TechAssessment {
    pub fn new(questions: Vec<String>) -> Self {
        Self {
            questions,
            cursor: 0,
        }
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.questions.len()
    }

    pub fn current(&self) -> Option<&str> {
        self.questions.get(self.cursor).map(String::as_str)
    }

    /// Store `answer` verbatim under the current question and advance
    pub fn submit_answer(&mut self, record: &mut CandidateRecord, answer: &str) -> AssessmentStep {
        if let Some(question) = self.current() {
            record.record_answer(question, answer);
            self.cursor += 1;
        }

        match self.current() {
            Some(next) => AssessmentStep::Next(next.to_string()),
            None => AssessmentStep::Finished,
        }
    }
}
