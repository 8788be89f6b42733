//! Field validation through the oracle
//!
//! No local format checks are made; the verdict is whatever the oracle says,
//! parsed fail-closed into a `FieldVerdict`.

use crate::catalog::ProfileField;
use crate::llm_client::{LanguageOracle, LlmError};

/// Parsed oracle verdict for one answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldVerdict {
    Approved,
    /// Rejected, with the oracle's explanation (may be empty)
    Rejected(String),
    /// Reply followed neither convention; carries the raw reply
    Malformed(String),
}

impl FieldVerdict {
    /// Classify a raw oracle reply.
    ///
    /// `invalid` is checked first since it does not start with `valid`.
    pub fn parse(reply: &str) -> Self {
        let trimmed = reply.trim();

        if starts_with_ignore_case(trimmed, "invalid") {
            let detail = if starts_with_ignore_case(trimmed, "invalid:") {
                trimmed["invalid:".len()..].trim().to_string()
            } else {
                String::new()
            };
            return FieldVerdict::Rejected(detail);
        }

        if starts_with_ignore_case(trimmed, "valid") {
            return FieldVerdict::Approved;
        }

        FieldVerdict::Malformed(trimmed.to_string())
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, FieldVerdict::Approved)
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

/// Prompt sent to the oracle; always in the working language, with the
/// candidate's raw text embedded untranslated.
pub fn validation_prompt(field: ProfileField, raw: &str) -> String {
    format!("Input: '{}'\n{}", raw, field.validation_instruction())
}

pub fn validate(
    oracle: &dyn LanguageOracle,
    field: ProfileField,
    raw: &str,
) -> Result<FieldVerdict, LlmError> {
    let reply = oracle.complete(&validation_prompt(field, raw))?;
    let verdict = FieldVerdict::parse(&reply);

    match &verdict {
        FieldVerdict::Malformed(raw_reply) => {
            tracing::warn!(%field, reply = %raw_reply, "oracle verdict did not follow valid/invalid convention");
        }
        other => tracing::debug!(%field, verdict = ?other, "field validated"),
    }

    Ok(verdict)
}
