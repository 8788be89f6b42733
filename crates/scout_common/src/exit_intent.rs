//! Exit-intent detection

use crate::llm_client::{LanguageOracle, LlmError};

fn exit_prompt(message: &str) -> String {
    format!(
        "Check if this message indicates the user wants to exit or stop the conversation.\n\
         Message: '{}'\n\
         Common exit phrases include: exit, quit, stop, bye, don't want to continue, not interested, etc.\n\
         Respond with only 'exit' or 'continue'",
        message
    )
}

/// Ask the oracle whether `message` means the candidate wants to stop.
///
/// Only a reply of exactly `exit` (after trimming, any case) counts; anything
/// else, malformed replies included, means continue.
pub fn is_exit(oracle: &dyn LanguageOracle, message: &str) -> Result<bool, LlmError> {
    let reply = oracle.complete(&exit_prompt(message))?;
    let exit = reply.trim().eq_ignore_ascii_case("exit");
    tracing::debug!(exit, "exit-intent check");
    Ok(exit)
}
