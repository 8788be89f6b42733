//! Error types for the intake library

use crate::llm_client::LlmError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a conversational turn or of persistence.
///
/// Rejected answers and translation failures are not errors; they are
/// handled inside the turn.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("language model call failed: {0}")]
    Oracle(#[from] LlmError),

    #[error("failed to write candidate record {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read candidate record {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("candidate record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration load/save failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unknown language code '{0}'")]
    UnknownLanguage(String),
}
