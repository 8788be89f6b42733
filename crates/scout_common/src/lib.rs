//! Scout Common - intake engine for the TalentScout hiring assistant
//!
//! Profile collection, oracle-driven validation, the generated technical
//! assessment, translation and resume intake. Front ends hold a
//! `SessionState` and feed it through `IntakeStateMachine::process`.

pub mod assessment;
pub mod catalog;
pub mod config;
pub mod error;
pub mod exit_intent;
pub mod llm_client;
pub mod persistence;
pub mod record;
pub mod resume;
pub mod session;
pub mod translation;
pub mod validator;

pub use catalog::ProfileField;
pub use config::ScoutConfig;
pub use error::{ConfigError, IntakeError};
pub use llm_client::{FakeLlmClient, HttpLlmClient, LanguageOracle, LlmConfig, LlmError};
pub use persistence::{CandidateStore, FileCandidateStore};
pub use record::CandidateRecord;
pub use session::{IntakeStateMachine, Phase, SessionState, Turn, TurnOutcome};
pub use translation::{Language, LlmTranslator, Localizer, TranslationOracle};
pub use validator::FieldVerdict;
