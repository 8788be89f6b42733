//! TalentScout configuration
//!
//! Configuration lives in `$XDG_CONFIG_HOME/talentscout/config.toml` unless a
//! path is given explicitly. Every key has a default, so an empty or missing
//! file is a valid configuration.

use crate::error::ConfigError;
use crate::llm_client::LlmConfig;
use crate::translation::Language;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "talentscout";
const CONFIG_FILE: &str = "config.toml";

/// Session behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Display language code, see `Language`
    #[serde(default = "default_language")]
    pub language: String,

    /// Rejected answers allowed per field before hand-off to a human (0 = unbounded)
    #[serde(default)]
    pub max_attempts: u32,

    /// Directory for candidate files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl SessionSettings {
    pub fn effective_max_attempts(&self) -> Option<u32> {
        match self.max_attempts {
            0 => None,
            n => Some(n),
        }
    }

    pub fn language(&self) -> Result<Language, ConfigError> {
        self.language
            .parse()
            .map_err(ConfigError::UnknownLanguage)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
            max_attempts: 0,
            output_dir: default_output_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub log: LogConfig,
}

impl ScoutConfig {
    /// `$XDG_CONFIG_HOME/talentscout/config.toml`, if a config dir exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default path if present, or defaults.
    ///
    /// An explicit path must exist; the default path may be missing.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load_from(p),
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::load_from(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ScoutConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        // reject unknown language codes at load time
        config.session.language()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
