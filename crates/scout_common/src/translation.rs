//! Translation layer for the multilingual variant
//!
//! Only bot-facing text is translated. Prompts sent to the oracle for
//! validation and exit detection stay in English with the candidate's raw
//! text embedded as typed.

use crate::llm_client::{LanguageOracle, LlmError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Closed set of display languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "zh-CN")]
    Chinese,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "ru")]
    Russian,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::English,
        Language::Hindi,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Chinese,
        Language::Japanese,
        Language::Korean,
        Language::Arabic,
        Language::Russian,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Chinese => "zh-CN",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::Arabic => "ar",
            Language::Russian => "ru",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Chinese => "Chinese",
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
            Language::Arabic => "Arabic",
            Language::Russian => "Russian",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    /// Accepts the code ("fr", "zh-CN", "zh") or the English name ("French")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("zh") {
            return Ok(Language::Chinese);
        }
        Language::ALL
            .iter()
            .copied()
            .find(|l| {
                l.code().eq_ignore_ascii_case(wanted) || l.display_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranslationError {
    #[error("translation backend failed: {0}")]
    Backend(#[from] LlmError),

    #[error("translation backend returned nothing")]
    Empty,
}

pub trait TranslationOracle: Send + Sync {
    fn translate(&self, text: &str, source: Language, target: Language)
        -> Result<String, TranslationError>;
}

/// Translator backed by the completion oracle
pub struct LlmTranslator {
    oracle: Arc<dyn LanguageOracle>,
}

impl LlmTranslator {
    pub fn new(oracle: Arc<dyn LanguageOracle>) -> Self {
        Self { oracle }
    }

    fn prompt(text: &str, source: Language, target: Language) -> String {
        format!(
            "Translate the following text from {} to {}. \
             Keep line breaks, numbering and placeholders such as file names unchanged. \
             Respond with only the translation.\n\n{}",
            source.display_name(),
            target.display_name(),
            text
        )
    }
}

impl TranslationOracle for LlmTranslator {
    fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, TranslationError> {
        if source == target || text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let reply = self.oracle.complete(&Self::prompt(text, source, target))?;
        let translated = reply.trim();
        if translated.is_empty() {
            return Err(TranslationError::Empty);
        }
        Ok(translated.to_string())
    }
}

/// Bot text after localisation, with a warning when translation fell back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localized {
    pub text: String,
    pub warning: Option<String>,
}

/// Localises bot-facing text from the English base strings
#[derive(Clone, Default)]
pub struct Localizer {
    translator: Option<Arc<dyn TranslationOracle>>,
}

impl Localizer {
    /// English only; every call is the identity
    pub fn identity() -> Self {
        Self { translator: None }
    }

    pub fn new(translator: Arc<dyn TranslationOracle>) -> Self {
        Self {
            translator: Some(translator),
        }
    }

    /// Translate `text` into `language`, falling back to the original text
    pub fn localize(&self, text: &str, language: Language) -> Localized {
        let translator = match (&self.translator, language) {
            (_, Language::English) | (None, _) => {
                return Localized {
                    text: text.to_string(),
                    warning: None,
                }
            }
            (Some(t), _) => t,
        };

        match translator.translate(text, Language::English, language) {
            Ok(translated) => Localized {
                text: translated,
                warning: None,
            },
            Err(e) => {
                tracing::warn!(language = %language, error = %e, "translation failed, showing English text");
                Localized {
                    text: text.to_string(),
                    warning: Some(format!(
                        "Translation to {} failed ({}); showing the original text.",
                        language.display_name(),
                        e
                    )),
                }
            }
        }
    }
}
