//! LLM Client - the text-completion oracle
//!
//! Every judgment the intake makes (exit intent, field validity, assessment
//! questions, translation, resume extraction) goes through `LanguageOracle`.
//! Supports an OpenAI-compatible chat endpoint (Groq by default), a local
//! Ollama endpoint, and a scripted fake client for testing.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL, e.g. "https://api.groq.com/openai/v1" or "http://localhost:11434"
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature, fixed for the life of the client
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Environment variable holding the API key (not needed for Ollama)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_api_key_env() -> Option<String> {
    Some("GROQ_API_KEY".to_string())
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// LLM errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("LLM returned empty response")]
    EmptyResponse,

    #[error("API key variable {0} is not set")]
    MissingApiKey(String),
}

/// Synchronous text-in/text-out completion.
///
/// No schema is enforced on the response; callers parse the informal
/// conventions (`valid`/`invalid:`, `||` lists, `exit`/`continue`) themselves.
pub trait LanguageOracle: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Real LLM client implementation using HTTP
pub struct HttpLlmClient {
    config: LlmConfig,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpLlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        let api_key = match &config.api_key_env {
            Some(var) => match std::env::var(var) {
                Ok(key) if !key.is_empty() => Some(key),
                _ if Self::is_ollama(&config.endpoint) => None,
                _ => return Err(LlmError::MissingApiKey(var.clone())),
            },
            None => None,
        };

        Ok(Self { config, api_key, client })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Check if endpoint is Ollama-style
    fn is_ollama(endpoint: &str) -> bool {
        endpoint.contains("11434") || endpoint.contains("ollama")
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.config.timeout_secs)
        } else {
            LlmError::HttpError(format!("Request failed: {}", e))
        }
    }

    /// Call Ollama-style API
    fn call_ollama(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.config.endpoint.trim_end_matches('/'));

        let request_body = serde_json::json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
            "options": { "temperature": self.config.temperature },
        });

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(LlmError::HttpError(format!(
                "HTTP {} from Ollama",
                response.status()
            )));
        }

        let response_json: serde_json::Value = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        response_json
            .get("response")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or(LlmError::EmptyResponse)
    }

    /// Call OpenAI-compatible API
    fn call_openai_compatible(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        );

        let request_body = serde_json::json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": [
                {"role": "user", "content": prompt},
            ],
        });

        let mut request = self.client.post(&url).json(&request_body);

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(LlmError::HttpError(format!(
                "HTTP {} from OpenAI-compatible API",
                response.status()
            )));
        }

        let response_json: serde_json::Value = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        response_json
            .get("choices")
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("message"))
            .and_then(|v| v.get("content"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or(LlmError::EmptyResponse)
    }
}

impl LanguageOracle for HttpLlmClient {
    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        tracing::debug!(model = %self.config.model, prompt_chars = prompt.len(), "oracle call");

        if Self::is_ollama(&self.config.endpoint) {
            self.call_ollama(prompt)
        } else {
            self.call_openai_compatible(prompt)
        }
    }
}

/// Fake LLM client for testing
///
/// Responses are handed out in order; the last one repeats once the script
/// runs down to a single entry. Every prompt is recorded.
pub struct FakeLlmClient {
    responses: Mutex<Vec<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeLlmClient {
    /// Create a fake client with pre-defined responses
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a fake client from plain text replies
    pub fn scripted<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// Create a fake client that always returns the same text
    pub fn always(reply: impl Into<String>) -> Self {
        Self::new(vec![Ok(reply.into())])
    }

    /// Create a fake client that always returns an error
    pub fn always_error(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Get the number of calls made
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl LanguageOracle for FakeLlmClient {
    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let mut responses = self
            .responses
            .lock()
            .map_err(|_| LlmError::HttpError("fake client poisoned".to_string()))?;

        match responses.len() {
            0 => Err(LlmError::EmptyResponse),
            1 => responses[0].clone(),
            _ => responses.remove(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_config_default() {
        let config = LlmConfig::default();
        assert_eq!(config.endpoint, "https://api.groq.com/openai/v1");
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert!((config.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.api_key_env.as_deref(), Some("GROQ_API_KEY"));
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_ollama_detection() {
        assert!(HttpLlmClient::is_ollama("http://localhost:11434"));
        assert!(HttpLlmClient::is_ollama("http://ollama.internal"));
        assert!(!HttpLlmClient::is_ollama("https://api.groq.com/openai/v1"));
    }

    #[test]
    fn test_missing_api_key_for_remote_endpoint() {
        let config = LlmConfig {
            api_key_env: Some("SCOUT_TEST_KEY_THAT_IS_NEVER_SET".to_string()),
            ..LlmConfig::default()
        };
        let result = HttpLlmClient::new(config);
        assert!(matches!(result, Err(LlmError::MissingApiKey(_))));
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let config = LlmConfig {
            endpoint: "http://localhost:11434".to_string(),
            api_key_env: Some("SCOUT_TEST_KEY_THAT_IS_NEVER_SET".to_string()),
            ..LlmConfig::default()
        };
        assert!(HttpLlmClient::new(config).is_ok());
    }

    #[test]
    fn test_fake_client_always() {
        let client = FakeLlmClient::always("valid");

        assert_eq!(client.complete("first").unwrap(), "valid");
        assert_eq!(client.complete("second").unwrap(), "valid");
        assert_eq!(client.call_count(), 2);
        assert_eq!(client.prompts(), vec!["first", "second"]);
    }

    #[test]
    fn test_fake_client_always_error() {
        let client = FakeLlmClient::always_error(LlmError::Timeout(5));

        let result = client.complete("prompt");
        assert_eq!(result, Err(LlmError::Timeout(5)));
        assert_eq!(client.call_count(), 1);
    }

    #[test]
    fn test_fake_client_scripted_sequence() {
        let client = FakeLlmClient::new(vec![
            Ok("continue".to_string()),
            Ok("valid".to_string()),
            Err(LlmError::EmptyResponse),
        ]);

        assert_eq!(client.complete("").unwrap(), "continue");
        assert_eq!(client.complete("").unwrap(), "valid");
        assert!(client.complete("").is_err());
        // last entry repeats
        assert!(client.complete("").is_err());
        assert_eq!(client.call_count(), 4);
    }
}
