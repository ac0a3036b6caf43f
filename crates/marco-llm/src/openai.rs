//! OpenAI Provider Implementation
//!
//! Talks to an OpenAI-compatible `/v1/chat/completions` endpoint.
//!
//! # Features
//!
//! - Blocking HTTP communication (callers run it off the async executor)
//! - Greedy decoding: temperature is always zero
//! - Bounded request timeout
//! - No retries; the caller decides whether to rerun an analysis
//!
//! # Examples
//!
//! ```no_run
//! use marco_llm::OpenAiProvider;
//! use marco_domain::traits::LlmProvider;
//! use std::time::Duration;
//!
//! let provider = OpenAiProvider::from_env(Duration::from_secs(120)).unwrap();
//! let text = provider.generate("gpt-4o", "Say hello").unwrap();
//! ```

use crate::LlmError;
use marco_domain::traits::LlmProvider as LlmProviderTrait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Default timeout for LLM requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Sampling temperature for every request
pub const TEMPERATURE: f32 = 0.0;

/// OpenAI chat-completions provider
pub struct OpenAiProvider {
    base_url: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `base_url`: API root (e.g., "https://api.openai.com")
    /// - `api_key`: bearer token
    /// - `timeout`: upper bound for a whole request
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout,
            client,
        })
    }

    /// Create a provider from `OPENAI_API_KEY` and, if set, `OPENAI_BASE_URL`
    pub fn from_env(timeout: Duration) -> Result<Self, LlmError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::Authentication(format!("{} is not set", API_KEY_ENV)))?;
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url, api_key, timeout)
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Send one chat completion request and return the message text
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The request times out or cannot be sent
    /// - The key is rejected (401/403) or rate limited (429)
    /// - The model does not exist (404)
    /// - The response body is not a chat completion
    pub fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let body = ChatRequest {
            model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: TEMPERATURE,
        };

        debug!("POST {} (model {}, {} prompt chars)", self.endpoint(), model, prompt.len());

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout)
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_status(status, error_text, model));
        }

        let parsed: ChatResponse = response.json().map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.timeout)
            } else {
                LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
            }
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Response contained no message content".to_string()))
    }
}

/// Map a non-success HTTP status to an error
fn classify_status(status: StatusCode, body: String, model: &str) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            LlmError::Authentication(format!("HTTP {}: {}", status, body))
        }
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded(body),
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            LlmError::Communication(format!("HTTP {}: upstream timeout", status))
        }
        _ => LlmError::Communication(format!("HTTP {}: {}", status, body)),
    }
}

impl LlmProviderTrait for OpenAiProvider {
    type Error = LlmError;

    fn generate(&self, model: &str, prompt: &str) -> Result<String, Self::Error> {
        self.complete(model, prompt)
    }

    fn backend_name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = OpenAiProvider::new("https://api.example.com/", "sk-test", Duration::from_secs(5)).unwrap();
        assert_eq!(provider.base_url, "https://api.example.com");
        assert_eq!(provider.endpoint(), "https://api.example.com/v1/chat/completions");
        assert_eq!(provider.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_request_body_has_zero_temperature() {
        let body = ChatRequest {
            model: "gpt-4o",
            messages: vec![ChatMessage { role: "user", content: "hi" }],
            temperature: TEMPERATURE,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["temperature"], serde_json::json!(0.0));
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, "bad key".into(), "gpt-4o"),
            LlmError::Authentication(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, "slow down".into(), "gpt-4o"),
            LlmError::RateLimitExceeded(_)
        ));
        match classify_status(StatusCode::NOT_FOUND, String::new(), "gpt-4o-mini") {
            LlmError::ModelNotAvailable(model) => assert_eq!(model, "gpt-4o-mini"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".into(), "gpt-4o"),
            LlmError::Communication(_)
        ));
    }

    #[test]
    fn test_response_parsing() {
        let body = r##"{"choices":[{"message":{"role":"assistant","content":"# A\nk: v"}}]}"##;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("# A\nk: v"));
    }

    #[test]
    fn test_connection_refused_is_communication_error() {
        let provider = OpenAiProvider::new("http://127.0.0.1:1", "sk-test", Duration::from_secs(2)).unwrap();
        let result = provider.complete("gpt-4o", "test");
        assert!(matches!(result, Err(LlmError::Communication(_)) | Err(LlmError::Timeout(_))));
    }

    #[test]
    #[ignore] // needs network access and OPENAI_API_KEY
    fn test_openai_generate_integration() {
        let provider = OpenAiProvider::from_env(Duration::from_secs(60)).unwrap();
        let response = provider.generate("gpt-4o-mini", "Reply with the word hello").unwrap();
        assert!(!response.is_empty());
    }
}
