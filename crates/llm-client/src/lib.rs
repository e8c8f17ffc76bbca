//! Language-model client for the recommendation pipeline.
//!
//! This crate provides:
//! - The `LanguageModel` trait every LLM-backed stage depends on
//! - `GroqClient`, a client for Groq's OpenAI-compatible chat completions API
//! - Helpers for coaxing typed JSON out of free-form completions
//! - A scripted `MockLanguageModel` for tests

pub mod error;
pub mod json;
pub mod mock;

pub use error::{LlmError, Result};
pub use json::{extract_json, format_instructions, parse_model_json};
pub use mock::MockLanguageModel;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// A text-in, text-out language model.
///
/// Implementations make no promise that the text is valid JSON even when the
/// prompt asks for it; callers go through `complete_json` and treat parse
/// failures like any other failed call.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Returns the name of the backing model (for logging)
    fn model_name(&self) -> &str;

    /// Complete a single user prompt and return the raw completion text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Complete `prompt` and deserialize the answer into `T`.
pub async fn complete_json<T: DeserializeOwned>(
    model: &dyn LanguageModel,
    prompt: &str,
) -> Result<T> {
    let raw = model.complete(prompt).await?;
    parse_model_json(&raw)
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_content(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

// =============================================================================
// GroqClient
// =============================================================================

/// Client for Groq's OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct GroqClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl GroqClient {
    /// Create a client with the default model and temperature.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Reuse an existing HTTP client (shares its connection pool and timeout).
    pub fn with_http_client(mut self, http_client: Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// Set a custom base URL (proxies, other OpenAI-compatible services).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

#[async_trait]
impl LanguageModel for GroqClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let start = std::time::Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "LLM request failed");
                LlmError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %body, "LLM API error");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            duration_ms = start.elapsed().as_millis(),
            "LLM chat completion"
        );

        chat_response.into_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = GroqClient::new("gsk-test")
            .with_base_url("https://proxy.example.com/v1/")
            .with_model("llama-3.1-8b-instant")
            .with_temperature(0.2);

        assert_eq!(client.api_key, "gsk-test");
        assert_eq!(client.base_url(), "https://proxy.example.com/v1");
        assert_eq!(client.model_name(), "llama-3.1-8b-instant");
        assert_eq!(client.temperature(), 0.2);
    }

    #[test]
    fn test_client_defaults() {
        let client = GroqClient::new("gsk-test");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.model_name(), DEFAULT_MODEL);
        assert_eq!(client.temperature(), DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_chat_request_shape() {
        let request = ChatRequest {
            model: DEFAULT_MODEL,
            messages: vec![ChatMessage { role: "user", content: "hi" }],
            temperature: 0.5,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], DEFAULT_MODEL);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_chat_response_content() {
        let raw = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"{\"a\":1}"}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.into_content().unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_chat_response_without_choices_is_empty() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(response.into_content(), Err(LlmError::EmptyResponse)));

        let raw = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(matches!(response.into_content(), Err(LlmError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_complete_json_through_trait_object() {
        let model = MockLanguageModel::new().with_response("```json\n{\"products\": []}\n```");
        let value: serde_json::Value = complete_json(&model, "prompt").await.unwrap();
        assert_eq!(value["products"], serde_json::json!([]));
    }
}
