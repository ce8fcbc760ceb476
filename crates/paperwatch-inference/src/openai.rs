//! OpenAI-compatible summarizer backend.
//!
//! Serves both the `openai` provider and `google` (Gemini exposes an
//! OpenAI-compatible surface), differing only in endpoint, key, and model.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use paperwatch_core::{Error, Result, Summarizer};

use crate::prompt::{build_prompt, SYSTEM_PROMPT};

/// Default OpenAI API endpoint.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Gemini's OpenAI-compatible endpoint.
pub const GEMINI_OPENAI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Default model for the `openai` provider.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Default model for the `google` provider.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Sampling temperature for summary generation. Low keeps the four-section
/// structure stable across papers.
const SUMMARY_TEMPERATURE: f32 = 0.3;

/// Configuration for an OpenAI-compatible summarizer.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Model to use for chat completions.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Summarizer over an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiSummarizer {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiSummarizer {
    /// Create a new summarizer with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "openai",
            base_url = %config.base_url,
            model = %config.model,
            "Initializing chat-completions summarizer"
        );

        Ok(Self { client, config })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Build the completions request with bearer authentication.
    fn build_request(&self) -> reqwest::RequestBuilder {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        self.client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, abstract_text: &str) -> Result<String> {
        let start = Instant::now();

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(abstract_text),
                },
            ],
            temperature: SUMMARY_TEMPERATURE,
        };

        let response = self
            .build_request()
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Provider returned {}: {}",
                status, body
            )));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Inference("Response contained no choices".to_string()))?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            subsystem = "inference",
            component = "openai",
            op = "summarize",
            model = %self.config.model,
            response_len = content.len(),
            duration_ms = elapsed,
            "Summary generated"
        );
        if elapsed > 30000 {
            warn!(
                subsystem = "inference",
                component = "openai",
                duration_ms = elapsed,
                slow = true,
                "Slow summary generation"
            );
        }
        Ok(content)
    }
}

/// Request body for the chat-completions endpoint.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response from the chat-completions endpoint.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// Single completion choice.
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenAiConfig::default();
        assert_eq!(config.base_url, DEFAULT_OPENAI_URL);
        assert_eq!(config.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECS);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_gemini_endpoint_is_openai_compatible() {
        assert!(GEMINI_OPENAI_URL.ends_with("/openai"));
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "Summarize this".to_string(),
            }],
            temperature: 0.3,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("gpt-4o-mini"));
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"temperature\":0.3"));
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "A summary."}, "finish_reason": "stop"}
            ]
        }"#;
        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "A summary.");
    }

    #[test]
    fn test_trailing_slash_trimmed_in_request_url() {
        let summarizer = OpenAiSummarizer::new(OpenAiConfig {
            base_url: "http://localhost:9999/".to_string(),
            api_key: "k".to_string(),
            model: "m".to_string(),
            timeout_seconds: 5,
        })
        .unwrap();
        // Endpoint join happens in build_request; verify via the stored config.
        assert_eq!(summarizer.config().base_url, "http://localhost:9999/");
        assert_eq!(
            format!(
                "{}/chat/completions",
                summarizer.config().base_url.trim_end_matches('/')
            ),
            "http://localhost:9999/chat/completions"
        );
    }
}
