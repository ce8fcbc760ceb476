//! Ollama summarizer backend.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use paperwatch_core::{Error, Result, Summarizer};

use crate::prompt::{build_prompt, SYSTEM_PROMPT};

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default generation model.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Timeout for generation requests (seconds). Local models can be slow on
/// first load, so this is generous.
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Summarizer over a local Ollama server's `/api/chat` endpoint.
pub struct OllamaSummarizer {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaSummarizer {
    /// Create a new summarizer against the default local endpoint.
    pub fn new() -> Self {
        Self::with_config(
            DEFAULT_OLLAMA_URL.to_string(),
            DEFAULT_OLLAMA_MODEL.to_string(),
        )
    }

    /// Create a new summarizer with custom endpoint and model.
    pub fn with_config(base_url: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(GEN_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        info!(
            subsystem = "inference",
            component = "ollama",
            base_url = %base_url,
            model = %model,
            "Initializing Ollama summarizer"
        );

        Self {
            client,
            base_url,
            model,
        }
    }

    /// Create from environment variables.
    ///
    /// `LLM_BASE_URL` overrides the endpoint; the model comes from
    /// `LLM_MODEL`, then `OLLAMA_MODEL`, then the default.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("LLM_BASE_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());
        let model = std::env::var("LLM_MODEL")
            .or_else(|_| std::env::var("OLLAMA_MODEL"))
            .unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_string());
        Self::with_config(base_url, model)
    }

    /// The generation model in use.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Default for OllamaSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(&self, abstract_text: &str) -> Result<String> {
        let start = Instant::now();

        let request = ChatRequest {
            model: self.model.clone(),
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
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result.message.content;
        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            subsystem = "inference",
            component = "ollama",
            op = "summarize",
            model = %self.model,
            response_len = content.len(),
            duration_ms = elapsed,
            "Summary generated"
        );
        if elapsed > 30000 {
            warn!(
                subsystem = "inference",
                component = "ollama",
                duration_ms = elapsed,
                slow = true,
                "Slow summary generation"
            );
        }
        Ok(content)
    }
}

/// Chat API message for `/api/chat`.
#[derive(Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Request payload for the Ollama `/api/chat` endpoint.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

/// Response from the Ollama `/api/chat` endpoint.
#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}
