//! # paperwatch-inference
//!
//! LLM summarizer backends for paperwatch.
//!
//! This crate provides:
//! - OpenAI-compatible implementation (serves the `openai` and `google` providers)
//! - Ollama implementation for local models
//! - Disabled no-op implementation when no credentials are configured
//! - Mock implementation for deterministic tests
//! - Provider selection from environment variables
//!
//! # Example
//!
//! ```rust,no_run
//! use paperwatch_inference::summarizer_from_env;
//!
//! #[tokio::main]
//! async fn main() {
//!     let summarizer = summarizer_from_env();
//!     let summary = summarizer.summarize("We study transformers.").await;
//! }
//! ```

use std::sync::Arc;

use tracing::{info, warn};

pub mod disabled;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod prompt;

// Re-export core types
pub use paperwatch_core::*;

pub use disabled::{DisabledSummarizer, UNAVAILABLE_SUMMARY};
pub use mock::MockSummarizer;
pub use ollama::{OllamaSummarizer, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
pub use openai::{
    OpenAiConfig, OpenAiSummarizer, DEFAULT_GEMINI_MODEL, DEFAULT_OPENAI_MODEL,
    DEFAULT_OPENAI_URL, GEMINI_OPENAI_URL,
};

/// Build the summarizer selected by `LLM_PROVIDER` (default `google`).
///
/// Key resolution is `LLM_API_KEY` first, then the provider's conventional
/// variable (`GEMINI_API_KEY` / `OPENAI_API_KEY`). `LLM_BASE_URL` overrides
/// the endpoint and `LLM_MODEL` the model. A provider without credentials,
/// or an unrecognized provider name, degrades to [`DisabledSummarizer`]
/// with a warning instead of failing startup.
pub fn summarizer_from_env() -> Arc<dyn Summarizer> {
    let provider = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "google".to_string());

    match provider.as_str() {
        "google" => openai_compatible_from_env(
            &provider,
            &["LLM_API_KEY", "GEMINI_API_KEY"],
            GEMINI_OPENAI_URL,
            DEFAULT_GEMINI_MODEL,
        ),
        "openai" => openai_compatible_from_env(
            &provider,
            &["LLM_API_KEY", "OPENAI_API_KEY"],
            DEFAULT_OPENAI_URL,
            DEFAULT_OPENAI_MODEL,
        ),
        "ollama" => {
            info!(
                subsystem = "inference",
                provider = "ollama",
                "Summaries enabled"
            );
            Arc::new(OllamaSummarizer::from_env())
        }
        other => {
            warn!(
                subsystem = "inference",
                provider = other,
                "Unrecognized LLM provider, summaries disabled"
            );
            Arc::new(DisabledSummarizer::new())
        }
    }
}

/// Shared construction path for the two chat-completions providers.
fn openai_compatible_from_env(
    provider: &str,
    key_vars: &[&str],
    default_base_url: &str,
    default_model: &str,
) -> Arc<dyn Summarizer> {
    let api_key = key_vars.iter().find_map(|var| std::env::var(var).ok());

    let Some(api_key) = api_key else {
        warn!(
            subsystem = "inference",
            provider,
            "No API key found (set LLM_API_KEY), summaries disabled"
        );
        return Arc::new(DisabledSummarizer::new());
    };

    let config = OpenAiConfig {
        base_url: std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| default_base_url.to_string()),
        api_key,
        model: std::env::var("LLM_MODEL").unwrap_or_else(|_| default_model.to_string()),
        ..OpenAiConfig::default()
    };

    match OpenAiSummarizer::new(config) {
        Ok(summarizer) => {
            info!(subsystem = "inference", provider, "Summaries enabled");
            Arc::new(summarizer)
        }
        Err(e) => {
            warn!(
                subsystem = "inference",
                provider,
                error = %e,
                "Summarizer construction failed, summaries disabled"
            );
            Arc::new(DisabledSummarizer::new())
        }
    }
}
