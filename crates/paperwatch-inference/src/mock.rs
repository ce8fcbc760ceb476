//! Mock summarizer for deterministic testing.
//!
//! Records every call, serves fixed or per-input mapped responses, and can
//! be switched into a failing mode. Used by this crate's own tests and by
//! the pipeline and API test suites.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use paperwatch_core::{Error, Result, Summarizer};

/// Deterministic in-memory summarizer.
#[derive(Clone)]
pub struct MockSummarizer {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<String>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    default_response: String,
    mapped_responses: HashMap<String, String>,
    fail: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            default_response: "Mock summary".to_string(),
            mapped_responses: HashMap::new(),
            fail: false,
        }
    }
}

impl MockSummarizer {
    /// Create a new mock with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the response returned for unmapped inputs.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Add a response for one specific input.
    pub fn with_response_mapping(
        mut self,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .mapped_responses
            .insert(input.into(), output.into());
        self
    }

    /// Make every call fail with an inference error.
    pub fn failing(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail = true;
        self
    }

    /// Inputs passed to `summarize`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of `summarize` calls so far.
    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, abstract_text: &str) -> Result<String> {
        self.call_log
            .lock()
            .unwrap()
            .push(abstract_text.to_string());

        if self.config.fail {
            return Err(Error::Inference("simulated failure".to_string()));
        }

        if let Some(response) = self.config.mapped_responses.get(abstract_text) {
            return Ok(response.clone());
        }
        Ok(self.config.default_response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_response() {
        let mock = MockSummarizer::new();
        let summary = mock.summarize("anything").await.unwrap();
        assert_eq!(summary, "Mock summary");
    }

    #[tokio::test]
    async fn test_fixed_response() {
        let mock = MockSummarizer::new().with_fixed_response("Custom");
        assert_eq!(mock.summarize("x").await.unwrap(), "Custom");
    }

    #[tokio::test]
    async fn test_mapped_response_overrides_default() {
        let mock = MockSummarizer::new()
            .with_fixed_response("fallback")
            .with_response_mapping("special input", "special output");

        assert_eq!(
            mock.summarize("special input").await.unwrap(),
            "special output"
        );
        assert_eq!(mock.summarize("other input").await.unwrap(), "fallback");
    }

    #[tokio::test]
    async fn test_failing_mode() {
        let mock = MockSummarizer::new().failing();
        let err = mock.summarize("x").await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[tokio::test]
    async fn test_call_log_records_inputs_in_order() {
        let mock = MockSummarizer::new();
        mock.summarize("first").await.unwrap();
        mock.summarize("second").await.unwrap();

        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.calls(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_failing_calls_still_logged() {
        let mock = MockSummarizer::new().failing();
        let _ = mock.summarize("attempted").await;
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_clear_calls() {
        let mock = MockSummarizer::new();
        mock.summarize("x").await.unwrap();
        mock.clear_calls();
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_call_log() {
        let mock = MockSummarizer::new();
        let clone = mock.clone();
        clone.summarize("via clone").await.unwrap();
        assert_eq!(mock.call_count(), 1);
    }
}
