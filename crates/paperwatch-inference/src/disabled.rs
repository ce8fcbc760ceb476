//! No-op summarizer used when no provider credentials are configured.

use async_trait::async_trait;

use paperwatch_core::{Result, Summarizer};

/// Sentinel summary stored when generation is disabled. Persisted like any
/// other summary text so readers see an explanation rather than a blank.
pub const UNAVAILABLE_SUMMARY: &str = "Summary unavailable (LLM not configured).";

/// Summarizer that always answers with the sentinel text.
///
/// Construction never fails; the service runs fetch-and-store cycles without
/// an LLM rather than refusing to start.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledSummarizer;

impl DisabledSummarizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Summarizer for DisabledSummarizer {
    async fn summarize(&self, _abstract_text: &str) -> Result<String> {
        Ok(UNAVAILABLE_SUMMARY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_returns_sentinel() {
        let summarizer = DisabledSummarizer::new();
        let summary = summarizer.summarize("any abstract").await.unwrap();
        assert_eq!(summary, UNAVAILABLE_SUMMARY);
    }

    #[tokio::test]
    async fn test_disabled_never_fails() {
        let summarizer = DisabledSummarizer::new();
        assert!(summarizer.summarize("").await.is_ok());
    }
}
