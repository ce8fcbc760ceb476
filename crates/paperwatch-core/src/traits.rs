//! Collaborator traits for paperwatch abstractions.
//!
//! These traits define the interfaces the reconciliation loop depends on,
//! enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Paper;

/// External paper-catalog client.
///
/// `fetch` returns candidate records for a search expression, newest first,
/// in catalog order. Implementations may skip malformed entries; they must
/// not reorder or deduplicate beyond that.
#[async_trait]
pub trait PaperSource: Send + Sync {
    async fn fetch(&self, query: &str, max_results: u32) -> Result<Vec<Paper>>;
}

/// Language-model summary generator.
///
/// One implementation per provider, selected at construction time. Transport
/// or API failures surface as `Err`; the caller owns the recovery (a record
/// is persisted without its summary rather than aborting the batch).
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, abstract_text: &str) -> Result<String>;
}

/// New-record notification sink.
///
/// Called at most once per cycle, only with a non-empty batch. Expected to
/// no-op quietly when not configured; delivery failures never affect job
/// status or persisted data.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, new_papers: &[Paper]) -> Result<()>;
}
