//! # paperwatch-db
//!
//! SQLite record store for paperwatch.
//!
//! This crate provides:
//! - Connection pool management (WAL mode, create-if-missing)
//! - Embedded schema with FTS5 feature detection at connect time
//! - The paper repository: upsert, point lookup, filtered listing, stats
//! - Interchangeable topic-search strategies (FTS5 index vs. LIKE fallback)
//!
//! ## Example
//!
//! ```rust,ignore
//! use paperwatch_db::{create_pool, PaperStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool("sqlite:data/papers.db").await?;
//!     let store = PaperStore::connect(pool).await?;
//!
//!     let page = store.list(&Default::default()).await?;
//!     println!("{} papers stored", page.total);
//!     Ok(())
//! }
//! ```

pub mod papers;
pub mod pool;
pub mod schema;
pub mod topic;

// Test fixtures for integration tests
// Note: Always compiled so dependent crates' tests can build stores without
// repeating the schema/pool boilerplate.
pub mod test_fixtures;

// Re-export core types
pub use paperwatch_core::*;

/// Escape LIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub use papers::PaperStore;
pub use pool::{create_memory_pool, create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use schema::{init_base_schema, init_search_schema, SearchMode};
pub use topic::{Fts5TopicSearch, LikeTopicSearch, TopicSearch};
