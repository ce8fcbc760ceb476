//! Test fixtures for database integration tests.
//!
//! Provides an in-memory store constructor and paper builders so tests across
//! the workspace assemble consistent data without repeating setup.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use paperwatch_db::test_fixtures::{memory_store, sample_paper};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let store = memory_store().await;
//!     store.save(&sample_paper("2301.00001")).await.unwrap();
//!
//!     // Run your tests...
//! }
//! ```

use chrono::{TimeZone, Utc};

use paperwatch_core::Paper;

use crate::papers::PaperStore;
use crate::pool::create_memory_pool;

/// Fresh in-memory store with the full schema applied.
///
/// Panics on failure; only meant for tests.
pub async fn memory_store() -> PaperStore {
    let pool = create_memory_pool()
        .await
        .expect("in-memory pool should always open");
    PaperStore::connect(pool)
        .await
        .expect("schema init should succeed on a fresh database")
}

/// Minimal valid paper with the given catalog ID and no enrichment.
///
/// Published timestamp is fixed so ordering assertions stay deterministic.
pub fn sample_paper(arxiv_id: &str) -> Paper {
    Paper {
        arxiv_id: arxiv_id.to_string(),
        title: format!("Sample Paper {arxiv_id}"),
        authors: vec!["Test Author".to_string()],
        abstract_text: "A sample abstract describing the paper contents.".to_string(),
        published: Utc.with_ymd_and_hms(2023, 1, 15, 12, 0, 0).unwrap(),
        updated: Utc.with_ymd_and_hms(2023, 1, 16, 12, 0, 0).unwrap(),
        primary_category: "cs.AI".to_string(),
        categories: vec!["cs.AI".to_string(), "cs.CL".to_string()],
        pdf_url: Some(format!("http://arxiv.org/pdf/{arxiv_id}")),
        llm_summary: None,
        key_insights: None,
    }
}

/// Paper published on a specific calendar day, for date-window tests.
pub fn paper_published_on(arxiv_id: &str, year: i32, month: u32, day: u32) -> Paper {
    let published = Utc
        .with_ymd_and_hms(year, month, day, 9, 30, 0)
        .single()
        .expect("fixture dates must be valid");
    Paper {
        published,
        updated: published,
        ..sample_paper(arxiv_id)
    }
}

/// Paper whose title and abstract mention a topic keyword, for search tests.
pub fn paper_about(arxiv_id: &str, topic: &str) -> Paper {
    Paper {
        title: format!("Advances in {topic} Research"),
        abstract_text: format!(
            "This work studies {topic} methods and evaluates {topic} benchmarks."
        ),
        ..sample_paper(arxiv_id)
    }
}
