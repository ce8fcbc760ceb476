//! # paperwatch-arxiv
//!
//! arXiv catalog client for paperwatch.
//!
//! This crate provides:
//! - An Atom feed client over the arXiv export API
//! - Retry handling for rate-limited and transient server errors
//! - Entry-to-record mapping that skips malformed entries
//!
//! ## Example
//!
//! ```rust,no_run
//! use paperwatch_arxiv::ArxivClient;
//! use paperwatch_core::PaperSource;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = ArxivClient::from_env();
//!     let papers = client.fetch("cat:cs.AI", 10).await.unwrap();
//!     println!("{} candidates", papers.len());
//! }
//! ```

pub mod client;

// Re-export core types
pub use paperwatch_core::*;

pub use client::{parse_feed, ArxivClient, DEFAULT_ARXIV_URL, FETCH_TIMEOUT_SECS};
