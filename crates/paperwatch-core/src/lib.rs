//! # paperwatch-core
//!
//! Core types, traits, and abstractions for the paperwatch service.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the other paperwatch crates depend on.

pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::{
    CycleReport, FetchParams, Job, JobStatus, JobUpdate, Paper, PaperFilter, PaperPage,
    StoreStats, DEFAULT_MAX_RESULTS, DEFAULT_PAGE_LIMIT,
};
pub use traits::{Notifier, PaperSource, Summarizer};
