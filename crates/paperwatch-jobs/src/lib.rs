//! # paperwatch-jobs
//!
//! Job tracking and the fetch-reconcile-notify pipeline for paperwatch.
//!
//! This crate provides:
//! - A process-lifetime job registry over a sharded concurrent map
//! - The reconciliation loop: fetch, classify, enrich, persist, notify
//! - A search-expression builder for structured fetch parameters
//! - A fire-and-forget runner that ties triggered jobs to the tracker
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use paperwatch_jobs::{JobRunner, JobTracker, ReconcileLoop};
//!
//! let pipeline = Arc::new(ReconcileLoop::new(
//!     store,
//!     source,
//!     summarizer,
//!     notifier,
//!     Arc::new(JobTracker::new()),
//! ));
//! let runner = JobRunner::new(pipeline);
//! let job = runner.submit(Default::default());
//! println!("triggered {}", job.id);
//! ```

pub mod pipeline;
pub mod query;
pub mod runner;
pub mod tracker;

// Re-export core types
pub use paperwatch_core::*;

pub use pipeline::ReconcileLoop;
pub use query::{build_query, DEFAULT_LOOKBACK_DAYS};
pub use runner::JobRunner;
pub use tracker::JobTracker;
