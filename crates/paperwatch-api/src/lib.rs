//! # paperwatch-api
//!
//! HTTP API server for paperwatch.
//!
//! This crate provides:
//! - The axum router: listings, lookups, stats, job status, fetch trigger
//! - A uniform JSON error envelope across all failure responses
//! - Application state wiring the store and the background job runner
//!
//! The `paperwatch` binary in this crate adds the CLI entry point with the
//! `serve`, `fetch`, and `schedule` subcommands.

pub mod app;
pub mod error;
pub mod handlers;

pub use app::{build_router, serve, AppState};
pub use error::{ApiError, ApiResult};
