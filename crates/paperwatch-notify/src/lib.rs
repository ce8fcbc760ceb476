//! # paperwatch-notify
//!
//! Email digest rendering and delivery for paperwatch.
//!
//! This crate provides:
//! - Digest rendering (subject, HTML body, plain-text alternative)
//! - An SMTP notifier with STARTTLS delivery via lettre
//! - Silent disable when credentials are not configured
//!
//! # Example
//!
//! ```rust,no_run
//! use paperwatch_notify::EmailNotifier;
//! use paperwatch_core::Notifier;
//!
//! #[tokio::main]
//! async fn main() {
//!     let notifier = EmailNotifier::from_env();
//!     notifier.notify(&[]).await.unwrap();
//! }
//! ```

pub mod digest;
pub mod email;

// Re-export core types
pub use paperwatch_core::*;

pub use digest::{render, render_text, ABSTRACT_PREVIEW_CHARS};
pub use email::{EmailConfig, EmailNotifier, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};
