//! Cinefeed - movie catalogue client with a deduplicating poster cache.
//!
//! The crate pairs a paged catalogue client for the movie metadata API with
//! an image fetch cache that coalesces concurrent downloads of the same URL
//! and lets each caller cancel its own interest independently.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "cinefeed";
