//! Image fetching infrastructure.
//!
//! This module provides:
//! - An in-memory cache of decoded images keyed by canonical URL
//! - Deduplication of concurrent downloads for the same URL
//! - Per-caller cancellation

mod fetch_cache;
mod stats;

pub use fetch_cache::{ImageFetchCache, ImageFetchConfig};
pub use stats::CacheStats;
