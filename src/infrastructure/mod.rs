//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// HTTP transport adapters.
pub mod http;
/// Deduplicating image fetch cache.
pub mod image_cache;
/// Movie metadata API client.
pub mod tmdb;

pub use config::{AppConfig, CliArgs, Command, LogLevel, StorageManager};
pub use http::ReqwestTransport;
pub use image_cache::{CacheStats, ImageFetchCache, ImageFetchConfig};
pub use tmdb::{CatalogConfig, TmdbCatalogClient};
