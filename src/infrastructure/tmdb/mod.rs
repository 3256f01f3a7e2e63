//! Movie metadata API client.

mod client;
mod dto;

pub use client::{
    CatalogConfig, DEFAULT_API_BASE, DEFAULT_IMAGE_BASE, DEFAULT_LANGUAGE, TmdbCatalogClient,
};
