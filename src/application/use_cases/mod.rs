//! Use case implementations.

mod browse_catalog_use_case;
mod resolve_trailer_use_case;

pub use browse_catalog_use_case::{BrowseMode, CatalogBrowser};
pub use resolve_trailer_use_case::ResolveTrailerUseCase;
