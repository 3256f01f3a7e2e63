//! Domain layer with core entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{CatalogItem, CatalogPage, ItemId, TrailerReference};
pub use errors::{CatalogError, ImageError};
pub use ports::{CatalogPort, HttpTransport, ImageFetchPort};
