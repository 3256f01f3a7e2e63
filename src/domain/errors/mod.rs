//! Domain error types.

mod catalog_error;
mod image_error;
mod transport_error;

pub use catalog_error::{CatalogError, HttpFailure};
pub use image_error::ImageError;
pub use transport_error::TransportError;
