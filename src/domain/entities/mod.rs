//! Domain entity definitions.

mod catalog;
mod poster;
mod token;

pub use catalog::{
    CatalogItem, CatalogPage, ItemId, TRAILER_SITE, TRAILER_TYPES, TrailerReference,
    VideoReference,
};
pub use poster::{DecodedImage, FetchHandle, ImageUrl};
pub use token::ApiToken;
