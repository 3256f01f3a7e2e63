//! Catalogue value objects returned by the metadata API.

use std::fmt;

/// Video type tags accepted as a playable trailer.
pub const TRAILER_TYPES: [&str; 2] = ["Trailer", "Teaser"];

/// Video-hosting site trailers are resolved against.
pub const TRAILER_SITE: &str = "YouTube";

const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

/// Identifier of a catalogue item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of catalogue results.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage {
    /// Page number, starting at 1.
    pub page_number: u32,
    /// Total number of pages available upstream.
    pub total_pages: u32,
    /// Items on this page, in upstream order.
    pub items: Vec<CatalogItem>,
}

impl CatalogPage {
    /// Returns true when a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    /// Returns true if the page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A single movie record.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    /// Catalogue identifier.
    pub id: ItemId,
    /// Localised title.
    pub title: String,
    /// Plot overview, empty when unknown.
    pub synopsis: String,
    /// Poster path relative to the image host, e.g. `/abc.jpg`.
    pub poster_path: Option<String>,
    /// Average rating on a 0-10 scale.
    pub rating: f32,
    /// Video references embedded in the record, if any.
    pub videos: Vec<VideoReference>,
}

impl CatalogItem {
    /// Resolves the poster path against an image base URL.
    ///
    /// Returns `None` when the item has no poster.
    #[must_use]
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        let path = self.poster_path.as_deref()?.trim();
        if path.is_empty() {
            return None;
        }
        let base = image_base_url.trim_end_matches('/');
        if path.starts_with('/') {
            Some(format!("{base}{path}"))
        } else {
            Some(format!("{base}/{path}"))
        }
    }

    /// Rating formatted with one decimal, as shown on detail screens.
    #[must_use]
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.rating)
    }
}

/// Reference to a video hosted on a third-party site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoReference {
    /// Hosting site, e.g. `YouTube`.
    pub site: String,
    /// Type tag such as `Trailer`, `Teaser` or `Clip`.
    pub kind: String,
    /// Site-specific key.
    pub key: String,
    /// Display name.
    pub name: Option<String>,
}

impl VideoReference {
    /// Returns true if this reference is a trailer on the expected site.
    #[must_use]
    pub fn is_trailer(&self) -> bool {
        TRAILER_TYPES.contains(&self.kind.as_str()) && self.site == TRAILER_SITE
    }
}

/// The video reference selected for playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailerReference {
    /// Item the trailer belongs to.
    pub item_id: ItemId,
    /// Selected video.
    pub video: VideoReference,
}

impl TrailerReference {
    /// Picks the first trailer-like reference from `videos`.
    #[must_use]
    pub fn select(item_id: ItemId, videos: &[VideoReference]) -> Option<Self> {
        videos.iter().find(|video| video.is_trailer()).map(|video| Self {
            item_id,
            video: video.clone(),
        })
    }

    /// Site-specific key of the selected video.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.video.key
    }

    /// Watch URL handed to the external player.
    #[must_use]
    pub fn watch_url(&self) -> String {
        format!("{WATCH_URL_BASE}{}", self.video.key)
    }
}
