//! Domain types for poster image fetching.

use std::fmt;
use std::sync::Arc;

use url::Url;

/// A decoded image, shared between the cache and every consumer.
///
/// Immutable, so it can be handed to a UI thread as-is.
pub type DecodedImage = Arc<image::DynamicImage>;

/// Canonical form of an image URL, used as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageUrl(Url);

impl ImageUrl {
    /// Parses and canonicalises a URL.
    ///
    /// Only `http` and `https` URLs are accepted.
    ///
    /// # Errors
    /// Returns a description of the problem if the URL is malformed.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let url = Url::parse(raw.trim()).map_err(|e| format!("{raw}: {e}"))?;
        match url.scheme() {
            "http" | "https" => Ok(Self(url)),
            other => Err(format!("{raw}: unsupported scheme `{other}`")),
        }
    }

    /// Returns the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Opaque token identifying one caller's interest in one URL.
///
/// Handles are cheap to clone; cancelling a handle more than once is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchHandle {
    url: Option<ImageUrl>,
    waiter: u64,
}

impl FetchHandle {
    pub(crate) const fn new(url: Option<ImageUrl>, waiter: u64) -> Self {
        Self { url, waiter }
    }

    /// Handle for a request that never registered a waiter
    /// (cache hits, malformed URLs).
    pub(crate) const fn detached(waiter: u64) -> Self {
        Self { url: None, waiter }
    }

    /// The URL this handle is registered against, if any.
    #[must_use]
    pub const fn url(&self) -> Option<&ImageUrl> {
        self.url.as_ref()
    }

    pub(crate) const fn waiter(&self) -> u64 {
        self.waiter
    }
}
