//! Port definition for deduplicated image fetching.

use tokio::sync::oneshot;

use crate::domain::entities::{DecodedImage, FetchHandle};
use crate::domain::errors::ImageError;

/// Terminal outcome of an image fetch.
pub type ImageResult = Result<DecodedImage, ImageError>;

/// Callback receiving the terminal outcome of a fetch.
///
/// Callbacks run on a runtime task and must not block. A panic inside one
/// callback is contained and does not affect other waiters.
pub type ImageCallback = Box<dyn FnOnce(ImageResult) + Send + 'static>;

/// A pending image fetch in future form.
#[derive(Debug)]
pub struct ImageRequest {
    handle: FetchHandle,
    outcome: oneshot::Receiver<ImageResult>,
}

impl ImageRequest {
    /// Pairs a fetch handle with the receiver its callback feeds.
    #[must_use]
    pub const fn new(handle: FetchHandle, outcome: oneshot::Receiver<ImageResult>) -> Self {
        Self { handle, outcome }
    }

    /// Handle used to cancel this request.
    #[must_use]
    pub const fn handle(&self) -> &FetchHandle {
        &self.handle
    }

    /// Waits for the terminal outcome.
    ///
    /// Returns `None` if the request was cancelled before it completed.
    pub async fn outcome(self) -> Option<ImageResult> {
        self.outcome.await.ok()
    }

    /// Splits into the handle and the raw outcome receiver.
    #[must_use]
    pub fn into_parts(self) -> (FetchHandle, oneshot::Receiver<ImageResult>) {
        (self.handle, self.outcome)
    }
}

/// Port for fetching decoded images by URL.
/// Implementations must be thread-safe and must not block the caller.
pub trait ImageFetchPort: Send + Sync {
    /// Requests `url`; `callback` receives exactly one terminal outcome
    /// unless the returned handle is cancelled first.
    fn fetch(&self, url: &str, callback: ImageCallback) -> FetchHandle;

    /// Withdraws one caller's interest. Idempotent.
    fn cancel(&self, handle: &FetchHandle);

    /// Future-based form of [`fetch`](Self::fetch).
    fn fetch_image(&self, url: &str) -> ImageRequest {
        let (tx, rx) = oneshot::channel();
        let handle = self.fetch(
            url,
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );
        ImageRequest::new(handle, rx)
    }
}
