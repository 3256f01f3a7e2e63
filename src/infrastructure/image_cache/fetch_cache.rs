//! Deduplicating, cancellable image fetch cache.
//!
//! Each distinct URL is downloaded and decoded at most once while an
//! operation is outstanding; later callers join the running operation.
//! Decoded images are kept for the lifetime of the cache.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::AbortHandle;
use tracing::{debug, error, trace, warn};

use super::stats::{CacheStats, Counters};
use crate::domain::entities::{DecodedImage, FetchHandle, ImageUrl};
use crate::domain::errors::ImageError;
use crate::domain::ports::{
    DEFAULT_TIMEOUT, HttpRequest, HttpTransport, ImageCallback, ImageFetchPort, ImageResult,
};

/// Configuration for the image fetch cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFetchConfig {
    /// Timeout applied to every image download.
    pub timeout: Duration,
}

impl Default for ImageFetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

struct Waiter {
    id: u64,
    callback: ImageCallback,
}

/// One network operation and the callers waiting on it, in registration order.
struct InFlight {
    operation: u64,
    waiters: Vec<Waiter>,
    abort: AbortHandle,
}

#[derive(Default)]
struct CacheState {
    images: HashMap<ImageUrl, DecodedImage>,
    in_flight: HashMap<ImageUrl, InFlight>,
}

struct Inner {
    transport: Arc<dyn HttpTransport>,
    config: ImageFetchConfig,
    state: Mutex<CacheState>,
    next_id: AtomicU64,
    counters: Counters,
}

/// Fetches images by URL, sharing in-flight work between callers.
///
/// All bookkeeping goes through one lock; callbacks always run outside it,
/// so a callback may call back into the cache.
///
/// Every outcome is delivered from a Tokio task, including cache hits, so
/// methods must be called from within a Tokio runtime.
#[derive(Clone)]
pub struct ImageFetchCache {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ImageFetchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFetchCache")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ImageFetchCache {
    /// Creates an empty cache over the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, config: ImageFetchConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                config,
                state: Mutex::new(CacheState::default()),
                next_id: AtomicU64::new(1),
                counters: Counters::default(),
            }),
        }
    }

    /// Creates a cache with default configuration.
    #[must_use]
    pub fn with_defaults(transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(transport, ImageFetchConfig::default())
    }

    /// Returns the cached image for `url` without touching statistics.
    #[must_use]
    pub fn cached(&self, url: &str) -> Option<DecodedImage> {
        let url = ImageUrl::parse(url).ok()?;
        self.inner.state.lock().images.get(&url).cloned()
    }

    /// Returns true if a decoded image is held for `url`.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.cached(url).is_some()
    }

    /// Number of decoded images held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.state.lock().images.len()
    }

    /// Returns true if no decoded image is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of URLs with an outstanding network operation.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.inner.state.lock().in_flight.len()
    }

    /// Number of callers waiting on the operation for `url`.
    #[must_use]
    pub fn pending_waiters(&self, url: &str) -> usize {
        let Ok(url) = ImageUrl::parse(url) else {
            return 0;
        };
        self.inner
            .state
            .lock()
            .in_flight
            .get(&url)
            .map_or(0, |flight| flight.waiters.len())
    }

    /// Returns cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let (cached, in_flight) = {
            let state = self.inner.state.lock();
            (state.images.len(), state.in_flight.len())
        };
        self.inner.counters.snapshot(cached, in_flight)
    }

    /// Drops every decoded image. Outstanding operations are unaffected.
    pub fn clear(&self) {
        let images = std::mem::take(&mut self.inner.state.lock().images);
        debug!(count = images.len(), "Cleared image cache");
    }

    /// Cancels every outstanding operation. No waiter receives an outcome.
    pub fn cancel_all(&self) {
        let flights: Vec<InFlight> = {
            let mut state = self.inner.state.lock();
            state.in_flight.drain().map(|(_, flight)| flight).collect()
        };

        for flight in &flights {
            flight.abort.abort();
        }
        self.inner.counters.cancelled(flights.len() as u64);

        if !flights.is_empty() {
            debug!(count = flights.len(), "Cancelled all image fetches");
        }
    }

    fn next_id(&self) -> u64 {
        self.inner.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn deliver_later(callback: ImageCallback, result: ImageResult) {
        tokio::spawn(async move { deliver(callback, result) });
    }
}

impl Inner {
    async fn download(&self, url: &ImageUrl) -> ImageResult {
        let request = HttpRequest::get(url.as_str()).timeout(self.config.timeout);
        self.counters.network_request();

        let response = self.transport.get(request).await.map_err(|e| {
            warn!(url = %url, error = %e, "Image download failed");
            ImageError::from(e)
        })?;

        if !response.is_success() {
            warn!(url = %url, status = response.status, "Image download rejected");
            return Err(ImageError::transport(format!("HTTP {}", response.status)));
        }

        let bytes = response.body;
        let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(|e| ImageError::decode(format!("decode task failed: {e}")))?
            .map_err(|e| {
                warn!(url = %url, error = %e, "Image decode failed");
                ImageError::decode(e.to_string())
            })?;

        trace!(
            url = %url,
            width = decoded.width(),
            height = decoded.height(),
            "Image decoded"
        );

        Ok(Arc::new(decoded))
    }

    async fn run_operation(self: Arc<Self>, url: ImageUrl, operation: u64) {
        let result = self.download(&url).await;

        let waiters = {
            let mut state = self.state.lock();
            // The entry is gone or replaced if every caller cancelled meanwhile.
            match state.in_flight.get(&url) {
                Some(flight) if flight.operation == operation => {}
                _ => return,
            }
            let Some(flight) = state.in_flight.remove(&url) else {
                return;
            };
            if let Ok(image) = &result {
                state.images.insert(url.clone(), image.clone());
            }
            flight.waiters
        };

        debug!(
            url = %url,
            ok = result.is_ok(),
            waiters = waiters.len(),
            "Image fetch completed"
        );

        for waiter in waiters {
            deliver(waiter.callback, result.clone());
        }
    }
}

/// Runs one callback; a panicking callback does not starve later waiters.
fn deliver(callback: ImageCallback, result: ImageResult) {
    if panic::catch_unwind(AssertUnwindSafe(move || callback(result))).is_err() {
        error!("Image fetch callback panicked");
    }
}

impl ImageFetchPort for ImageFetchCache {
    fn fetch(&self, url: &str, callback: ImageCallback) -> FetchHandle {
        let id = self.next_id();

        let url = match ImageUrl::parse(url) {
            Ok(url) => url,
            Err(reason) => {
                debug!(reason = %reason, "Rejected image url");
                Self::deliver_later(callback, Err(ImageError::InvalidUrl { reason }));
                return FetchHandle::detached(id);
            }
        };

        let mut state = self.inner.state.lock();

        if let Some(image) = state.images.get(&url).cloned() {
            drop(state);
            self.inner.counters.hit();
            trace!(url = %url, "Image cache hit");
            Self::deliver_later(callback, Ok(image));
            return FetchHandle::detached(id);
        }

        self.inner.counters.miss();

        if let Some(flight) = state.in_flight.get_mut(&url) {
            flight.waiters.push(Waiter { id, callback });
            self.inner.counters.coalesced();
            trace!(url = %url, waiters = flight.waiters.len(), "Joined in-flight image fetch");
            return FetchHandle::new(Some(url), id);
        }

        // The task cannot finish before the entry exists: completion needs this lock.
        let task = tokio::spawn(self.inner.clone().run_operation(url.clone(), id));
        state.in_flight.insert(
            url.clone(),
            InFlight {
                operation: id,
                waiters: vec![Waiter { id, callback }],
                abort: task.abort_handle(),
            },
        );
        debug!(url = %url, "Started image fetch");

        FetchHandle::new(Some(url), id)
    }

    fn cancel(&self, handle: &FetchHandle) {
        let Some(url) = handle.url() else {
            return;
        };

        let (removed, emptied) = {
            let mut state = self.inner.state.lock();
            let Some(flight) = state.in_flight.get_mut(url) else {
                return;
            };
            let Some(position) = flight.waiters.iter().position(|w| w.id == handle.waiter())
            else {
                return;
            };
            let removed = flight.waiters.remove(position);
            let emptied = if flight.waiters.is_empty() {
                state.in_flight.remove(url)
            } else {
                None
            };
            (removed, emptied)
        };

        if let Some(flight) = emptied {
            flight.abort.abort();
            self.inner.counters.cancelled(1);
            debug!(url = %url, "Cancelled image fetch, no callers left");
        } else {
            trace!(url = %url, "Withdrew one caller from image fetch");
        }

        // Dropped outside the lock: the callback may own arbitrary state.
        drop(removed);
    }
}
