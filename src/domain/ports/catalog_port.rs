//! Port for the remote movie catalogue.

use async_trait::async_trait;

use crate::domain::entities::{CatalogPage, ItemId, TrailerReference};
use crate::domain::errors::CatalogError;

/// Port for paged catalogue queries.
///
/// Dropping a returned future abandons the request without producing an error.
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Fetches one page of the popular listing.
    async fn list_popular(&self, page: u32) -> Result<CatalogPage, CatalogError>;

    /// Fetches one page of free-text search results.
    async fn search(&self, query: &str, page: u32) -> Result<CatalogPage, CatalogError>;

    /// Resolves the trailer to play for an item.
    async fn fetch_trailer_reference(
        &self,
        item_id: ItemId,
    ) -> Result<TrailerReference, CatalogError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use parking_lot::Mutex;

    use crate::domain::entities::{CatalogItem, VideoReference};
    use crate::domain::errors::TransportError;

    /// Key identifying one request: `None` for the popular listing.
    pub type PageKey = (Option<String>, u32);

    /// In-memory catalogue for testing.
    #[derive(Default)]
    pub struct MockCatalog {
        pages: HashMap<PageKey, CatalogPage>,
        trailers: HashMap<ItemId, Vec<VideoReference>>,
        failing: AtomicBool,
        latency: Option<Duration>,
        calls: Mutex<Vec<PageKey>>,
    }

    impl MockCatalog {
        /// Creates an empty mock.
        pub fn new() -> Self {
            Self::default()
        }

        /// Serves `ids` as page `page` of `total_pages` for `query`.
        pub fn with_page(
            mut self,
            query: Option<&str>,
            page: u32,
            total_pages: u32,
            ids: &[u64],
        ) -> Self {
            let items = ids
                .iter()
                .map(|id| CatalogItem {
                    id: ItemId(*id),
                    title: format!("Movie {id}"),
                    synopsis: String::new(),
                    poster_path: Some(format!("/{id}.jpg")),
                    rating: 5.0,
                    videos: Vec::new(),
                })
                .collect();
            self.pages.insert(
                (query.map(String::from), page),
                CatalogPage {
                    page_number: page,
                    total_pages,
                    items,
                },
            );
            self
        }

        /// Serves `videos` for `item_id`.
        pub fn with_videos(mut self, item_id: u64, videos: Vec<VideoReference>) -> Self {
            self.trailers.insert(ItemId(item_id), videos);
            self
        }

        /// Delays every page response by `latency`.
        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = Some(latency);
            self
        }

        /// Makes every request fail with a timeout.
        pub fn set_failing(&self, value: bool) {
            self.failing.store(value, Ordering::SeqCst);
        }

        /// Requests received so far.
        pub fn calls(&self) -> Vec<PageKey> {
            self.calls.lock().clone()
        }

        async fn page(&self, key: PageKey) -> Result<CatalogPage, CatalogError> {
            self.calls.lock().push(key.clone());
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(CatalogError::Transport(TransportError::Timeout));
            }
            self.pages
                .get(&key)
                .cloned()
                .ok_or_else(|| CatalogError::http(404))
        }
    }

    #[async_trait]
    impl CatalogPort for MockCatalog {
        async fn list_popular(&self, page: u32) -> Result<CatalogPage, CatalogError> {
            self.page((None, page)).await
        }

        async fn search(&self, query: &str, page: u32) -> Result<CatalogPage, CatalogError> {
            self.page((Some(query.to_string()), page)).await
        }

        async fn fetch_trailer_reference(
            &self,
            item_id: ItemId,
        ) -> Result<TrailerReference, CatalogError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(CatalogError::Transport(TransportError::Timeout));
            }
            let videos = self.trailers.get(&item_id).cloned().unwrap_or_default();
            TrailerReference::select(item_id, &videos)
                .ok_or_else(|| CatalogError::missing(format!("trailer for item {item_id}")))
        }
    }
}
