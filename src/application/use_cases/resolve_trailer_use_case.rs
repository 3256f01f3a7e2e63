//! Trailer resolution for the detail screen.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::{ItemId, TrailerReference};
use crate::domain::errors::CatalogError;
use crate::domain::ports::CatalogPort;

/// Resolves the trailer an item's detail screen should play.
#[derive(Clone)]
pub struct ResolveTrailerUseCase {
    catalog: Arc<dyn CatalogPort>,
}

impl ResolveTrailerUseCase {
    /// Creates the use case over a catalogue port.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogPort>) -> Self {
        Self { catalog }
    }

    /// Returns the selected trailer and its watch URL.
    ///
    /// # Errors
    /// Returns `MissingData` when the item has no playable trailer.
    pub async fn execute(
        &self,
        item_id: ItemId,
    ) -> Result<(TrailerReference, String), CatalogError> {
        debug!(item_id = %item_id, "Resolving trailer");

        let trailer = self.catalog.fetch_trailer_reference(item_id).await?;
        let watch_url = trailer.watch_url();

        info!(item_id = %item_id, key = trailer.key(), "Trailer resolved");
        Ok((trailer, watch_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::VideoReference;
    use crate::domain::ports::mocks::MockCatalog;

    fn video(kind: &str, key: &str) -> VideoReference {
        VideoReference {
            site: "YouTube".to_string(),
            kind: kind.to_string(),
            key: key.to_string(),
            name: None,
        }
    }

    #[tokio::test]
    async fn test_resolves_watch_url() {
        let catalog = Arc::new(
            MockCatalog::new().with_videos(5, vec![video("Clip", "c"), video("Teaser", "t")]),
        );
        let use_case = ResolveTrailerUseCase::new(catalog);

        let (trailer, url) = use_case.execute(ItemId(5)).await.unwrap();
        assert_eq!(trailer.key(), "t");
        assert_eq!(url, "https://www.youtube.com/watch?v=t");
    }

    #[tokio::test]
    async fn test_missing_trailer() {
        let catalog = Arc::new(MockCatalog::new().with_videos(5, vec![video("Clip", "c")]));
        let use_case = ResolveTrailerUseCase::new(catalog);

        let result = use_case.execute(ItemId(5)).await;
        assert!(matches!(result, Err(CatalogError::MissingData { .. })));
    }
}
