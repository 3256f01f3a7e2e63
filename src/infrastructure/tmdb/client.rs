//! Metadata API catalogue client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::dto::{MovieListResponse, VideoListResponse};
use crate::domain::entities::{ApiToken, CatalogPage, ItemId, TrailerReference};
use crate::domain::errors::CatalogError;
use crate::domain::ports::{CatalogPort, DEFAULT_TIMEOUT, HttpRequest, HttpTransport};

/// Default metadata API base.
pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";

/// Default poster image base.
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// Default response language.
pub const DEFAULT_LANGUAGE: &str = "ko-KR";

/// Connection settings for [`TmdbCatalogClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Base URL poster paths are joined onto.
    pub image_base_url: String,
    /// Language tag sent with every request.
    pub language: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Catalogue client for the movie metadata API.
///
/// Stateless apart from configuration; every call is independent.
pub struct TmdbCatalogClient {
    transport: Arc<dyn HttpTransport>,
    token: ApiToken,
    config: CatalogConfig,
}

impl std::fmt::Debug for TmdbCatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbCatalogClient")
            .field("token", &self.token)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TmdbCatalogClient {
    /// Creates a client over the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, token: ApiToken, config: CatalogConfig) -> Self {
        Self {
            transport,
            token,
            config,
        }
    }

    /// Base URL poster paths resolve against.
    #[must_use]
    pub fn image_base_url(&self) -> &str {
        &self.config.image_base_url
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, CatalogError> {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{path}"))
            .map_err(|e| CatalogError::invalid_input(format!("invalid endpoint url: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair("language", &self.config.language);
        }

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let request = HttpRequest::get(url.as_str())
            .header("accept", "application/json")
            .header("authorization", self.token.bearer_header())
            .timeout(self.config.timeout);

        let response = self.transport.get(request).await.map_err(|e| {
            warn!(path = url.path(), error = %e, "Catalogue request failed");
            CatalogError::from(e)
        })?;

        if !response.is_success() {
            warn!(path = url.path(), status = response.status, "Catalogue request rejected");
            return Err(CatalogError::http(response.status));
        }

        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Err(CatalogError::missing("response body"));
        }

        serde_json::from_slice(&response.body).map_err(|e| {
            warn!(path = url.path(), error = %e, "Failed to decode catalogue response");
            CatalogError::Decode(e)
        })
    }

    async fn fetch_page(&self, url: Url) -> Result<CatalogPage, CatalogError> {
        let list: MovieListResponse = self.get_json(url).await?;
        let page = CatalogPage::from(list);

        debug!(
            page = page.page_number,
            total_pages = page.total_pages,
            items = page.items.len(),
            "Catalogue page received"
        );

        Ok(page)
    }
}

fn check_page(page: u32) -> Result<String, CatalogError> {
    if page == 0 {
        return Err(CatalogError::invalid_input("page numbers start at 1"));
    }
    Ok(page.to_string())
}

/// Validates a free-text query, returning the text to send.
fn check_query(query: &str) -> Result<&str, CatalogError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::invalid_input("search query is empty"));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(CatalogError::invalid_input(
            "search query contains control characters",
        ));
    }
    Ok(trimmed)
}

#[async_trait]
impl CatalogPort for TmdbCatalogClient {
    async fn list_popular(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        let page = check_page(page)?;
        let url = self.endpoint("/movie/popular", &[("page", page.as_str())])?;

        debug!(page = %page, "Fetching popular listing");
        self.fetch_page(url).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<CatalogPage, CatalogError> {
        let query = check_query(query)?;
        let page = check_page(page)?;
        let url = self.endpoint("/search/movie", &[("query", query), ("page", page.as_str())])?;

        debug!(query, page = %page, "Searching catalogue");
        self.fetch_page(url).await
    }

    async fn fetch_trailer_reference(
        &self,
        item_id: ItemId,
    ) -> Result<TrailerReference, CatalogError> {
        let url = self.endpoint(&format!("/movie/{item_id}/videos"), &[])?;

        debug!(item_id = %item_id, "Fetching video references");
        let list: VideoListResponse = self.get_json(url).await?;
        let videos: Vec<_> = list.results.into_iter().map(Into::into).collect();

        TrailerReference::select(item_id, &videos).ok_or_else(|| {
            debug!(item_id = %item_id, candidates = videos.len(), "No playable trailer");
            CatalogError::missing(format!("trailer for item {item_id}"))
        })
    }
}
