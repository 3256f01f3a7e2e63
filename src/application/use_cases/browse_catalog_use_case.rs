//! Paged browsing of the popular listing and search results.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::domain::entities::{CatalogItem, CatalogPage};
use crate::domain::errors::CatalogError;
use crate::domain::ports::CatalogPort;

/// Quiet period a typed query must survive before it is sent.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Which listing the browser is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BrowseMode {
    /// The popular listing.
    #[default]
    Popular,
    /// Results for a trimmed, non-empty query.
    Search(String),
}

impl BrowseMode {
    fn for_query(query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            Self::Popular
        } else {
            Self::Search(query.to_string())
        }
    }
}

enum SearchStep {
    Loaded(Result<CatalogPage, CatalogError>),
    Superseded(String),
}

impl std::fmt::Display for BrowseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Popular => write!(f, "popular"),
            Self::Search(query) => write!(f, "search \"{query}\""),
        }
    }
}

/// Accumulates catalogue pages for an infinitely scrolling list.
///
/// A failed request never modifies the items, counters or mode.
pub struct CatalogBrowser {
    catalog: Arc<dyn CatalogPort>,
    mode: BrowseMode,
    current_page: u32,
    total_pages: u32,
    items: Vec<CatalogItem>,
    debounce: Duration,
}

impl std::fmt::Debug for CatalogBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogBrowser")
            .field("mode", &self.mode)
            .field("current_page", &self.current_page)
            .field("total_pages", &self.total_pages)
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}

impl CatalogBrowser {
    /// Creates an empty browser in popular mode.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogPort>) -> Self {
        Self {
            catalog,
            mode: BrowseMode::Popular,
            current_page: 0,
            total_pages: 1,
            items: Vec::new(),
            debounce: SEARCH_DEBOUNCE,
        }
    }

    /// Overrides the quiet period used by
    /// [`search_as_you_type`](Self::search_as_you_type).
    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Listing currently shown.
    #[must_use]
    pub const fn mode(&self) -> &BrowseMode {
        &self.mode
    }

    /// Last page loaded, 0 before the first load.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Total pages reported by the last successful load.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Items accumulated across loaded pages.
    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Returns true if another page can be requested.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Loads the first page of the popular listing, replacing current items.
    ///
    /// # Errors
    /// Returns the catalogue error; state is left untouched.
    pub async fn load_popular(&mut self) -> Result<&[CatalogItem], CatalogError> {
        self.load_first(BrowseMode::Popular).await
    }

    /// Loads the first page of results for `query`, replacing current items.
    ///
    /// A blank query returns to the popular listing.
    ///
    /// # Errors
    /// Returns the catalogue error; state is left untouched.
    pub async fn search(&mut self, query: &str) -> Result<&[CatalogItem], CatalogError> {
        self.load_first(BrowseMode::for_query(query)).await
    }

    /// Searches for the latest query from `queries` once typing settles.
    ///
    /// A query is sent only after no newer one arrives for the debounce
    /// period. A query arriving while a request is in flight abandons that
    /// request silently and restarts the wait. Blank queries return to the
    /// popular listing.
    ///
    /// Returns `None` if the channel closes before any query arrives.
    ///
    /// # Errors
    /// Returns the catalogue error of the request that completed; state is
    /// left untouched.
    pub async fn search_as_you_type(
        &mut self,
        queries: &mut mpsc::UnboundedReceiver<String>,
    ) -> Option<Result<(), CatalogError>> {
        let mut pending = queries.recv().await?;
        let mut closed = false;

        loop {
            loop {
                tokio::select! {
                    next = queries.recv(), if !closed => match next {
                        Some(query) => {
                            trace!(superseded = %pending, "Search query replaced while typing");
                            pending = query;
                        }
                        None => closed = true,
                    },
                    () = tokio::time::sleep(self.debounce) => break,
                }
            }

            let mode = BrowseMode::for_query(&pending);
            let step = {
                let fetch = self.fetch(&mode, 1);
                tokio::pin!(fetch);
                loop {
                    tokio::select! {
                        result = &mut fetch => break SearchStep::Loaded(result),
                        next = queries.recv(), if !closed => match next {
                            Some(query) => break SearchStep::Superseded(query),
                            None => closed = true,
                        },
                    }
                }
            };

            match step {
                SearchStep::Loaded(result) => {
                    let page = match result {
                        Ok(page) => page,
                        Err(e) => return Some(Err(e)),
                    };
                    info!(
                        mode = %mode,
                        total_pages = page.total_pages,
                        "Loaded first catalogue page"
                    );
                    self.mode = mode;
                    self.apply(page, true);
                    return Some(Ok(()));
                }
                SearchStep::Superseded(query) => {
                    debug!(abandoned = %mode, "Dropped in-flight search for newer query");
                    pending = query;
                }
            }
        }
    }

    /// Appends the next page of the current listing.
    ///
    /// Returns `false` without any request once the last page is loaded.
    ///
    /// # Errors
    /// Returns the catalogue error; state is left untouched.
    pub async fn load_next_page(&mut self) -> Result<bool, CatalogError> {
        if !self.has_more() {
            debug!(mode = %self.mode, page = self.current_page, "No further pages");
            return Ok(false);
        }

        let next = self.current_page + 1;
        let page = self.fetch(&self.mode, next).await?;
        let added = page.items.len();
        self.apply(page, false);

        debug!(mode = %self.mode, page = next, added, "Appended catalogue page");
        Ok(true)
    }

    /// Clears all items and returns to popular mode.
    pub fn reset(&mut self) {
        self.mode = BrowseMode::Popular;
        self.current_page = 0;
        self.total_pages = 1;
        self.items.clear();
    }

    async fn load_first(&mut self, mode: BrowseMode) -> Result<&[CatalogItem], CatalogError> {
        let page = self.fetch(&mode, 1).await?;

        info!(mode = %mode, total_pages = page.total_pages, "Loaded first catalogue page");
        self.mode = mode;
        self.apply(page, true);
        Ok(&self.items)
    }

    async fn fetch(&self, mode: &BrowseMode, page: u32) -> Result<CatalogPage, CatalogError> {
        let result = match mode {
            BrowseMode::Popular => self.catalog.list_popular(page).await,
            BrowseMode::Search(query) => self.catalog.search(query, page).await,
        };
        result.inspect_err(|e| warn!(mode = %mode, page, error = %e, "Catalogue fetch failed"))
    }

    fn apply(&mut self, page: CatalogPage, replace: bool) {
        if replace {
            self.items = page.items;
        } else {
            self.items.extend(page.items);
        }
        self.current_page = page.page_number;
        self.total_pages = page.total_pages;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockCatalog;

    fn typed(queries: &[&str]) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        for query in queries {
            tx.send((*query).to_string()).unwrap();
        }
        rx
    }

    fn ids(browser: &CatalogBrowser) -> Vec<u64> {
        browser.items().iter().map(|item| item.id.get()).collect()
    }

    #[tokio::test]
    async fn test_pages_accumulate_until_last() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_page(None, 1, 2, &[1, 2])
                .with_page(None, 2, 2, &[3, 4]),
        );
        let mut browser = CatalogBrowser::new(catalog.clone());

        browser.load_popular().await.unwrap();
        assert_eq!(ids(&browser), vec![1, 2]);
        assert!(browser.has_more());

        assert!(browser.load_next_page().await.unwrap());
        assert_eq!(ids(&browser), vec![1, 2, 3, 4]);
        assert_eq!(browser.current_page(), 2);

        assert!(!browser.load_next_page().await.unwrap());
        assert_eq!(catalog.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_search_replaces_items_and_pages_within_query() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_page(None, 1, 5, &[1, 2])
                .with_page(Some("alien"), 1, 2, &[10])
                .with_page(Some("alien"), 2, 2, &[11]),
        );
        let mut browser = CatalogBrowser::new(catalog.clone());

        browser.load_popular().await.unwrap();
        browser.search("  alien ").await.unwrap();
        assert_eq!(browser.mode(), &BrowseMode::Search("alien".to_string()));
        assert_eq!(ids(&browser), vec![10]);

        browser.load_next_page().await.unwrap();
        assert_eq!(ids(&browser), vec![10, 11]);
        assert_eq!(
            catalog.calls().last(),
            Some(&(Some("alien".to_string()), 2))
        );
    }

    #[tokio::test]
    async fn test_blank_search_returns_to_popular() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_page(None, 1, 1, &[1])
                .with_page(Some("x"), 1, 1, &[9]),
        );
        let mut browser = CatalogBrowser::new(catalog);

        browser.search("x").await.unwrap();
        browser.search("   ").await.unwrap();

        assert_eq!(browser.mode(), &BrowseMode::Popular);
        assert_eq!(ids(&browser), vec![1]);
    }

    #[tokio::test]
    async fn test_failure_leaves_state_untouched() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_page(None, 1, 3, &[1, 2])
                .with_page(None, 2, 3, &[3]),
        );
        let mut browser = CatalogBrowser::new(catalog.clone());
        browser.load_popular().await.unwrap();

        catalog.set_failing(true);
        assert!(browser.load_next_page().await.is_err());
        assert!(browser.search("anything").await.is_err());

        assert_eq!(browser.mode(), &BrowseMode::Popular);
        assert_eq!(browser.current_page(), 1);
        assert_eq!(browser.total_pages(), 3);
        assert_eq!(ids(&browser), vec![1, 2]);

        catalog.set_failing(false);
        assert!(browser.load_next_page().await.unwrap());
        assert_eq!(ids(&browser), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_next_page_before_first_load_fetches_page_one() {
        let catalog = Arc::new(MockCatalog::new().with_page(None, 1, 1, &[7]));
        let mut browser = CatalogBrowser::new(catalog);

        assert!(browser.load_next_page().await.unwrap());
        assert_eq!(ids(&browser), vec![7]);
        assert!(!browser.has_more());
    }

    #[tokio::test]
    async fn test_reset() {
        let catalog = Arc::new(MockCatalog::new().with_page(Some("q"), 1, 4, &[1]));
        let mut browser = CatalogBrowser::new(catalog);
        browser.search("q").await.unwrap();

        browser.reset();
        assert_eq!(browser.mode(), &BrowseMode::Popular);
        assert!(browser.items().is_empty());
        assert_eq!(browser.current_page(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_sends_only_the_settled_query() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_page(Some("ali"), 1, 1, &[1])
                .with_page(Some("alien"), 1, 1, &[10]),
        );
        let mut browser = CatalogBrowser::new(catalog.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            tx.send("ali".to_string()).unwrap();
            tokio::time::sleep(Duration::from_millis(200)).await;
            tx.send("alien".to_string()).unwrap();
        });

        let result = browser.search_as_you_type(&mut rx).await;

        assert!(matches!(result, Some(Ok(()))));
        assert_eq!(catalog.calls(), vec![(Some("alien".to_string()), 1)]);
        assert_eq!(browser.mode(), &BrowseMode::Search("alien".to_string()));
        assert_eq!(ids(&browser), vec![10]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_query_abandons_request_in_flight() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_page(Some("ali"), 1, 1, &[1])
                .with_page(Some("alien"), 1, 1, &[10])
                .with_latency(Duration::from_secs(2)),
        );
        let mut browser = CatalogBrowser::new(catalog.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            tx.send("ali".to_string()).unwrap();
            tokio::time::sleep(SEARCH_DEBOUNCE + Duration::from_millis(500)).await;
            tx.send("alien".to_string()).unwrap();
        });

        let result = browser.search_as_you_type(&mut rx).await;

        assert!(matches!(result, Some(Ok(()))));
        assert_eq!(
            catalog.calls(),
            vec![(Some("ali".to_string()), 1), (Some("alien".to_string()), 1)]
        );
        assert_eq!(ids(&browser), vec![10]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_blank_query_returns_to_popular() {
        let catalog = Arc::new(MockCatalog::new().with_page(None, 1, 1, &[1]));
        let mut browser =
            CatalogBrowser::new(catalog.clone()).with_debounce(Duration::from_millis(50));
        let mut rx = typed(&["x", "  "]);

        let result = browser.search_as_you_type(&mut rx).await;

        assert!(matches!(result, Some(Ok(()))));
        assert_eq!(catalog.calls(), vec![(None, 1)]);
        assert_eq!(browser.mode(), &BrowseMode::Popular);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_failure_leaves_state_untouched() {
        let catalog = Arc::new(MockCatalog::new().with_page(None, 1, 2, &[1, 2]));
        let mut browser = CatalogBrowser::new(catalog.clone());
        browser.load_popular().await.unwrap();

        let mut rx = typed(&["unknown"]);
        let result = browser.search_as_you_type(&mut rx).await;

        assert!(matches!(result, Some(Err(CatalogError::Http(_)))));
        assert_eq!(browser.mode(), &BrowseMode::Popular);
        assert_eq!(ids(&browser), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_closed_input_without_queries() {
        let catalog = Arc::new(MockCatalog::new());
        let mut browser = CatalogBrowser::new(catalog.clone());
        let mut rx = typed(&[]);

        assert!(browser.search_as_you_type(&mut rx).await.is_none());
        assert!(catalog.calls().is_empty());
    }
}
