//! Main scraper API for cinesubz.co
//!
//! Provides the high-level API combining HTTP client and parsers.

use tracing::debug;

use crate::client::{CinesubzClient, ClientConfig};
use crate::error::{CinesubzError, Result};
use crate::parser::{
    DiscoveryMode, discover_links, parse_details, parse_download_page, parse_episodes,
    parse_search_results,
};
use crate::types::{
    DetailRecord, DownloadPage, RawLink, Resolution, ResolvedLink, SearchResult, Season,
};
use crate::url::{build_search_url, same_url, validate_page_url};

/// Default cap on search results
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 20;

/// Tuning knobs on top of the HTTP client configuration
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub client: ClientConfig,
    /// Maximum number of search results returned
    pub max_search_results: usize,
    /// How countdown-page discovery strategies combine
    pub discovery: DiscoveryMode,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            discovery: DiscoveryMode::default(),
        }
    }
}

/// Main scraper API for cinesubz.co
///
/// Each method performs one outbound fetch and parses the result. No state
/// is kept between calls beyond the pooled HTTP client.
#[derive(Debug, Clone)]
pub struct CinesubzScraper {
    client: CinesubzClient,
    max_search_results: usize,
    discovery: DiscoveryMode,
}

impl CinesubzScraper {
    /// Create a new scraper with default configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    /// Create a new scraper with custom configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        let client = CinesubzClient::with_config(config.client)?;
        Ok(Self {
            client,
            max_search_results: config.max_search_results,
            discovery: config.discovery,
        })
    }

    /// Site root the scraper talks to
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Search the catalog
    ///
    /// # Errors
    /// - `InvalidQuery` if query is empty or whitespace only
    /// - `HttpError` / `Status` if the search page cannot be fetched
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> cinesubz_core::Result<()> {
    /// use cinesubz_core::CinesubzScraper;
    /// let scraper = CinesubzScraper::new()?;
    /// for hit in scraper.search("avatar").await? {
    ///     println!("{} -> {}", hit.title, hit.movie_url);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(CinesubzError::InvalidQuery(
                "Search query cannot be empty".to_string(),
            ));
        }

        let url = build_search_url(self.base_url(), trimmed);
        let html = self.client.fetch(&url).await?;
        parse_search_results(&html, self.base_url(), self.max_search_results)
    }

    /// Scrape a movie or series page
    ///
    /// # Errors
    /// - `InvalidUrl` if `url` is not an absolute http(s) URL
    /// - `HttpError` / `Status` if the page cannot be fetched
    pub async fn details(&self, url: &str) -> Result<DetailRecord> {
        let url = validate_page_url(url)?;
        let html = self.client.fetch(url).await?;
        Ok(parse_details(&html, self.base_url()))
    }

    /// Scrape the season and episode list of a series page
    ///
    /// # Errors
    /// - `InvalidUrl` if `url` is not an absolute http(s) URL
    /// - `HttpError` / `Status` if the page cannot be fetched
    pub async fn episodes(&self, url: &str) -> Result<Vec<Season>> {
        let url = validate_page_url(url)?;
        let html = self.client.fetch(url).await?;
        Ok(parse_episodes(&html, self.base_url()))
    }

    /// Scrape a countdown page for download links
    ///
    /// Links are classified by host and direct mirror links come back
    /// rewritten to the canonical mirror.
    ///
    /// # Errors
    /// - `InvalidUrl` if `url` is not an absolute http(s) URL
    /// - `HttpError` / `Status` if the page cannot be fetched
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> cinesubz_core::Result<()> {
    /// use cinesubz_core::CinesubzScraper;
    /// let scraper = CinesubzScraper::new()?;
    /// let page = scraper.download("https://cinesubz.co/api-abc123/").await?;
    /// for link in page.links {
    ///     println!("{:?}: {}", link.kind, link.download_url);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn download(&self, url: &str) -> Result<DownloadPage> {
        let url = validate_page_url(url)?;
        let html = self.client.fetch(url).await?;
        Ok(parse_download_page(&html, self.base_url(), self.discovery))
    }

    /// Follow a redirect or countdown URL to where it leads
    ///
    /// When the server redirects, the final URL is reported (rewritten
    /// through the mirror table). Otherwise the body is searched with the
    /// same discovery strategies as [`Self::download`].
    ///
    /// # Errors
    /// - `InvalidUrl` if `url` is not an absolute http(s) URL
    /// - `HttpError` / `Status` if the page cannot be fetched
    pub async fn resolve(&self, url: &str) -> Result<Resolution> {
        let url = validate_page_url(url)?;
        let page = self.client.fetch_resolved(url).await?;

        if !same_url(&page.final_url, url) {
            debug!(from = url, to = %page.final_url, "followed redirect");
            let link = ResolvedLink::from_raw(RawLink {
                href: page.final_url,
                anchor_text: String::new(),
            });
            return Ok(Resolution {
                original_url: url.to_string(),
                redirect_url: Some(link.download_url),
                extracted_link: None,
            });
        }

        let extracted_link = discover_links(&page.body, self.base_url(), self.discovery)
            .into_iter()
            .next()
            .map(|raw| ResolvedLink::from_raw(raw).download_url);

        Ok(Resolution {
            original_url: url.to_string(),
            redirect_url: None,
            extracted_link,
        })
    }
}
