//! HTTP client for cinesubz.co and its countdown pages
//!
//! One GET per call with browser-like headers, a bounded timeout and a
//! bounded redirect count. Failures are returned on first occurrence.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::error::{CinesubzError, Result};
use crate::url::BASE_URL;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Site root used for search URLs, relative links and the Referer header
    pub base_url: String,
    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    /// Maximum redirects followed per request (default: 5)
    pub max_redirects: usize,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout_secs: 10,
            max_redirects: 5,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// A fetched page together with the URL it ended up at
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub final_url: String,
    pub body: String,
}

/// HTTP client wrapper
///
/// Cheap to share: the inner reqwest client pools connections.
#[derive(Debug, Clone)]
pub struct CinesubzClient {
    client: reqwest::Client,
    base_url: String,
}

impl CinesubzClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(
            header::REFERER,
            HeaderValue::from_str(&base_url)
                .map_err(|_| CinesubzError::InvalidUrl(config.base_url.clone()))?,
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .default_headers(headers)
            .build()
            .map_err(CinesubzError::HttpError)?;

        Ok(Self { client, base_url })
    }

    /// Site root without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch HTML content from an absolute URL
    ///
    /// # Errors
    /// - `HttpError` - timeout, connection failure, too many redirects
    /// - `Status` - upstream answered with a non-2xx status
    pub async fn fetch(&self, url: &str) -> Result<String> {
        self.fetch_resolved(url).await.map(|page| page.body)
    }

    /// Fetch a page and report the URL reached after redirects
    pub async fn fetch_resolved(&self, url: &str) -> Result<FetchedPage> {
        debug!(url, "fetching page");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(url, error = %e, "upstream request failed");
            CinesubzError::HttpError(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "upstream returned error status");
            return Err(CinesubzError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(CinesubzError::HttpError)?;
        debug!(url, final_url = %final_url, bytes = body.len(), "page fetched");

        Ok(FetchedPage { final_url, body })
    }
}
