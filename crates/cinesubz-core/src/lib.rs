//! Cinesubz Scraper Core Library
//!
//! Provides an async API for searching cinesubz.co, scraping movie and
//! series pages, and resolving countdown pages to directly fetchable
//! download links.
//!
//! # Overview
//!
//! - HTTP client with browser-like headers, bounded timeout and redirects
//! - HTML parsers for search, details, episode and countdown pages
//! - A mirror table that rewrites legacy redirect hosts onto the canonical
//!   download mirror
//!
//! # Example
//!
//! ```no_run
//! use cinesubz_core::{CinesubzScraper, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = CinesubzScraper::new()?;
//!
//!     let results = scraper.search("avatar").await?;
//!     if let Some(hit) = results.first() {
//!         let details = scraper.details(&hit.movie_url).await?;
//!         if let Some(candidate) = details.download_links.first() {
//!             let page = scraper.download(&candidate.countdown_url).await?;
//!             for link in page.links {
//!                 println!("{}: {}", link.label, link.download_url);
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Mirror rewriting
//!
//! [`mirror::rewrite`] is pure and can be used on its own:
//!
//! ```
//! use cinesubz_core::mirror::rewrite;
//! assert_eq!(
//!     rewrite("https://google.com/server21/1:/Loki.S01E01.mp4"),
//!     "https://cloud.sonic-cloud.online/server2/Loki.S01E01?ext=mp4"
//! );
//! ```

mod client;
mod error;
pub mod mirror;
pub mod parser;
mod scraper;
mod types;
pub mod url;

// Re-export client types
pub use client::{CinesubzClient, ClientConfig, FetchedPage};

// Re-export error types
pub use error::{CinesubzError, Result};

// Re-export parser entry points
pub use parser::{
    DiscoveryMode, discover_links, parse_details, parse_download_page, parse_episodes,
    parse_search_results,
};

// Re-export main scraper API
pub use scraper::{CinesubzScraper, DEFAULT_MAX_SEARCH_RESULTS, ScraperConfig};

// Re-export data types
pub use types::{
    DetailRecord, DownloadCandidate, DownloadPage, Episode, FileInfo, LinkKind, MediaType,
    MovieInfo, RawLink, Resolution, ResolvedLink, Season, SearchResult,
};

// Re-export the rewriter for convenience
pub use mirror::rewrite;
