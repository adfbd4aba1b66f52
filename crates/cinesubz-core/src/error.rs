//! Error types for the cinesubz scraper
//!
//! Only transport failures and caller mistakes are errors. A page that
//! fetched fine but lacks the expected markup is reported through empty
//! records, never through this enum.

use thiserror::Error;

/// Error type for all cinesubz scraper operations
#[derive(Error, Debug)]
pub enum CinesubzError {
    /// HTTP request failed (timeout, connect, body read)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status
    #[error("Upstream returned {status} for {url}")]
    Status { status: u16, url: String },

    /// Failed to parse HTML content
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Empty or otherwise unusable search query
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl CinesubzError {
    /// True for errors caused by the caller's input rather than the upstream site
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidUrl(_) | Self::InvalidQuery(_))
    }
}

/// Result type alias for cinesubz operations
pub type Result<T> = std::result::Result<T, CinesubzError>;
