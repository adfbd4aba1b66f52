//! URL helper functions for cinesubz.co
//!
//! Provides functions for building search URLs and normalizing the
//! relative and protocol-relative links the site emits.

use ::url::Url;

use crate::error::{CinesubzError, Result};

/// Default site root
pub const BASE_URL: &str = "https://cinesubz.co";

/// Makes a scraped href or image source absolute
///
/// # Arguments
/// * `url` - Raw attribute value (may be empty, relative or protocol-relative)
/// * `base` - Site root without trailing slash
///
/// # Example
/// ```
/// use cinesubz_core::url::fix_url;
/// assert_eq!(fix_url("/movies/x/", "https://cinesubz.co"), "https://cinesubz.co/movies/x/");
/// assert_eq!(fix_url("//img.cdn/a.jpg", "https://cinesubz.co"), "https://img.cdn/a.jpg");
/// assert_eq!(fix_url("", "https://cinesubz.co"), "");
/// ```
pub fn fix_url(url: &str, base: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }
    if url.starts_with("//") {
        return format!("https:{}", url);
    }
    if url.starts_with('/') {
        return format!("{}{}", base.trim_end_matches('/'), url);
    }
    url.to_string()
}

/// Builds the search URL for a given query
///
/// # Example
/// ```
/// use cinesubz_core::url::build_search_url;
/// let url = build_search_url("https://cinesubz.co", "avatar way of water");
/// assert_eq!(url, "https://cinesubz.co/?s=avatar%20way%20of%20water");
/// ```
pub fn build_search_url(base: &str, query: &str) -> String {
    let encoded = urlencoding::encode(query);
    format!("{}/?s={}", base.trim_end_matches('/'), encoded)
}

/// Returns false for hrefs that never lead anywhere: empty, fragment-only
/// and `javascript:` pseudo-URLs
pub fn is_navigable_href(href: &str) -> bool {
    let href = href.trim();
    !(href.is_empty()
        || href.starts_with('#')
        || href.to_ascii_lowercase().starts_with("javascript:"))
}

/// Checks that a caller-supplied page URL is an absolute http(s) URL
///
/// The URL must parse and name a host. The trimmed input is returned.
pub fn validate_page_url(url: &str) -> Result<&str> {
    let trimmed = url.trim();
    match Url::parse(trimmed) {
        Ok(parsed)
            if matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().is_some_and(|h| !h.is_empty()) =>
        {
            Ok(trimmed)
        }
        _ => Err(CinesubzError::InvalidUrl(url.to_string())),
    }
}

/// True when both strings parse to the same URL
///
/// Comparison happens after parsing, so scheme and host case,
/// percent-encoding and an implicit root path do not matter. Unparseable
/// input falls back to an exact string comparison.
pub fn same_url(a: &str, b: &str) -> bool {
    match (Url::parse(a.trim()), Url::parse(b.trim())) {
        (Ok(a), Ok(b)) => a == b,
        _ => a.trim() == b.trim(),
    }
}

/// Returns the last non-empty path segment of a URL, percent-decoded
pub fn last_path_segment(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.rev().find(|s| !s.is_empty())?;
    Some(
        urlencoding::decode(segment)
            .map(|d| d.into_owned())
            .unwrap_or_else(|_| segment.to_string()),
    )
}
