//! Search results parser for cinesubz.co
//!
//! Parses HTML from the `/?s=` results page and extracts one record per
//! result card.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{dedup_last_wins, first_image_in, first_text_in, text_in};
use crate::error::{CinesubzError, Result};
use crate::types::{MediaType, SearchResult};
use crate::url::{fix_url, is_navigable_href};

/// Result card selectors, tried in order; the theme has shipped all three
const RESULT_CONTAINERS: [&str; 3] = [".result-item", ".item-box", "article"];

/// Parses search results HTML and returns a list of search results
///
/// The first container selector yielding at least one usable card wins.
/// Results are deduplicated by URL (later cards replace earlier ones) and
/// truncated to `limit`.
///
/// # Arguments
/// * `html` - Raw HTML string from the search results page
/// * `base_url` - Site root used to absolutize relative links
/// * `limit` - Maximum number of results returned
///
/// # Errors
/// Returns `ParseError` if a container selector is invalid
pub fn parse_search_results(html: &str, base_url: &str, limit: usize) -> Result<Vec<SearchResult>> {
    let document = Html::parse_document(html);

    for css in RESULT_CONTAINERS {
        let selector = Selector::parse(css)
            .map_err(|e| CinesubzError::ParseError(format!("Invalid selector {}: {:?}", css, e)))?;

        let results: Vec<SearchResult> = document
            .select(&selector)
            .filter_map(|card| parse_result_card(&card, base_url))
            .collect();

        if !results.is_empty() {
            debug!(selector = css, count = results.len(), "search cards matched");
            let mut results = dedup_last_wins(results, |r| r.movie_url.clone());
            results.truncate(limit);
            return Ok(results);
        }
    }

    Ok(Vec::new())
}

/// Parses a single result card
///
/// Returns `None` when the card has no title or no link.
fn parse_result_card(card: &ElementRef, base_url: &str) -> Option<SearchResult> {
    let title = first_text_in(card, &[".title a", ".title", "h1", "h2", "h3"])?;
    let href = first_href_in(card, &[".title a[href]", "a[href]"])?;
    let movie_url = fix_url(&href, base_url);

    let poster_url = first_image_in(card, &[".thumbnail img", "img"])
        .map(|src| fix_url(&src, base_url))
        .filter(|src| !src.is_empty());

    Some(SearchResult {
        title,
        media_type: MediaType::from_url(&movie_url),
        poster_url,
        rating: text_in(card, ".rating"),
        quality: text_in(card, ".quality"),
        year: text_in(card, ".year"),
        movie_url,
    })
}

/// First navigable href among descendants matching any of `selectors`
fn first_href_in(card: &ElementRef, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        card.select(&selector)
            .filter_map(|a| a.value().attr("href"))
            .find(|href| is_navigable_href(href))
            .map(|href| href.trim().to_string())
    })
}
