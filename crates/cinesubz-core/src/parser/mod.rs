//! HTML parsers for cinesubz.co
//!
//! One module per page type. Parsers never fail because markup is
//! missing: absent fields come back as `None` or empty lists.
//!
//! Fallback chains ("try selector A, else B, else C") are written as
//! ordered slices of [`Extraction`] functions and evaluated with
//! [`first_of`].

pub mod details;
pub mod download;
pub mod episodes;
pub mod search;

use std::collections::HashMap;
use std::hash::Hash;

use scraper::{ElementRef, Html, Selector};

pub use details::parse_details;
pub use download::{DiscoveryMode, discover_links, parse_download_page};
pub use episodes::parse_episodes;
pub use search::parse_search_results;

/// One step of a fallback chain
pub(crate) type Extraction<T> = fn(&Html) -> Option<T>;

/// Runs a fallback chain, returning the first non-empty result
pub(crate) fn first_of<T>(document: &Html, chain: &[Extraction<T>]) -> Option<T> {
    chain.iter().find_map(|extract| extract(document))
}

/// Text of an element with whitespace runs collapsed to single spaces
pub(crate) fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First non-empty text among descendants matching `css`
pub(crate) fn text_in(element: &ElementRef, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    element
        .select(&selector)
        .map(|el| element_text(&el))
        .find(|text| !text.is_empty())
}

/// First non-empty text for any of `selectors`, tried in order
pub(crate) fn first_text_in(element: &ElementRef, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|css| text_in(element, css))
}

/// Document-level [`text_in`]
pub(crate) fn text_of(document: &Html, css: &str) -> Option<String> {
    text_in(&document.root_element(), css)
}

/// `content` attribute of the first matching `<meta>` tag
pub(crate) fn meta_content(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}

/// Image source, honoring the lazy-loading attributes WordPress themes use
///
/// `data:` placeholders in `src` are skipped.
pub(crate) fn image_src(img: &ElementRef) -> Option<String> {
    ["data-src", "data-lazy-src", "src"]
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .map(str::trim)
        .find(|src| !src.is_empty() && !src.starts_with("data:"))
        .map(str::to_string)
}

/// First usable image source among descendants matching any of `selectors`
pub(crate) fn first_image_in(element: &ElementRef, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        element.select(&selector).find_map(|img| image_src(&img))
    })
}

/// Deduplicates by key; a later item replaces an earlier one in place
pub(crate) fn dedup_last_wins<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut out: Vec<T> = Vec::with_capacity(items.len());

    for item in items {
        match positions.get(&key(&item)) {
            Some(&pos) => out[pos] = item,
            None => {
                positions.insert(key(&item), out.len());
                out.push(item);
            }
        }
    }

    out
}

/// Deduplicates by key keeping the first occurrence
pub(crate) fn dedup_first_wins<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}
