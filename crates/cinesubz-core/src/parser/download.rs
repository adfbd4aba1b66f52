//! Countdown page parser for cinesubz.co
//!
//! Countdown pages reveal the real file link after a client-side delay,
//! and where the link sits has changed with nearly every theme update.
//! Discovery therefore runs a fixed list of strategies:
//!
//! 1. the primary link element (`#link`)
//! 2. anchors inside the "countdown complete" container
//! 3. any anchor pointing at a known file host
//! 4. URLs embedded in inline scripts
//!
//! Every candidate is classified and, where applicable, rewritten through
//! the mirror table.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Extraction, dedup_first_wins, element_text, first_of, text_of};
use crate::types::{DownloadPage, FileInfo, LinkKind, RawLink, ResolvedLink};
use crate::url::{fix_url, is_navigable_href, last_path_segment};

/// How discovery strategies combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMode {
    /// Stop at the first strategy that yields a candidate
    #[default]
    FirstMatch,
    /// Run every strategy and union the results
    Union,
}

type Strategy = fn(&Html, &str) -> Vec<RawLink>;

/// Discovery strategies in precedence order
const STRATEGIES: [(&str, Strategy); 4] = [
    ("primary_link", primary_link),
    ("countdown_container", countdown_container_links),
    ("known_host_anchor", known_host_anchors),
    ("inline_script", inline_script_urls),
];

/// Containers the theme reveals once the countdown finishes
const COUNTDOWN_CONTAINERS: [&str; 6] = [
    ".wait-done",
    "#wait-done",
    ".countdown-done",
    "#countdown-done",
    ".download-area",
    ".dl-links",
];

/// Parses a countdown page into classified links and file details
pub fn parse_download_page(html: &str, base_url: &str, mode: DiscoveryMode) -> DownloadPage {
    let document = Html::parse_document(html);
    let links: Vec<ResolvedLink> = discover(&document, base_url, mode)
        .into_iter()
        .map(ResolvedLink::from_raw)
        .collect();
    let file_info = extract_file_info(&document, &links);

    DownloadPage { links, file_info }
}

/// Runs link discovery on raw HTML, returning unclassified candidates
pub fn discover_links(html: &str, base_url: &str, mode: DiscoveryMode) -> Vec<RawLink> {
    discover(&Html::parse_document(html), base_url, mode)
}

/// Candidates deduplicated by href; the earliest strategy's copy is kept
fn discover(document: &Html, base_url: &str, mode: DiscoveryMode) -> Vec<RawLink> {
    let mut found = Vec::new();

    for (name, strategy) in STRATEGIES {
        let links = strategy(document, base_url);
        if links.is_empty() {
            continue;
        }
        debug!(strategy = name, count = links.len(), "download candidates discovered");
        found.extend(links);
        if mode == DiscoveryMode::FirstMatch {
            break;
        }
    }

    dedup_first_wins(found, |link| link.href.clone())
}

fn raw_link(href: &str, text: String, base_url: &str) -> Option<RawLink> {
    if !is_navigable_href(href) {
        return None;
    }
    Some(RawLink {
        href: fix_url(href, base_url),
        anchor_text: text,
    })
}

fn is_known_host(url: &str) -> bool {
    LinkKind::classify(url) != LinkKind::Unknown
}

/// Strategy 1: the element with id `link`
fn primary_link(document: &Html, base_url: &str) -> Vec<RawLink> {
    let Ok(selector) = Selector::parse("#link") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|el| {
            let href = el.value().attr("href").or_else(|| el.value().attr("data-href"))?;
            raw_link(href, element_text(&el), base_url)
        })
        .take(1)
        .collect()
}

/// Strategy 2: anchors in the revealed container, minus navigation
fn countdown_container_links(document: &Html, base_url: &str) -> Vec<RawLink> {
    let mut links = Vec::new();

    for css in COUNTDOWN_CONTAINERS {
        let Ok(selector) = Selector::parse(&format!("{} a[href]", css)) else {
            continue;
        };
        for a in document.select(&selector) {
            if is_navigation_link(&a, base_url) {
                continue;
            }
            if let Some(href) = a.value().attr("href")
                && let Some(link) = raw_link(href, element_text(&a), base_url)
            {
                links.push(link);
            }
        }
    }

    links
}

/// Back buttons, home links and the like
fn is_navigation_link(a: &ElementRef, base_url: &str) -> bool {
    let href = a.value().attr("href").unwrap_or("").trim();
    let base = base_url.trim_end_matches('/');
    if href == "/" || href == base || href.strip_suffix('/') == Some(base) {
        return true;
    }

    let class = a.value().attr("class").unwrap_or("").to_ascii_lowercase();
    if ["back", "nav", "home"].iter().any(|c| class.contains(c)) {
        return true;
    }
    if a.value().attr("rel").is_some_and(|rel| rel.contains("prev")) {
        return true;
    }

    let text = element_text(a).to_ascii_lowercase();
    text.contains("back") || text == "home" || text.starts_with("go to home")
}

/// Strategy 3: any anchor on a known file host
fn known_host_anchors(document: &Html, base_url: &str) -> Vec<RawLink> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|a| {
            let href = a.value().attr("href")?.trim();
            if !is_known_host(href) {
                return None;
            }
            raw_link(href, element_text(&a), base_url)
        })
        .collect()
}

/// Strategy 4: URLs on known hosts embedded in inline script bodies
fn inline_script_urls(document: &Html, _base_url: &str) -> Vec<RawLink> {
    let (Ok(selector), Ok(url_re)) = (
        Selector::parse("script"),
        Regex::new(r#"https?:(?:\\?/){2}[^\s"'<>`]+"#),
    ) else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for script in document.select(&selector) {
        if script.value().attr("src").is_some() {
            continue;
        }
        let body: String = script.text().collect();
        for m in url_re.find_iter(&body) {
            // JSON-encoded script data escapes slashes
            let url = m
                .as_str()
                .replace("\\/", "/")
                .trim_end_matches(['\\', ')', ';', ','])
                .to_string();
            if is_known_host(&url) {
                links.push(RawLink {
                    href: url,
                    anchor_text: String::new(),
                });
            }
        }
    }

    links
}

/// File name and size as displayed on the countdown page
fn extract_file_info(document: &Html, links: &[ResolvedLink]) -> FileInfo {
    let name_chain: [Extraction<String>; 4] = [
        |doc| text_of(doc, ".file-name"),
        |doc| text_of(doc, ".filename"),
        |doc| text_of(doc, ".file-title"),
        |doc| text_of(doc, "h1"),
    ];
    let size_chain: [Extraction<String>; 3] = [
        |doc| text_of(doc, ".file-size"),
        |doc| text_of(doc, ".filesize"),
        |doc| {
            let re = Regex::new(r"(?i)\b(\d+(?:\.\d+)?\s*(?:GB|MB))\b").ok()?;
            let text = element_text(&doc.root_element());
            re.captures(&text)?.get(1).map(|m| m.as_str().to_string())
        },
    ];

    let name = first_of(document, &name_chain).or_else(|| {
        links
            .iter()
            .find(|link| link.kind == LinkKind::Direct)
            .and_then(|link| last_path_segment(&link.raw_url))
    });

    FileInfo {
        name,
        size: first_of(document, &size_chain),
    }
}
