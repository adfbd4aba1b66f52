//! Details page parser for cinesubz.co
//!
//! Pulls the metadata block and every link that looks like it leads to a
//! countdown page.

use regex::Regex;
use scraper::{Html, Selector};

use super::{Extraction, dedup_last_wins, element_text, first_image_in, first_of, meta_content, text_of};
use crate::types::{DetailRecord, DownloadCandidate, MovieInfo};
use crate::url::{fix_url, is_navigable_href};

/// Href fragments used by countdown-page links
const COUNTDOWN_PATH_MARKERS: [&str; 2] = ["/api-", "/links/"];

/// Parses a movie or series page
///
/// Never fails: fields that cannot be found are `None`, lists are empty.
///
/// # Arguments
/// * `html` - Raw HTML string from the details page
/// * `base_url` - Site root used to absolutize relative links
pub fn parse_details(html: &str, base_url: &str) -> DetailRecord {
    let document = Html::parse_document(html);

    let title_chain: [Extraction<String>; 5] = [
        |doc| text_of(doc, ".sheader .data h1"),
        |doc| text_of(doc, ".data h1"),
        |doc| text_of(doc, "h1.entry-title"),
        |doc| text_of(doc, ".entry-title"),
        |doc| meta_content(doc, r#"meta[property="og:title"]"#),
    ];
    let description_chain: [Extraction<String>; 3] = [
        |doc| text_of(doc, ".wp-content p"),
        |doc| meta_content(doc, r#"meta[name="description"]"#),
        |doc| meta_content(doc, r#"meta[property="og:description"]"#),
    ];
    let poster_chain: [Extraction<String>; 2] = [
        |doc| first_image_in(&doc.root_element(), &[".poster img"]),
        |doc| meta_content(doc, r#"meta[property="og:image"]"#),
    ];
    let rating_chain: [Extraction<String>; 3] = [
        |doc| text_of(doc, ".dt_rating_vgs"),
        |doc| text_of(doc, r#"[itemprop="ratingValue"]"#),
        |doc| text_of(doc, ".rating"),
    ];
    let year_chain: [Extraction<String>; 3] = [
        |doc| text_of(doc, ".extra .date").and_then(|t| extract_year(&t)),
        |doc| text_of(doc, ".date").and_then(|t| extract_year(&t)),
        |doc| text_of(doc, ".year").and_then(|t| extract_year(&t)),
    ];

    DetailRecord {
        title: first_of(&document, &title_chain),
        description: first_of(&document, &description_chain),
        poster_url: first_of(&document, &poster_chain)
            .map(|src| fix_url(&src, base_url))
            .filter(|src| !src.is_empty()),
        movie_info: MovieInfo {
            year: first_of(&document, &year_chain),
            rating: first_of(&document, &rating_chain),
            genres: extract_genres(&document),
        },
        download_links: extract_download_candidates(&document, base_url),
    }
}

/// Pulls a four-digit year out of a date label like "Mar. 04, 2022"
fn extract_year(text: &str) -> Option<String> {
    let re = Regex::new(r"\b(19|20)\d{2}\b").ok()?;
    re.find(text).map(|m| m.as_str().to_string())
}

/// Genre names, from the first genre list present
fn extract_genres(document: &Html) -> Vec<String> {
    for css in [".sgeneros a", ".genres a"] {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        let mut genres: Vec<String> = Vec::new();
        for text in document.select(&selector).map(|a| element_text(&a)) {
            if !text.is_empty() && !genres.contains(&text) {
                genres.push(text);
            }
        }
        if !genres.is_empty() {
            return genres;
        }
    }
    Vec::new()
}

/// Collects countdown-page links, deduplicated by href (last wins)
///
/// An anchor qualifies when its href carries a countdown path marker or
/// its text carries a resolution label such as "720p".
fn extract_download_candidates(document: &Html, base_url: &str) -> Vec<DownloadCandidate> {
    let (Ok(anchor), Ok(label_re), Ok(quality_re), Ok(size_re)) = (
        Selector::parse("a[href]"),
        Regex::new(r"(?i)\d+p"),
        Regex::new(r"(?i)\b(\d{3,4})p\b"),
        Regex::new(r"(?i)\b(\d+(?:\.\d+)?\s*(?:GB|MB))\b"),
    ) else {
        return Vec::new();
    };

    let candidates: Vec<DownloadCandidate> = document
        .select(&anchor)
        .filter_map(|a| {
            let href = a.value().attr("href")?.trim();
            if !is_navigable_href(href) {
                return None;
            }
            let text = element_text(&a);
            let looks_like_download = COUNTDOWN_PATH_MARKERS.iter().any(|m| href.contains(m))
                || label_re.is_match(&text);
            if !looks_like_download {
                return None;
            }

            let quality = quality_re
                .captures(&text)
                .and_then(|c| c.get(1))
                .map(|m| format!("{}p", m.as_str()))
                .unwrap_or_else(|| "HD".to_string());
            let size = size_re
                .captures(&text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "N/A".to_string());

            Some(DownloadCandidate {
                quality,
                size,
                countdown_url: fix_url(href, base_url),
            })
        })
        .collect();

    dedup_last_wins(candidates, |c| c.countdown_url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://cinesubz.co";

    const MOVIE_PAGE: &str = r#"
    <html>
    <head>
        <meta property="og:title" content="Dune: Part Two (2024) Sinhala Subtitles">
        <meta property="og:image" content="https://cinesubz.co/og.jpg">
    </head>
    <body>
    <div class="sheader">
        <div class="poster"><img src="/wp-content/uploads/dune2.jpg" alt="Dune"></div>
        <div class="data">
            <h1>Dune: Part Two</h1>
            <div class="extra"><span class="date">Feb. 27, 2024</span></div>
            <div class="sgeneros">
                <a href="/genre/action/">Action</a>
                <a href="/genre/sci-fi/">Science Fiction</a>
                <a href="/genre/action/">Action</a>
            </div>
        </div>
    </div>
    <div class="dt_rating_vgs">8.6</div>
    <div class="wp-content">
        <p></p>
        <p>Paul Atreides unites with Chani and the Fremen.</p>
    </div>
    <div class="res-options">
        <a href="https://cinesubz.co/api-abc123/">Download 480p - 650 MB</a>
        <a href="https://cinesubz.co/api-def456/">Download 720p - 1.2 GB</a>
        <a href="/links/xyz/">Telegram Mirror</a>
        <a href="https://cinesubz.co/api-abc123/">480p again 700 MB</a>
        <a href="javascript:void(0)">1080p soon</a>
        <a href="/movies/">Back to movies</a>
    </div>
    </body>
    </html>
    "#;

    #[test]
    fn test_parse_details_metadata() {
        let record = parse_details(MOVIE_PAGE, BASE);
        assert_eq!(record.title, Some("Dune: Part Two".to_string()));
        assert_eq!(
            record.description,
            Some("Paul Atreides unites with Chani and the Fremen.".to_string())
        );
        assert_eq!(
            record.poster_url,
            Some("https://cinesubz.co/wp-content/uploads/dune2.jpg".to_string())
        );
        assert_eq!(record.movie_info.year, Some("2024".to_string()));
        assert_eq!(record.movie_info.rating, Some("8.6".to_string()));
        assert_eq!(
            record.movie_info.genres,
            vec!["Action".to_string(), "Science Fiction".to_string()]
        );
    }

    #[test]
    fn test_parse_details_download_links_dedup() {
        let record = parse_details(MOVIE_PAGE, BASE);
        let links = &record.download_links;

        // 4 qualifying anchors, 3 distinct hrefs
        assert_eq!(links.len(), 3);

        assert_eq!(links[0].countdown_url, "https://cinesubz.co/api-abc123/");
        assert_eq!(links[0].quality, "480p");
        assert_eq!(links[0].size, "700 MB");

        assert_eq!(links[1].quality, "720p");
        assert_eq!(links[1].size, "1.2 GB");

        assert_eq!(links[2].countdown_url, "https://cinesubz.co/links/xyz/");
        assert_eq!(links[2].quality, "HD");
        assert_eq!(links[2].size, "N/A");
    }

    #[test]
    fn test_parse_details_meta_fallbacks() {
        let html = r#"
        <html><head>
            <meta property="og:title" content="Fallback Title">
            <meta name="description" content="From meta.">
            <meta property="og:image" content="//cdn.example/p.jpg">
        </head><body></body></html>
        "#;

        let record = parse_details(html, BASE);
        assert_eq!(record.title, Some("Fallback Title".to_string()));
        assert_eq!(record.description, Some("From meta.".to_string()));
        assert_eq!(record.poster_url, Some("https://cdn.example/p.jpg".to_string()));
        assert!(record.download_links.is_empty());
    }

    #[test]
    fn test_parse_details_empty_page() {
        let record = parse_details("<html><body><p>nothing</p></body></html>", BASE);
        assert!(record.is_empty());
        assert_eq!(record.movie_info, MovieInfo::default());
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("Mar. 04, 2022"), Some("2022".to_string()));
        assert_eq!(extract_year("1999"), Some("1999".to_string()));
        assert_eq!(extract_year("12345"), None);
        assert_eq!(extract_year("N/A"), None);
    }
}
