//! Core data types for the cinesubz scraper
//!
//! Every value here lives for a single request: it is scraped, serialized
//! and dropped.

use serde::{Deserialize, Serialize};

use crate::mirror;

/// Kind of content a search hit points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    TvShow,
}

impl MediaType {
    /// Classifies by URL path; the site files series under `/tvshows/`
    pub fn from_url(url: &str) -> Self {
        if url.contains("/tvshows/") {
            Self::TvShow
        } else {
            Self::Movie
        }
    }
}

/// One hit from the search page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub poster_url: Option<String>,
    pub rating: Option<String>,
    pub quality: Option<String>,
    pub year: Option<String>,
    pub movie_url: String,
}

/// Metadata block of a movie or series page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieInfo {
    pub year: Option<String>,
    pub rating: Option<String>,
    pub genres: Vec<String>,
}

/// Link from a details page to a countdown page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadCandidate {
    /// Resolution label such as "720p", "HD" when none is given
    pub quality: String,
    /// File size such as "1.4 GB", "N/A" when none is given
    pub size: String,
    pub countdown_url: String,
}

/// Everything scraped from a details page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub movie_info: MovieInfo,
    pub download_links: Vec<DownloadCandidate>,
}

impl DetailRecord {
    /// True when the page yielded neither a title nor any download link
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.download_links.is_empty()
    }
}

/// One episode row of a series page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub episode: String,
    pub title: String,
    pub url: String,
    pub image: Option<String>,
    pub date: Option<String>,
}

/// A season and its episodes; never constructed empty by the parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub season: u32,
    pub episode_count: usize,
    pub episodes: Vec<Episode>,
}

/// Host family a download link belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Direct,
    GoogleDrive,
    Telegram,
    Mega,
    Mediafire,
    Unknown,
}

impl LinkKind {
    /// Classifies a URL by host substring
    ///
    /// Drive is checked before the mirror sources since both live on
    /// google.com.
    pub fn classify(url: &str) -> Self {
        let lower = url.to_ascii_lowercase();
        if lower.contains("://t.me/")
            || lower.contains("telegram.me/")
            || lower.contains("telegram.dog/")
        {
            Self::Telegram
        } else if lower.contains("drive.google.com") {
            Self::GoogleDrive
        } else if lower.contains("mega.nz") {
            Self::Mega
        } else if lower.contains("mediafire.com") {
            Self::Mediafire
        } else if mirror::matches_mirror(url) || lower.contains("google.com/server") {
            Self::Direct
        } else {
            Self::Unknown
        }
    }

    /// Whether links of this kind go through [`mirror::rewrite`]
    pub fn is_rewritable(self) -> bool {
        matches!(self, Self::Direct | Self::Telegram)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::GoogleDrive => "google_drive",
            Self::Telegram => "telegram",
            Self::Mega => "mega",
            Self::Mediafire => "mediafire",
            Self::Unknown => "unknown",
        }
    }
}

/// An anchor as found in the page, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    pub href: String,
    pub anchor_text: String,
}

/// A classified download link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLink {
    pub kind: LinkKind,
    pub label: String,
    pub raw_url: String,
    pub download_url: String,
}

impl ResolvedLink {
    /// Classifies a raw link and rewrites it when its kind calls for it
    pub fn from_raw(raw: RawLink) -> Self {
        let kind = LinkKind::classify(&raw.href);
        let download_url = if kind.is_rewritable() {
            mirror::rewrite(&raw.href)
        } else {
            raw.href.clone()
        };
        let label = match raw.anchor_text.trim() {
            "" => default_label(kind).to_string(),
            text => text.to_string(),
        };

        Self {
            kind,
            label,
            raw_url: raw.href,
            download_url,
        }
    }
}

fn default_label(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::Direct => "Cloud Stream",
        LinkKind::GoogleDrive => "Google Drive",
        LinkKind::Telegram => "Telegram",
        LinkKind::Mega => "Mega",
        LinkKind::Mediafire => "Mediafire",
        LinkKind::Unknown => "Download",
    }
}

/// Name and size shown on a countdown page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: Option<String>,
    pub size: Option<String>,
}

/// Result of scraping a countdown page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadPage {
    pub links: Vec<ResolvedLink>,
    pub file_info: FileInfo,
}

/// Where a redirect or countdown URL ultimately leads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub original_url: String,
    pub redirect_url: Option<String>,
    pub extracted_link: Option<String>,
}
