//! Response shaping shared by the handlers

use cinesubz_core::{DetailRecord, FileInfo, ResolvedLink};
use serde::Serialize;

/// `link_type` reported when a page offers more than one link
pub const MULTIPLE_LINKS: &str = "multiple";

/// Body of a successful `/download` response
///
/// A single link is reported inline; several are listed under
/// `download_options`. `count` is the number of links either way.
#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub success: bool,
    pub count: usize,
    pub link_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_options: Option<Vec<ResolvedLink>>,
    pub file_info: FileInfo,
}

impl DownloadResponse {
    /// Returns `None` when there is nothing to report
    pub fn from_links(mut links: Vec<ResolvedLink>, file_info: FileInfo) -> Option<Self> {
        let count = links.len();
        match count {
            0 => None,
            1 => {
                let link = links.pop()?;
                Some(Self {
                    success: true,
                    count,
                    link_type: link.kind.as_str().to_string(),
                    download_url: Some(link.download_url),
                    download_options: None,
                    file_info,
                })
            }
            _ => Some(Self {
                success: true,
                count,
                link_type: MULTIPLE_LINKS.to_string(),
                download_url: None,
                download_options: Some(links),
                file_info,
            }),
        }
    }
}

/// Plain-text rendering of a details page for chat bots
pub fn bot_message(record: &DetailRecord) -> String {
    let title = record.title.as_deref().unwrap_or("Unknown title");
    let rating = record.movie_info.rating.as_deref().unwrap_or("N/A");
    let genres = if record.movie_info.genres.is_empty() {
        "N/A".to_string()
    } else {
        record.movie_info.genres.join(", ")
    };

    let mut text = format!("*🎬 {}*\n\n", title.to_uppercase());
    text.push_str(&format!("⭐ Info: {}\n", rating));
    text.push_str(&format!("🎭 Genres: {}\n\n", genres));
    text.push_str("*⬇️ DOWNLOADS:*\n");
    for link in &record.download_links {
        text.push_str(&format!(
            "• {} ({}): {}\n",
            link.quality, link.size, link.countdown_url
        ));
    }
    text
}
