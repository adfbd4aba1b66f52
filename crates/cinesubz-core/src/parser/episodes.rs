//! Episode list parser for cinesubz.co series pages

use scraper::{ElementRef, Html, Selector};

use super::{element_text, first_image_in, first_text_in, text_in};
use crate::types::{Episode, Season};
use crate::url::{fix_url, is_navigable_href};

/// Parses the season blocks of a series page
///
/// Seasons without any parsable episode are left out. Season numbers come
/// from the page when present, otherwise from block position.
pub fn parse_episodes(html: &str, base_url: &str) -> Vec<Season> {
    let document = Html::parse_document(html);

    let Some(blocks) = season_blocks(&document) else {
        return Vec::new();
    };

    blocks
        .iter()
        .enumerate()
        .filter_map(|(index, block)| {
            let episodes = parse_season_episodes(block, base_url);
            if episodes.is_empty() {
                return None;
            }
            let season = text_in(block, ".se-t")
                .and_then(|t| t.trim().parse::<u32>().ok())
                .or_else(|| first_number(&text_in(block, ".se-q .title")?))
                .unwrap_or(index as u32 + 1);

            Some(Season {
                season,
                episode_count: episodes.len(),
                episodes,
            })
        })
        .collect()
}

/// Season containers from the first selector that matches anything
fn season_blocks(document: &Html) -> Option<Vec<ElementRef<'_>>> {
    ["#seasons .se-c", ".se-c"].iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        let blocks: Vec<ElementRef> = document.select(&selector).collect();
        (!blocks.is_empty()).then_some(blocks)
    })
}

fn parse_season_episodes(block: &ElementRef, base_url: &str) -> Vec<Episode> {
    let Ok(item) = Selector::parse("ul.episodios li") else {
        return Vec::new();
    };

    block
        .select(&item)
        .enumerate()
        .filter_map(|(index, li)| parse_episode(&li, index, base_url))
        .collect()
}

/// Parses one episode row; rows without a link are skipped
fn parse_episode(li: &ElementRef, index: usize, base_url: &str) -> Option<Episode> {
    // The title link carries the name; thumbnails may wrap an unlabeled one
    let link = [".episodiotitle a[href]", "a[href]"].iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        li.select(&selector)
            .find(|a| a.value().attr("href").is_some_and(is_navigable_href))
    })?;
    let url = fix_url(link.value().attr("href")?, base_url);

    // "1 - 3" is season 1, episode 3
    let episode = text_in(li, ".numerando")
        .and_then(|n| n.rsplit('-').next().map(|e| e.trim().to_string()))
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| (index + 1).to_string());

    let title = Some(element_text(&link))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format!("Episode {}", episode));

    Some(Episode {
        episode,
        title,
        url,
        image: first_image_in(li, &[".imagen img", "img"]).map(|src| fix_url(&src, base_url)),
        date: first_text_in(li, &[".episodiotitle .date", ".date"]),
    })
}

fn first_number(text: &str) -> Option<u32> {
    text.split(|c: char| !c.is_ascii_digit())
        .find(|part| !part.is_empty())
        .and_then(|part| part.parse().ok())
}
