use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::header,
    response::{IntoResponse, Response},
};
use cinesubz_core::{DetailRecord, Season, SearchResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::error::ApiError;
use super::format::{DownloadResponse, bot_message};
use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub url: Option<String>,
    pub format: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub upstream: String,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub count: usize,
    pub results: Vec<SearchResult>,
}

#[derive(Serialize)]
pub struct DetailsResponse {
    pub success: bool,
    pub data: DetailRecord,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodesResponse {
    pub success: bool,
    pub season_count: usize,
    pub seasons: Vec<Season>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub success: bool,
    pub original_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_link: Option<String>,
}

/// A required, non-blank query parameter
fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("Query parameter '{}' is required", name)))
}

/// The page was fetched but held nothing recognizable
fn not_extracted(what: &str) -> Response {
    Json(json!({
        "success": false,
        "message": format!("could not extract {} from page", what),
    }))
    .into_response()
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let endpoints = BTreeMap::from([
        ("search", "/search?q={query}"),
        ("details", "/details?url={page}&format=bot"),
        ("episodes", "/episodes?url={series_page}"),
        ("download", "/download?url={countdown_page}"),
        ("resolve", "/resolve?url={link}"),
    ]);

    Json(HealthResponse {
        status: "online",
        version: VERSION,
        upstream: state.config().scraper.base_url.clone(),
        endpoints,
    })
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params?;
    let query = required(&params.q, "q")?;
    info!(query, "search");

    let results = state
        .scraper()
        .search(query)
        .await
        .map_err(|e| ApiError::scrape("Search failed", e))?;

    Ok(Json(SearchResponse {
        success: true,
        count: results.len(),
        results,
    }))
}

pub async fn details(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    let url = required(&params.url, "url")?;
    info!(url, format = params.format.as_deref(), "details");

    let record = state
        .scraper()
        .details(url)
        .await
        .map_err(|e| ApiError::scrape("Failed to fetch details", e))?;

    if record.is_empty() {
        return Ok(not_extracted("details"));
    }

    if params.format.as_deref() == Some("bot") {
        return Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            bot_message(&record),
        )
            .into_response());
    }

    Ok(Json(DetailsResponse {
        success: true,
        data: record,
    })
    .into_response())
}

pub async fn episodes(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    let url = required(&params.url, "url")?;
    info!(url, "episodes");

    let seasons = state
        .scraper()
        .episodes(url)
        .await
        .map_err(|e| ApiError::scrape("Failed to fetch episodes", e))?;

    if seasons.is_empty() {
        return Ok(not_extracted("episodes"));
    }

    Ok(Json(EpisodesResponse {
        success: true,
        season_count: seasons.len(),
        seasons,
    })
    .into_response())
}

/// Serves both `/download` and `/extract`
pub async fn download(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    let url = required(&params.url, "url")?;
    info!(url, "download");

    let page = state
        .scraper()
        .download(url)
        .await
        .map_err(|e| ApiError::scrape("Extraction failed", e))?;

    match DownloadResponse::from_links(page.links, page.file_info) {
        Some(response) => Ok(Json(response).into_response()),
        None => Ok(not_extracted("download links")),
    }
}

pub async fn resolve(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    let url = required(&params.url, "url")?;
    info!(url, "resolve");

    let resolution = state
        .scraper()
        .resolve(url)
        .await
        .map_err(|e| ApiError::scrape("Resolve failed", e))?;

    if resolution.redirect_url.is_none() && resolution.extracted_link.is_none() {
        return Ok(not_extracted("a download link"));
    }

    Ok(Json(ResolveResponse {
        success: true,
        original_url: resolution.original_url,
        redirect_url: resolution.redirect_url,
        extracted_link: resolution.extracted_link,
    })
    .into_response())
}
