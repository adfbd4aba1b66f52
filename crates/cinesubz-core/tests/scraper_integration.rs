//! End-to-end scraper tests against a mocked site

use std::time::Duration;

use cinesubz_core::{
    CinesubzError, CinesubzScraper, ClientConfig, DiscoveryMode, LinkKind, MediaType,
    ScraperConfig,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn scraper_for(server: &MockServer) -> CinesubzScraper {
    scraper_with(server, 5, DiscoveryMode::FirstMatch)
}

fn scraper_with(server: &MockServer, timeout_secs: u64, discovery: DiscoveryMode) -> CinesubzScraper {
    let config = ScraperConfig {
        client: ClientConfig {
            base_url: server.uri(),
            timeout_secs,
            ..Default::default()
        },
        discovery,
        ..Default::default()
    };
    CinesubzScraper::with_config(config).expect("scraper should build")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

const SEARCH_PAGE: &str = r#"
<html><body>
<div class="result-item"><article>
    <div class="thumbnail"><a href="/movies/avatar-2009/"><img src="/p/avatar.jpg"></a></div>
    <div class="details"><div class="title"><a href="/movies/avatar-2009/">Avatar</a></div>
    <span class="rating">7.9</span></div>
</article></div>
<div class="result-item"><article>
    <div class="title"><a href="/movies/avatar-the-way-of-water-2022/">Avatar: The Way of Water</a></div>
</article></div>
<div class="result-item"><article>
    <div class="title"><a href="/tvshows/avatar-the-last-airbender/">Avatar: The Last Airbender</a></div>
</article></div>
</body></html>
"#;

#[tokio::test]
async fn test_search_parses_mocked_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("s", "avatar"))
        .and(header("referer", server.uri().as_str()))
        .respond_with(html(SEARCH_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let scraper = scraper_for(&server);
    let results = scraper.search("avatar").await.expect("search should succeed");

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| !r.title.is_empty() && !r.movie_url.is_empty()));
    assert_eq!(results[0].movie_url, format!("{}/movies/avatar-2009/", server.uri()));
    assert_eq!(results[2].media_type, MediaType::TvShow);
}

#[tokio::test]
async fn test_details_fetches_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movies/dune/"))
        .respond_with(html(
            r#"<div class="data"><h1>Dune</h1></div>
               <a href="/api-1/">720p 1.1 GB</a>
               <a href="/api-1/">720p 1.1 GB</a>"#,
        ))
        .mount(&server)
        .await;

    let scraper = scraper_for(&server);
    let record = scraper
        .details(&format!("{}/movies/dune/", server.uri()))
        .await
        .expect("details should succeed");

    assert_eq!(record.title.as_deref(), Some("Dune"));
    assert_eq!(record.download_links.len(), 1);
    assert_eq!(record.download_links[0].quality, "720p");
}

#[tokio::test]
async fn test_download_rewrites_direct_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api-abc/"))
        .respond_with(html(
            r#"<div class="wait-done">
                 <a href="/">Back to home</a>
                 <a href="https://google.com/server12/1:/Avatar.2009.mkv">720p</a>
                 <a href="https://t.me/cinesubz">Telegram</a>
               </div>"#,
        ))
        .mount(&server)
        .await;

    let scraper = scraper_for(&server);
    let page = scraper
        .download(&format!("{}/api-abc/", server.uri()))
        .await
        .expect("download should succeed");

    assert_eq!(page.links.len(), 2);
    assert_eq!(page.links[0].kind, LinkKind::Direct);
    assert_eq!(
        page.links[0].download_url,
        "https://cloud.sonic-cloud.online/server1/Avatar.2009?ext=mkv"
    );
    assert_eq!(page.links[1].kind, LinkKind::Telegram);
    assert_eq!(page.file_info.name.as_deref(), Some("Avatar.2009.mkv"));
}

#[tokio::test]
async fn test_resolve_reports_redirect_target() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/go/42"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/landing", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(html("<p>landed</p>"))
        .mount(&server)
        .await;

    let scraper = scraper_for(&server);
    let original = format!("{}/go/42", server.uri());
    let resolution = scraper.resolve(&original).await.expect("resolve should succeed");

    assert_eq!(resolution.original_url, original);
    assert_eq!(resolution.redirect_url, Some(format!("{}/landing", server.uri())));
    assert_eq!(resolution.extracted_link, None);
}

#[tokio::test]
async fn test_resolve_extracts_link_from_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api-xyz/"))
        .respond_with(html(
            r#"<a id="link" href="https://google.com/server3/1:/pack.zip">Get</a>"#,
        ))
        .mount(&server)
        .await;

    let scraper = scraper_for(&server);
    let resolution = scraper
        .resolve(&format!("{}/api-xyz/", server.uri()))
        .await
        .expect("resolve should succeed");

    assert_eq!(resolution.redirect_url, None);
    assert_eq!(
        resolution.extracted_link.as_deref(),
        Some("https://cloud.sonic-cloud.online/server3/pack?ext=zip")
    );
}

#[tokio::test]
async fn test_non_success_status_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let scraper = scraper_for(&server);
    let result = scraper.details(&format!("{}/movies/gone/", server.uri())).await;

    match result {
        Err(CinesubzError::Status { status, url }) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/movies/gone/"));
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout_surfaces_as_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<p>slow</p>").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let scraper = scraper_with(&server, 1, DiscoveryMode::FirstMatch);
    let result = scraper.download(&format!("{}/api-slow/", server.uri())).await;

    match result {
        Err(CinesubzError::HttpError(e)) => assert!(e.is_timeout()),
        other => panic!("Expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_episodes_fetches_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tvshows/loki/"))
        .respond_with(html(
            r#"<div id="seasons"><div class="se-c">
                 <span class="se-t">2</span>
                 <ul class="episodios">
                   <li><div class="numerando">2 - 1</div>
                       <div class="episodiotitle"><a href="/episodes/loki-2x1/">Ouroboros</a></div></li>
                 </ul>
               </div></div>"#,
        ))
        .mount(&server)
        .await;

    let scraper = scraper_for(&server);
    let seasons = scraper
        .episodes(&format!("{}/tvshows/loki/", server.uri()))
        .await
        .expect("episodes should succeed");

    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0].season, 2);
    assert_eq!(seasons[0].episodes[0].title, "Ouroboros");
}

#[tokio::test]
async fn test_resolve_without_redirect_survives_url_normalization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(
            r#"<a id="link" href="https://google.com/server3/1:/Pack.zip">Get</a>"#,
        ))
        .mount(&server)
        .await;

    let scraper = scraper_for(&server);
    let requests = [
        format!("{}/links/a b/", server.uri()),
        format!("{}/links/abc/", server.uri()).replacen("http://", "HTTP://", 1),
        format!("{}/links/චිත්‍රපට/", server.uri()),
    ];

    for request in requests {
        let resolution = scraper.resolve(&request).await.expect("resolve should succeed");
        assert_eq!(resolution.redirect_url, None, "for {request}");
        assert_eq!(
            resolution.extracted_link.as_deref(),
            Some("https://cloud.sonic-cloud.online/server3/Pack?ext=zip"),
            "for {request}"
        );
    }
}

#[tokio::test]
async fn test_unparseable_urls_are_validation_errors() {
    let server = MockServer::start().await;
    let scraper = scraper_for(&server);

    for url in ["https://:80/x", "https://exa mple.com/x", "http://[::1/x"] {
        match scraper.details(url).await {
            Err(CinesubzError::InvalidUrl(_)) => {}
            other => panic!("Expected InvalidUrl for {url:?}, got {other:?}"),
        }
    }
}
