//! Provider contract tests.
//!
//! Each adapter runs against a wiremock stand-in for its upstream API.
//! These verify:
//! - request shape: path, query parameters, credentials
//! - response mapping into `ImageResult`
//! - that failures (non-2xx, malformed bodies, timeouts) yield nothing
//! - the Wikipedia multi-stage lookup, filtering and truncation

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use montage_search::http::build_client;
use montage_search::providers::{
    PexelsProvider, PixabayProvider, UnsplashProvider, WikipediaProvider,
};
use montage_search::{ImageProvider, ImageSource, SearchConfig};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> reqwest::Client {
    build_client(&SearchConfig::default()).expect("client builds")
}

fn client_with_timeout(seconds: u64) -> reqwest::Client {
    let config = SearchConfig {
        timeout_seconds: seconds,
        ..Default::default()
    };
    build_client(&config).expect("client builds")
}

// ────────────────────────────────────────────────────────────────────────────
// Pexels
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pexels_sends_key_in_authorization_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(header("Authorization", "pexels-test-key"))
        .and(query_param("query", "red fox"))
        .and(query_param("per_page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "photos": [{
                "id": 42,
                "width": 1200,
                "height": 800,
                "url": "https://www.pexels.com/photo/42/",
                "photographer": "Ada",
                "photographer_url": "https://www.pexels.com/@ada",
                "src": {
                    "medium": "https://images.pexels.com/42/medium.jpeg",
                    "original": "https://images.pexels.com/42/original.jpeg"
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = PexelsProvider::new(
        client(),
        format!("{}/v1/search", server.uri()),
        "pexels-test-key",
    );
    let results = provider.fetch("red fox", 3).await.expect("fetch succeeds");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "pexels_42");
    assert_eq!(results[0].source, ImageSource::Pexels);
    assert_eq!(results[0].attribution_name, "Ada");
    assert_eq!((results[0].width, results[0].height), (1200, 800));
}

#[tokio::test]
async fn pexels_server_error_yields_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let provider = PexelsProvider::new(client(), format!("{}/v1/search", server.uri()), "k");
    assert!(provider.search("cats", 5).await.is_empty());
}

#[tokio::test]
async fn pexels_error_never_mentions_the_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let provider = PexelsProvider::new(
        client(),
        format!("{}/v1/search", server.uri()),
        "super-secret-key",
    );
    let err = provider.fetch("cats", 5).await.unwrap_err();
    assert!(!err.to_string().contains("super-secret-key"));
}

// ────────────────────────────────────────────────────────────────────────────
// Pixabay
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pixabay_sends_key_and_photo_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/"))
        .and(query_param("key", "pixabay-test-key"))
        .and(query_param("q", "tulips"))
        .and(query_param("per_page", "5"))
        .and(query_param("image_type", "photo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "totalHits": 1,
            "hits": [{
                "id": 73424,
                "pageURL": "https://pixabay.com/en/tulip-73424/",
                "webformatURL": "https://pixabay.com/get/tulip_640.jpg",
                "largeImageURL": "https://pixabay.com/get/tulip_1280.jpg",
                "imageWidth": 3000,
                "imageHeight": 2000,
                "user_id": 11,
                "user": "Hans"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = PixabayProvider::new(
        client(),
        format!("{}/api/", server.uri()),
        "pixabay-test-key",
    );
    let results = provider.fetch("tulips", 5).await.expect("fetch succeeds");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "pixabay_73424");
    assert_eq!(results[0].attribution_url, "https://pixabay.com/users/Hans-11/");
    assert_eq!(results[0].full_size_url, "https://pixabay.com/get/tulip_1280.jpg");
}

#[tokio::test]
async fn pixabay_malformed_body_yields_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .expect(2)
        .mount(&server)
        .await;

    let provider = PixabayProvider::new(client(), format!("{}/api/", server.uri()), "k");
    let err = provider.fetch("cats", 5).await.unwrap_err();
    assert!(err.to_string().contains("parse error"));
    assert!(provider.search("cats", 5).await.is_empty());
}

// ────────────────────────────────────────────────────────────────────────────
// Unsplash
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unsplash_sends_client_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/photos"))
        .and(query_param("query", "mountains"))
        .and(query_param("per_page", "2"))
        .and(query_param("client_id", "unsplash-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "results": [
                {
                    "id": "abc",
                    "width": 4000,
                    "height": 6000,
                    "urls": {
                        "small": "https://images.unsplash.com/abc?w=400",
                        "full": "https://images.unsplash.com/abc"
                    },
                    "links": {"html": "https://unsplash.com/photos/abc"},
                    "user": {
                        "name": "Grace",
                        "links": {"html": "https://unsplash.com/@grace"}
                    }
                },
                {
                    "id": "def",
                    "urls": {
                        "small": "https://images.unsplash.com/def?w=400",
                        "full": "https://images.unsplash.com/def"
                    }
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = UnsplashProvider::new(
        client(),
        format!("{}/search/photos", server.uri()),
        "unsplash-test-key",
    );
    let results = provider.fetch("mountains", 2).await.expect("fetch succeeds");

    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["unsplash_abc", "unsplash_def"]);
    assert_eq!(results[0].attribution_url, "https://unsplash.com/@grace");
    assert_eq!(results[0].source_page_url, "https://unsplash.com/photos/abc");
    assert_eq!(results[1].attribution_name, "");
}

#[tokio::test]
async fn unsplash_timeout_yields_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/photos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": []}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let provider = UnsplashProvider::new(
        client_with_timeout(1),
        format!("{}/search/photos", server.uri()),
        "k",
    );
    let started = std::time::Instant::now();
    assert!(provider.search("cats", 5).await.is_empty());
    assert!(started.elapsed() < Duration::from_secs(4));
}

// ────────────────────────────────────────────────────────────────────────────
// Wikipedia
// ────────────────────────────────────────────────────────────────────────────

async fn mount_article_search(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("list", "search"))
        .and(query_param("srlimit", "5"))
        .and(query_param("formatversion", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_image_info(server: &MockServer, title: &str, url: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "imageinfo"))
        .and(query_param("titles", title))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"pages": [{
                "ns": 6,
                "title": title,
                "imageinfo": [{"url": url, "width": 800, "height": 600}]
            }]}
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn wikipedia(server: &MockServer) -> WikipediaProvider {
    WikipediaProvider::new(client(), format!("{}/w/api.php", server.uri()))
}

#[tokio::test]
async fn wikipedia_filters_and_stops_at_limit() {
    let server = MockServer::start().await;

    mount_article_search(
        &server,
        json!({"query": {"search": [
            {"pageid": 101, "title": "Cat"},
            {"pageid": 202, "title": "Dog"}
        ]}}),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "images|imageinfo"))
        .and(query_param("pageids", "101|202"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"pages": [
                {"pageid": 101, "title": "Cat", "images": [
                    {"ns": 6, "title": "File:Logo.png"},
                    {"ns": 6, "title": "File:Cat.jpg"},
                    {"ns": 6, "title": "File:Icon.svg"}
                ]},
                {"pageid": 202, "title": "Dog", "images": [
                    {"ns": 6, "title": "File:Dog.png"}
                ]}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    mount_image_info(&server, "File:Cat.jpg", "https://upload.example/cat.jpg", 1).await;
    mount_image_info(&server, "File:Dog.png", "https://upload.example/dog.png", 0).await;

    let results = wikipedia(&server).fetch("cat", 1).await.expect("fetch succeeds");

    assert_eq!(results.len(), 1);
    let cat = &results[0];
    assert_eq!(cat.id, "wiki_101_0");
    assert_eq!(cat.full_size_url, "https://upload.example/cat.jpg");
    assert_eq!(cat.thumbnail_url, cat.full_size_url);
    assert_eq!(cat.source, ImageSource::Wikipedia);
    assert_eq!(cat.source_page_url, "https://en.wikipedia.org/?curid=101");
    assert_eq!(cat.attribution_name, "Wikipedia/Commons");
    assert_eq!(cat.description.as_deref(), Some("From article: Cat"));
}

#[tokio::test]
async fn wikipedia_walks_articles_in_search_order() {
    let server = MockServer::start().await;

    mount_article_search(
        &server,
        json!({"query": {"search": [{"pageid": 2}, {"pageid": 1}]}}),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "images|imageinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"pages": [
                {"pageid": 2, "title": "Second", "images": [{"title": "File:B.jpg"}]},
                {"pageid": 1, "title": "First", "images": [{"title": "File:A.jpeg"}]}
            ]}
        })))
        .mount(&server)
        .await;

    mount_image_info(&server, "File:B.jpg", "https://upload.example/b.jpg", 1).await;
    mount_image_info(&server, "File:A.jpeg", "https://upload.example/a.jpeg", 1).await;

    let results = wikipedia(&server).fetch("letters", 10).await.expect("fetch succeeds");

    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["wiki_2_0", "wiki_1_1"]);
    assert_eq!(
        results[1].description.as_deref(),
        Some("From article: First")
    );
}

#[tokio::test]
async fn wikipedia_no_articles_makes_no_further_calls() {
    let server = MockServer::start().await;

    mount_article_search(&server, json!({"query": {"search": []}})).await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("action", "query"))
        .and(query_param("prop", "images|imageinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"query": {"pages": []}})))
        .expect(0)
        .mount(&server)
        .await;

    let results = wikipedia(&server)
        .fetch("qwzxv nothing", 10)
        .await
        .expect("fetch succeeds");
    assert!(results.is_empty());
}

#[tokio::test]
async fn wikipedia_skips_files_that_do_not_resolve() {
    let server = MockServer::start().await;

    mount_article_search(&server, json!({"query": {"search": [{"pageid": 7}]}})).await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "images|imageinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"pages": [{"pageid": 7, "images": [
                {"title": "File:Gone.jpg"},
                {"title": "File:Here.png"}
            ]}]}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "imageinfo"))
        .and(query_param("titles", "File:Gone.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"pages": [{"ns": 6, "title": "File:Gone.jpg", "missing": true}]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_image_info(&server, "File:Here.png", "https://upload.example/here.png", 1).await;

    let results = wikipedia(&server).fetch("files", 10).await.expect("fetch succeeds");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].full_size_url, "https://upload.example/here.png");
    // Untitled articles fall back to a generic label.
    assert_eq!(
        results[0].description.as_deref(),
        Some("From article: Wikipedia Article")
    );
}

#[tokio::test]
async fn wikipedia_api_error_yields_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"code": "maxlag", "info": "Waiting for a database server"}
        })))
        .mount(&server)
        .await;

    let provider = wikipedia(&server);
    let err = provider.fetch("cats", 5).await.unwrap_err();
    assert!(err.to_string().contains("maxlag"));
    assert!(provider.search("cats", 5).await.is_empty());
}

#[tokio::test]
async fn wikipedia_stage_failure_discards_partial_results() {
    let server = MockServer::start().await;

    mount_article_search(&server, json!({"query": {"search": [{"pageid": 3}]}})).await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "images|imageinfo"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(wikipedia(&server).search("cats", 5).await.is_empty());
}
