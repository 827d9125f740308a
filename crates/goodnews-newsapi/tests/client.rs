//! Integration tests for `NewsApiClient` using wiremock HTTP mocks.

use chrono::{Duration, Utc};
use goodnews_newsapi::{EverythingQuery, NewsApiClient, NewsApiError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> NewsApiClient {
    NewsApiClient::with_base_url("test-key", 5, "goodnews-test", base_url)
        .expect("client construction should not fail")
}

fn query() -> EverythingQuery {
    EverythingQuery {
        q: "france".to_string(),
        language: "en".to_string(),
        domains: vec![],
        from: Utc::now() - Duration::days(7),
        page_size: 50,
    }
}

#[tokio::test]
async fn search_returns_parsed_articles() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "ok",
        "totalResults": 2,
        "articles": [
            {
                "source": { "id": "le-monde", "name": "Le Monde" },
                "title": "France inaugurates solar park",
                "description": "A milestone for renewable power.",
                "url": "https://www.lemonde.fr/solar",
                "urlToImage": "https://img.lemonde.fr/solar.jpg",
                "publishedAt": "2025-03-01T10:00:00Z"
            },
            {
                "source": { "id": null, "name": null },
                "title": null,
                "description": null,
                "url": "https://example.org/empty",
                "urlToImage": null,
                "publishedAt": null
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/everything"))
        .and(query_param("q", "france"))
        .and(query_param("language", "en"))
        .and(query_param("sortBy", "publishedAt"))
        .and(query_param("pageSize", "50"))
        .and(query_param("apiKey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let articles = client
        .search_everything(&query())
        .await
        .expect("should parse articles");

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].source_name(), Some("Le Monde"));
    assert_eq!(
        articles[0].url_to_image.as_deref(),
        Some("https://img.lemonde.fr/solar.jpg")
    );
    assert!(articles[1].title.is_none());
    assert!(articles[1].source_name().is_none());
}

#[tokio::test]
async fn ok_envelope_without_articles_is_empty_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/everything"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "totalResults": 0,
                "articles": []
            })),
        )
        .mount(&server)
        .await;

    let articles = test_client(&server.uri())
        .search_everything(&query())
        .await
        .expect("empty result is not an error");
    assert!(articles.is_empty());
}

#[tokio::test]
async fn http_429_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "status": "error",
            "code": "rateLimited",
            "message": "You have made too many requests recently."
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search_everything(&query())
        .await
        .unwrap_err();
    assert!(
        matches!(err, NewsApiError::RateLimited(ref m) if m.contains("too many requests")),
        "got {err:?}"
    );
}

#[tokio::test]
async fn http_429_without_body_still_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search_everything(&query())
        .await
        .unwrap_err();
    assert!(matches!(err, NewsApiError::RateLimited(_)), "got {err:?}");
}

#[tokio::test]
async fn rate_limited_code_in_200_envelope_is_detected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "error",
            "code": "rateLimited",
            "message": "quota"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search_everything(&query())
        .await
        .unwrap_err();
    assert!(matches!(err, NewsApiError::RateLimited(_)), "got {err:?}");
}

#[tokio::test]
async fn http_426_is_upgrade_required() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(426).set_body_json(serde_json::json!({
            "status": "error",
            "code": "parameterInvalid",
            "message": "You are trying to request results too far in the past."
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search_everything(&query())
        .await
        .unwrap_err();
    assert!(matches!(err, NewsApiError::UpgradeRequired(_)), "got {err:?}");
}

#[tokio::test]
async fn invalid_key_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "status": "error",
            "code": "apiKeyInvalid",
            "message": "Your API key is invalid."
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search_everything(&query())
        .await
        .unwrap_err();
    assert!(
        matches!(err, NewsApiError::ApiError { ref code, .. } if code == "apiKeyInvalid"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn server_error_without_envelope_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search_everything(&query())
        .await
        .unwrap_err();
    assert!(matches!(err, NewsApiError::Http(_)), "got {err:?}");
}

#[tokio::test]
async fn malformed_success_body_is_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search_everything(&query())
        .await
        .unwrap_err();
    assert!(matches!(err, NewsApiError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn connection_refused_is_http_error() {
    let client = test_client("http://127.0.0.1:1");
    let err = client.search_everything(&query()).await.unwrap_err();
    assert!(matches!(err, NewsApiError::Http(_)), "got {err:?}");
}
