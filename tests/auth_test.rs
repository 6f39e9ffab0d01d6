//! Tests for the credential cache and JWT-bearer exchange, against a mocked
//! token endpoint.

mod common;

use ens_relay::error::AppError;
use ens_relay::salesforce::TokenCache;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::sf_config;

fn cache_for(server: &MockServer) -> TokenCache {
    let client = reqwest::Client::new();
    TokenCache::with_token_url(
        sf_config(&server.uri()),
        client,
        format!("{}/services/oauth2/token", server.uri()),
    )
}

fn token_response(server: &MockServer) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "access_token": "tok-1",
        "instance_url": server.uri(),
        "token_type": "Bearer"
    }))
}

#[tokio::test]
async fn test_get_exchanges_assertion_for_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .and(body_string_contains("jwt-bearer"))
        .and(body_string_contains("assertion="))
        .respond_with(token_response(&server))
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let credential = cache.get().await.unwrap();

    assert_eq!(credential.access_token, "tok-1");
    assert_eq!(credential.instance_url, server.uri());
    assert!(credential.expires_at > chrono::Utc::now());
}

#[tokio::test]
async fn test_valid_token_is_reused_without_second_exchange() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .respond_with(token_response(&server))
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let first = cache.get().await.unwrap();
    let second = cache.get().await.unwrap();

    assert_eq!(first.access_token, second.access_token);
    // expect(1) on the mock verifies no second exchange happened
}

#[tokio::test]
async fn test_concurrent_callers_share_one_exchange() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .respond_with(token_response(&server))
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server);

    // Both start with an empty cache; the refresh must be single-flight
    let (a, b) = tokio::join!(cache.get(), cache.get());

    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(a.access_token, "tok-1");
    assert_eq!(a.access_token, b.access_token);
}

#[tokio::test]
async fn test_provider_rejection_propagates_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "user hasn't approved this consumer"
            })),
        )
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let err = cache.get().await.unwrap_err();

    match err {
        AppError::Auth(detail) => {
            assert!(detail.contains("400"));
            assert!(detail.contains("invalid_grant"));
        }
        other => panic!("expected AppError::Auth, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_exchange_caches_nothing() {
    let server = MockServer::start().await;

    // First call fails, second succeeds
    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .respond_with(token_response(&server))
        .mount(&server)
        .await;

    let cache = cache_for(&server);

    assert!(cache.get().await.is_err());

    // Next attempt re-triggers the exchange instead of serving a bad cache
    let credential = cache.get().await.unwrap();
    assert_eq!(credential.access_token, "tok-1");
}
