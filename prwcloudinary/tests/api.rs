//! Handler-level tests: the JSON error contract and cache directives

use axum::body::Body;
use axum::http::{Request, StatusCode};
use mockito::Matcher;
use prwcloudinary::api_rest::MediaState;
use prwcloudinary::{MediaClient, api_rest};
use prwconfig::MediaCredentials;
use std::sync::Arc;
use tower::ServiceExt;

fn state_for(server: &mockito::Server) -> MediaState {
    let client = MediaClient::builder()
        .base_url(server.url())
        .credentials(MediaCredentials {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
        })
        .build()
        .expect("client");
    MediaState::new(Some(Arc::new(client)), None, None)
}

fn unconfigured_state() -> MediaState {
    MediaState::new(None, None, None)
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value, Option<String>) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let cache_control = response
        .headers()
        .get("cache-control")
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body, cache_control)
}

#[tokio::test]
async fn missing_credentials_fail_before_any_upstream_call() {
    let router = api_rest::create_router(unconfigured_state());

    for uri in ["/tracks", "/gallery"] {
        let (status, body, _) = get(router.clone(), uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body["error"], "Server configuration error", "{uri}");
    }
}

#[tokio::test]
async fn stream_without_id_is_a_bad_request() {
    let router = api_rest::create_router(unconfigured_state());

    // The parameter check runs before the credentials check
    let (status, body, _) = get(router.clone(), "/stream").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required query parameter: id");

    // An empty value counts as missing
    let (status, _, _) = get(router, "/stream?id=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn provider_error_is_echoed_never_downgraded() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/demo/resources/image/upload")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body("{\"error\":{\"message\":\"unknown api_key\"}}")
        .create_async()
        .await;

    let router = api_rest::create_router(state_for(&server));
    let (status, body, _) = get(router, "/gallery").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Cloudinary API error");
    assert!(body["details"].as_str().unwrap().contains("unknown api_key"));
}

#[tokio::test]
async fn track_listing_is_private_and_uncached() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/demo/resources/raw/upload")
        .match_query(Matcher::Any)
        .with_body(
            r#"{"resources": [
                {"public_id": "tracks/demo_123456", "format": "mp3", "bytes": 99,
                 "secure_url": "https://res.example/demo.mp3"}
            ]}"#,
        )
        .create_async()
        .await;

    let router = api_rest::create_router(state_for(&server));
    let (status, body, cache_control) = get(router, "/tracks").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache_control.as_deref(), Some("private, no-store"));
    assert_eq!(body[0]["id"], "tracks/demo_123456");
    assert_eq!(body[0]["name"], "demo.mp3");
    assert!(body[0]["originalFilename"].is_null());
}

#[tokio::test]
async fn stream_resolution_is_briefly_cacheable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/demo/resources/raw/upload")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("prefix".into(), "tracks/demo".into()),
            Matcher::UrlEncoded("max_results".into(), "1".into()),
        ]))
        .with_body(
            r#"{"resources": [
                {"public_id": "tracks/demo", "secure_url": "https://res.example/demo.mp3"}
            ]}"#,
        )
        .create_async()
        .await;

    let router = api_rest::create_router(state_for(&server));
    let (status, body, cache_control) = get(router, "/stream?id=tracks%2Fdemo").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache_control.as_deref(), Some("private, max-age=30"));
    assert_eq!(body["url"], "https://res.example/demo.mp3");
}

#[tokio::test]
async fn stream_miss_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/demo/resources/raw/upload")
        .match_query(Matcher::Any)
        .with_body(r#"{"resources": []}"#)
        .create_async()
        .await;

    let router = api_rest::create_router(state_for(&server));
    let (status, body, _) = get(router, "/stream?id=ghost").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "File not found");
}

#[tokio::test]
async fn non_get_methods_are_rejected() {
    let router = api_rest::create_router(unconfigured_state());
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tracks")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
