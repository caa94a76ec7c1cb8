//! Shared-secret authentication on API routes.

mod common;

use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::{Request, StatusCode};
use common::body_json;
use tower::ServiceExt;

async fn get_with_auth(header: Option<&str>, uri: &str) -> axum::response::Response {
    let app = common::build_test_app();
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = header {
        builder = builder.header(AUTHORIZATION, value);
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn missing_key_is_rejected() {
    let response = get_with_auth(None, "/jobs").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn wrong_key_is_rejected_on_every_resource() {
    for uri in ["/jobs", "/job-tasks", "/images"] {
        let response = get_with_auth(Some("not-the-key"), uri).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn raw_and_bearer_keys_are_accepted() {
    let raw = get_with_auth(Some(common::TEST_API_KEY), "/jobs").await;
    assert_eq!(raw.status(), StatusCode::OK);

    let bearer = get_with_auth(Some(&format!("Bearer {}", common::TEST_API_KEY)), "/jobs").await;
    assert_eq!(bearer.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_is_checked_before_the_body() {
    let app = common::build_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/jobs")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
