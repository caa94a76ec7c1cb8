#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use brush_api::config::{BlobBackend, ServerConfig, StoreBackend};
use brush_api::router::build_app_router;
use brush_api::state::AppState;
use brush_core::cascade::CascadeMode;
use brush_db::Stores;
use brush_pipeline::Pipeline;
use brush_storage::{AttachmentStore, MemoryBlobStore};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key";

/// Build a test `ServerConfig` on in-memory backends.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        api_key: TEST_API_KEY.to_string(),
        store: StoreBackend::Memory,
        blobs: BlobBackend::Memory,
        result_page_size: 20,
        image_page_size: 20,
        cascade: CascadeMode::Exhaustive,
        max_tasks_per_job: 100,
    }
}

/// The application router plus a handle on its blob store.
pub struct TestApp {
    pub router: Router,
    pub blobs: Arc<MemoryBlobStore>,
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over fresh in-memory stores.
pub fn build_test_app() -> Router {
    build_test_app_with(test_config()).router
}

pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let blobs = Arc::new(MemoryBlobStore::new());
    let pipeline = Pipeline::new(
        Stores::memory(),
        AttachmentStore::new(blobs.clone()),
        config.pipeline_settings(),
    );
    let state = AppState {
        pipeline,
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        blobs,
    }
}

/// Send a request carrying the test API key.
pub async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, TEST_API_KEY);

    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: Router, uri: &str) -> Response {
    send(app, Method::POST, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(json)).await
}

pub async fn put(app: Router, uri: &str) -> Response {
    send(app, Method::PUT, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Submit a job and return its JSON.
pub async fn create_job(app: &Router, count: i64) -> serde_json::Value {
    let response = post_json(
        app.clone(),
        "/jobs",
        serde_json::json!({"count": count, "phrases": ["a red fox"], "steps": 30}),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}

/// Post a result with the given raw bytes and return its JSON.
pub async fn create_result(app: &Router, job_id: &str, image: &[u8], latents: &[u8]) -> serde_json::Value {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    let response = post_json(
        app.clone(),
        &format!("/jobs/{job_id}/results"),
        serde_json::json!({
            "encoded_image": STANDARD.encode(image),
            "encoded_latents": STANDARD.encode(latents),
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}
