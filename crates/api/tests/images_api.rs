//! HTTP-level tests for `/images`.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_job, create_result, delete, get, put};

/// Post and promote `n` results, returning the image ids oldest first.
async fn promote_many(app: &axum::Router, n: u8) -> Vec<String> {
    let job = create_job(app, 1).await;
    let job_id = job["id"].as_str().unwrap();

    let mut ids = Vec::new();
    for tag in 0..n {
        let result = create_result(app, job_id, &[tag], &[tag]).await;
        let id = result["id"].as_str().unwrap().to_string();
        let response = put(app.clone(), &format!("/job-results/{id}")).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        ids.push(id);
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }
    ids
}

#[tokio::test]
async fn list_is_a_bare_array_newest_first() {
    let app = common::build_test_app();
    let ids = promote_many(&app, 3).await;

    let response = get(app, "/images").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let listed: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(listed, vec![ids[2].as_str(), ids[1].as_str(), ids[0].as_str()]);
    assert!(json[0]["created"].is_i64());
}

#[tokio::test]
async fn list_pages_with_the_image_page_size() {
    let mut config = common::test_config();
    config.image_page_size = 2;
    let app = common::build_test_app_with(config).router;
    let ids = promote_many(&app, 3).await;

    let first = body_json(get(app.clone(), "/images").await).await;
    assert_eq!(first.as_array().unwrap().len(), 2);

    let cursor = first[1]["created"].as_i64().unwrap();
    let rest = body_json(get(app, &format!("/images?cursor={cursor}")).await).await;
    assert_eq!(rest.as_array().unwrap().len(), 1);
    assert_eq!(rest[0]["id"], ids[0].as_str());
}

#[tokio::test]
async fn delete_image_removes_it_everywhere() {
    let test_app = common::build_test_app_with(common::test_config());
    let app = test_app.router.clone();
    let ids = promote_many(&app, 1).await;
    let id = &ids[0];

    let response = delete(app.clone(), &format!("/images/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.clone(), &format!("/images/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let listed = body_json(get(app, "/images").await).await;
    assert!(listed.as_array().unwrap().is_empty());
    assert!(test_app.blobs.is_empty().await);
}
