use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use serde_json::{Value, json};
use server::{
    config::Config,
    file_store::FileStore,
    page::{NO_DATA, TITLE},
    router,
    state::State,
    storage::{READ_ONLY_MESSAGE, Storage},
};
use tempfile::TempDir;
use tower::ServiceExt;

fn file_app() -> (TempDir, Router) {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let data_file = temp_dir.path().join("data.json");

    let storage = Storage::new(None, FileStore::new(&data_file), false);
    let state = State::with_storage(Config::file_only(&data_file), storage);

    (temp_dir, router(state))
}

fn broken_app(lenient_writes: bool) -> (TempDir, Router) {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    // The data file path is a directory, so every write fails.
    let storage = Storage::new(None, FileStore::new(temp_dir.path()), lenient_writes);
    let state: Arc<State> = State::with_storage(Config::file_only(temp_dir.path()), storage);

    (temp_dir, router(state))
}

async fn submit(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::post("/api/submit")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request");

    let response = app.clone().oneshot(request).await.expect("submit");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");

    (status, serde_json::from_slice(&bytes).expect("json body"))
}

async fn aggregate(app: &Router) -> Value {
    let request = Request::get("/api/aggregate")
        .body(Body::empty())
        .expect("build request");

    let response = app.clone().oneshot(request).await.expect("aggregate");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");

    serde_json::from_slice(&bytes).expect("json body")
}

async fn total(app: &Router) -> u64 {
    aggregate(app).await["counts"]
        .as_array()
        .expect("counts array")
        .iter()
        .map(|tally| tally["yes"].as_u64().unwrap() + tally["no"].as_u64().unwrap())
        .sum()
}

#[tokio::test]
async fn aggregate_over_no_submissions_is_all_zero() {
    let (_tmp, app) = file_app();

    let body = aggregate(&app).await;
    let counts = body["counts"].as_array().expect("counts array");

    assert_eq!(counts.len(), 11);
    for tally in counts {
        assert_eq!(tally, &json!({ "yes": 0, "no": 0 }));
    }
}

#[tokio::test]
async fn submit_accepts_eleven_answers_and_tallies_them() {
    let (_tmp, app) = file_app();

    let (status, body) = submit(
        &app,
        json!({ "answers": [true, false, null, true, true, null, false, false, true, null, true] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = submit(&app, json!({ "answers": vec![false; 11] })).await;
    assert_eq!(status, StatusCode::OK);

    let body = aggregate(&app).await;
    assert_eq!(body["counts"][0], json!({ "yes": 1, "no": 1 }));
    assert_eq!(body["counts"][1], json!({ "yes": 0, "no": 2 }));
    assert_eq!(body["counts"][2], json!({ "yes": 0, "no": 1 }));
    assert_eq!(body["counts"][10], json!({ "yes": 1, "no": 1 }));
}

#[tokio::test]
async fn every_submission_is_persisted() {
    let (tmp, app) = file_app();

    for _ in 0..3 {
        let (status, _) = submit(&app, json!({ "answers": vec![true; 11] })).await;
        assert_eq!(status, StatusCode::OK);
    }

    let stored: Vec<Value> = serde_json::from_str(
        &std::fs::read_to_string(tmp.path().join("data.json")).expect("read data file"),
    )
    .expect("data file is a json array");

    assert_eq!(stored.len(), 3);
    assert!(stored[0]["timestamp"].as_i64().expect("timestamp") > 0);
    assert_eq!(total(&app).await, 33);
}

#[tokio::test]
async fn submit_rejects_wrong_length_and_shape() {
    let (_tmp, app) = file_app();

    for body in [
        json!({ "answers": [] }),
        json!({ "answers": vec![true; 10] }),
        json!({ "answers": vec![true; 12] }),
        json!({ "answers": "yes" }),
        json!({ "answers": [1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1] }),
        json!({}),
    ] {
        let (status, response) = submit(&app, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({ "error": "Invalid input" }));
    }

    assert_eq!(total(&app).await, 0);
}

#[tokio::test]
async fn storage_failure_is_reported() {
    let (_tmp, app) = broken_app(false);

    let (status, body) = submit(&app, json!({ "answers": vec![true; 11] })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Server error");
    assert!(body["details"].as_str().is_some_and(|details| !details.is_empty()));
}

#[tokio::test]
async fn lenient_storage_failure_still_thanks_respondent() {
    let (_tmp, app) = broken_app(true);

    let (status, body) = submit(&app, json!({ "answers": vec![true; 11] })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": READ_ONLY_MESSAGE }));
    assert_eq!(total(&app).await, 0);
}

#[tokio::test]
async fn page_and_results_render() {
    let (_tmp, app) = file_app();
    submit(&app, json!({ "answers": vec![true; 11] })).await;

    let response = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).expect("build request"))
        .await
        .expect("page");
    assert_eq!(response.status(), StatusCode::OK);
    let page = String::from_utf8(
        to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body")
            .to_vec(),
    )
    .expect("utf8 page");
    assert!(page.contains(TITLE));

    let response = app
        .clone()
        .oneshot(Request::get("/results").body(Body::empty()).expect("build request"))
        .await
        .expect("results");
    assert_eq!(response.status(), StatusCode::OK);
    let results = String::from_utf8(
        to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body")
            .to_vec(),
    )
    .expect("utf8 results");
    assert!(results.contains("Yes: 1 • No: 0 • Total: 1"));
    assert!(!results.contains(NO_DATA));
}
