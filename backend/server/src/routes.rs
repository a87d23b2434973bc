use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State as AxumState,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde_json::json;
use tracing::info;

use crate::{
    error::AppError,
    page::{render_page, render_results},
    state::State,
    storage::Saved,
    survey::Submission,
    utils::get_answers_from_body,
};

pub async fn submit_handler(
    AxumState(state): AxumState<Arc<State>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let answers = get_answers_from_body(&body).inspect_err(|_| {
        info!("Rejected submission: {}", String::from_utf8_lossy(&body));
    })?;

    let entry = Submission::new(answers);

    let body = match state.storage.save(&entry).await? {
        Saved::Stored => json!({ "success": true }),
        Saved::Unsaved(message) => json!({ "success": true, "message": message }),
    };

    Ok((StatusCode::OK, Json(body)))
}

pub async fn aggregate_handler(AxumState(state): AxumState<Arc<State>>) -> impl IntoResponse {
    let aggregate = state.storage.aggregate().await;

    #[cfg(feature = "verbose")]
    info!("Returning aggregated counts: {:?}", aggregate.counts);

    Json(aggregate)
}

pub async fn page_handler(AxumState(state): AxumState<Arc<State>>) -> impl IntoResponse {
    let aggregate = state.storage.aggregate().await;

    Html(render_page(&aggregate))
}

pub async fn results_handler(AxumState(state): AxumState<Arc<State>>) -> impl IntoResponse {
    let aggregate = state.storage.aggregate().await;

    Html(render_results(&aggregate))
}
