//! Documentation of a gene editing public opinion survey.
//!
//! Eleven yes/no questions about choices gene editing could one day offer
//! parents. Respondents answer any subset, the answers are stored with a
//! timestamp and everyone can see the running tally.
//!
//!
//!
//! # Endpoints
//! - `GET /`: survey page with the current results
//! - `GET /results`: results section only, refreshed by the page after a vote
//! - `POST /api/submit`: `{ "answers": [true | false | null; 11] }`
//! - `GET /api/aggregate`: `{ "counts": [{ "yes": n, "no": n }; 11] }`
//! - `GET /static/*`: illustrations from `STATIC_DIR`
//!
//!
//!
//! # Storage
//!
//! Redis when `REDIS_URL` is set and reachable, a JSON file otherwise. Writes
//! and reads both fall back to the file when Redis misbehaves, see
//! [`storage`].
//!
//! Read-only deployments can set `LENIENT_WRITES=true` so a failed file write
//! still thanks the respondent instead of erroring.
//!
//!
//!
//! # Setup
//!
//! Run locally with file storage.
//! ```sh
//! RUST_LOG=info cargo run -p survey
//! ```
//!
//! With Redis.
//! ```sh
//! REDIS_URL=redis://127.0.0.1:6379 RUST_LOG=info cargo run -p survey
//! ```
//!
//! Seed a running server.
//! ```sh
//! cargo run -p tester -- --count 50
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod file_store;
pub mod page;
pub mod routes;
pub mod state;
pub mod storage;
pub mod survey;
pub mod utils;

use routes::{aggregate_handler, page_handler, results_handler, submit_handler};
use state::State;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await;

    info!("Starting server...");

    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {address}: {e}");
            return;
        }
    };
    info!("Server running on {address}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
    }

    info!("Server shutting down...");
}

pub fn router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(page_handler))
        .route("/results", get(results_handler))
        .route("/api/submit", post(submit_handler))
        .route("/api/aggregate", get(aggregate_handler))
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves on the first of Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let interrupt = async {
        match ctrl_c().await {
            Ok(()) => "Ctrl+C",
            Err(e) => {
                error!("Ctrl+C handler unavailable: {e}");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                error!("SIGTERM handler unavailable: {e}");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&str>();

    let received = tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    };

    info!("Received {received}, shutting down");
}
