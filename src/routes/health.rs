use std::time::Instant;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::state::AppState;

pub fn root_router() -> Router<AppState> {
    Router::new().route("/health", get(liveness))
}

pub fn api_router() -> Router<AppState> {
    Router::new().route("/health", get(readiness))
}

/// `GET /health`: the process is up.
async fn liveness() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /api/health`: includes a database round trip.
async fn readiness(State(state): State<AppState>) -> Json<Value> {
    let started = Instant::now();
    let connected = state.db.ping().await.is_ok();
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    Json(json!({
        "status": if connected { "healthy" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": {
            "connected": connected,
            "latency_ms": latency_ms,
        },
        "imageStorage": state.images.kind(),
    }))
}
