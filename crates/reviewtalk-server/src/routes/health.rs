//! Liveness routes.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(pong))
        .route("/ping", get(pong))
}

/// GET /health — liveness check.
async fn pong() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "pong" }))
}
