//! Chat routes — request/response chat and transcript reads.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::debug;

use crate::error::{ApiError, JsonBody};
use crate::state::AppState;
use reviewtalk_chat::types::{ChatRequest, ChatResponse};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/users/{user_id}/chats/{chat_id}",
            get(get_chat_history).post(chat_with_bot),
        )
        .route("/chat", post(chat_once))
}

/// GET /api/v1/users/{user_id}/chats/{chat_id} — full transcript, oldest first.
async fn get_chat_history(
    State(state): State<Arc<AppState>>,
    Path((user_id, chat_id)): Path<(String, String)>,
) -> Json<Vec<ChatResponse>> {
    debug!("get_chat_history: user={} chat={}", user_id, chat_id);
    Json(state.store.read(&chat_id))
}

/// POST /api/v1/users/{user_id}/chats/{chat_id} — answer a message and record it.
async fn chat_with_bot(
    State(state): State<Arc<AppState>>,
    Path((user_id, chat_id)): Path<(String, String)>,
    JsonBody(req): JsonBody<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    debug!("chat_with_bot: user={} chat={}", user_id, chat_id);

    let debug_mode = state.config.debug;
    let session = state
        .session()
        .map_err(|e| ApiError::new(e, debug_mode))?;
    let answer = session
        .handle(&chat_id, &req.message)
        .await
        .map_err(|e| ApiError::new(e, debug_mode))?;

    Ok(Json(ChatResponse { answer }))
}

/// POST /api/v1/chat — single stateless turn, nothing recorded.
async fn chat_once(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let debug_mode = state.config.debug;
    let session = state
        .session()
        .map_err(|e| ApiError::new(e, debug_mode))?;
    let answer = session
        .ask(&req.message)
        .await
        .map_err(|e| ApiError::new(e, debug_mode))?;

    Ok(Json(ChatResponse { answer }))
}
