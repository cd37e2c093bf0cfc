//! WebSocket chat — one text frame in, one answer frame out.
//!
//! Each connection is registered under its chat id for as long as its
//! handler runs, however the handler exits. Frames on one connection are
//! answered strictly in arrival order; a slow provider call only holds up
//! its own connection. On a provider failure the connection is closed
//! without an explanation frame.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tracing::{debug, error, info};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/users/{user_id}/chats/{chat_id}", get(ws_handler))
}

/// Upgrade unconditionally; there is no auth check on this channel.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path((user_id, chat_id)): Path<(String, String)>,
) -> impl IntoResponse {
    debug!("WebSocket upgrade: user={} chat={}", user_id, chat_id);
    ws.on_upgrade(move |socket| handle_socket(socket, state, chat_id))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, chat_id: String) {
    let registration = state.connections.register_guarded(&chat_id);
    let connection_id = registration.id();
    info!("WebSocket {} opened for chat {}", connection_id, chat_id);

    match state.session() {
        Ok(session) => loop {
            let text = match socket.recv().await {
                Some(Ok(Message::Text(text))) => text,
                Some(Ok(Message::Close(_))) | None => {
                    debug!("WebSocket {} closed by client", connection_id);
                    break;
                }
                Some(Err(e)) => {
                    debug!("WebSocket {} receive error: {}", connection_id, e);
                    break;
                }
                // Binary, ping and pong frames carry no chat message
                Some(Ok(_)) => continue,
            };

            let answer = match session.handle(&chat_id, text.as_str()).await {
                Ok(answer) => answer,
                Err(e) => {
                    error!("WebSocket {} chat {} failed: {}", connection_id, chat_id, e);
                    let _ = socket.send(Message::Close(None)).await;
                    break;
                }
            };

            if socket.send(Message::Text(answer.into())).await.is_err() {
                debug!("WebSocket {} send failed, client gone", connection_id);
                break;
            }
        },
        Err(e) => {
            error!("WebSocket {} chat {} failed: {}", connection_id, chat_id, e);
            let _ = socket.send(Message::Close(None)).await;
        }
    }

    drop(registration);
    info!("WebSocket {} closed for chat {}", connection_id, chat_id);
}
