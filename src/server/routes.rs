//! Route handlers for the WOOT collaboration server.
//!
//! This module contains HTTP route definitions: replica health, a read-only
//! document snapshot, and the WebSocket upgrade for collaborative editing.

use axum::{
    Router,
    extract::{State, ws::WebSocketUpgrade},
    response::{Json, Response},
    routing::get,
};
use serde::Serialize;

use crate::crdt::SiteId;
use crate::server::websocket::{AppState, handle_websocket_connection};

/// Liveness report for the server replica
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Site identifier the server replica generates characters for
    pub site: SiteId,
    /// Number of WebSocket sessions currently subscribed to updates
    pub sessions: usize,
}

/// Read-only snapshot of the replicated document
#[derive(Serialize)]
pub struct DocumentResponse {
    pub content: String,
    pub visible_chars: usize,
    /// Total characters held, tombstones and sentinels included
    pub total_chars: usize,
    /// Remote operations still waiting for their preconditions
    pub pending_ops: usize,
}

/// Health check reporting which site this replica serves and how many
/// sessions are attached
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let replica = state.replica.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        site: replica.site(),
        sessions: state.updates.receiver_count(),
    })
}

/// Snapshot of the current document, tombstone and pool counts included
pub async fn document(State(state): State<AppState>) -> Json<DocumentResponse> {
    let replica = state.replica.read().await;
    Json(DocumentResponse {
        content: replica.value(),
        visible_chars: replica.visible_char_count(),
        total_chars: replica.total_char_count(),
        pending_ops: replica.pending_count(),
    })
}

/// WebSocket connection handler for collaborative editing
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_websocket_connection(socket, state))
}

/// Creates and configures the main application router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/document", get(document))
        .route("/ws", get(ws_handler))
}
