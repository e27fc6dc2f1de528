//! WebSocket session management for collaborative WOOT editing.
//!
//! This module handles WebSocket connections, message parsing, local edit
//! generation, remote operation relay, and real-time fan-out of updates to
//! every connected client.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use chrono::{DateTime, Utc};
use futures_util::sink::SinkExt;
use futures_util::stream::{SplitSink, SplitStream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, error, info, warn};

use crate::crdt::{Operation, SiteId, WootString};

/// Shared application state: the server-side replica plus the update channel
/// every session subscribes to.
pub struct SharedState {
    /// The replicated string this server edits on behalf of its clients
    pub replica: RwLock<WootString>,
    /// Fan-out of serialized [`EditResponse`] updates to all sessions
    pub updates: broadcast::Sender<String>,
}

/// Handle to the shared application state.
pub type AppState = Arc<SharedState>;

impl SharedState {
    /// Creates the shared state with a fresh replica for `site`.
    pub fn new(site: SiteId) -> AppState {
        let (updates, _) = broadcast::channel(64);
        Arc::new(SharedState {
            replica: RwLock::new(WootString::new(site)),
            updates,
        })
    }
}

/// WebSocket message protocol for edit requests
#[derive(Serialize, Deserialize, Debug)]
pub struct EditRequest {
    #[serde(rename = "type")]
    pub op_type: String,
    pub character: Option<char>,
    pub position: Option<usize>,
    pub operation: Option<Operation>,
}

/// Response messages sent to clients
#[derive(Serialize, Debug)]
pub struct EditResponse {
    #[serde(rename = "type")]
    pub response_type: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
    pub timestamp: DateTime<Utc>,
}

impl EditResponse {
    fn new(response_type: &str, content: String, operation: Option<Operation>) -> Self {
        EditResponse {
            response_type: response_type.to_string(),
            content,
            operation,
            timestamp: Utc::now(),
        }
    }
}

/// WebSocket session manager
pub struct WebSocketSession {
    sink: SplitSink<WebSocket, Message>,
    stream: SplitStream<WebSocket>,
    updates: broadcast::Receiver<String>,
    state: AppState,
    session_id: String,
}

impl WebSocketSession {
    /// Create a new WebSocket session
    pub fn new(socket: WebSocket, state: AppState, session_id: String) -> Self {
        let (sink, stream) = socket.split();
        let updates = state.updates.subscribe();
        Self {
            sink,
            stream,
            updates,
            state,
            session_id,
        }
    }

    /// Handle the WebSocket connection lifecycle
    pub async fn handle(mut self) {
        info!("WebSocket session {} established", self.session_id);

        // Send initial document state
        if let Err(e) = self.send_initial_state().await {
            error!("Failed to send initial state to {}: {}", self.session_id, e);
            return;
        }

        // Process incoming messages and fan-out updates from other sessions
        loop {
            tokio::select! {
                msg = self.stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            if let Err(e) = self.handle_text_message(&text).await {
                                error!("Error handling message from {}: {}", self.session_id, e);
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) => {
                            info!("WebSocket session {} closed by client", self.session_id);
                            break;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = self.sink.send(Message::Pong(data)).await {
                                error!("Failed to send pong to {}: {}", self.session_id, e);
                                break;
                            }
                        }
                        Some(Ok(_)) => {
                            // Ignore other message types (binary, pong)
                        }
                        Some(Err(e)) => {
                            warn!("WebSocket error for {}: {}", self.session_id, e);
                            break;
                        }
                        None => break,
                    }
                }
                update = self.updates.recv() => {
                    match update {
                        Ok(json) => {
                            if self.sink.send(Message::Text(json)).await.is_err() {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(
                                "Session {} lagged behind by {} updates",
                                self.session_id, skipped
                            );
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }

        info!("WebSocket session {} ended", self.session_id);
    }

    /// Send initial document state to a newly connected client
    async fn send_initial_state(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let replica = self.state.replica.read().await;
        let content = replica.value();
        drop(replica);

        let response = EditResponse::new("init", content, None);
        self.send_response(&response).await
    }

    /// Handle incoming text messages
    async fn handle_text_message(&mut self, text: &str) -> Result<(), Box<dyn std::error::Error>> {
        debug!("Session {} received: {}", self.session_id, text);

        match serde_json::from_str::<EditRequest>(text) {
            Ok(request) => self.process_edit_request(request).await,
            Err(e) => {
                warn!("Failed to parse request from {}: {}", self.session_id, e);
                Ok(()) // Don't break connection for parse errors
            }
        }
    }

    /// Dispatch edit requests
    async fn process_edit_request(
        &mut self,
        request: EditRequest,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match request.op_type.as_str() {
            "insert" => self.handle_insert(request).await,
            "delete" => self.handle_delete(request).await,
            "apply" => self.handle_apply(request).await,
            "get_content" => self.handle_get_content().await,
            _ => {
                warn!(
                    "Unknown request type '{}' from session {}",
                    request.op_type, self.session_id
                );
                Ok(())
            }
        }
    }

    /// Handle local character insertion
    async fn handle_insert(
        &mut self,
        request: EditRequest,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let Some(character) = request.character else {
            warn!(
                "Insert request missing character from session {}",
                self.session_id
            );
            return Ok(());
        };
        let position = request.position.unwrap_or(0);

        let mut replica = self.state.replica.write().await;
        match replica.generate_insert(position, character) {
            Ok(op) => {
                let content = replica.value();
                drop(replica);

                info!(
                    "Session {} inserted '{}' at position {}",
                    self.session_id, character, position
                );
                self.broadcast_update(content, Some(op));
            }
            Err(e) => {
                warn!(
                    "Insert rejected for session {}: {}",
                    self.session_id, e
                );
            }
        }

        Ok(())
    }

    /// Handle local character deletion
    async fn handle_delete(
        &mut self,
        request: EditRequest,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let Some(position) = request.position else {
            warn!(
                "Delete request missing position from session {}",
                self.session_id
            );
            return Ok(());
        };

        let mut replica = self.state.replica.write().await;
        match replica.generate_delete(position) {
            Ok(op) => {
                let content = replica.value();
                drop(replica);

                info!(
                    "Session {} deleted position {}",
                    self.session_id, position
                );
                self.broadcast_update(content, Some(op));
            }
            Err(e) => {
                warn!(
                    "Delete rejected for session {}: {}",
                    self.session_id, e
                );
            }
        }

        Ok(())
    }

    /// Handle a remote operation relayed from another replica
    async fn handle_apply(
        &mut self,
        request: EditRequest,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let Some(op) = request.operation else {
            warn!(
                "Apply request missing operation from session {}",
                self.session_id
            );
            return Ok(());
        };

        let mut replica = self.state.replica.write().await;
        replica.receive(op);
        match replica.drain() {
            Ok(true) => {
                let content = replica.value();
                drop(replica);

                info!("Session {} applied remote operation(s)", self.session_id);
                self.broadcast_update(content, None);
            }
            Ok(false) => {
                debug!(
                    "Session {} queued remote operation ({} pending)",
                    self.session_id,
                    replica.pending_count()
                );
            }
            Err(e) => {
                error!(
                    "Integration failure for session {}: {}",
                    self.session_id, e
                );
            }
        }

        Ok(())
    }

    /// Handle content read requests
    async fn handle_get_content(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let replica = self.state.replica.read().await;
        let content = replica.value();
        drop(replica);

        let response = EditResponse::new("content", content, None);
        self.send_response(&response).await?;
        debug!("Session {} requested content", self.session_id);
        Ok(())
    }

    /// Publish an update to every connected session, this one included
    fn broadcast_update(&self, content: String, operation: Option<Operation>) {
        let response = EditResponse::new("update", content, operation);
        match serde_json::to_string(&response) {
            Ok(json) => {
                // Err means no subscribers, which cannot happen while this
                // session holds its own receiver
                let _ = self.state.updates.send(json);
            }
            Err(e) => error!("Failed to serialize update: {}", e),
        }
    }

    /// Send a response message to this client only
    async fn send_response(
        &mut self,
        response: &EditResponse,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string(response)?;
        self.sink.send(Message::Text(json)).await?;
        Ok(())
    }
}

/// Generate a unique session ID
pub fn generate_session_id() -> String {
    format!("session_{}", Utc::now().timestamp_millis())
}

/// Create and handle a new WebSocket session
pub async fn handle_websocket_connection(socket: WebSocket, state: AppState) {
    let session_id = generate_session_id();
    let session = WebSocketSession::new(socket, state, session_id);
    session.handle().await;
}
