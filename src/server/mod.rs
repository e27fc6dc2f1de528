//! Web server module for the WOOT collaboration service.
//!
//! This module contains the Axum web server implementation that exposes the
//! replicated string over HTTP and WebSocket endpoints.

pub mod routes;
pub mod websocket;

// Re-export main server functionality
pub use routes::*;
pub use websocket::{AppState, SharedState};
