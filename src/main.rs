//! Entry point for the WOOT collaboration server.
//!
//! Binds the Axum router and serves the collaborative editing WebSocket.
//! Configuration comes from the environment: `WOOT_ADDR` for the bind
//! address, `WOOT_SITE` for the server replica's site identifier, and
//! `RUST_LOG` for log filtering.

use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crdt_woot::server::routes::create_router;
use crdt_woot::server::websocket::SharedState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let site: u64 = std::env::var("WOOT_SITE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);
    let addr = std::env::var("WOOT_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let state = SharedState::new(site);
    let app = create_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("WOOT server for site {} listening on {}", site, addr);
    axum::serve(listener, app).await?;

    Ok(())
}
