//! Q&A Rooms Server - Entry Point
//!
//! Starts the TCP listener and accepts WebSocket connections against a
//! shared in-memory store.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use qa_rooms::{serve, Config, QaStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=qa_rooms=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("qa_rooms=info")),
        )
        .init();

    let config = Config::from_env();

    let listener = TcpListener::bind(&config.addr).await?;
    info!("Q&A server listening on {}", config.addr);

    let store = Arc::new(QaStore::new());
    serve(listener, store).await;

    Ok(())
}
