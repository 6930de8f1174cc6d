//! Connection accept loop
//!
//! Spawns one handler task per accepted connection, all sharing the
//! same store.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::handler::handle_connection;
use crate::store::QaStore;

/// Accept connections forever
pub async fn serve(listener: TcpListener, store: Arc<QaStore>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let store = Arc::clone(&store);

                // Spawn handler task for each connection
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, store).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
