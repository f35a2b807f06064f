//! Room-Scoped Chat Relay - Entry Point
//!
//! Starts the ChatServer actor, the WebSocket listener, and the HTTP
//! surface (chat page + health check).

use std::env;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chat_relay::{handle_connection, http, ChatServer};

/// Default WebSocket listener address
const DEFAULT_WS_ADDR: &str = "127.0.0.1:8080";

/// Default HTTP surface address
const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8081";

/// Channel buffer size for server commands
const CHANNEL_BUFFER_SIZE: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=chat_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chat_relay=info")),
        )
        .init();

    // Bind addresses from environment, with defaults
    let ws_addr = env::var("CHAT_WS_ADDR").unwrap_or_else(|_| DEFAULT_WS_ADDR.to_string());
    let http_addr = env::var("CHAT_HTTP_ADDR").unwrap_or_else(|_| DEFAULT_HTTP_ADDR.to_string());

    // Start TCP listener for WebSocket connections
    let listener = TcpListener::bind(&ws_addr).await?;
    info!("WebSocket chat relay listening on {}", ws_addr);

    // Create ChatServer actor channel and start
    let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
    let server = ChatServer::new(cmd_rx);
    tokio::spawn(server.run());

    info!("ChatServer actor started");

    // HTTP surface: chat page and /health
    let http_cmd_tx = cmd_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = http::serve(&http_addr, http_cmd_tx).await {
            error!("HTTP surface error: {}", e);
        }
    });

    // Connection accept loop
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let cmd_tx = cmd_tx.clone();

                // Spawn handler task for each connection
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, cmd_tx).await {
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
