//! HTTP surface: chat page and health check
//!
//! A small axum router alongside the WebSocket listener. It never
//! touches core state directly: the health counts come from the
//! ChatServer actor through a `Stats` command, so reads are serialized
//! with mutations and can never observe a room with zero members.

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use crate::error::AppError;
use crate::message::unix_timestamp;
use crate::server::{ServerCommand, ServerStats};

/// Service name reported by the health check
const SERVICE_NAME: &str = "chat_relay";

/// Build the router: `/` serves the chat page, `/health` the counts
pub fn router(cmd_tx: mpsc::Sender<ServerCommand>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .with_state(cmd_tx)
}

/// Bind and serve the HTTP surface until the process exits
pub async fn serve(addr: &str, cmd_tx: mpsc::Sender<ServerCommand>) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP surface listening on {}", addr);
    axum::serve(listener, router(cmd_tx)).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    timestamp: f64,
    active_users: usize,
    active_rooms: usize,
}

async fn health(State(cmd_tx): State<mpsc::Sender<ServerCommand>>) -> Json<HealthResponse> {
    let stats = fetch_stats(&cmd_tx).await;

    Json(HealthResponse {
        status: if stats.is_some() { "healthy" } else { "degraded" },
        service: SERVICE_NAME,
        timestamp: unix_timestamp(),
        active_users: stats.map_or(0, |s| s.active_users),
        active_rooms: stats.map_or(0, |s| s.active_rooms),
    })
}

/// Ask the actor for its counts; None if the actor is gone
async fn fetch_stats(cmd_tx: &mpsc::Sender<ServerCommand>) -> Option<ServerStats> {
    let (reply_tx, reply_rx) = oneshot::channel();
    cmd_tx
        .send(ServerCommand::Stats { reply: reply_tx })
        .await
        .ok()?;
    reply_rx.await.ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::ChatServer;

    #[tokio::test]
    async fn test_health_reports_counts_from_actor() {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        tokio::spawn(ChatServer::new(cmd_rx).run());

        let Json(response) = health(State(cmd_tx)).await;

        assert_eq!(response.status, "healthy");
        assert_eq!(response.service, "chat_relay");
        assert_eq!(response.active_users, 0);
        assert_eq!(response.active_rooms, 0);
        assert!(response.timestamp > 0.0);
    }

    #[tokio::test]
    async fn test_health_degraded_when_actor_gone() {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        drop(cmd_rx);

        let Json(response) = health(State(cmd_tx)).await;

        assert_eq!(response.status, "degraded");
        assert_eq!(response.active_users, 0);
    }
}
