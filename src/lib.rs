//! Room-Scoped WebSocket Chat Relay Library
//!
//! Clients join named rooms, exchange text messages and typing
//! signals, and receive a bounded history replay on join. Built with
//! tokio-tungstenite using the Actor pattern for state management.
//!
//! # Features
//! - Named rooms, created lazily and destroyed when emptied
//! - Atomic room switching (never a member of two rooms at once)
//! - Bounded per-room message history with FIFO eviction
//! - Room-wide broadcasts: joins, leaves, messages, typing indicators
//! - HTTP health check reporting live user/room counts
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning presence, rooms, and
//!   history; it processes every command in arrival order
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use chat_relay::{ChatServer, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatServer::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod client;
pub mod error;
pub mod handler;
pub mod history;
pub mod http;
pub mod message;
pub mod presence;
pub mod room;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use client::Client;
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use history::{History, HISTORY_CAPACITY, HISTORY_REPLAY};
pub use message::{ChatMessage, ClientEvent, ErrorCode, MessageKind, ServerEvent};
pub use presence::{Presence, PresenceEntry};
pub use room::Room;
pub use server::{ChatServer, ServerCommand, ServerStats};
pub use types::{ConnId, RoomId};
