//! Client struct definition
//!
//! Represents a connected client: its id and the channel used to
//! deliver server events to its socket. Username and room live in the
//! presence registry, not here, so a client stays lightweight from
//! connect until join.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::message::ServerEvent;
use crate::types::ConnId;

/// Connected client handle
#[derive(Debug)]
pub struct Client {
    /// Unique identifier for this connection
    pub id: ConnId,
    /// Server → Client event channel
    pub sender: mpsc::Sender<ServerEvent>,
}

impl Client {
    /// Create a new client with the given ID and sender channel
    pub fn new(id: ConnId, sender: mpsc::Sender<ServerEvent>) -> Self {
        Self { id, sender }
    }

    /// Send an event to this client
    ///
    /// Returns an error if the channel is closed (client disconnected).
    pub async fn send(&self, event: ServerEvent) -> Result<(), SendError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| SendError::ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ErrorCode;

    #[tokio::test]
    async fn test_client_send() {
        let (tx, mut rx) = mpsc::channel(32);
        let client = Client::new(ConnId::new(), tx);

        client
            .send(ServerEvent::UserTyping {
                username: "alice".to_string(),
                is_typing: true,
            })
            .await
            .unwrap();

        assert!(matches!(rx.recv().await, Some(ServerEvent::UserTyping { .. })));
    }

    #[tokio::test]
    async fn test_send_to_closed_channel_errors() {
        let (tx, rx) = mpsc::channel(32);
        let client = Client::new(ConnId::new(), tx);
        drop(rx);

        let result = client
            .send(ServerEvent::Error {
                code: ErrorCode::InvalidMessage,
                message: "test".to_string(),
            })
            .await;

        assert!(result.is_err());
    }
}
