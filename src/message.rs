//! Wire protocol definitions
//!
//! JSON-based bidirectional event protocol using Serde's tagged enum
//! for type-safe serialization/deserialization. Every frame is an
//! object tagged by an `event` field with the payload fields beside it.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Current wall-clock time as float seconds since the Unix epoch
///
/// Display metadata only; never used to order broadcasts.
pub fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Client → Server event
///
/// All events a client can send. Connect/disconnect are transport-level
/// and have no JSON representation.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Join a room, switching out of the current one if necessary
    JoinRoom { room_id: String, username: String },
    /// Leave the current room
    LeaveRoom,
    /// Send a chat message to the current room
    SendMessage { message: String },
    /// Indicate typing started
    TypingStart,
    /// Indicate typing stopped
    TypingStop,
}

/// Server → Client event
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Recent messages and member list, sent to a joiner only
    RoomHistory {
        messages: Vec<ChatMessage>,
        active_users: Vec<String>,
    },
    /// A user joined the room (broadcast, includes the joiner)
    UserJoined {
        username: String,
        timestamp: f64,
        active_users: Vec<String>,
    },
    /// A user left the room (broadcast to remaining members)
    UserLeft {
        username: String,
        timestamp: f64,
        active_users: Vec<String>,
    },
    /// A chat message (broadcast to the whole room)
    NewMessage {
        #[serde(flatten)]
        message: ChatMessage,
    },
    /// Typing indicator (broadcast to the whole room)
    UserTyping { username: String, is_typing: bool },
    /// Malformed-input acknowledgment
    Error { code: ErrorCode, message: String },
}

/// A single chat message as stored in history and broadcast on send
///
/// Immutable once constructed. The id is a dedicated UUID, not derived
/// from the timestamp, since two messages can share a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub username: String,
    pub message: String,
    pub timestamp: f64,
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

impl ChatMessage {
    /// Build a message with a fresh id and the current timestamp
    pub fn new(username: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            message: message.into(),
            timestamp: unix_timestamp(),
            kind: MessageKind::UserMessage,
        }
    }
}

/// Message kind discriminator, serialized as the `type` payload field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    UserMessage,
}

/// Error codes for ServerEvent::Error
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A required payload field was empty or missing
    InvalidPayload,
    /// The frame was not valid protocol JSON
    InvalidMessage,
}

/// Convert AppError to ServerEvent for client notification
impl From<AppError> for ServerEvent {
    fn from(err: AppError) -> Self {
        let (code, message) = match &err {
            AppError::MissingRoomId => {
                (ErrorCode::InvalidPayload, "room_id is required".to_string())
            }
            AppError::MissingUsername => {
                (ErrorCode::InvalidPayload, "username is required".to_string())
            }
            AppError::Json(e) => {
                (ErrorCode::InvalidMessage, format!("Invalid message format: {}", e))
            }
            // Fatal errors are not typically converted (connection closes)
            _ => (ErrorCode::InvalidMessage, "Internal error".to_string()),
        };
        ServerEvent::Error { code, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_deserialize() {
        let json = r#"{"event": "join_room", "room_id": "lobby", "username": "alice"}"#;
        let msg: ClientEvent = serde_json::from_str(json).unwrap();
        match msg {
            ClientEvent::JoinRoom { room_id, username } => {
                assert_eq!(room_id, "lobby");
                assert_eq!(username, "alice");
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_payloadless_event_deserialize() {
        let msg: ClientEvent = serde_json::from_str(r#"{"event": "typing_stop"}"#).unwrap();
        assert!(matches!(msg, ClientEvent::TypingStop));
    }

    #[test]
    fn test_new_message_serialize_flattens_payload() {
        let event = ServerEvent::NewMessage {
            message: ChatMessage::new("alice", "hi"),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"new_message\""));
        assert!(json.contains("\"username\":\"alice\""));
        assert!(json.contains("\"message\":\"hi\""));
        assert!(json.contains("\"type\":\"user_message\""));
    }

    #[test]
    fn test_chat_message_ids_unique() {
        let a = ChatMessage::new("alice", "hi");
        let b = ChatMessage::new("alice", "hi");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_error_code_serialize() {
        let event = ServerEvent::Error {
            code: ErrorCode::InvalidPayload,
            message: "Test".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"code\":\"invalid_payload\""));
    }

    #[test]
    fn test_room_history_serialize() {
        let event = ServerEvent::RoomHistory {
            messages: vec![],
            active_users: vec!["alice".to_string()],
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"room_history\""));
        assert!(json.contains("\"active_users\":[\"alice\"]"));
    }
}
