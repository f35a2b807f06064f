//! ChatServer Actor implementation
//!
//! The central actor owning all state: connected clients, the presence
//! registry, and the room store. Uses the Actor pattern with mpsc
//! channels for message passing. Every core event (including
//! disconnects and health-check reads) is a command processed in
//! arrival order by one task, so per-room mutations and their
//! broadcasts are applied in a single total order without locks.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::error::AppError;
use crate::message::{unix_timestamp, ChatMessage, ServerEvent};
use crate::presence::Presence;
use crate::room::Room;
use crate::types::{ConnId, RoomId};

/// Commands sent from handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New connection accepted by the transport
    Connect {
        conn_id: ConnId,
        sender: mpsc::Sender<ServerEvent>,
    },
    /// Connection closed (transport-driven leave)
    Disconnect {
        conn_id: ConnId,
    },
    /// Join a room, switching out of the current one if needed
    JoinRoom {
        conn_id: ConnId,
        room_id: String,
        username: String,
    },
    /// Voluntarily leave the current room
    LeaveRoom {
        conn_id: ConnId,
    },
    /// Send a chat message to the current room
    SendMessage {
        conn_id: ConnId,
        message: String,
    },
    /// Typing indicator started
    TypingStart {
        conn_id: ConnId,
    },
    /// Typing indicator stopped
    TypingStop {
        conn_id: ConnId,
    },
    /// Read registry/store sizes for the health check
    Stats {
        reply: oneshot::Sender<ServerStats>,
    },
}

/// Counts reported by the health check
#[derive(Debug, Clone, Copy)]
pub struct ServerStats {
    /// Connections currently joined to a room
    pub active_users: usize,
    /// Rooms currently in the store (all non-empty)
    pub active_rooms: usize,
}

/// The main ChatServer actor
///
/// Manages all state and processes commands from connection handlers.
pub struct ChatServer {
    /// All connected clients: ConnId -> Client
    clients: HashMap<ConnId, Client>,
    /// Joined connections: ConnId -> (username, room)
    presence: Presence,
    /// All active rooms: RoomId -> Room
    rooms: HashMap<RoomId, Room>,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            clients: HashMap::new(),
            presence: Presence::new(),
            rooms: HashMap::new(),
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders
    /// are dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd).await;
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    async fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { conn_id, sender } => {
                self.handle_connect(conn_id, sender);
            }
            ServerCommand::Disconnect { conn_id } => {
                self.handle_disconnect(conn_id).await;
            }
            ServerCommand::JoinRoom {
                conn_id,
                room_id,
                username,
            } => {
                self.handle_join_room(conn_id, room_id, username).await;
            }
            ServerCommand::LeaveRoom { conn_id } => {
                self.handle_leave_room(conn_id).await;
            }
            ServerCommand::SendMessage { conn_id, message } => {
                self.handle_send_message(conn_id, message).await;
            }
            ServerCommand::TypingStart { conn_id } => {
                self.handle_typing(conn_id, true).await;
            }
            ServerCommand::TypingStop { conn_id } => {
                self.handle_typing(conn_id, false).await;
            }
            ServerCommand::Stats { reply } => {
                self.handle_stats(reply);
            }
        }
    }

    /// Handle new connection: register the outbound channel, nothing more
    ///
    /// A connected client has no presence entry until it joins a room.
    fn handle_connect(&mut self, conn_id: ConnId, sender: mpsc::Sender<ServerEvent>) {
        info!("Client {} connected", conn_id);
        self.clients.insert(conn_id, Client::new(conn_id, sender));
        debug!(
            "Total clients: {}, Total rooms: {}",
            self.clients.len(),
            self.rooms.len()
        );
    }

    /// Handle connection loss: same leave sequence as an explicit leave
    async fn handle_disconnect(&mut self, conn_id: ConnId) {
        info!("Client {} disconnected", conn_id);

        self.leave_current_room(conn_id).await;
        self.clients.remove(&conn_id);

        debug!(
            "Total clients: {}, Total rooms: {}",
            self.clients.len(),
            self.rooms.len()
        );
    }

    /// Handle room joining
    ///
    /// Room switching is atomic from the caller's perspective: the old
    /// room's leave sequence runs to completion before the new join, so
    /// a connection is never present in two rooms.
    async fn handle_join_room(&mut self, conn_id: ConnId, room_id: String, username: String) {
        // Malformed payload: reject without touching any state
        if room_id.is_empty() {
            self.send_to(conn_id, AppError::MissingRoomId.into()).await;
            return;
        }
        if username.is_empty() {
            self.send_to(conn_id, AppError::MissingUsername.into()).await;
            return;
        }

        let room_id = RoomId::new(room_id);

        // Already in a different room? Leave it first.
        let needs_switch = self
            .presence
            .get(conn_id)
            .is_some_and(|entry| entry.room_id != room_id);
        if needs_switch {
            self.leave_current_room(conn_id).await;
        }

        self.presence.set(conn_id, username.clone(), room_id.clone());

        // Lazily create the room and add the member
        let room = self
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone()));
        room.add_member(conn_id, username.clone());

        let messages = room.history.recent();
        let active_users = room.usernames();

        info!("Client {} joined room {} as '{}'", conn_id, room_id, username);

        // History goes to the joiner only, then the join broadcast to
        // the whole room (joiner included - the member list changed).
        self.send_to(
            conn_id,
            ServerEvent::RoomHistory {
                messages,
                active_users: active_users.clone(),
            },
        )
        .await;

        self.broadcast_to_room(
            &room_id,
            ServerEvent::UserJoined {
                username,
                timestamp: unix_timestamp(),
                active_users,
            },
        )
        .await;
    }

    /// Handle voluntary room leaving; silently ignored when not joined
    async fn handle_leave_room(&mut self, conn_id: ConnId) {
        if self.presence.get(conn_id).is_none() {
            return;
        }

        info!("Client {} left their room", conn_id);
        self.leave_current_room(conn_id).await;
    }

    /// Handle chat message
    ///
    /// A message from a connection with no presence entry is dropped
    /// silently: it is a benign race (send before join, send after
    /// leave), not a client error.
    async fn handle_send_message(&mut self, conn_id: ConnId, message: String) {
        let Some(entry) = self.presence.get(conn_id) else {
            debug!("Dropping message from {} (not in a room)", conn_id);
            return;
        };

        let room_id = entry.room_id.clone();
        let chat_message = ChatMessage::new(entry.username.clone(), message);

        let Some(room) = self.rooms.get_mut(&room_id) else {
            return;
        };
        room.history.push(chat_message.clone());

        self.broadcast_to_room(
            &room_id,
            ServerEvent::NewMessage {
                message: chat_message,
            },
        )
        .await;
    }

    /// Handle typing indicator; one broadcast per call, never stored
    async fn handle_typing(&mut self, conn_id: ConnId, is_typing: bool) {
        let Some(entry) = self.presence.get(conn_id) else {
            return;
        };

        let room_id = entry.room_id.clone();
        let username = entry.username.clone();

        self.broadcast_to_room(&room_id, ServerEvent::UserTyping { username, is_typing })
            .await;
    }

    /// Reply with registry/store sizes
    ///
    /// Runs inside the actor loop so the counts can never observe a
    /// half-applied mutation (e.g. a room with zero members).
    fn handle_stats(&self, reply: oneshot::Sender<ServerStats>) {
        let _ = reply.send(ServerStats {
            active_users: self.presence.len(),
            active_rooms: self.rooms.len(),
        });
    }

    /// Helper: run the full leave sequence for a connection's current room
    ///
    /// Removes membership and presence, notifies the remaining members,
    /// and deletes the room the moment it empties. No-op when the
    /// connection has no presence entry.
    async fn leave_current_room(&mut self, conn_id: ConnId) {
        let Some(entry) = self.presence.remove(conn_id) else {
            return;
        };

        let Some(room) = self.rooms.get_mut(&entry.room_id) else {
            return;
        };
        room.remove_member(conn_id);

        if room.is_empty() {
            self.rooms.remove(&entry.room_id);
            debug!("Room {} deleted (empty)", entry.room_id);
            return;
        }

        let active_users = self
            .rooms
            .get(&entry.room_id)
            .map(|r| r.usernames())
            .unwrap_or_default();

        self.broadcast_to_room(
            &entry.room_id,
            ServerEvent::UserLeft {
                username: entry.username,
                timestamp: unix_timestamp(),
                active_users,
            },
        )
        .await;
    }

    /// Helper: deliver an event to one connection, if still registered
    async fn send_to(&self, conn_id: ConnId, event: ServerEvent) {
        let Some(client) = self.clients.get(&conn_id) else {
            return;
        };
        if client.send(event).await.is_err() {
            warn!("Send to {} failed: channel closed", conn_id);
        }
    }

    /// Helper: deliver an event to every member of a room
    ///
    /// Fan-out is per-recipient: a failed send is logged and skipped,
    /// never aborting delivery to the remaining members.
    async fn broadcast_to_room(&self, room_id: &RoomId, event: ServerEvent) {
        let Some(room) = self.rooms.get(room_id) else {
            return;
        };

        for conn_id in room.member_ids() {
            let Some(client) = self.clients.get(&conn_id) else {
                warn!("Member {} of room {} has no client entry", conn_id, room_id);
                continue;
            };
            if client.send(event.clone()).await.is_err() {
                warn!(
                    "Broadcast to {} in room {} failed: channel closed",
                    conn_id, room_id
                );
            }
        }
    }
}
