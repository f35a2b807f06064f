//! Room struct definition
//!
//! A room groups the connections that share broadcasts and message
//! history. Rooms are created lazily on first join and destroyed the
//! instant the member list empties; an existing room always has at
//! least one member.

use crate::history::History;
use crate::types::{ConnId, RoomId};

/// A chat room: insertion-ordered members plus bounded history
///
/// Members are kept as (connection, username) pairs in join order,
/// which is the order usernames appear in `active_users` lists.
/// Username uniqueness is not enforced; connections are unique.
#[derive(Debug)]
pub struct Room {
    /// Room identifier
    pub id: RoomId,
    /// Bounded message history
    pub history: History,
    members: Vec<(ConnId, String)>,
}

impl Room {
    /// Create a new empty room
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            history: History::new(),
            members: Vec::new(),
        }
    }

    /// Add a connection as a member, or update its username if already present
    pub fn add_member(&mut self, conn_id: ConnId, username: String) {
        if let Some(member) = self.members.iter_mut().find(|(id, _)| *id == conn_id) {
            member.1 = username;
        } else {
            self.members.push((conn_id, username));
        }
    }

    /// Remove a connection from the room
    ///
    /// Returns true if the connection was a member. An empty room must
    /// be deleted by the caller; it never persists in the store.
    pub fn remove_member(&mut self, conn_id: ConnId) -> bool {
        let before = self.members.len();
        self.members.retain(|(id, _)| *id != conn_id);
        self.members.len() != before
    }

    /// Check if a connection is a member of this room
    pub fn contains(&self, conn_id: ConnId) -> bool {
        self.members.iter().any(|(id, _)| *id == conn_id)
    }

    /// Member usernames in join order (the active_users list)
    pub fn usernames(&self) -> Vec<String> {
        self.members.iter().map(|(_, name)| name.clone()).collect()
    }

    /// Member connection ids in join order (the broadcast recipient set)
    pub fn member_ids(&self) -> impl Iterator<Item = ConnId> + '_ {
        self.members.iter().map(|(id, _)| *id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
