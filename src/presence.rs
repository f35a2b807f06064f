//! Presence registry
//!
//! Maps each live connection to its current username and room. An entry
//! exists from the moment a connection joins a room until it leaves or
//! disconnects; a connected-but-not-yet-joined connection has none.
//!
//! The registry is owned exclusively by the `ChatServer` actor, so it
//! needs no locking of its own. It is the single source of truth
//! consulted at the start of every room operation.

use std::collections::HashMap;

use crate::types::{ConnId, RoomId};

/// What a joined connection currently is: a display name in a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEntry {
    pub username: String,
    pub room_id: RoomId,
}

/// Registry of all joined connections
#[derive(Debug, Default)]
pub struct Presence {
    entries: HashMap<ConnId, PresenceEntry>,
}

impl Presence {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert or overwrite the entry for a connection
    ///
    /// Overwriting an existing entry with a different room is the
    /// mechanism behind room switching.
    pub fn set(&mut self, conn_id: ConnId, username: String, room_id: RoomId) {
        self.entries.insert(conn_id, PresenceEntry { username, room_id });
    }

    /// Look up a connection's entry
    ///
    /// Absent is a normal outcome (not-yet-joined or already-left),
    /// never an error.
    pub fn get(&self, conn_id: ConnId) -> Option<&PresenceEntry> {
        self.entries.get(&conn_id)
    }

    /// Remove a connection's entry; removing an absent id is a no-op
    pub fn remove(&mut self, conn_id: ConnId) -> Option<PresenceEntry> {
        self.entries.remove(&conn_id)
    }

    /// Number of joined connections (the health check's active_users)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut presence = Presence::new();
        let conn = ConnId::new();
        presence.set(conn, "alice".to_string(), RoomId::new("lobby"));

        let entry = presence.get(conn).unwrap();
        assert_eq!(entry.username, "alice");
        assert_eq!(entry.room_id, RoomId::new("lobby"));
        assert_eq!(presence.len(), 1);
    }

    #[test]
    fn test_get_absent_is_none() {
        let presence = Presence::new();
        assert!(presence.get(ConnId::new()).is_none());
    }

    #[test]
    fn test_overwrite_switches_room() {
        let mut presence = Presence::new();
        let conn = ConnId::new();
        presence.set(conn, "alice".to_string(), RoomId::new("lobby"));
        presence.set(conn, "alice".to_string(), RoomId::new("den"));

        assert_eq!(presence.get(conn).unwrap().room_id, RoomId::new("den"));
        assert_eq!(presence.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut presence = Presence::new();
        let conn = ConnId::new();
        presence.set(conn, "alice".to_string(), RoomId::new("lobby"));

        assert!(presence.remove(conn).is_some());
        assert!(presence.remove(conn).is_none());
        assert!(presence.is_empty());
    }
}
