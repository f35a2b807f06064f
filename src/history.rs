//! Bounded room history
//!
//! A FIFO buffer of the most recent messages in a room. Capacity and
//! eviction order are explicit: appending beyond capacity drops the
//! oldest message first. Joiners are replayed a smaller, fixed-size
//! tail of the buffer.

use std::collections::VecDeque;

use crate::message::ChatMessage;

/// Maximum messages retained per room
pub const HISTORY_CAPACITY: usize = 100;

/// Maximum messages replayed to a joining connection
pub const HISTORY_REPLAY: usize = 50;

/// Bounded FIFO message history for one room
#[derive(Debug, Default)]
pub struct History {
    messages: VecDeque<ChatMessage>,
}

impl History {
    pub fn new() -> Self {
        Self {
            messages: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Append a message, evicting the oldest once over capacity
    pub fn push(&mut self, message: ChatMessage) {
        if self.messages.len() == HISTORY_CAPACITY {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// The most recent messages to replay on join, oldest first
    pub fn recent(&self) -> Vec<ChatMessage> {
        let skip = self.messages.len().saturating_sub(HISTORY_REPLAY);
        self.messages.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
