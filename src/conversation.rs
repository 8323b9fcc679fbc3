//! Conversation log types
//!
//! The log is append-only: entries are never edited or removed once
//! committed, and their order is the append order.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Identifier of a committed message.
///
/// Allocated from a per-conversation sequence, so ids compare in the same
/// order the messages were appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    User,
    Assistant,
}

/// One committed entry of the thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub origin: Origin,
    /// Display only; ordering comes from `id`
    pub created_at: DateTime<Utc>,
}

/// Ordered, append-only message log
#[derive(Debug, Clone)]
pub struct MessageLog {
    messages: Vec<Message>,
    next_id: u64,
}

impl MessageLog {
    /// Create a log holding a single assistant greeting
    pub fn seeded(greeting: impl Into<String>) -> Self {
        let mut log = Self {
            messages: Vec::new(),
            next_id: 1,
        };
        log.append(Origin::Assistant, greeting);
        log
    }

    /// Commit a new message at the end of the log
    pub fn append(&mut self, origin: Origin, text: impl Into<String>) -> &Message {
        let text = text.into();
        debug_assert!(!text.trim().is_empty(), "committed messages are never blank");

        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message {
            id,
            text,
            origin,
            created_at: Utc::now(),
        });

        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

/// Read model handed to renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadSnapshot {
    pub messages: Vec<Message>,
    /// True while a response is outstanding ("typing" indicator)
    pub busy: bool,
    pub draft: String,
}
