//! Effects produced by state transitions

use crate::conversation::Origin;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace the draft buffer
    SetDraft { text: String },

    /// Commit a message to the end of the log
    AppendMessage { origin: Origin, text: String },

    /// Ask the responder for a reply (spawns as background task)
    RequestResponse { round: u64, prompt: String },
}

impl Effect {
    pub fn append_user_message(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            origin: Origin::User,
            text: text.into(),
        }
    }

    pub fn append_assistant_message(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            origin: Origin::Assistant,
            text: text.into(),
        }
    }

    pub fn clear_draft() -> Self {
        Effect::SetDraft {
            text: String::new(),
        }
    }
}
