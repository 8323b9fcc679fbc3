//! Conversation state types

/// Phase of the conversation.
///
/// Busy is derived from the phase: a round is outstanding exactly while the
/// state is `AwaitingResponse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvState {
    /// Ready for user input, no pending response
    #[default]
    Idle,

    /// User message committed, response request in flight
    AwaitingResponse { round: u64 },
}

impl ConvState {
    /// Whether submissions are currently blocked
    pub fn is_busy(&self) -> bool {
        matches!(self, ConvState::AwaitingResponse { .. })
    }
}

/// Context for a conversation (immutable configuration)
#[derive(Debug, Clone)]
pub struct ConvContext {
    pub conversation_id: String,
    /// Assistant text committed when a round fails
    pub fallback_text: String,
}

impl ConvContext {
    pub fn new(conversation_id: impl Into<String>, fallback_text: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            fallback_text: fallback_text.into(),
        }
    }
}
