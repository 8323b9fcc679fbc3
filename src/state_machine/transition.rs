//! Pure state transition function
//!
//! Given the same inputs it always produces the same outputs; clocks, ids
//! and the responder call live in the runtime that executes the effects.

use super::{ConvContext, ConvState, Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A response is still pending, cannot accept message")]
    Busy,
    #[error("Message is empty")]
    EmptyDraft,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
pub fn transition(
    state: &ConvState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Draft edits are accepted in every phase and never touch the log
        (_, Event::DraftChanged { text }) => {
            Ok(TransitionResult::new(*state).with_effect(Effect::SetDraft { text }))
        }

        // ============================================================
        // Submission
        // ============================================================

        (ConvState::AwaitingResponse { .. }, Event::UserSubmit { .. }) => {
            Err(TransitionError::Busy)
        }

        // Idle + UserSubmit -> AwaitingResponse
        (ConvState::Idle, Event::UserSubmit { draft, round }) => {
            let text = draft.trim();
            if text.is_empty() {
                return Err(TransitionError::EmptyDraft);
            }

            Ok(TransitionResult::new(ConvState::AwaitingResponse { round })
                .with_effect(Effect::append_user_message(text))
                .with_effect(Effect::clear_draft())
                .with_effect(Effect::RequestResponse {
                    round,
                    prompt: text.to_string(),
                }))
        }

        // ============================================================
        // Round completion
        // ============================================================

        // A blank reply cannot be committed; fold it into the failure path
        (
            ConvState::AwaitingResponse { round },
            Event::ResponseReady {
                round: resolved,
                text,
            },
        ) if *round == resolved => {
            let reply = if text.trim().is_empty() {
                context.fallback_text.clone()
            } else {
                text
            };
            Ok(TransitionResult::new(ConvState::Idle)
                .with_effect(Effect::append_assistant_message(reply)))
        }

        (
            ConvState::AwaitingResponse { round },
            Event::ResponseFailed {
                round: resolved, ..
            },
        ) if *round == resolved => Ok(TransitionResult::new(ConvState::Idle)
            .with_effect(Effect::append_assistant_message(
                context.fallback_text.clone(),
            ))),

        // ============================================================
        // Invalid Transitions
        // ============================================================

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {state:?} with event {event:?}"
        ))),
    }
}
