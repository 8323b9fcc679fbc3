//! Events that can occur in a conversation

use crate::responder::ResponseErrorKind;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    DraftChanged {
        text: String,
    },
    UserSubmit {
        /// Draft contents at the moment of submission, untrimmed
        draft: String,
        /// Round number to use if the submission is accepted
        round: u64,
    },

    // Responder events
    ResponseReady {
        round: u64,
        text: String,
    },
    ResponseFailed {
        round: u64,
        message: String,
        error_kind: ResponseErrorKind,
    },
}
