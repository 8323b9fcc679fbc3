//! API request and response types

use crate::runtime::SubmitOutcome;
use serde::{Deserialize, Serialize};

/// Request to replace the draft
#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub text: String,
}

/// Response for submit action
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub outcome: SubmitOutcome,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
