//! Response generation error types

use thiserror::Error;

/// Failure reported by a response generator
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ResponseError {
    pub kind: ResponseErrorKind,
    pub message: String,
}

impl ResponseError {
    pub fn new(kind: ResponseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ResponseErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ResponseErrorKind::Timeout, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ResponseErrorKind::Malformed, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ResponseErrorKind::Internal, message)
    }
}

/// Classification used for logging; the conversation treats every kind alike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseErrorKind {
    Network,
    Timeout,
    /// The backend answered with something unusable
    Malformed,
    /// The generator task itself failed
    Internal,
}

impl ResponseErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Malformed => "malformed",
            Self::Internal => "internal",
        }
    }
}
