//! HTTP API exposing the conversation to renderers

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::ConversationHandle;
use tokio_util::sync::CancellationToken;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub conversation: ConversationHandle,
    /// Cancelled when the server shuts down; ends open event streams
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(conversation: ConversationHandle, shutdown: CancellationToken) -> Self {
        Self {
            conversation,
            shutdown,
        }
    }
}
