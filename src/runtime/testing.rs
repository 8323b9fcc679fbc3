//! Mock implementations for testing
//!
//! These mocks enable runtime tests without real latency or a backend.

use super::{spawn_conversation, ConversationHandle, RuntimeOptions};
use crate::conversation::{MessageLog, ThreadSnapshot};
use crate::responder::{ResponseError, ResponseGenerator};
use crate::state_machine::ConvContext;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch, Notify};

pub const TEST_GREETING: &str = "Hello! How can I help?";
pub const TEST_FALLBACK: &str = "Sorry, something went wrong.";

pub fn test_context() -> ConvContext {
    ConvContext::new("test-conv", TEST_FALLBACK)
}

/// Spawn a conversation seeded with [`TEST_GREETING`]
pub fn spawn_test_conversation<R>(responder: R, options: RuntimeOptions) -> ConversationHandle
where
    R: ResponseGenerator + 'static,
{
    spawn_conversation(test_context(), TEST_GREETING, responder, options)
}

/// Handle whose runtime is already gone
pub fn stopped_handle() -> ConversationHandle {
    let (command_tx, _) = mpsc::channel(1);
    let log = MessageLog::seeded(TEST_GREETING);
    let (_, snapshot_rx) = watch::channel(ThreadSnapshot {
        messages: log.messages().to_vec(),
        busy: false,
        draft: String::new(),
    });
    ConversationHandle {
        command_tx,
        snapshot_rx,
    }
}

// ============================================================================
// Mock Responder
// ============================================================================

/// Mock responder that returns queued results
pub struct MockResponder {
    results: Mutex<VecDeque<Result<String, ResponseError>>>,
    /// Record of all prompts received
    prompts: Mutex<Vec<String>>,
}

impl MockResponder {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: impl Into<String>) {
        self.results.lock().unwrap().push_back(Ok(reply.into()));
    }

    /// Queue a failure
    pub fn queue_error(&self, error: ResponseError) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_result(&self, prompt: &str) -> Result<String, ResponseError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ResponseError::network("No mock response queued")))
    }
}

impl Default for MockResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseGenerator for MockResponder {
    async fn generate(&self, user_text: &str) -> Result<String, ResponseError> {
        self.next_result(user_text)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Gated Responder (holds the round open until released)
// ============================================================================

/// Mock responder that waits for [`GatedResponder::release`] before answering
pub struct GatedResponder {
    inner: MockResponder,
    gate: Notify,
    /// Notified when a request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl GatedResponder {
    pub fn new() -> Self {
        Self {
            inner: MockResponder::new(),
            gate: Notify::new(),
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_reply(&self, reply: impl Into<String>) {
        self.inner.queue_reply(reply);
    }

    /// Let one pending (or the next) request complete
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.inner.recorded_prompts()
    }
}

#[async_trait]
impl ResponseGenerator for GatedResponder {
    async fn generate(&self, user_text: &str) -> Result<String, ResponseError> {
        self.request_started.notify_one();
        self.gate.notified().await;
        self.inner.next_result(user_text)
    }

    fn name(&self) -> &str {
        "gated-mock"
    }
}

// ============================================================================
// Misbehaving Responders
// ============================================================================

/// Responder whose task panics
pub struct PanickingResponder;

#[async_trait]
impl ResponseGenerator for PanickingResponder {
    async fn generate(&self, _user_text: &str) -> Result<String, ResponseError> {
        panic!("responder blew up")
    }

    fn name(&self) -> &str {
        "panicking-mock"
    }
}

/// Responder that never answers
pub struct HangingResponder;

#[async_trait]
impl ResponseGenerator for HangingResponder {
    async fn generate(&self, _user_text: &str) -> Result<String, ResponseError> {
        std::future::pending().await
    }

    fn name(&self) -> &str {
        "hanging-mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_responder() {
        let mock = MockResponder::new();
        mock.queue_reply("Hello");

        assert_eq!(mock.generate("hi").await.unwrap(), "Hello");

        // Second call should fail (no more responses)
        assert!(mock.generate("again").await.is_err());
        assert_eq!(mock.recorded_prompts(), vec!["hi", "again"]);
    }

    #[tokio::test]
    async fn test_gated_responder_waits_for_release() {
        let gated = Arc::new(GatedResponder::new());
        gated.queue_reply("later");

        let task = {
            let gated = gated.clone();
            tokio::spawn(async move { gated.generate("q").await })
        };
        gated.request_started.notified().await;
        assert!(!task.is_finished());

        gated.release();
        assert_eq!(task.await.unwrap().unwrap(), "later");
    }
}
