//! Response generation boundary
//!
//! The conversation only depends on [`ResponseGenerator`]; what sits behind
//! it (a model backend, the bundled simulator) is interchangeable.

mod error;
mod simulated;

pub use error::{ResponseError, ResponseErrorKind};
pub use simulated::SimulatedResponder;

use async_trait::async_trait;
use std::sync::Arc;

/// Produces an assistant reply for a submitted user text
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, user_text: &str) -> Result<String, ResponseError>;

    /// Name used in logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: ResponseGenerator + ?Sized> ResponseGenerator for Arc<T> {
    async fn generate(&self, user_text: &str) -> Result<String, ResponseError> {
        (**self).generate(user_text).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Logging wrapper for response generators
pub struct LoggingResponder {
    inner: Arc<dyn ResponseGenerator>,
    name: String,
}

impl LoggingResponder {
    pub fn new(inner: Arc<dyn ResponseGenerator>) -> Self {
        let name = inner.name().to_string();
        Self { inner, name }
    }
}

#[async_trait]
impl ResponseGenerator for LoggingResponder {
    async fn generate(&self, user_text: &str) -> Result<String, ResponseError> {
        let start = std::time::Instant::now();
        let result = self.inner.generate(user_text).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    responder = %self.name,
                    duration_ms = %duration.as_millis(),
                    prompt_chars = user_text.chars().count(),
                    reply_chars = reply.chars().count(),
                    "Response generated"
                );
            }
            Err(e) => {
                tracing::error!(
                    responder = %self.name,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = e.kind.as_str(),
                    "Response generation failed"
                );
            }
        }

        result
    }

    fn name(&self) -> &str {
        &self.name
    }
}
