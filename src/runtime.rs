//! Runtime for executing the conversation
//!
//! One task owns the conversation state and applies commands and responder
//! completions strictly in arrival order. Observers read snapshots through a
//! watch channel and never block that task.

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationRuntime;

use crate::conversation::{MessageLog, ThreadSnapshot};
use crate::responder::ResponseGenerator;
use crate::state_machine::ConvContext;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

/// Commands accepted from the presentation layer
#[derive(Debug)]
pub enum Command {
    UpdateDraft {
        text: String,
        done: oneshot::Sender<ThreadSnapshot>,
    },
    Submit {
        done: oneshot::Sender<SubmitOutcome>,
    },
}

/// What happened to a submit request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// The user message was committed and a response requested
    Accepted,
    /// Ignored: a response is still pending
    Busy,
    /// Ignored: the draft was empty or whitespace
    EmptyDraft,
    /// Refused by an unexpected transition error (logged)
    Rejected,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Conversation runtime has stopped")]
    Stopped,
}

/// Runtime tuning that does not affect transitions
#[derive(Debug, Clone, Default)]
pub struct RuntimeOptions {
    /// Fail a round whose response takes longer than this
    pub response_timeout: Option<Duration>,
}

/// Handle to interact with a running conversation
#[derive(Clone)]
pub struct ConversationHandle {
    command_tx: mpsc::Sender<Command>,
    snapshot_rx: watch::Receiver<ThreadSnapshot>,
}

impl ConversationHandle {
    /// Replace the draft; resolves once the new draft is visible to observers
    pub async fn update_draft(&self, text: impl Into<String>) -> Result<ThreadSnapshot, RuntimeError> {
        let (done, rx) = oneshot::channel();
        self.command_tx
            .send(Command::UpdateDraft {
                text: text.into(),
                done,
            })
            .await
            .map_err(|_| RuntimeError::Stopped)?;
        rx.await.map_err(|_| RuntimeError::Stopped)
    }

    /// Submit the current draft.
    ///
    /// When accepted, the user message and busy flag are already published
    /// by the time this returns; the reply arrives later.
    pub async fn submit(&self) -> Result<SubmitOutcome, RuntimeError> {
        let (done, rx) = oneshot::channel();
        self.command_tx
            .send(Command::Submit { done })
            .await
            .map_err(|_| RuntimeError::Stopped)?;
        rx.await.map_err(|_| RuntimeError::Stopped)
    }

    /// Latest published state
    pub fn snapshot(&self) -> ThreadSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<ThreadSnapshot> {
        self.snapshot_rx.clone()
    }
}

/// Start a conversation runtime in the background.
///
/// The log is seeded with `greeting`. The runtime stops once every handle
/// is dropped and no round is outstanding.
pub fn spawn_conversation<R>(
    context: ConvContext,
    greeting: &str,
    responder: R,
    options: RuntimeOptions,
) -> ConversationHandle
where
    R: ResponseGenerator + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(32);
    let log = MessageLog::seeded(greeting);
    let (snapshot_tx, snapshot_rx) = watch::channel(ThreadSnapshot {
        messages: log.messages().to_vec(),
        busy: false,
        draft: String::new(),
    });

    let conv_id = context.conversation_id.clone();
    let runtime = ConversationRuntime::new(context, log, responder, options, command_rx, snapshot_tx);

    tokio::spawn(async move {
        runtime.run().await;
        tracing::info!(conv_id = %conv_id, "Conversation runtime finished");
    });

    ConversationHandle {
        command_tx,
        snapshot_rx,
    }
}
