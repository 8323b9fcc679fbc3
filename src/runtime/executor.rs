//! Conversation runtime executor

use super::{Command, RuntimeOptions, SubmitOutcome};
use crate::conversation::{MessageLog, ThreadSnapshot};
use crate::responder::{ResponseError, ResponseGenerator};
use crate::state_machine::{transition, ConvContext, ConvState, Effect, Event, TransitionError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Conversation runtime generic over the response generator
pub struct ConversationRuntime<R>
where
    R: ResponseGenerator + 'static,
{
    context: ConvContext,
    state: ConvState,
    log: MessageLog,
    draft: String,
    /// Rounds started so far; the next accepted submit gets `rounds + 1`
    rounds: u64,
    responder: Arc<R>,
    options: RuntimeOptions,
    command_rx: mpsc::Receiver<Command>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    snapshot_tx: watch::Sender<ThreadSnapshot>,
}

impl<R> ConversationRuntime<R>
where
    R: ResponseGenerator + 'static,
{
    pub fn new(
        context: ConvContext,
        log: MessageLog,
        responder: R,
        options: RuntimeOptions,
        command_rx: mpsc::Receiver<Command>,
        snapshot_tx: watch::Sender<ThreadSnapshot>,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel(8);
        Self {
            context,
            state: ConvState::Idle,
            log,
            draft: String::new(),
            rounds: 0,
            responder: Arc::new(responder),
            options,
            command_rx,
            event_rx,
            event_tx,
            snapshot_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            conv_id = %self.context.conversation_id,
            responder = %self.responder.name(),
            "Starting conversation runtime"
        );

        let mut commands_closed = false;

        loop {
            // Once nobody can send commands, finish the outstanding round so
            // the log stays paired, then stop
            if commands_closed && !self.state.is_busy() {
                break;
            }

            tokio::select! {
                command = self.command_rx.recv(), if !commands_closed => match command {
                    Some(command) => self.handle_command(command),
                    None => commands_closed = true,
                },
                Some(event) = self.event_rx.recv() => {
                    if let Err(e) = self.apply(event) {
                        tracing::warn!(
                            conv_id = %self.context.conversation_id,
                            error = %e,
                            "Dropped responder event"
                        );
                    }
                }
            }
        }

        tracing::info!(conv_id = %self.context.conversation_id, "Conversation runtime stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::UpdateDraft { text, done } => {
                if let Err(e) = self.apply(Event::DraftChanged { text }) {
                    tracing::error!(error = %e, "Draft update rejected");
                }
                let _ = done.send(self.snapshot());
            }

            Command::Submit { done } => {
                let event = Event::UserSubmit {
                    draft: self.draft.clone(),
                    round: self.rounds + 1,
                };
                let outcome = submit_outcome(self.apply(event));
                tracing::debug!(
                    conv_id = %self.context.conversation_id,
                    outcome = ?outcome,
                    "Submit handled"
                );
                let _ = done.send(outcome);
            }
        }
    }

    /// Run one event through the state machine, execute its effects and
    /// publish a single snapshot covering all of them
    fn apply(&mut self, event: Event) -> Result<(), TransitionError> {
        let result = transition(&self.state, &self.context, event)?;

        self.state = result.new_state;
        if let ConvState::AwaitingResponse { round } = self.state {
            self.rounds = round;
        }

        for effect in result.effects {
            self.execute_effect(effect);
        }

        self.snapshot_tx.send_replace(self.snapshot());
        Ok(())
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::SetDraft { text } => {
                self.draft = text;
            }

            Effect::AppendMessage { origin, text } => {
                let message_id = self.log.append(origin, text).id;
                tracing::debug!(
                    conv_id = %self.context.conversation_id,
                    message_id = %message_id,
                    origin = ?origin,
                    log_len = self.log.len(),
                    "Message appended"
                );
            }

            Effect::RequestResponse { round, prompt } => {
                let responder = Arc::clone(&self.responder);
                let event_tx = self.event_tx.clone();
                let timeout = self.options.response_timeout;
                let conv_id = self.context.conversation_id.clone();

                tokio::spawn(async move {
                    tracing::info!(conv_id = %conv_id, round, "Requesting response (background)");

                    let event = match generate_reply(responder, prompt, timeout).await {
                        Ok(text) => Event::ResponseReady { round, text },
                        Err(e) => {
                            tracing::warn!(
                                conv_id = %conv_id,
                                round,
                                error = %e,
                                kind = e.kind.as_str(),
                                "Response failed, using fallback"
                            );
                            Event::ResponseFailed {
                                round,
                                message: e.message,
                                error_kind: e.kind,
                            }
                        }
                    };

                    if event_tx.send(event).await.is_err() {
                        tracing::warn!(conv_id = %conv_id, round, "Runtime gone before response arrived");
                    }
                });
            }
        }
    }

    fn snapshot(&self) -> ThreadSnapshot {
        ThreadSnapshot {
            messages: self.log.messages().to_vec(),
            busy: self.state.is_busy(),
            draft: self.draft.clone(),
        }
    }
}

/// Map the result of a submit transition to what the caller is told.
///
/// Only the busy and empty-draft guards are expected; anything else is
/// logged and reported as `Rejected`.
fn submit_outcome(result: Result<(), TransitionError>) -> SubmitOutcome {
    match result {
        Ok(()) => SubmitOutcome::Accepted,
        Err(TransitionError::Busy) => SubmitOutcome::Busy,
        Err(TransitionError::EmptyDraft) => SubmitOutcome::EmptyDraft,
        Err(e @ TransitionError::InvalidTransition(_)) => {
            tracing::error!(error = %e, "Submit hit an unhandled state");
            SubmitOutcome::Rejected
        }
    }
}

/// Call the responder on its own task so a panic inside it still resolves
/// the round, optionally bounded by a timeout
async fn generate_reply<R>(
    responder: Arc<R>,
    prompt: String,
    timeout: Option<Duration>,
) -> Result<String, ResponseError>
where
    R: ResponseGenerator + 'static,
{
    let mut call = tokio::spawn(async move { responder.generate(&prompt).await });

    let joined = match timeout {
        Some(limit) => {
            if let Ok(joined) = tokio::time::timeout(limit, &mut call).await {
                joined
            } else {
                call.abort();
                return Err(ResponseError::timeout(format!(
                    "No response within {}ms",
                    limit.as_millis()
                )));
            }
        }
        None => call.await,
    };

    joined.unwrap_or_else(|e| Err(ResponseError::internal(format!("Responder task failed: {e}"))))
}
