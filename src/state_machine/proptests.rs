//! Property-based tests for the state machine
//!
//! These tests drive random operation sequences through `transition` with a
//! minimal effect interpreter and check the conversation invariants after
//! every step.

use super::transition::*;
use super::*;
use crate::conversation::{MessageId, MessageLog, Origin};
use crate::responder::ResponseErrorKind;
use proptest::prelude::*;

const FALLBACK: &str = "fallback";

// ============================================================================
// Test Harness
// ============================================================================

/// Operations a user or the responder can perform
#[derive(Debug, Clone)]
enum Op {
    UpdateDraft(String),
    Submit,
    Resolve(String),
    Fail,
}

/// Synchronous stand-in for the runtime: applies effects in order and keeps
/// the pending request instead of spawning it
struct Harness {
    context: ConvContext,
    state: ConvState,
    log: MessageLog,
    draft: String,
    rounds: u64,
    pending: Option<(u64, String)>,
}

impl Harness {
    fn new() -> Self {
        Self {
            context: ConvContext::new("prop-conv", FALLBACK),
            state: ConvState::Idle,
            log: MessageLog::seeded("greeting"),
            draft: String::new(),
            rounds: 0,
            pending: None,
        }
    }

    fn apply(&mut self, op: &Op) -> Result<(), TransitionError> {
        let event = match op {
            Op::UpdateDraft(text) => Event::DraftChanged { text: text.clone() },
            Op::Submit => Event::UserSubmit {
                draft: self.draft.clone(),
                round: self.rounds + 1,
            },
            Op::Resolve(text) => Event::ResponseReady {
                round: self.pending.as_ref().map_or(0, |(r, _)| *r),
                text: text.clone(),
            },
            Op::Fail => Event::ResponseFailed {
                round: self.pending.as_ref().map_or(0, |(r, _)| *r),
                message: "boom".to_string(),
                error_kind: ResponseErrorKind::Malformed,
            },
        };

        let result = transition(&self.state, &self.context, event)?;
        if let ConvState::AwaitingResponse { round } = result.new_state {
            self.rounds = round;
        }
        if !result.new_state.is_busy() {
            self.pending = None;
        }
        self.state = result.new_state;

        for effect in result.effects {
            match effect {
                Effect::SetDraft { text } => self.draft = text,
                Effect::AppendMessage { origin, text } => {
                    self.log.append(origin, text);
                }
                Effect::RequestResponse { round, prompt } => self.pending = Some((round, prompt)),
            }
        }
        Ok(())
    }

    fn entries(&self) -> Vec<(MessageId, Origin, String)> {
        self.log
            .messages()
            .iter()
            .map(|m| (m.id, m.origin, m.text.clone()))
            .collect()
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_draft() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t\n]{1,4}",
        "[a-zA-Z ]{1,20}",
        " [a-z]{1,8} ",
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => arb_draft().prop_map(Op::UpdateDraft),
        3 => Just(Op::Submit),
        2 => "[a-zA-Z ]{0,20}".prop_map(Op::Resolve),
        1 => Just(Op::Fail),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Log only grows, and committed entries never change
    #[test]
    fn prop_log_is_append_only(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let mut harness = Harness::new();
        let mut before = harness.entries();

        for op in &ops {
            let _ = harness.apply(op);
            let after = harness.entries();
            prop_assert!(after.len() >= before.len());
            prop_assert_eq!(&after[..before.len()], &before[..]);
            before = after;
        }
    }

    /// Every user message is immediately followed by an assistant message
    /// once the next entry exists
    #[test]
    fn prop_user_messages_are_paired(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let mut harness = Harness::new();
        for op in &ops {
            let _ = harness.apply(op);
        }

        let entries = harness.entries();
        prop_assert_eq!(entries[0].1, Origin::Assistant);
        for pair in entries.windows(2) {
            if pair[0].1 == Origin::User {
                prop_assert_eq!(pair[1].1, Origin::Assistant);
            }
        }
        // Only the last entry may be an unanswered user message, and only
        // while busy
        if entries.last().map(|e| e.1) == Some(Origin::User) {
            prop_assert!(harness.state.is_busy());
        }
    }

    /// Submitting while busy changes nothing
    #[test]
    fn prop_busy_submit_is_noop(
        ops in proptest::collection::vec(arb_op(), 0..20),
        draft in "[a-z]{1,10}",
    ) {
        let mut harness = Harness::new();
        for op in &ops {
            let _ = harness.apply(op);
        }
        let _ = harness.apply(&Op::UpdateDraft(draft.clone()));
        if !harness.state.is_busy() {
            harness.apply(&Op::Submit).unwrap();
            let _ = harness.apply(&Op::UpdateDraft(draft));
        }

        let state = harness.state;
        let entries = harness.entries();
        let result = harness.apply(&Op::Submit);

        prop_assert_eq!(result, Err(TransitionError::Busy));
        prop_assert_eq!(harness.state, state);
        prop_assert_eq!(harness.entries(), entries);
    }

    /// Submitting a blank draft never appends
    #[test]
    fn prop_blank_submit_is_noop(blank in "[ \t\n]{0,6}") {
        let mut harness = Harness::new();
        harness.apply(&Op::UpdateDraft(blank)).unwrap();

        let result = harness.apply(&Op::Submit);

        prop_assert_eq!(result, Err(TransitionError::EmptyDraft));
        prop_assert_eq!(harness.state, ConvState::Idle);
        prop_assert_eq!(harness.log.len(), 1);
    }

    /// Whatever the outcome, a resolved round leaves the conversation idle
    /// with exactly one new assistant message
    #[test]
    fn prop_resolution_clears_busy(
        text in "[a-z]{1,10}",
        reply in "[a-zA-Z ]{0,10}",
        succeed in any::<bool>(),
    ) {
        let mut harness = Harness::new();
        harness.apply(&Op::UpdateDraft(text.clone())).unwrap();
        harness.apply(&Op::Submit).unwrap();
        prop_assert!(harness.state.is_busy());
        prop_assert_eq!(harness.pending.as_ref().map(|(_, p)| p.clone()), Some(text));

        let op = if succeed { Op::Resolve(reply.clone()) } else { Op::Fail };
        harness.apply(&op).unwrap();

        prop_assert_eq!(harness.state, ConvState::Idle);
        prop_assert_eq!(harness.log.len(), 3);
        let last = harness.log.messages().last().unwrap();
        prop_assert_eq!(last.origin, Origin::Assistant);
        let expected = if succeed && !reply.trim().is_empty() { reply.as_str() } else { FALLBACK };
        prop_assert_eq!(last.text.as_str(), expected);
    }

    /// Message ids strictly increase along the log
    #[test]
    fn prop_ids_increase(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let mut harness = Harness::new();
        for op in &ops {
            let _ = harness.apply(op);
        }

        let entries = harness.entries();
        prop_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
    }
}
