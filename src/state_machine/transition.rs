//! Pure state transition function
//!
//! Given the same state and event this always produces the same result, with
//! no I/O. The controller executes the returned effects.

use super::state::{Reply, APOLOGY_TEXT};
use super::{DispatchState, Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: DispatchState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: DispatchState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyInput,
    #[error("A reply is still pending, cannot accept message")]
    Busy,
    #[error("Stale settlement for cycle {got} (awaiting {expected:?})")]
    StaleSettlement { expected: Option<u64>, got: u64 },
}

/// Pure transition function
///
/// # Errors
///
/// Returns a [`TransitionError`] when the event is not valid in `state`.
pub fn transition(state: &DispatchState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Submission
        // ============================================================

        (_, Event::Submit { text, .. }) if text.trim().is_empty() => {
            Err(TransitionError::EmptyInput)
        }

        // Idle + Submit -> AwaitingResponse. The raw text is kept as typed.
        (
            DispatchState::Idle,
            Event::Submit {
                text,
                message_id,
                cycle,
            },
        ) => Ok(TransitionResult::new(DispatchState::AwaitingResponse { cycle })
            .with_effect(Effect::append_user(message_id, text.clone()))
            .with_effect(Effect::PublishState)
            .with_effect(Effect::begin_dispatch(cycle, text))),

        (DispatchState::AwaitingResponse { .. }, Event::Submit { .. }) => {
            Err(TransitionError::Busy)
        }

        // ============================================================
        // Settlement
        // ============================================================

        (
            DispatchState::AwaitingResponse { cycle },
            Event::Settled {
                cycle: settled,
                reply_id,
                reply,
            },
        ) if *cycle == settled => {
            Ok(TransitionResult::new(DispatchState::Idle)
                .with_effect(Effect::append_bot(reply_id, bot_text(&reply)))
                .with_effect(Effect::PublishState))
        }

        // A reset released the gate while this cycle was in flight
        (state, Event::Settled { cycle, .. }) => Err(TransitionError::StaleSettlement {
            expected: state.cycle(),
            got: cycle,
        }),

        // ============================================================
        // Reset (any state)
        // ============================================================

        (_, Event::Reset) => Ok(TransitionResult::new(DispatchState::Idle)
            .with_effect(Effect::ClearConversation)
            .with_effect(Effect::PublishState)),
    }
}

/// An empty generated reply cannot be stored; it counts as a failure.
fn bot_text(reply: &Reply) -> &str {
    match reply {
        Reply::Generated { text } if text.is_empty() => APOLOGY_TEXT,
        other => other.text(),
    }
}
