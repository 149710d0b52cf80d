//! Effects produced by state transitions

use crate::conversation::{MessageId, Role};

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the transcript
    AppendMessage {
        id: MessageId,
        role: Role,
        text: String,
    },

    /// Empty the transcript
    ClearConversation,

    /// Start the background latency/classify/generate task
    BeginDispatch { cycle: u64, text: String },

    /// Notify observers of the new dispatch state
    PublishState,
}

impl Effect {
    pub fn append_user(id: MessageId, text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            id,
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn append_bot(id: MessageId, text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            id,
            role: Role::Bot,
            text: text.into(),
        }
    }

    pub fn begin_dispatch(cycle: u64, text: impl Into<String>) -> Self {
        Effect::BeginDispatch {
            cycle,
            text: text.into(),
        }
    }
}
