//! Per-message actions

use crate::conversation::{ConversationStore, MessageId};
use crate::runtime::Clipboard;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageAction {
    Like,
    Dislike,
    Copy,
    Retry,
}

impl MessageAction {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageAction::Like => "like",
            MessageAction::Dislike => "dislike",
            MessageAction::Copy => "copy",
            MessageAction::Retry => "retry",
        }
    }
}

impl fmt::Display for MessageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown message action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for MessageAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(MessageAction::Like),
            "dislike" => Ok(MessageAction::Dislike),
            "copy" => Ok(MessageAction::Copy),
            "retry" => Ok(MessageAction::Retry),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Message text was written to the clipboard
    Copied,
    /// No message with that id; nothing happened
    NotFound,
    /// Action is reserved but has no behavior yet
    Unimplemented { action: MessageAction },
}

/// Execute `action` against the message `id`. Never mutates the transcript.
pub fn perform(
    store: &ConversationStore,
    clipboard: &dyn Clipboard,
    id: &MessageId,
    action: MessageAction,
) -> ActionOutcome {
    match action {
        MessageAction::Copy => match store.get(id) {
            Some(message) => {
                clipboard.write(&message.text);
                tracing::debug!(message_id = %id, "Copied message text");
                ActionOutcome::Copied
            }
            None => {
                tracing::debug!(message_id = %id, "Copy target not found");
                ActionOutcome::NotFound
            }
        },
        // Sentiment tracking and resubmission are not implemented
        MessageAction::Like | MessageAction::Dislike | MessageAction::Retry => {
            tracing::debug!(message_id = %id, action = %action, "Message action not implemented");
            ActionOutcome::Unimplemented { action }
        }
    }
}
