//! Command interface for the controller
//!
//! UI event handlers map onto [`Command`] values; the shell also parses them
//! from typed lines.

use crate::actions::{ActionOutcome, MessageAction};
use crate::conversation::MessageId;
use crate::recent::RecentChatSummary;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A user intent the controller can handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Submit {
        text: String,
    },
    NewChat,
    ShowRecent,
    ShowChat,
    SelectRecent {
        index: usize,
    },
    Act {
        message_id: MessageId,
        action: MessageAction,
    },
}

/// Why a submission was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    EmptyInput,
    Busy,
}

/// Result of a submit call. Rejections are silent: nothing changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Submission {
    Accepted { message_id: MessageId, cycle: u64 },
    Rejected { reason: RejectReason },
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Submission::Accepted { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandOutcome {
    Submitted(Submission),
    Reset,
    ViewChanged,
    Selected { chat: RecentChatSummary },
    Acted { outcome: ActionOutcome },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("Unknown command: /{0}")]
    UnknownCommand(String),
    #[error("/{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("Not a list position: {0}")]
    InvalidIndex(String),
}

impl FromStr for Command {
    type Err = CommandParseError;

    /// Shell syntax. Anything not starting with `/` is a message, kept
    /// verbatim.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Command::Submit {
                text: line.to_string(),
            });
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        match name {
            "new" => Ok(Command::NewChat),
            "recent" => Ok(Command::ShowRecent),
            "chat" | "back" => Ok(Command::ShowChat),
            "open" => {
                let raw = arg.ok_or(CommandParseError::MissingArgument("open"))?;
                let index = raw
                    .parse()
                    .map_err(|_| CommandParseError::InvalidIndex(raw.to_string()))?;
                Ok(Command::SelectRecent { index })
            }
            "like" | "dislike" | "copy" | "retry" => {
                let action: MessageAction = name
                    .parse()
                    .map_err(|_| CommandParseError::UnknownCommand(name.to_string()))?;
                let id = arg.ok_or(CommandParseError::MissingArgument(action.as_str()))?;
                Ok(Command::Act {
                    message_id: MessageId::from(id),
                    action,
                })
            }
            other => Err(CommandParseError::UnknownCommand(other.to_string())),
        }
    }
}
