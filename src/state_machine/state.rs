//! Dispatch state types

use serde::{Deserialize, Serialize};

pub const CLARIFICATION_TEXT: &str = "It seems like there might have been a typo or an error in your message. Could you please clarify or let me know how I can assist you? 😊";

pub const APOLOGY_TEXT: &str =
    "I apologize, but I encountered an error. Please try asking your question again.";

/// Dispatch state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DispatchState {
    /// Ready for user input, no dispatch in flight
    #[default]
    Idle,

    /// A dispatch cycle is in flight; further submissions are ignored
    AwaitingResponse { cycle: u64 },
}

impl DispatchState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DispatchState::Idle)
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self, DispatchState::AwaitingResponse { .. })
    }

    /// Cycle currently in flight, if any
    pub fn cycle(&self) -> Option<u64> {
        match self {
            DispatchState::Idle => None,
            DispatchState::AwaitingResponse { cycle } => Some(*cycle),
        }
    }
}

/// How a dispatch cycle ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    /// Input was suspect; the generator was not called
    Clarification,
    /// The generator answered
    Generated { text: String },
    /// The generator failed
    Apology,
}

impl Reply {
    /// Text of the bot message this reply becomes
    pub fn text(&self) -> &str {
        match self {
            Reply::Clarification => CLARIFICATION_TEXT,
            Reply::Generated { text } => text,
            Reply::Apology => APOLOGY_TEXT,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Clarification => "clarification",
            Reply::Generated { .. } => "generated",
            Reply::Apology => "apology",
        }
    }
}
