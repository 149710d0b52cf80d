//! Runtime for driving a conversation
//!
//! The controller owns all mutable chat state, runs the pure transition
//! function and executes the resulting effects.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ChatController;
pub use traits::*;

use crate::conversation::{ConversationError, Message};
use crate::generator::{LoggingGenerator, PlaceholderGenerator, TimeoutGenerator};
use crate::navigation::{NavigationError, ViewMode};
use crate::recent::RecentChatSummary;
use crate::state_machine::{DispatchState, TransitionError};
use serde::Serialize;
use thiserror::Error;

/// Type alias for the shell's controller with concrete implementations
pub type ShellController = ChatController<
    LoggingGenerator<TimeoutGenerator<PlaceholderGenerator>>,
    MemoryClipboard,
    FixedLatency,
>;

/// Change notifications for a rendering layer
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    MessageAppended { message: Message },
    StateChanged { state: DispatchState },
    ConversationReset,
    ViewChanged { mode: ViewMode },
}

/// What the rendering layer should currently show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen<'a> {
    Chat {
        messages: &'a [Message],
        /// A reply is pending: show the typing indicator, disable input
        awaiting: bool,
    },
    Recent {
        chats: &'a [RecentChatSummary],
    },
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Conversation(#[from] ConversationError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
