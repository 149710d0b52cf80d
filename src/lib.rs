//! AGNES - conversational assistant interaction controller
//!
//! Owns the transcript of an assistant chat, gates message dispatch so only
//! one reply is pending at a time, and routes per-message actions and
//! navigation between the active chat and the recent-chat list.

#![allow(clippy::must_use_candidate)]

pub mod actions;
pub mod classifier;
pub mod command;
pub mod config;
pub mod conversation;
pub mod generator;
pub mod navigation;
pub mod recent;
pub mod runtime;
pub mod state_machine;

pub use command::{Command, CommandOutcome, Submission};
pub use config::ChatConfig;
pub use conversation::{ConversationStore, Message, MessageId, Role};
pub use runtime::{ChatController, ChatEvent, ControllerError, Screen, ShellController};
pub use state_machine::{DispatchState, Reply};
