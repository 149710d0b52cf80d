//! Ordered, append-only conversation transcript

mod message;

pub use message::{
    greeting, Message, MessageId, Role, PROMPT_ID, PROMPT_TEXT, WELCOME_ID, WELCOME_TEXT,
};

use std::collections::HashSet;
use thiserror::Error;

/// Why a message was refused by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidReason {
    #[error("text is empty")]
    EmptyText,
    #[error("id already present in conversation")]
    DuplicateId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    #[error("Invalid message {id}: {reason}")]
    InvalidMessage { id: MessageId, reason: InvalidReason },
}

/// Transcript store. Display order is append order; the only way to remove
/// messages is [`ConversationStore::reset`].
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
    ids: HashSet<MessageId>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the welcome and prompt bot messages
    pub fn with_greeting() -> Self {
        let mut store = Self::new();
        for message in greeting() {
            store.ids.insert(message.id.clone());
            store.messages.push(message);
        }
        store
    }

    /// Add a message to the end of the transcript
    ///
    /// # Errors
    ///
    /// [`ConversationError::InvalidMessage`] for empty text or an id already
    /// in the transcript.
    pub fn append(&mut self, message: Message) -> Result<&Message, ConversationError> {
        if message.text.is_empty() {
            return Err(ConversationError::InvalidMessage {
                id: message.id,
                reason: InvalidReason::EmptyText,
            });
        }
        if self.ids.contains(&message.id) {
            return Err(ConversationError::InvalidMessage {
                id: message.id,
                reason: InvalidReason::DuplicateId,
            });
        }

        self.ids.insert(message.id.clone());
        self.messages.push(message);
        Ok(&self.messages[self.messages.len() - 1])
    }

    /// Drop every message, starting a new chat
    pub fn reset(&mut self) {
        self.messages.clear();
        self.ids.clear();
    }

    /// Messages in append order. The iterator is `Clone`, so it can be
    /// restarted by cloning before consuming.
    pub fn all(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        if !self.ids.contains(id) {
            return None;
        }
        self.messages.iter().find(|m| &m.id == id)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
