//! Transcript message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Id of the first greeting message
pub const WELCOME_ID: &str = "welcome";

/// Id of the second greeting message
pub const PROMPT_ID: &str = "prompt";

pub const WELCOME_TEXT: &str = "Hi! My Name is AGNES. I am an AI chatbot here to help with any questions you may have about Climate Change. Please note that I am still under training and may not have all the answers now, but definitely with time, I will be more optimized";

pub const PROMPT_TEXT: &str = "What can I help you with?";

/// Unique identifier of a message within a conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Fresh random id
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MessageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Bot => f.write_str("bot"),
        }
    }
}

/// A single transcript entry. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(id: MessageId, role: Role, text: impl Into<String>) -> Self {
        Self {
            id,
            role,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageId::new(), Role::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(MessageId::new(), Role::Bot, text)
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_bot(&self) -> bool {
        self.role == Role::Bot
    }
}

/// The two bot messages shown when the widget first opens
pub fn greeting() -> [Message; 2] {
    [
        Message::new(WELCOME_ID.into(), Role::Bot, WELCOME_TEXT),
        Message::new(PROMPT_ID.into(), Role::Bot, PROMPT_TEXT),
    ]
}
