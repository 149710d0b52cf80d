//! Recent-chats registry
//!
//! Read-only summaries of past conversations, shown in the history list.
//! The core never writes them; a source loads them once at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One entry in the recent-chats list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentChatSummary {
    pub title: String,
    pub preview: String,
}

impl RecentChatSummary {
    pub fn new(title: impl Into<String>, preview: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            preview: preview.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RecentChatsError {
    #[error("Failed to read recent chats from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse recent chats from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// External provider of recent-chat summaries
pub trait RecentChatSource {
    /// # Errors
    ///
    /// Fails when the backing store cannot be read or parsed.
    fn load(&self) -> Result<Vec<RecentChatSummary>, RecentChatsError>;
}

/// In-memory source
#[derive(Debug, Clone, Default)]
pub struct StaticRecentChats(pub Vec<RecentChatSummary>);

impl RecentChatSource for StaticRecentChats {
    fn load(&self) -> Result<Vec<RecentChatSummary>, RecentChatsError> {
        Ok(self.0.clone())
    }
}

/// Source backed by a JSON array of `{ "title", "preview" }` objects.
/// A missing file means no history yet.
#[derive(Debug, Clone)]
pub struct JsonFileRecentChats {
    path: PathBuf,
}

impl JsonFileRecentChats {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecentChatSource for JsonFileRecentChats {
    fn load(&self) -> Result<Vec<RecentChatSummary>, RecentChatsError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No recent chats file");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(RecentChatsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| RecentChatsError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// Loaded, read-only list of recent chats
#[derive(Debug, Clone, Default)]
pub struct RecentChats {
    chats: Vec<RecentChatSummary>,
}

impl RecentChats {
    /// # Errors
    ///
    /// Propagates the source's failure.
    pub fn load(source: &dyn RecentChatSource) -> Result<Self, RecentChatsError> {
        let chats = source.load()?;
        tracing::debug!(count = chats.len(), "Loaded recent chats");
        Ok(Self { chats })
    }

    pub fn as_slice(&self) -> &[RecentChatSummary] {
        &self.chats
    }

    pub fn get(&self, index: usize) -> Option<&RecentChatSummary> {
        self.chats.get(index)
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}

impl From<Vec<RecentChatSummary>> for RecentChats {
    fn from(chats: Vec<RecentChatSummary>) -> Self {
        Self { chats }
    }
}
