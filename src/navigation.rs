//! View navigation between the active chat and the recent-chats list

use crate::recent::{RecentChatSummary, RecentChats};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    ActiveChat,
    RecentList,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("Recent chats are not being shown")]
    NotShowingRecent,
    #[error("No recent chat at index {index} ({available} available)")]
    NoSuchChat { index: usize, available: usize },
}

/// Tracks which screen is shown. Independent of the dispatch gate.
#[derive(Debug, Clone, Default)]
pub struct ViewController {
    mode: ViewMode,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Set the mode. Both modes are always reachable.
    pub fn switch_to(&mut self, mode: ViewMode) {
        if self.mode != mode {
            tracing::debug!(from = ?self.mode, to = ?mode, "Switching view");
        }
        self.mode = mode;
    }

    /// Pick an entry from the recent list and return to the active chat.
    ///
    /// The selected conversation is not loaded; the active transcript is left
    /// as it was.
    ///
    /// # Errors
    ///
    /// [`NavigationError::NotShowingRecent`] outside the recent list,
    /// [`NavigationError::NoSuchChat`] for a bad index. The mode is unchanged.
    pub fn select_recent<'a>(
        &mut self,
        recent: &'a RecentChats,
        index: usize,
    ) -> Result<&'a RecentChatSummary, NavigationError> {
        if self.mode != ViewMode::RecentList {
            return Err(NavigationError::NotShowingRecent);
        }
        let chat = recent.get(index).ok_or(NavigationError::NoSuchChat {
            index,
            available: recent.len(),
        })?;
        self.switch_to(ViewMode::ActiveChat);
        Ok(chat)
    }
}
