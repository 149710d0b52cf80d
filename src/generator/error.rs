//! Response generator error types

use std::time::Duration;
use thiserror::Error;

/// Generator error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct GeneratorError {
    pub kind: GeneratorErrorKind,
    pub message: String,
}

impl GeneratorError {
    pub fn new(kind: GeneratorErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(GeneratorErrorKind::Backend, message)
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(
            GeneratorErrorKind::Timeout,
            format!("No reply within {}ms", after.as_millis()),
        )
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(GeneratorErrorKind::Unavailable, message)
    }
}

/// Error classification, used for logging only. Every kind takes the same
/// apology path in the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorErrorKind {
    /// The backend answered with an error
    Backend,
    /// The backend did not answer in time
    Timeout,
    /// No backend is reachable or configured
    Unavailable,
}

impl GeneratorErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Timeout => "timeout",
            Self::Unavailable => "unavailable",
        }
    }
}
