//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the controller with mock implementations.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Destination for copied message text. Fire-and-forget.
pub trait Clipboard: Send + Sync {
    fn write(&self, text: &str);
}

/// Simulated "thinking" time before a reply is produced
#[async_trait]
pub trait LatencyPolicy: Send + Sync {
    async fn wait(&self);
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

impl<T: Clipboard + ?Sized> Clipboard for Arc<T> {
    fn write(&self, text: &str) {
        (**self).write(text);
    }
}

#[async_trait]
impl<T: LatencyPolicy + ?Sized> LatencyPolicy for Arc<T> {
    async fn wait(&self) {
        (**self).wait().await;
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Reference delay before every reply
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1000);

/// Sleep for a fixed duration on the tokio clock
#[derive(Debug, Clone, Copy)]
pub struct FixedLatency(pub Duration);

impl Default for FixedLatency {
    fn default() -> Self {
        Self(DEFAULT_LATENCY)
    }
}

#[async_trait]
impl LatencyPolicy for FixedLatency {
    async fn wait(&self) {
        tokio::time::sleep(self.0).await;
    }
}

/// Reply as soon as the task is polled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLatency;

#[async_trait]
impl LatencyPolicy for NoLatency {
    async fn wait(&self) {}
}

/// Process-local clipboard holding the most recent copy
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    last: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        match self.last.lock() {
            Ok(last) => last.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn write(&self, text: &str) {
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *last = Some(text.to_string());
    }
}
