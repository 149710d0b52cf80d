//! Response generator abstraction
//!
//! The natural-language backend is an external collaborator. This module
//! defines its interface plus the adapters the shell stacks around it.

mod error;

pub use error::{GeneratorError, GeneratorErrorKind};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const PLACEHOLDER_REPLY: &str =
    "This is a placeholder response. Implement your actual response generation logic here.";

/// Produces a bot reply for a meaningful user message
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, text: &str) -> Result<String, GeneratorError>;

    /// Short name for logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: ResponseGenerator + ?Sized> ResponseGenerator for Arc<T> {
    async fn generate(&self, text: &str) -> Result<String, GeneratorError> {
        (**self).generate(text).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Stand-in backend that always answers with [`PLACEHOLDER_REPLY`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderGenerator;

#[async_trait]
impl ResponseGenerator for PlaceholderGenerator {
    async fn generate(&self, _text: &str) -> Result<String, GeneratorError> {
        Ok(PLACEHOLDER_REPLY.to_string())
    }

    fn name(&self) -> &str {
        "placeholder"
    }
}

/// Bounds a generator call. Expiry surfaces as a
/// [`GeneratorErrorKind::Timeout`] error.
pub struct TimeoutGenerator<G> {
    inner: G,
    timeout: Duration,
}

impl<G: ResponseGenerator> TimeoutGenerator<G> {
    pub fn new(inner: G, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<G: ResponseGenerator> ResponseGenerator for TimeoutGenerator<G> {
    async fn generate(&self, text: &str) -> Result<String, GeneratorError> {
        match tokio::time::timeout(self.timeout, self.inner.generate(text)).await {
            Ok(result) => result,
            Err(_) => Err(GeneratorError::timeout(self.timeout)),
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Logging wrapper for generators
pub struct LoggingGenerator<G> {
    inner: G,
}

impl<G: ResponseGenerator> LoggingGenerator<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<G: ResponseGenerator> ResponseGenerator for LoggingGenerator<G> {
    async fn generate(&self, text: &str) -> Result<String, GeneratorError> {
        let start = Instant::now();
        let result = self.inner.generate(text).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    generator = %self.inner.name(),
                    duration_ms = %duration.as_millis(),
                    reply_chars = reply.chars().count(),
                    "Response generated"
                );
            }
            Err(e) => {
                tracing::error!(
                    generator = %self.inner.name(),
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Response generation failed"
                );
            }
        }

        result
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
