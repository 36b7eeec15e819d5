//! Completion service trait and retry policy.
//!
//! The [`CompletionModel`] trait abstracts the external LLM text-generation
//! API. [`RetryingCompletion`] wraps any model with bounded
//! retry-with-backoff, the standard treatment for rate-limited LLM endpoints.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::warn;

use crate::error::Result;

/// A single request to the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// The full prompt text.
    pub prompt: String,
    /// Model identifier passed through to the service.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
    /// When true, the service is asked to constrain its reply to a
    /// machine-parsable JSON object (structured output mode).
    pub json_output: bool,
}

/// An external LLM completion service.
///
/// Implementations wrap a specific provider behind a unified async interface.
/// Calls are network-bound and may fail or time out; callers decide whether a
/// failure degrades the result or aborts the operation.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Generate a completion for the given request.
    ///
    /// Returns the raw reply text. In structured output mode the reply is
    /// expected to be a JSON object, but parsing is the caller's concern.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Wraps a [`CompletionModel`] with bounded retry and exponential backoff.
///
/// A request is attempted up to `1 + max_retries` times; the delay before
/// retry `n` is `initial_backoff * 2^n`. The last error is returned if all
/// attempts fail.
pub struct RetryingCompletion {
    inner: Arc<dyn CompletionModel>,
    max_retries: u32,
    initial_backoff: Duration,
}

impl RetryingCompletion {
    /// Default number of retries after the initial attempt.
    pub const DEFAULT_MAX_RETRIES: u32 = 2;

    /// Default delay before the first retry.
    pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);

    /// Wrap a model with the default retry policy (2 retries, 1s backoff).
    pub fn new(inner: Arc<dyn CompletionModel>) -> Self {
        Self {
            inner,
            max_retries: Self::DEFAULT_MAX_RETRIES,
            initial_backoff: Self::DEFAULT_INITIAL_BACKOFF,
        }
    }

    /// Set the number of retries after the initial attempt.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the delay before the first retry; subsequent delays double.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }
}

#[async_trait]
impl CompletionModel for RetryingCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.inner.complete(request).await {
                Ok(reply) => return Ok(reply),
                Err(e) if attempt < self.max_retries => {
                    let delay = self.initial_backoff * 2u32.pow(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_attempts = self.max_retries + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "completion request failed, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
