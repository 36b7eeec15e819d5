//! Retry policy behavior at the completion boundary.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::FlakyCompletion;
use docqa::completion::{CompletionModel, CompletionRequest, RetryingCompletion};
use docqa::error::DocQaError;

fn request() -> CompletionRequest {
    CompletionRequest {
        prompt: "prompt".to_string(),
        model: "llama3-8b-8192".to_string(),
        temperature: 0.2,
        max_tokens: 300,
        json_output: false,
    }
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let inner = Arc::new(FlakyCompletion::new(2));
    let model = RetryingCompletion::new(inner.clone())
        .with_max_retries(2)
        .with_initial_backoff(Duration::from_millis(1));

    let reply = model.complete(&request()).await.unwrap();
    assert_eq!(reply, "ok");
    assert_eq!(inner.attempts(), 3);
}

#[tokio::test]
async fn persistent_failure_returns_last_error() {
    let inner = Arc::new(FlakyCompletion::new(u32::MAX));
    let model = RetryingCompletion::new(inner.clone())
        .with_max_retries(2)
        .with_initial_backoff(Duration::from_millis(1));

    let err = model.complete(&request()).await.unwrap_err();
    assert!(matches!(err, DocQaError::Completion { .. }));
    assert_eq!(inner.attempts(), 3);
}

#[tokio::test]
async fn zero_retries_attempts_once() {
    let inner = Arc::new(FlakyCompletion::new(1));
    let model = RetryingCompletion::new(inner.clone())
        .with_max_retries(0)
        .with_initial_backoff(Duration::from_millis(1));

    model.complete(&request()).await.unwrap_err();
    assert_eq!(inner.attempts(), 1);
}
