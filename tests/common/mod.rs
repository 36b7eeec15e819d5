//! Shared test doubles: a deterministic embedder and a scripted completion
//! model.

#![allow(dead_code)]

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use docqa::completion::{CompletionModel, CompletionRequest};
use docqa::embedding::EmbeddingProvider;
use docqa::error::{DocQaError, Result};

/// Marker separating the extraction prompt preamble from the chunk text.
const EXTRACTION_MARKER: &str = "document content:\n\n";

/// A deterministic bag-of-words embedder.
///
/// Each lowercase alphanumeric token is hashed into one of `dim` buckets, so
/// texts sharing words get similar vectors. Deterministic for identical text,
/// which retrieval relies on.
pub struct HashEmbedding {
    dim: usize,
}

impl HashEmbedding {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dim];
        let lowered = text.to_lowercase();
        for token in lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            vector[(hasher.finish() as usize) % self.dim] += 1.0;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dim
    }
}

/// An embedder that always fails, for ingestion-failure tests.
pub struct FailingEmbedding;

#[async_trait]
impl EmbeddingProvider for FailingEmbedding {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(DocQaError::Embedding {
            provider: "failing".to_string(),
            message: "embedding backend unavailable".to_string(),
        })
    }

    fn dimensions(&self) -> usize {
        8
    }
}

/// A completion model with scripted behavior.
///
/// Extraction requests (plain text) echo the chunk text back; structured
/// requests return the configured synthesis reply, or fail when none is set.
/// Extraction requests whose prompt contains the configured substring fail.
/// All requests are recorded for assertions.
pub struct ScriptedCompletion {
    synthesis_reply: Option<String>,
    fail_extractions_containing: Option<String>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    /// Reply to synthesis requests with the given raw text.
    pub fn new(synthesis_reply: impl Into<String>) -> Self {
        Self {
            synthesis_reply: Some(synthesis_reply.into()),
            fail_extractions_containing: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every synthesis request, simulating a completion-service outage
    /// that affects only Stage 2.
    pub fn failing_synthesis() -> Self {
        Self {
            synthesis_reply: None,
            fail_extractions_containing: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail extraction requests whose prompt contains `needle`.
    pub fn with_failing_extractions_containing(mut self, needle: impl Into<String>) -> Self {
        self.fail_extractions_containing = Some(needle.into());
        self
    }

    /// All requests received so far, in order.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionModel for ScriptedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request.clone());

        if request.json_output {
            return self.synthesis_reply.clone().ok_or_else(|| DocQaError::Completion {
                provider: "scripted".to_string(),
                message: "synthesis unavailable".to_string(),
            });
        }

        if let Some(needle) = &self.fail_extractions_containing {
            if request.prompt.contains(needle) {
                return Err(DocQaError::Completion {
                    provider: "scripted".to_string(),
                    message: "extraction unavailable".to_string(),
                });
            }
        }

        let content = request.prompt.split(EXTRACTION_MARKER).nth(1).unwrap_or("");
        Ok(format!("The relevant passage is: {content}"))
    }
}

/// A completion model that fails a fixed number of times before succeeding,
/// for retry-policy tests.
pub struct FlakyCompletion {
    failures_remaining: AtomicU32,
    attempts: AtomicU32,
}

impl FlakyCompletion {
    pub fn new(failures: u32) -> Self {
        Self { failures_remaining: AtomicU32::new(failures), attempts: AtomicU32::new(0) }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionModel for FlakyCompletion {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(DocQaError::Completion {
                provider: "flaky".to_string(),
                message: "transient failure".to_string(),
            });
        }
        Ok("ok".to_string())
    }
}
