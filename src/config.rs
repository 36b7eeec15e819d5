//! Configuration for the document question-answering pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{DocQaError, Result};

/// Configuration parameters for the pipeline and synthesizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocQaConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of top results to return from retrieval.
    pub top_k: usize,
    /// Completion model identifier passed to the completion service.
    pub model: String,
    /// Sampling temperature for per-document extraction calls.
    pub extraction_temperature: f32,
    /// Sampling temperature for the cross-document synthesis call.
    pub synthesis_temperature: f32,
    /// Token budget for each per-document extraction call.
    pub extraction_max_tokens: u32,
    /// Token budget for the cross-document synthesis call.
    pub synthesis_max_tokens: u32,
}

impl Default for DocQaConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 5,
            model: "llama3-8b-8192".to_string(),
            extraction_temperature: 0.2,
            synthesis_temperature: 0.3,
            extraction_max_tokens: 300,
            synthesis_max_tokens: 4000,
        }
    }
}

impl DocQaConfig {
    /// Create a new builder for constructing a [`DocQaConfig`].
    pub fn builder() -> DocQaConfigBuilder {
        DocQaConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`DocQaConfig`].
#[derive(Debug, Clone, Default)]
pub struct DocQaConfigBuilder {
    config: DocQaConfig,
}

impl DocQaConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of top results to return from retrieval.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the completion model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the sampling temperature for extraction calls.
    pub fn extraction_temperature(mut self, temperature: f32) -> Self {
        self.config.extraction_temperature = temperature;
        self
    }

    /// Set the sampling temperature for the synthesis call.
    pub fn synthesis_temperature(mut self, temperature: f32) -> Self {
        self.config.synthesis_temperature = temperature;
        self
    }

    /// Set the token budget for each extraction call.
    pub fn extraction_max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.extraction_max_tokens = max_tokens;
        self
    }

    /// Set the token budget for the synthesis call.
    pub fn synthesis_max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.synthesis_max_tokens = max_tokens;
        self
    }

    /// Build the [`DocQaConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`DocQaError::Config`] if:
    /// - `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    /// - `model` is empty
    pub fn build(self) -> Result<DocQaConfig> {
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(DocQaError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(DocQaError::Config("top_k must be greater than zero".to_string()));
        }
        if self.config.model.is_empty() {
            return Err(DocQaError::Config("model must not be empty".to_string()));
        }
        Ok(self.config)
    }
}
