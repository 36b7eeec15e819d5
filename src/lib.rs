//! Retrieval-augmented document question answering.
//!
//! `docqa` implements the core query pipeline of a document QA system:
//! documents are chunked and indexed for semantic retrieval, and queries are
//! answered by retrieving relevant chunks and running a two-stage LLM
//! orchestration over them — per-document extraction followed by one
//! cross-document synthesis call that produces a cited, thematically
//! organized [`QueryResult`].
//!
//! External capabilities (text extraction, embedding computation, the
//! completion service) sit behind the [`TextExtractor`],
//! [`EmbeddingProvider`], and [`CompletionModel`] traits; built-in
//! implementations are feature-gated:
//!
//! - `openai` — [`openai::OpenAiEmbeddingProvider`] for the OpenAI
//!   embeddings API
//! - `groq` — [`groq::GroqCompletionModel`] for the Groq (OpenAI-compatible)
//!   chat completions API
//! - `pdf` — PDF text extraction in [`MediaExtractor`]
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docqa::{DocQaPipeline, DocQaConfig, InMemoryVectorStore, RawDocument};
//! use docqa::groq::GroqCompletionModel;
//! use docqa::openai::OpenAiEmbeddingProvider;
//!
//! let pipeline = DocQaPipeline::builder()
//!     .config(DocQaConfig::default())
//!     .embedding_provider(Arc::new(OpenAiEmbeddingProvider::from_env()?))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .completion_model(Arc::new(GroqCompletionModel::from_env()?))
//!     .build()?;
//!
//! let docs = vec![RawDocument::new("report.pdf", bytes, "application/pdf")];
//! let chunk_count = pipeline.ingest(&docs).await?;
//! let result = pipeline.answer("What are the key findings?").await?;
//! ```

pub mod answer;
pub mod chunking;
pub mod completion;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod inmemory;
pub mod pipeline;
pub mod synthesizer;
pub mod vectorstore;

#[cfg(feature = "groq")]
pub mod groq;
#[cfg(feature = "openai")]
pub mod openai;

pub use answer::{DocumentResponse, NO_ANSWER, QueryResult, SupportingDoc, Theme};
pub use chunking::{Chunker, RecursiveChunker};
pub use completion::{CompletionModel, CompletionRequest, RetryingCompletion};
pub use config::{DocQaConfig, DocQaConfigBuilder};
pub use document::{Chunk, RawDocument, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{DocQaError, Result};
pub use extract::{MediaExtractor, TextExtractor};
pub use inmemory::InMemoryVectorStore;
pub use pipeline::{DocQaPipeline, DocQaPipelineBuilder};
pub use synthesizer::AnswerSynthesizer;
pub use vectorstore::VectorStore;
