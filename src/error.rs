//! Error types for the `docqa` crate.

use thiserror::Error;

/// Errors that can occur in document question-answering operations.
#[derive(Debug, Error)]
pub enum DocQaError {
    /// Text could not be extracted from a document.
    ///
    /// Recoverable: the pipeline skips the affected document during ingestion.
    #[error("Extraction error ({doc_id}): {message}")]
    Extraction {
        /// The document that could not be extracted.
        doc_id: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    ///
    /// Fatal to the ingest batch in progress: no chunks from the batch are
    /// stored, leaving the index in its previous state.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStore {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The index query failed; surfaced as a query-level failure with no
    /// partial answer.
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// A completion-service call failed (network, auth, rate limit, timeout).
    ///
    /// Stage-1 failures degrade the result (the affected row is omitted);
    /// a Stage-2 failure yields a default-answer [`QueryResult`](crate::QueryResult).
    #[error("Completion service error ({provider}): {message}")]
    Completion {
        /// The completion provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Structured output from the synthesis stage failed to parse.
    ///
    /// Handled identically to a completion failure for user-visible purposes.
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    /// A configuration validation error. Fails fast before any processing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error in the pipeline orchestration.
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// A convenience result type for document question-answering operations.
pub type Result<T> = std::result::Result<T, DocQaError>;
