//! Data types for raw documents, chunks, and search results.

use serde::{Deserialize, Serialize};

/// An uploaded document before text extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    /// Stable identifier of the source document (typically the file name).
    pub doc_id: String,
    /// The raw file contents.
    pub bytes: Vec<u8>,
    /// The MIME media type of the file (e.g. `application/pdf`).
    pub media_type: String,
}

impl RawDocument {
    /// Create a new raw document.
    pub fn new(
        doc_id: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        media_type: impl Into<String>,
    ) -> Self {
        Self { doc_id: doc_id.into(), bytes: bytes.into(), media_type: media_type.into() }
    }
}

/// A bounded-size segment of a document's extracted text with provenance
/// metadata and, once indexed, its vector embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier, derived as `{doc_id}_{chunk_index}`.
    ///
    /// Deterministic derivation gives idempotent replace semantics: adding a
    /// chunk with an existing id overwrites the prior entry.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text. Empty until the pipeline
    /// attaches one during ingestion.
    pub embedding: Vec<f32>,
    /// Identifier of the source document, stable across its chunks.
    pub doc_id: String,
    /// Zero-based position of this chunk within its document's chunk sequence.
    pub chunk_index: usize,
    /// Best-effort page number, approximated as `chunk_index + 1` when no
    /// true page boundary is tracked.
    pub page: usize,
}

impl Chunk {
    /// Create a chunk with provenance derived from `doc_id` and `chunk_index`.
    ///
    /// The embedding starts empty; `page` is approximated as `chunk_index + 1`.
    pub fn new(doc_id: impl Into<String>, chunk_index: usize, text: impl Into<String>) -> Self {
        let doc_id = doc_id.into();
        Self {
            id: format!("{doc_id}_{chunk_index}"),
            text: text.into(),
            embedding: Vec::new(),
            doc_id,
            chunk_index,
            page: chunk_index + 1,
        }
    }
}

/// A retrieved [`Chunk`] paired with a relevance score.
///
/// A transient, read-only view produced by retrieval; not separately owned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}
