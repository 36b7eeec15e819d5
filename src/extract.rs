//! Text extraction from uploaded document bytes.
//!
//! Extraction internals (PDF parsing, OCR) are external capabilities; this
//! module defines the [`TextExtractor`] seam and [`MediaExtractor`], which
//! dispatches on media type. PDF support is available behind the `pdf`
//! feature; OCR for raster images belongs behind this same seam and is left
//! to custom implementations.

use async_trait::async_trait;

use crate::error::{DocQaError, Result};

/// Extracts plain text from a document's raw bytes.
///
/// A failure is recoverable at the pipeline level: the affected document is
/// skipped with a warning rather than aborting ingestion.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the full plain text of a document.
    async fn extract(&self, doc_id: &str, bytes: &[u8], media_type: &str) -> Result<String>;
}

/// A [`TextExtractor`] that dispatches on the document's media type.
///
/// Handles `text/plain` and `text/markdown` as UTF-8, and `application/pdf`
/// when the `pdf` feature is enabled. Any other media type is an extraction
/// error, which the pipeline consumes as "skip this document".
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaExtractor;

impl MediaExtractor {
    /// Create a new media-type-dispatching extractor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for MediaExtractor {
    async fn extract(&self, doc_id: &str, bytes: &[u8], media_type: &str) -> Result<String> {
        match media_type {
            "text/plain" | "text/markdown" => Ok(String::from_utf8_lossy(bytes).into_owned()),
            #[cfg(feature = "pdf")]
            "application/pdf" => {
                pdf_extract::extract_text_from_mem(bytes).map_err(|e| DocQaError::Extraction {
                    doc_id: doc_id.to_string(),
                    message: format!("PDF extraction failed: {e}"),
                })
            }
            other => Err(DocQaError::Extraction {
                doc_id: doc_id.to_string(),
                message: format!("unsupported media type '{other}'"),
            }),
        }
    }
}
