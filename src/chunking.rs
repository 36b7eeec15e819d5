//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`RecursiveChunker`], which
//! splits extracted text on a priority list of natural boundaries (paragraph
//! breaks, line breaks, sentence-ending punctuation, whitespace) before
//! falling back to character-level splitting.

use crate::document::Chunk;

/// Separators tried in priority order before character-level splitting.
const SEPARATORS: [&str; 6] = ["\n\n", "\n", ". ", "! ", "? ", " "];

/// A strategy for splitting extracted document text into chunks.
///
/// Implementations produce [`Chunk`]s with text and provenance but no
/// embeddings. Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document's extracted text into chunks.
    ///
    /// Returns an empty `Vec` for empty or all-whitespace input. Chunks are
    /// produced in document order with `chunk_index` assigned sequentially
    /// from 0; no chunk is empty.
    fn chunk(&self, doc_id: &str, text: &str) -> Vec<Chunk>;
}

/// Splits text hierarchically on [`SEPARATORS`], keeping each chunk at or
/// below `chunk_size` while preferring natural boundaries.
///
/// Consecutive chunks from the same document overlap: each chunk after the
/// first is prefixed with up to `chunk_overlap` trailing characters of the
/// previous chunk's content, so context is not lost at chunk boundaries.
/// With `chunk_overlap` of zero, concatenating the chunks in index order
/// reconstructs the input exactly.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` — maximum number of bytes per chunk (overlap included)
    /// * `chunk_overlap` — number of overlapping bytes between consecutive
    ///   chunks; must be less than `chunk_size`
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, doc_id: &str, text: &str) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        // Split into an exact partition sized so that prepending the overlap
        // still keeps every chunk within chunk_size.
        let budget = self.chunk_size.saturating_sub(self.chunk_overlap).max(1);
        let pieces = split_and_merge(text, budget, &SEPARATORS);

        let mut chunks = Vec::with_capacity(pieces.len());
        for (i, piece) in pieces.iter().enumerate() {
            let chunk_text = if i == 0 {
                piece.clone()
            } else {
                format!("{}{piece}", tail(&pieces[i - 1], self.chunk_overlap))
            };
            chunks.push(Chunk::new(doc_id, i, chunk_text));
        }

        chunks
    }
}

/// Split text by the first separator, then merge segments into pieces that
/// respect `max_size`. Oversized segments are split further using the
/// next-level separator. The returned pieces are an exact, in-order
/// partition of `text`.
fn split_and_merge(text: &str, max_size: usize, separators: &[&str]) -> Vec<String> {
    if text.len() <= max_size {
        return vec![text.to_string()];
    }
    let Some((separator, remaining)) = separators.split_first() else {
        return split_by_size(text, max_size);
    };

    let segments = split_keeping_separator(text, separator);
    if segments.len() <= 1 {
        // Separator absent — try the next one
        return split_and_merge(text, max_size, remaining);
    }

    let mut pieces = Vec::new();
    let mut current = String::new();

    for segment in segments {
        if current.is_empty() {
            current = segment.to_string();
        } else if current.len() + segment.len() <= max_size {
            current.push_str(segment);
        } else {
            flush(current, max_size, remaining, &mut pieces);
            current = segment.to_string();
        }
    }
    if !current.is_empty() {
        flush(current, max_size, remaining, &mut pieces);
    }

    pieces
}

/// Push a merged piece, splitting it with the remaining separators if it
/// still exceeds `max_size`.
fn flush(piece: String, max_size: usize, separators: &[&str], pieces: &mut Vec<String>) {
    if piece.len() > max_size {
        pieces.extend(split_and_merge(&piece, max_size, separators));
    } else {
        pieces.push(piece);
    }
}

/// Split text at a separator while keeping the separator attached to the
/// preceding segment, so that concatenating the segments yields `text`.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Character-boundary-safe splitting into pieces of at most `max_size` bytes.
fn split_by_size(text: &str, max_size: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_size).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        if end == start {
            // A single character wider than max_size — emit it whole
            end = start
                + text[start..].chars().next().map(char::len_utf8).unwrap_or(text.len() - start);
        }
        pieces.push(text[start..end].to_string());
        start = end;
    }

    pieces
}

/// The trailing `overlap` bytes of `s`, adjusted forward to a character
/// boundary.
fn tail(s: &str, overlap: usize) -> &str {
    if overlap == 0 {
        return "";
    }
    let mut start = s.len().saturating_sub(overlap);
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}
