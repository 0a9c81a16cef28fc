//! Core data models used throughout semantic-grep.
//!
//! These types represent the chunks, embeddings, and search results that flow
//! through the scan → embed → rank pipeline. None of them is mutated after
//! construction.

use serde::Serialize;
use std::path::PathBuf;

/// A contiguous, line-numbered slice of one file's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// File the lines were read from.
    pub file_path: PathBuf,
    /// First line (1-based, inclusive).
    pub start_line: usize,
    /// Last line (1-based, inclusive).
    pub end_line: usize,
    /// Literal content of the line range, line terminators included.
    pub text: String,
}

/// A chunk paired with the embedding vector the backend returned for it.
///
/// Only built for chunks whose embedding succeeded.
#[derive(Debug, Clone)]
pub struct EmbeddedChunk<'a> {
    pub chunk: &'a Chunk,
    pub embedding: Vec<f32>,
}

/// A chunk with its similarity to the query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<'a> {
    pub chunk: &'a Chunk,
    /// Cosine similarity, in `[-1.0, 1.0]` (exactly `0.0` for incomparable vectors).
    pub score: f64,
}

/// Output of the batch embedder: the successful embeddings plus the number
/// of chunks that were attempted.
#[derive(Debug, Clone)]
pub struct BatchOutcome<'a> {
    pub embedded: Vec<EmbeddedChunk<'a>>,
    pub total: usize,
}

impl<'a> BatchOutcome<'a> {
    pub fn successes(&self) -> usize {
        self.embedded.len()
    }

    pub fn failures(&self) -> usize {
        self.total - self.embedded.len()
    }

    /// True when nothing could be embedded (including an empty input).
    pub fn is_empty(&self) -> bool {
        self.embedded.is_empty()
    }
}
