//! Typed failures of the embedding-and-ranking pipeline.
//!
//! Two layers:
//! - [`EmbeddingError`]: one text could not be embedded. The batch embedder
//!   recovers from it locally (the chunk is dropped); it only reaches the
//!   user when it is the query that failed.
//! - [`SearchError`]: the two conditions that stop a search:
//!   query-embedding failure and a batch with zero successful embeddings.
//!
//! Dimension mismatches and all-zero vectors are not errors: they score
//! exactly `0.0` (see [`crate::embedding::cosine_similarity`]).

use thiserror::Error;

/// A single text could not be embedded.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Connection failure, DNS failure, or request timeout.
    #[error("embedding request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success HTTP status.
    #[error("embedding backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not JSON or had no numeric `embedding` array.
    #[error("malformed embedding response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            EmbeddingError::MalformedResponse(err.to_string())
        } else {
            EmbeddingError::Request(err.to_string())
        }
    }
}

/// A search invocation could not produce results.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query text itself could not be embedded.
    #[error("could not embed the query: {0}")]
    QueryEmbedding(#[source] EmbeddingError),

    /// Every chunk of the batch failed to embed.
    #[error("no embeddings produced for {total} chunks; is the embedding backend reachable?")]
    NoEmbeddingsProduced { total: usize },
}
