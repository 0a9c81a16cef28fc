//! Similarity ranking.
//!
//! The ranker is a pure full scan: every embedded chunk is scored against
//! the query with [`cosine_similarity`], the scores are sorted in descending
//! order, and the list is cut to `top_k`. There is no index; at local-corpus
//! sizes (thousands of chunks) a linear pass is fast enough.
//!
//! # Ordering
//!
//! Sorting uses `f64::total_cmp` with a stable sort, so chunks with equal
//! scores keep the order they had in the embedded sequence.

use crate::batch::embed_query;
use crate::embedding::{cosine_similarity, EmbeddingProvider};
use crate::error::SearchError;
use crate::models::{EmbeddedChunk, SearchResult};

/// Rank embedded chunks by similarity to `query`, best first, at most `top_k`.
///
/// An empty `embedded` slice or `top_k == 0` yields an empty result.
pub fn rank<'a>(
    query: &[f32],
    embedded: &[EmbeddedChunk<'a>],
    top_k: usize,
) -> Vec<SearchResult<'a>> {
    if top_k == 0 || embedded.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<SearchResult<'a>> = embedded
        .iter()
        .map(|ec| SearchResult {
            chunk: ec.chunk,
            score: cosine_similarity(query, &ec.embedding),
        })
        .collect();

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(top_k);

    results
}

/// Embed `query` and rank `embedded` against it.
///
/// If the query cannot be embedded the ranker is not run and
/// [`SearchError::QueryEmbedding`] is returned.
pub async fn search<'a>(
    provider: &dyn EmbeddingProvider,
    embedded: &[EmbeddedChunk<'a>],
    query: &str,
    top_k: usize,
) -> Result<Vec<SearchResult<'a>>, SearchError> {
    let query_vec = embed_query(provider, query).await?;
    Ok(rank(&query_vec, embedded, top_k))
}
