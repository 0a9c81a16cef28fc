//! Batch embedding with per-item failure tolerance.
//!
//! [`embed_many`] runs the provider over every chunk exactly once. A chunk
//! whose embedding fails is dropped from the output and the batch carries
//! on; there is no retry and no early abort. The caller gets the successes
//! (in input order) together with the number of chunks attempted, so it can
//! tell a degraded run from a healthy one.
//!
//! Requests are issued through [`futures::StreamExt::buffered`]: with
//! `concurrency = 1` this is the plain sequential loop, with more it keeps up
//! to `concurrency` requests in flight while still yielding results in input
//! order.

use futures::stream::{self, StreamExt};
use tracing::info;

use crate::embedding::EmbeddingProvider;
use crate::error::SearchError;
use crate::models::{BatchOutcome, Chunk, EmbeddedChunk};
use crate::progress::{should_report, EmbedProgressEvent, EmbedProgressReporter};

/// Embed every chunk, skipping the ones the provider fails on.
///
/// Postcondition: `outcome.total == chunks.len()` and
/// `outcome.successes() <= outcome.total`.
pub async fn embed_many<'a>(
    provider: &dyn EmbeddingProvider,
    chunks: &'a [Chunk],
    concurrency: usize,
    progress: &dyn EmbedProgressReporter,
) -> BatchOutcome<'a> {
    let total = chunks.len();
    let mut embedded = Vec::with_capacity(total);

    let mut results = stream::iter(chunks.iter().enumerate())
        .map(|(index, chunk)| async move {
            if should_report(index) {
                progress.report(EmbedProgressEvent::Embedding {
                    n: (index + 1) as u64,
                    total: total as u64,
                });
            }
            (chunk, provider.embed(&chunk.text).await)
        })
        .buffered(concurrency.max(1));

    while let Some((chunk, result)) = results.next().await {
        // The provider has already logged the cause.
        if let Ok(embedding) = result {
            embedded.push(EmbeddedChunk { chunk, embedding });
        }
    }

    progress.report(EmbedProgressEvent::Finished {
        embedded: embedded.len() as u64,
        total: total as u64,
    });
    info!(
        model = provider.model_name(),
        embedded = embedded.len(),
        total,
        "batch embedding finished"
    );

    BatchOutcome { embedded, total }
}

/// Embed a search query.
///
/// A failure here is reported as [`SearchError::QueryEmbedding`], never as an
/// empty result.
pub async fn embed_query(
    provider: &dyn EmbeddingProvider,
    query: &str,
) -> Result<Vec<f32>, SearchError> {
    provider
        .embed(query)
        .await
        .map_err(SearchError::QueryEmbedding)
}

/// Like [`embed_many`], but turns a batch with zero successes into
/// [`SearchError::NoEmbeddingsProduced`].
pub async fn embed_corpus<'a>(
    provider: &dyn EmbeddingProvider,
    chunks: &'a [Chunk],
    concurrency: usize,
    progress: &dyn EmbedProgressReporter,
) -> Result<BatchOutcome<'a>, SearchError> {
    let outcome = embed_many(provider, chunks, concurrency, progress).await;
    if outcome.is_empty() {
        return Err(SearchError::NoEmbeddingsProduced {
            total: outcome.total,
        });
    }
    Ok(outcome)
}
