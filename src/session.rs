//! One search session over a fixed set of chunks.
//!
//! The session embeds the corpus the first time a query comes in and keeps
//! the vectors in memory for later queries (nothing is written to disk). A
//! batch that produced no embeddings at all is not kept, so the next query
//! tries again: the usual cause is a backend that was not running yet.

use crate::batch::embed_corpus;
use crate::embedding::EmbeddingProvider;
use crate::error::SearchError;
use crate::models::{Chunk, EmbeddedChunk, SearchResult};
use crate::progress::EmbedProgressReporter;
use crate::search;

/// Knobs passed into the session instead of being read from globals.
pub struct SessionSettings {
    pub concurrency: usize,
    pub progress: Box<dyn EmbedProgressReporter>,
}

pub struct SearchSession<'a> {
    provider: Box<dyn EmbeddingProvider>,
    chunks: &'a [Chunk],
    settings: SessionSettings,
    embedded: Option<Vec<EmbeddedChunk<'a>>>,
}

impl<'a> SearchSession<'a> {
    pub fn new(
        provider: Box<dyn EmbeddingProvider>,
        chunks: &'a [Chunk],
        settings: SessionSettings,
    ) -> Self {
        Self {
            provider,
            chunks,
            settings,
            embedded: None,
        }
    }

    pub fn chunks(&self) -> &'a [Chunk] {
        self.chunks
    }

    /// Number of chunks with an embedding, once the corpus has been embedded.
    pub fn embedded_count(&self) -> Option<usize> {
        self.embedded.as_ref().map(Vec::len)
    }

    /// Embed the corpus if that has not succeeded yet. Returns the number of
    /// chunks that have an embedding.
    pub async fn ensure_embedded(&mut self) -> Result<usize, SearchError> {
        if self.embedded.is_none() {
            let outcome = embed_corpus(
                self.provider.as_ref(),
                self.chunks,
                self.settings.concurrency,
                self.settings.progress.as_ref(),
            )
            .await?;
            self.embedded = Some(outcome.embedded);
        }

        Ok(self.embedded.as_ref().map_or(0, Vec::len))
    }

    /// Run one query: embed the corpus if needed, embed the query, rank.
    pub async fn search(
        &mut self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult<'a>>, SearchError> {
        self.ensure_embedded().await?;
        let embedded = self.embedded.as_deref().unwrap_or_default();
        search::search(self.provider.as_ref(), embedded, query, top_k).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmbeddingError;
    use crate::progress::NoProgress;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Maps text to a 2-d vector by keyword; can be switched offline.
    struct KeywordProvider {
        online: Arc<AtomicBool>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl EmbeddingProvider for KeywordProvider {
        fn model_name(&self) -> &str {
            "keyword"
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.online.load(Ordering::SeqCst) {
                return Err(EmbeddingError::Request("connection refused".to_string()));
            }
            if text.contains("rust") {
                Ok(vec![1.0, 0.0])
            } else {
                Ok(vec![0.0, 1.0])
            }
        }
    }

    fn corpus() -> Vec<Chunk> {
        vec![
            Chunk {
                file_path: PathBuf::from("notes/python.md"),
                start_line: 1,
                end_line: 2,
                text: "python notes\n".to_string(),
            },
            Chunk {
                file_path: PathBuf::from("notes/rust.md"),
                start_line: 1,
                end_line: 2,
                text: "rust notes\n".to_string(),
            },
        ]
    }

    fn session<'a>(
        chunks: &'a [Chunk],
        online: bool,
    ) -> (SearchSession<'a>, Arc<AtomicBool>, Arc<AtomicUsize>) {
        let online = Arc::new(AtomicBool::new(online));
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = KeywordProvider {
            online: online.clone(),
            calls: calls.clone(),
        };
        let settings = SessionSettings {
            concurrency: 1,
            progress: Box::new(NoProgress),
        };
        (
            SearchSession::new(Box::new(provider), chunks, settings),
            online,
            calls,
        )
    }

    #[tokio::test]
    async fn search_ranks_matching_chunk_first() {
        let chunks = corpus();
        let (mut session, _, _) = session(&chunks, true);

        let results = session.search("rust ownership", 1).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.file_path, PathBuf::from("notes/rust.md"));
        assert!((results[0].score - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn corpus_is_embedded_once_per_session() {
        let chunks = corpus();
        let (mut session, _, calls) = session(&chunks, true);

        session.search("rust", 5).await.unwrap();
        session.search("python", 5).await.unwrap();

        // Two chunks once, plus one call per query.
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(session.embedded_count(), Some(2));
    }

    #[tokio::test]
    async fn backend_down_reports_no_embeddings_then_recovers() {
        let chunks = corpus();
        let (mut session, online, _) = session(&chunks, false);

        let err = session.search("rust", 5).await.unwrap_err();
        assert!(matches!(err, SearchError::NoEmbeddingsProduced { total: 2 }));
        assert_eq!(session.embedded_count(), None);

        online.store(true, Ordering::SeqCst);
        let results = session.search("rust", 5).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn query_failure_is_reported_distinctly() {
        let chunks = corpus();
        let (mut session, online, _) = session(&chunks, true);

        session.ensure_embedded().await.unwrap();
        online.store(false, Ordering::SeqCst);

        let err = session.search("rust", 5).await.unwrap_err();
        assert!(matches!(err, SearchError::QueryEmbedding(_)));
    }
}
