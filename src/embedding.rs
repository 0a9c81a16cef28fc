//! Embedding provider abstraction and the Ollama implementation.
//!
//! Defines the [`EmbeddingProvider`] trait and its concrete backend:
//! - **[`OllamaProvider`]**: calls a local Ollama instance's `/api/embeddings` endpoint.
//!
//! Also provides [`cosine_similarity`], the scoring function used by the ranker.
//!
//! # Provider Selection
//!
//! Use [`create_provider`] to instantiate the provider named in the
//! configuration:
//!
//! ```rust,no_run
//! # use semantic_grep::config::EmbeddingConfig;
//! # use semantic_grep::embedding::create_provider;
//! let config = EmbeddingConfig::default(); // provider = "ollama", model = "llama3.2"
//! let provider = create_provider(&config).unwrap();
//! assert_eq!(provider.model_name(), "llama3.2");
//! ```
//!
//! # Failure Model
//!
//! One call, one request, one timeout, no retry. Connection errors, non-2xx
//! statuses and malformed bodies all surface as an [`EmbeddingError`]; the
//! provider logs the cause and hands the error back so batch callers can
//! skip the item and keep going.

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::EmbeddingConfig;
use crate::error::EmbeddingError;

/// Trait for embedding providers.
///
/// An implementation maps one text to one vector. The returned vector is
/// passed through uninterpreted: no normalization and no dimension check.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Returns the model identifier (e.g. `"llama3.2"`).
    fn model_name(&self) -> &str;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError>;
}

// ============ Ollama Provider ============

/// Embedding provider using a local Ollama instance.
///
/// Calls `POST {url}/api/embeddings` with `{"model": ..., "prompt": ...}` and
/// reads the vector from the `embedding` field of the response. Requires
/// Ollama to be running with the configured model pulled.
pub struct OllamaProvider {
    model: String,
    url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Option<Vec<f32>>,
}

impl OllamaProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            model: config.model.clone(),
            url: config.url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Full URL of the embeddings endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/api/embeddings", self.url)
    }

    async fn request(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": text,
        });

        debug!(endpoint = %self.endpoint(), chars = text.len(), "embedding request");

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Status {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let body_text = response.text().await?;
        parse_ollama_response(&body_text)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
        let result = self.request(text).await;
        if let Err(ref e) = result {
            warn!(model = %self.model, url = %self.url, error = %e, "embedding failed");
        }
        result
    }
}

fn parse_ollama_response(body: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
    let parsed: OllamaEmbeddingResponse = serde_json::from_str(body)
        .map_err(|e| EmbeddingError::MalformedResponse(e.to_string()))?;

    parsed.embedding.ok_or_else(|| {
        EmbeddingError::MalformedResponse("missing `embedding` field".to_string())
    })
}

/// Create the appropriate [`EmbeddingProvider`] based on configuration.
///
/// # Supported Providers
///
/// | Config Value | Provider |
/// |-------------|----------|
/// | `"ollama"` | [`OllamaProvider`] |
///
/// # Errors
///
/// Returns an error for unknown provider names or if the HTTP client cannot
/// be built.
pub fn create_provider(config: &EmbeddingConfig) -> Result<Box<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "ollama" => Ok(Box::new(OllamaProvider::new(config)?)),
        other => bail!("Unknown embedding provider: {}", other),
    }
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`:
/// - `1.0` = identical direction
/// - `0.0` = orthogonal (unrelated)
/// - `-1.0` = opposite direction
///
/// Returns exactly `0.0` when the lengths differ, when either vector has
/// a zero norm (this covers empty vectors too), or when the result is not
/// finite (a component overflowed to infinity or was NaN). Accumulation is
/// done in `f64`; the result is not clamped.
///
/// # Formula
///
/// ```text
///            a · b
/// cos(θ) = ─────────
///          ‖a‖ × ‖b‖
/// ```
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let (norm_a, norm_b) = (norm_a.sqrt(), norm_b.sqrt());
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let sim = dot / (norm_a * norm_b);
    if sim.is_finite() {
        sim
    } else {
        0.0
    }
}
