//! TOML configuration.
//!
//! Every table and every field has a default, so an empty file (or no file
//! at all, see [`Config::default`]) is a valid configuration:
//!
//! ```toml
//! [embedding]
//! provider = "ollama"
//! model = "llama3.2"
//! url = "http://localhost:11434"
//! timeout_secs = 30
//! concurrency = 1
//!
//! [scan]
//! extensions = [".txt", ".md", ".py", ".java", ".sql", ".json"]
//! ignore_dirs = [".git", "__pycache__", "node_modules", ".idea", ".vscode"]
//! exclude_globs = []
//! max_file_bytes = 5242880
//! chunk_lines = 40
//! follow_symlinks = false
//!
//! [retrieval]
//! final_limit = 10
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum number of embedding requests in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_provider() -> String {
    "ollama".to_string()
}
fn default_model() -> String {
    "llama3.2".to_string()
}
fn default_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_concurrency() -> usize {
    1
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    /// File extensions to index, with the leading dot (case-sensitive).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Directory names pruned from the walk wherever they appear.
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,
    /// Extra glob patterns, matched against the path relative to the root.
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    #[serde(default = "default_chunk_lines")]
    pub chunk_lines: usize,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            ignore_dirs: default_ignore_dirs(),
            exclude_globs: Vec::new(),
            max_file_bytes: default_max_file_bytes(),
            chunk_lines: default_chunk_lines(),
            follow_symlinks: false,
        }
    }
}

fn default_extensions() -> Vec<String> {
    [".txt", ".md", ".py", ".java", ".sql", ".json"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_ignore_dirs() -> Vec<String> {
    [".git", "__pycache__", "node_modules", ".idea", ".vscode"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_max_file_bytes() -> u64 {
    5 * 1024 * 1024
}
fn default_chunk_lines() -> usize {
    40
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_final_limit")]
    pub final_limit: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            final_limit: default_final_limit(),
        }
    }
}

fn default_final_limit() -> usize {
    10
}

impl Config {
    /// Check the invariants the rest of the pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        if self.scan.chunk_lines == 0 {
            anyhow::bail!("scan.chunk_lines must be > 0");
        }

        if self.retrieval.final_limit < 1 {
            anyhow::bail!("retrieval.final_limit must be >= 1");
        }

        if self.embedding.concurrency < 1 {
            anyhow::bail!("embedding.concurrency must be >= 1");
        }

        if self.embedding.timeout_secs == 0 {
            anyhow::bail!("embedding.timeout_secs must be > 0");
        }

        if self.embedding.model.trim().is_empty() {
            anyhow::bail!("embedding.model must not be empty");
        }

        match self.embedding.provider.as_str() {
            "ollama" => {}
            other => anyhow::bail!(
                "Unknown embedding provider: '{}'. Must be ollama.",
                other
            ),
        }

        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;
    config.validate()?;
    Ok(config)
}
