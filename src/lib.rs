//! # semantic-grep
//!
//! Local natural-language search over a directory of text files.
//!
//! Files are split into fixed-size line chunks, every chunk and the query are
//! embedded by a local embedding model (Ollama), and chunks are ranked by
//! cosine similarity to the query.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌──────────────┐   ┌──────────┐
//! │  Scanner +  │──▶│   Batch     │──▶│  Similarity  │──▶│ Presenter│
//! │  Chunker    │   │  Embedder   │   │   Ranker     │   │ (CLI)    │
//! └─────────────┘   └──────┬──────┘   └──────▲───────┘   └──────────┘
//!                          │                 │
//!                          ▼                 │ query vector
//!                    ┌───────────┐           │
//!                    │  Ollama   │───────────┘
//!                    └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! semgrep "where do we retry failed uploads" --dir ./docs
//! semgrep --dir ./notes            # interactive prompt
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`connector_fs`] | Directory walk and file filtering |
//! | [`chunk`] | Fixed-size line chunking |
//! | [`embedding`] | Embedding provider abstraction and cosine similarity |
//! | [`batch`] | Failure-tolerant batch embedding |
//! | [`search`] | Similarity ranking |
//! | [`session`] | Search flow over one corpus |
//! | [`output`] | Result rendering |
//! | [`progress`] | Embedding progress reporting |
//! | [`error`] | Typed pipeline errors |

pub mod batch;
pub mod chunk;
pub mod config;
pub mod connector_fs;
pub mod embedding;
pub mod error;
pub mod models;
pub mod output;
pub mod progress;
pub mod search;
pub mod session;
