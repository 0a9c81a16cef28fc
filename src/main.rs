//! # semantic-grep CLI (`semgrep`)
//!
//! Scans a directory, embeds its text in line chunks with a local Ollama
//! model, and prints the chunks closest in meaning to a query.
//!
//! ## Usage
//!
//! ```bash
//! semgrep [QUERY] [--dir DIR] [--results N] [--config FILE]
//! ```
//!
//! ## Examples
//!
//! ```bash
//! # One-shot search in the current directory
//! semgrep "how are database migrations applied"
//!
//! # Interactive prompt over a notes folder, 5 results per query
//! semgrep --dir ~/notes -n 5
//!
//! # Machine-readable output with a different embedding model
//! semgrep "retry policy" --model nomic-embed-text --json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use semantic_grep::config::{self, Config};
use semantic_grep::connector_fs;
use semantic_grep::embedding;
use semantic_grep::error::SearchError;
use semantic_grep::output;
use semantic_grep::progress::ProgressMode;
use semantic_grep::session::{SearchSession, SessionSettings};

/// Semantic grep: local natural-language search over text files.
///
/// Without a query, an interactive prompt is started; enter an empty line,
/// `quit`, `exit` or `q` to leave.
#[derive(Parser)]
#[command(
    name = "semgrep",
    about = "Semantic grep: local natural-language search over text files",
    version
)]
struct Cli {
    /// Natural language search query. Omit to start an interactive prompt.
    query: Option<String>,

    /// Root folder to scan.
    #[arg(short = 'd', long = "dir", default_value = ".")]
    dir: PathBuf,

    /// Number of results to show (defaults to `retrieval.final_limit`, 10).
    #[arg(short = 'n', long = "results")]
    results: Option<usize>,

    /// Path to a configuration file (TOML). Built-in defaults apply without one.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Embedding model name, overriding `embedding.model`.
    #[arg(long)]
    model: Option<String>,

    /// Embedding backend base URL, overriding `embedding.url`.
    #[arg(long)]
    url: Option<String>,

    /// Number of embedding requests in flight, overriding `embedding.concurrency`.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Print results as JSON on stdout; status lines go to stderr.
    #[arg(long)]
    json: bool,

    /// Embedding progress on stderr. Defaults to `human` on a TTY, `off` otherwise.
    #[arg(long, value_enum)]
    progress: Option<ProgressMode>,
}

impl Cli {
    fn resolve_config(&self) -> Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => config::load_config(path)?,
            None => Config::default(),
        };

        if let Some(model) = &self.model {
            cfg.embedding.model = model.clone();
        }
        if let Some(url) = &self.url {
            cfg.embedding.url = url.clone();
        }
        if let Some(concurrency) = self.concurrency {
            cfg.embedding.concurrency = concurrency;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

/// Status lines go to stdout, or to stderr when stdout carries JSON.
fn status(json: bool, line: &str) {
    if json {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // SEMGREP_LOG=debug semgrep "query"
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SEMGREP_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = cli.resolve_config()?;

    let root = cli
        .dir
        .canonicalize()
        .with_context(|| format!("Search root does not exist: {}", cli.dir.display()))?;

    status(cli.json, &format!("Scanning: {}", root.display()));
    let chunks = connector_fs::build_index(&cfg.scan, &root)?;

    let file_count = chunks
        .iter()
        .map(|c| &c.file_path)
        .collect::<HashSet<_>>()
        .len();
    status(cli.json, &format!("Files scanned: {}", file_count));
    status(cli.json, &format!("Chunks built: {}", chunks.len()));

    if chunks.is_empty() {
        status(cli.json, "No files found to index.");
        return Ok(ExitCode::SUCCESS);
    }

    let provider = embedding::create_provider(&cfg.embedding)?;
    let progress = cli.progress.unwrap_or_else(ProgressMode::default_for_tty);
    let settings = SessionSettings {
        concurrency: cfg.embedding.concurrency,
        progress: progress.reporter(),
    };
    let mut session = SearchSession::new(provider, &chunks, settings);
    let top_k = cli.results.unwrap_or(cfg.retrieval.final_limit);

    match &cli.query {
        Some(query) => {
            if run_query(&mut session, query, top_k, cli.json).await? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        None => run_interactive(&mut session, top_k, cli.json).await,
    }
}

/// Prompt for queries until EOF, Ctrl-C, an empty line, or `quit`/`exit`/`q`.
///
/// Ctrl-C while a query is running cancels it and ends the session with
/// exit code 130.
async fn run_interactive(
    session: &mut SearchSession<'_>,
    top_k: usize,
    json: bool,
) -> Result<ExitCode> {
    status(json, "\nNo query provided. Enter a query (or 'quit' to exit):\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt(json)?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };

        let Some(line) = line else {
            status(json, "\nBye.");
            return Ok(ExitCode::SUCCESS);
        };

        let query = line.trim();
        if query.is_empty() || matches!(query.to_lowercase().as_str(), "quit" | "exit" | "q") {
            status(json, "Bye.");
            return Ok(ExitCode::SUCCESS);
        }

        // Once ctrl_c() has been polled the default SIGINT handler is gone,
        // so a running query has to listen for it too.
        tokio::select! {
            result = run_query(session, query, top_k, json) => {
                // Failures are reported inside run_query; keep prompting.
                result?;
            }
            _ = tokio::signal::ctrl_c() => {
                status(json, "\nInterrupted.");
                return Ok(ExitCode::from(130));
            }
        }
    }
}

fn prompt(json: bool) -> Result<()> {
    if json {
        eprint!("semgrep> ");
        std::io::stderr().flush()?;
    } else {
        print!("semgrep> ");
        std::io::stdout().flush()?;
    }
    Ok(())
}

/// Run one search and print its outcome. Returns `false` if the search could
/// not run (no embeddings, or the query could not be embedded).
async fn run_query(
    session: &mut SearchSession<'_>,
    query: &str,
    top_k: usize,
    json: bool,
) -> Result<bool> {
    let total = session.chunks().len();

    if session.embedded_count().is_none() {
        status(json, &format!("\nEmbedding {} chunks...", total));
        if let Err(e) = session.ensure_embedded().await {
            report_failure(&e, total, json);
            return Ok(false);
        }
    }

    status(json, &format!("Searching for: \"{}\"\n", query));

    match session.search(query, top_k).await {
        Ok(results) => {
            if json {
                println!("{}", output::format_results_json(&results)?);
            } else {
                println!("{}", output::format_results(&results));
            }
            Ok(true)
        }
        Err(e) => {
            report_failure(&e, total, json);
            Ok(false)
        }
    }
}

fn report_failure(err: &SearchError, total: usize, json: bool) {
    tracing::debug!(error = %err, chunks = total, "search failed");
    match err {
        SearchError::NoEmbeddingsProduced { .. } => {
            status(json, "Failed to generate embeddings. Is Ollama running?");
        }
        SearchError::QueryEmbedding(_) => {
            status(json, "Failed to embed query.");
        }
    }
}
