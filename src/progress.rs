//! Embedding progress reporting.
//!
//! Reports observable progress while the batch embedder works through the
//! corpus so users can see that a slow backend is still making headway.
//! Progress is emitted on **stderr** so stdout stays clean for results.

use std::io::Write;

/// A single progress event from the batch embedder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmbedProgressEvent {
    /// About to embed item `n` (1-based) of `total`.
    Embedding { n: u64, total: u64 },
    /// The batch is done: `embedded` of `total` chunks succeeded.
    Finished { embedded: u64, total: u64 },
}

/// Receives progress events. Implementations write to stderr (human or JSON).
pub trait EmbedProgressReporter: Send + Sync {
    /// Emit a progress event. Called from the batch embedder.
    fn report(&self, event: EmbedProgressEvent);
}

/// Human-friendly progress on stderr: "[embedding] Processing chunk 10/1,234...".
pub struct StderrProgress;

impl EmbedProgressReporter for StderrProgress {
    fn report(&self, event: EmbedProgressEvent) {
        let line = match &event {
            EmbedProgressEvent::Embedding { n, total } => format!(
                "[embedding] Processing chunk {}/{}...\n",
                format_number(*n),
                format_number(*total)
            ),
            EmbedProgressEvent::Finished { embedded, total } => format!(
                "[embedding] Successfully embedded {}/{} chunks.\n",
                format_number(*embedded),
                format_number(*total)
            ),
        };
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl EmbedProgressReporter for JsonProgress {
    fn report(&self, event: EmbedProgressEvent) {
        let obj = match &event {
            EmbedProgressEvent::Embedding { n, total } => serde_json::json!({
                "event": "progress",
                "phase": "embedding",
                "n": n,
                "total": total
            }),
            EmbedProgressEvent::Finished { embedded, total } => serde_json::json!({
                "event": "progress",
                "phase": "finished",
                "embedded": embedded,
                "total": total
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}", line);
            let _ = stderr.flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl EmbedProgressReporter for NoProgress {
    fn report(&self, _event: EmbedProgressEvent) {}
}

/// Whether item `index` (0-based) gets a progress line: the first one, then every 10th.
pub fn should_report(index: usize) -> bool {
    index == 0 || (index + 1) % 10 == 0
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Build a reporter for this mode.
    pub fn reporter(&self) -> Box<dyn EmbedProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
