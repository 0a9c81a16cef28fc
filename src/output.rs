//! Rendering of ranked results for a terminal or for scripts.

use anyhow::Result;

use crate::models::SearchResult;

const SEPARATOR_WIDTH: usize = 60;
const PREVIEW_LINES: usize = 5;

/// Human-readable listing: rank, file, line range, 4-decimal score, preview.
pub fn format_results(results: &[SearchResult<'_>]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }

    let separator = "-".repeat(SEPARATOR_WIDTH);
    let mut lines = Vec::new();
    lines.push(format!("Found {} relevant chunks:\n", results.len()));
    lines.push(separator.clone());

    for (i, result) in results.iter().enumerate() {
        let chunk = result.chunk;
        lines.push(format!(
            "\n[{}] {} (lines {}-{}) [score: {:.4}]",
            i + 1,
            chunk.file_path.display(),
            chunk.start_line,
            chunk.end_line,
            result.score
        ));
        lines.push(separator.clone());
        lines.push(preview(&chunk.text));
        lines.push(separator.clone());
    }

    lines.join("\n")
}

/// JSON array of `{chunk: {file_path, start_line, end_line, text}, score}`.
pub fn format_results_json(results: &[SearchResult<'_>]) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// First few lines of a chunk, with `...` when anything was cut.
fn preview(text: &str) -> String {
    let all: Vec<&str> = text.split('\n').collect();
    let mut preview = all
        .iter()
        .take(PREVIEW_LINES)
        .copied()
        .collect::<Vec<_>>()
        .join("\n");
    if all.len() > PREVIEW_LINES {
        preview.push_str("\n...");
    }
    preview
}
