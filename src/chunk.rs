//! Fixed-size line chunker.
//!
//! Splits file content into [`Chunk`]s of `chunk_lines` lines each (the last
//! one may be shorter). Line numbers are 1-based and inclusive, and every
//! line keeps its terminator, so concatenating the chunks of a file gives
//! back its content exactly.

use std::path::Path;
use tracing::debug;

use crate::config::ScanConfig;
use crate::models::Chunk;

/// Split `content` into chunks of at most `chunk_lines` lines.
///
/// Returns no chunks for empty content. A `chunk_lines` of zero is treated
/// as one line per chunk.
pub fn chunk_lines(path: &Path, content: &str, chunk_lines: usize) -> Vec<Chunk> {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let step = chunk_lines.max(1);

    lines
        .chunks(step)
        .enumerate()
        .map(|(i, group)| {
            let start_line = i * step + 1;
            Chunk {
                file_path: path.to_path_buf(),
                start_line,
                end_line: start_line + group.len() - 1,
                text: group.concat(),
            }
        })
        .collect()
}

/// Read a file and split it into line chunks.
///
/// Files larger than `max_file_bytes` and files that cannot be read yield no
/// chunks. Invalid UTF-8 is decoded lossily.
pub fn chunk_file(path: &Path, config: &ScanConfig) -> Vec<Chunk> {
    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "skipping unreadable file");
            return Vec::new();
        }
    };

    if size > config.max_file_bytes {
        debug!(path = %path.display(), size, "skipping oversized file");
        return Vec::new();
    }

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "skipping unreadable file");
            return Vec::new();
        }
    };

    let content = String::from_utf8_lossy(&bytes);
    chunk_lines(path, &content, config.chunk_lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn numbered_lines(n: usize) -> String {
        (1..=n).map(|i| format!("line {}\n", i)).collect()
    }

    #[test]
    fn test_empty_content_no_chunks() {
        assert!(chunk_lines(Path::new("a.txt"), "", 40).is_empty());
    }

    #[test]
    fn test_small_file_single_chunk() {
        let chunks = chunk_lines(Path::new("a.txt"), "alpha\nbeta\n", 40);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[0].end_line, 2);
        assert_eq!(chunks[0].text, "alpha\nbeta\n");
    }

    #[test]
    fn test_line_bounds_are_one_based_inclusive() {
        let chunks = chunk_lines(Path::new("a.txt"), &numbered_lines(95), 40);
        let bounds: Vec<(usize, usize)> = chunks.iter().map(|c| (c.start_line, c.end_line)).collect();
        assert_eq!(bounds, vec![(1, 40), (41, 80), (81, 95)]);
        assert!(chunks[1].text.starts_with("line 41\n"));
        assert!(chunks[2].text.ends_with("line 95\n"));
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_chunk() {
        let chunks = chunk_lines(Path::new("a.txt"), &numbered_lines(80), 40);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].end_line, 80);
    }

    #[test]
    fn test_chunks_reassemble_content() {
        let content = "no trailing newline\nsecond\r\nthird";
        let chunks = chunk_lines(Path::new("a.txt"), content, 2);
        assert_eq!(chunks.len(), 2);
        let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(joined, content);
        assert_eq!((chunks[1].start_line, chunks[1].end_line), (3, 3));
    }

    #[test]
    fn test_chunk_text_never_empty() {
        let chunks = chunk_lines(Path::new("a.txt"), "\n\n\n", 1);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| !c.text.is_empty()));
    }

    #[test]
    fn test_chunk_file_skips_oversized() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("big.txt");
        fs::write(&path, numbered_lines(100)).unwrap();

        let config = ScanConfig {
            max_file_bytes: 10,
            ..Default::default()
        };
        assert!(chunk_file(&path, &config).is_empty());

        let config = ScanConfig::default();
        assert_eq!(chunk_file(&path, &config).len(), 3);
    }

    #[test]
    fn test_chunk_file_missing_file() {
        let config = ScanConfig::default();
        assert!(chunk_file(Path::new("/nonexistent/file.txt"), &config).is_empty());
    }

    #[test]
    fn test_chunk_file_lossy_utf8() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bin.txt");
        fs::write(&path, b"ok line\n\xff\xfe broken\n").unwrap();

        let chunks = chunk_file(&path, &ScanConfig::default());
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].text.starts_with("ok line\n"));
        assert_eq!(chunks[0].end_line, 2);
    }
}
