use anyhow::{bail, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::chunk::chunk_file;
use crate::config::ScanConfig;
use crate::models::Chunk;

/// Walk `root` and return the files that should be indexed, sorted by path.
pub fn scan_files(config: &ScanConfig, root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        bail!("Search root does not exist: {}", root.display());
    }

    let exclude_set = build_globset(&config.exclude_globs)?;

    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(config.follow_symlinks)
        .into_iter()
        .filter_entry(|entry| !is_ignored_dir(entry, config));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !has_allowed_extension(path, config) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if exclude_set.is_match(relative) {
            continue;
        }

        files.push(path.to_path_buf());
    }

    // Sort for deterministic ordering
    files.sort();

    Ok(files)
}

/// Scan `root` and chunk every matching file.
pub fn build_index(config: &ScanConfig, root: &Path) -> Result<Vec<Chunk>> {
    let files = scan_files(config, root)?;
    Ok(files
        .iter()
        .flat_map(|path| chunk_file(path, config))
        .collect())
}

fn is_ignored_dir(entry: &DirEntry, config: &ScanConfig) -> bool {
    // The root itself is never pruned, even if its name matches.
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    config.ignore_dirs.iter().any(|d| d == name.as_ref())
}

fn has_allowed_extension(path: &Path, config: &ScanConfig) -> bool {
    match path.extension() {
        Some(ext) => {
            let dotted = format!(".{}", ext.to_string_lossy());
            config.extensions.iter().any(|e| *e == dotted)
        }
        None => false,
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
