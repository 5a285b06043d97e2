//! Directory scanning for artifact candidates.

use std::path::{Path, PathBuf};

use arx_schema::Version;
use tracing::trace;
use walkdir::WalkDir;

use crate::pattern::NamingPattern;
use crate::resolve::ResolveError;

/// A repository file whose name matched the artifact pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Path of the matched file.
    pub path: PathBuf,
    /// Version extracted from the file name.
    pub version: Version,
}

/// Walk `root` recursively and collect every file the pattern recognizes.
///
/// Entries are visited in file-name order so repeated runs over the same
/// tree produce candidates in the same sequence. Hidden entries are skipped
/// and hidden directories are not descended into. Files the pattern does
/// not recognize are passed over silently.
pub fn scan_tree(root: &Path, pattern: &NamingPattern) -> Result<Vec<Candidate>, ResolveError> {
    if !root.is_dir() {
        return Err(ResolveError::RepositoryNotFound(root.to_path_buf()));
    }

    let mut found = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    for entry in walker.flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if let Some(version) = pattern.match_file(&name) {
            trace!(file = %name, version = %version, "candidate");
            found.push(Candidate {
                path: entry.into_path(),
                version,
            });
        }
    }

    Ok(found)
}

/// List the visible files directly inside `dir`, sorted by name.
///
/// The flat-directory strategies never recurse; subdirectories and hidden
/// entries are ignored.
pub fn list_flat(dir: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    if !dir.is_dir() {
        return Err(ResolveError::RepositoryNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)?.flatten() {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
