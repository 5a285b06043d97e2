//! Winner selection over scanned candidates.
//!
//! Three historical resolution policies share this module: numeric interval
//! selection over a scanned tree, lexicographic prefix matching over a flat
//! directory, and exact-filename lookup (which falls back to the prefix
//! policy). All of them consume their input in the order the caller fixed
//! and keep the first winner on ties.

use std::cmp::Ordering;
use std::path::PathBuf;

use arx_schema::{VersionInterval, compare};
use tracing::debug;

use crate::scan::Candidate;

/// How a dependency token is matched against repository contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Versioned naming pattern plus numeric interval math over a tree.
    RangeNumeric,
    /// Flat directory, filename prefix match, highest filename string wins.
    PrefixLexicographic,
    /// Flat directory, the token (plus extension) names the file outright;
    /// falls back to the prefix policy when the exact file is absent.
    ExactFilename,
}

/// Fold candidates down to the highest version the interval admits.
///
/// Candidates are consumed in the order given; on an exact version tie the
/// earlier candidate keeps the win.
pub fn select_in_range(
    interval: &VersionInterval,
    candidates: Vec<Candidate>,
) -> Option<Candidate> {
    let mut winner: Option<Candidate> = None;
    for candidate in candidates {
        if !interval.admits(&candidate.version) {
            debug!(
                file = %candidate.path.display(),
                version = %candidate.version,
                "out of range"
            );
            continue;
        }
        winner = match winner {
            None => Some(candidate),
            Some(best) => {
                if compare(&candidate.version, &best.version) == Ordering::Greater {
                    Some(candidate)
                } else {
                    Some(best)
                }
            }
        };
    }
    winner
}

/// Flat-directory policy: keep filenames starting with `token` and ending
/// with `.<extension>`, and pick the lexicographically highest filename.
///
/// String order is intentional here ("9" sorts above "10"); callers choose
/// this strategy for repositories whose naming never needs numeric
/// comparison. Ties keep the first file seen.
pub fn select_prefix_lexicographic(
    token: &str,
    extension: &str,
    files: &[PathBuf],
) -> Option<PathBuf> {
    let suffix = format!(".{extension}");
    let mut winner: Option<(&str, &PathBuf)> = None;
    for path in files {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.starts_with(token) || !name.ends_with(&suffix) {
            continue;
        }
        match winner {
            Some((best, _)) if best >= name => {}
            _ => winner = Some((name, path)),
        }
    }
    winner.map(|(_, path)| path.clone())
}
