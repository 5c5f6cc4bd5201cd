//! Integrity classification of filesystem paths.
//!
//! Two cheap predicates decide whether an existing path is worth feeding
//! into the recovery chain. Both trade accuracy for O(1) cost: the
//! degenerate-header check accepts false positives and negatives.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::types::VALIDATION_HEADER_SIZE;

/// Outcome of classifying one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PathClass {
    pub deleted: bool,
    pub corrupted: bool,
}

impl PathClass {
    /// A path is a recovery candidate iff it is deleted or corrupted.
    pub fn is_candidate(&self) -> bool {
        self.deleted || self.corrupted
    }
}

/// True when the path can no longer be treated as a live regular file:
/// it cannot be stat'd, is not a regular file (e.g. a dangling symlink),
/// or exists with zero length.
pub fn is_deleted(path: &Path) -> bool {
    match fs::metadata(path) {
        Err(_) => true,
        Ok(meta) => !meta.is_file() || meta.len() == 0,
    }
}

/// True when the path cannot be opened for reading, or its first 16 bytes
/// are all-zero or all-0xFF — a degenerate header that no real format
/// produces.
pub fn is_corrupted(path: &Path) -> bool {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "unreadable, treating as corrupted");
            return true;
        }
    };

    let mut head = [0u8; VALIDATION_HEADER_SIZE];
    if file.read_exact(&mut head).is_err() {
        // Shorter than the probe window; the heuristic does not apply.
        return false;
    }

    head.iter().all(|&b| b == 0x00) || head.iter().all(|&b| b == 0xFF)
}

/// Runs both predicates over one path.
pub fn classify_path(path: &Path) -> PathClass {
    PathClass {
        deleted: is_deleted(path),
        corrupted: is_corrupted(path),
    }
}
