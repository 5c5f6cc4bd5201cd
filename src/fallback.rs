//! Ordered recovery strategies over a single logical target.
//!
//! Strategies run in a fixed order and the chain short-circuits on the
//! first one yielding non-empty, readable data: direct read, then the
//! backup-path set, then a journal-residue scan. An exhausted chain is an
//! expected outcome, not a fault.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use memchr::memmem;

use crate::error::{RecoveryError, Result};
use crate::signatures::SignatureTable;
use crate::types::{FileKind, JOURNAL_BLOCK_SIZE, RecoveredArtifact, RecoveryStrategy};

const DEFAULT_TRASH_DIR: &str = "/sdcard/.Trash";
const DEFAULT_CACHE_DIR: &str = "/data/local/tmp";
const DEFAULT_JOURNAL_PATH: &str = "/data/media/.journal";

/// The multi-strategy fallback chain.
///
/// Alternate locations and the journal source are injectable so the chain
/// works against test fixtures as well as a device image; the defaults are
/// the usual mobile trash and cache locations.
pub struct RecoveryChain {
    table: Arc<SignatureTable>,
    trash_dir: PathBuf,
    cache_dir: PathBuf,
    journal_path: PathBuf,
    journal_block: usize,
}

impl RecoveryChain {
    pub fn new(table: Arc<SignatureTable>) -> Self {
        Self {
            table,
            trash_dir: PathBuf::from(DEFAULT_TRASH_DIR),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            journal_path: PathBuf::from(DEFAULT_JOURNAL_PATH),
            journal_block: JOURNAL_BLOCK_SIZE,
        }
    }

    pub fn with_trash_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.trash_dir = dir.into();
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_journal(mut self, path: impl Into<PathBuf>) -> Self {
        self.journal_path = path.into();
        self
    }

    pub fn with_journal_block(mut self, block: usize) -> Self {
        self.journal_block = block.max(1);
        self
    }

    /// Attempts recovery of one target, returning the first validated
    /// strategy result, or `None` when every strategy comes up empty.
    pub fn recover(&self, target: &Path) -> Result<Option<RecoveredArtifact>> {
        if target.as_os_str().is_empty() {
            return Err(RecoveryError::InvalidInput(
                "empty recovery target path".into(),
            ));
        }

        if let Some(bytes) = read_nonempty(target) {
            tracing::debug!(path = %target.display(), "recovered via direct read");
            return Ok(Some(self.artifact(bytes, RecoveryStrategy::DirectRead)));
        }

        for candidate in self.backup_candidates(target) {
            if let Some(bytes) = read_nonempty(&candidate) {
                tracing::debug!(
                    path = %target.display(),
                    backup = %candidate.display(),
                    "recovered via backup path"
                );
                return Ok(Some(self.artifact(bytes, RecoveryStrategy::BackupPath)));
            }
        }

        if let Some(bytes) = self.scan_journal(target) {
            tracing::debug!(path = %target.display(), "recovered journal residue block");
            let mut artifact = self.artifact(bytes, RecoveryStrategy::JournalResidue);
            // Residue blocks are not validated files; only a signature
            // re-check can upgrade their confidence.
            artifact.valid = artifact.kind != FileKind::Unknown;
            return Ok(Some(artifact));
        }

        tracing::debug!(path = %target.display(), "all recovery strategies exhausted");
        Ok(None)
    }

    /// Fixed, ordered alternate locations for a target: sibling `.bak` and
    /// `~` copies, then its basename under the trash and cache dirs.
    fn backup_candidates(&self, target: &Path) -> Vec<PathBuf> {
        let mut candidates = Vec::with_capacity(4);
        candidates.push(append_suffix(target, ".bak"));
        candidates.push(append_suffix(target, "~"));

        if let Some(name) = target.file_name() {
            candidates.push(self.trash_dir.join(name));
            candidates.push(self.cache_dir.join(name));
        }

        candidates
    }

    /// Streams the journal source in fixed-size blocks and returns the
    /// first whole block containing the target path as a substring. The
    /// block is residue near a path reference, not a reconstructed file.
    fn scan_journal(&self, target: &Path) -> Option<Vec<u8>> {
        let mut journal = match File::open(&self.journal_path) {
            Ok(f) => f,
            Err(err) => {
                tracing::debug!(
                    journal = %self.journal_path.display(),
                    %err,
                    "journal source unavailable"
                );
                return None;
            }
        };

        let needle = target.as_os_str().as_encoded_bytes();
        let finder = memmem::Finder::new(needle);
        let mut block = vec![0u8; self.journal_block];

        loop {
            let n = match journal.read(&mut block) {
                Ok(0) => return None,
                Ok(n) => n,
                Err(err) => {
                    tracing::debug!(%err, "journal read failed, abandoning strategy");
                    return None;
                }
            };

            if finder.find(&block[..n]).is_some() {
                return Some(block[..n].to_vec());
            }
        }
    }

    fn artifact(&self, bytes: Vec<u8>, strategy: RecoveryStrategy) -> RecoveredArtifact {
        let kind = self.table.identify(&bytes).unwrap_or(FileKind::Unknown);
        RecoveredArtifact::new(bytes, kind, strategy)
    }
}

/// Reads a file fully if it opens and has non-zero size; any failure or
/// empty file is a per-strategy miss, not an error.
fn read_nonempty(path: &Path) -> Option<Vec<u8>> {
    let meta = fs::metadata(path).ok()?;
    if !meta.is_file() || meta.len() == 0 {
        return None;
    }
    match fs::read(path) {
        Ok(bytes) if !bytes.is_empty() => Some(bytes),
        Ok(_) => None,
        Err(err) => {
            tracing::debug!(path = %path.display(), %err, "read failed");
            None
        }
    }
}

/// `target` with `suffix` appended to the full file name, e.g.
/// `photo.jpg` -> `photo.jpg.bak`.
fn append_suffix(target: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
