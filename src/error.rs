use thiserror::Error;

/// Errors surfaced by the recovery pipeline.
///
/// Expected absences (no signature match, nothing recoverable, missing
/// backups) are modeled as `Option`/empty collections, never as errors.
#[derive(Error, Debug)]
pub enum RecoveryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid range: offset {offset} + {len} bytes exceeds source of {source_len} bytes")]
    InvalidRange {
        offset: u64,
        len: u64,
        source_len: u64,
    },

    #[error("memory mapping failed: {0}")]
    Mmap(String),
}

/// Result type alias for recovery operations.
pub type Result<T> = std::result::Result<T, RecoveryError>;
