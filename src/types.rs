use serde::Serialize;
use sha2::{Digest, Sha256};

const KB: u64 = 1024;
const MB: u64 = KB * 1024;

/// Default sector granularity for extent identification.
pub const DEFAULT_SECTOR_SIZE: usize = 512;
/// Hard cap on a single carved extent.
pub const MAX_EXTENT_BYTES: u64 = MB;
/// Matcher lookahead: every registered signature fits in this window.
pub const LOOKAHEAD_BYTES: usize = 8;
/// Degenerate-header probe size for the integrity classifier.
pub const VALIDATION_HEADER_SIZE: usize = 16;
/// Block granularity for the journal-residue strategy.
pub const JOURNAL_BLOCK_SIZE: usize = 4096;

/// File formats the pipeline can identify and recover.
///
/// Equality only; there is no meaningful ordering between kinds.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileKind {
    Unknown,
    Jpeg,
    Png,
    Gif,
    Pdf,
    Zip,
    Mp3,
    Mp4,
    Doc,
    Docx,
    Xls,
}

impl FileKind {
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Jpeg => "jpg",
            FileKind::Png => "png",
            FileKind::Gif => "gif",
            FileKind::Pdf => "pdf",
            FileKind::Zip => "zip",
            FileKind::Mp3 => "mp3",
            FileKind::Mp4 => "mp4",
            FileKind::Doc => "doc",
            FileKind::Docx => "docx",
            FileKind::Xls => "xls",
            FileKind::Unknown => "bin",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::Jpeg => write!(f, "JPEG"),
            FileKind::Png => write!(f, "PNG"),
            FileKind::Gif => write!(f, "GIF"),
            FileKind::Pdf => write!(f, "PDF"),
            FileKind::Zip => write!(f, "ZIP"),
            FileKind::Mp3 => write!(f, "MP3"),
            FileKind::Mp4 => write!(f, "MP4"),
            FileKind::Doc => write!(f, "DOC"),
            FileKind::Docx => write!(f, "DOCX"),
            FileKind::Xls => write!(f, "XLS"),
            FileKind::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A contiguous candidate byte range believed to hold one recoverable file.
///
/// Produced by the extent identifier against a single buffer and consumed
/// immediately by the carver; the source buffer is passed alongside rather
/// than stored. `start` is sector-aligned. `end` is heuristic and may run
/// past the actual data; the carver enforces bounds before copying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub start: u64,
    pub end: u64,
    pub kind: FileKind,
    /// Carving targets unallocated space; no filesystem metadata confirms
    /// allocation state at this layer, so every identified extent is
    /// treated as deleted.
    pub deleted: bool,
}

impl Extent {
    pub fn new(start: u64, end: u64, kind: FileKind) -> Self {
        Self {
            start,
            end,
            kind,
            deleted: true,
        }
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Which strategy produced a recovered artifact.
///
/// `JournalResidue` artifacts are lower-confidence than the others: the
/// strategy returns raw journal blocks near a path reference, not a
/// validated file.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecoveryStrategy {
    DirectRead,
    BackupPath,
    JournalResidue,
    Carved,
}

impl std::fmt::Display for RecoveryStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoveryStrategy::DirectRead => write!(f, "direct read"),
            RecoveryStrategy::BackupPath => write!(f, "backup path"),
            RecoveryStrategy::JournalResidue => write!(f, "journal residue"),
            RecoveryStrategy::Carved => write!(f, "carved"),
        }
    }
}

/// Owned bytes recovered by one strategy, handed off to the caller.
///
/// The pipeline holds no reference to the artifact after returning it.
#[derive(Debug, Clone)]
pub struct RecoveredArtifact {
    pub bytes: Vec<u8>,
    pub kind: FileKind,
    pub strategy: RecoveryStrategy,
    pub valid: bool,
}

impl RecoveredArtifact {
    pub fn new(bytes: Vec<u8>, kind: FileKind, strategy: RecoveryStrategy) -> Self {
        Self {
            bytes,
            kind,
            strategy,
            valid: true,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// SHA-256 of the recovered bytes, hex-encoded, for evidence integrity.
    pub fn sha256_hex(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        hex::encode(hasher.finalize())
    }
}
