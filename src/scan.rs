//! Scan orchestration across a directory or device scope.
//!
//! Composes the integrity classifier and the extent identifier over
//! caller-supplied providers, aggregating candidates into a report. The
//! orchestrator only enumerates candidates; byte recovery is a separate,
//! explicit call per candidate through the fallback chain or the carver.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::classify::{PathClass, classify_path};
use crate::error::{RecoveryError, Result};
use crate::extents::{ExtentConfig, ExtentScanner};
use crate::signatures::SignatureTable;
use crate::types::FileKind;

/// Enumerates regular files under a root, in discovery order. Supplied by
/// the caller; enumeration failures below the root are skipped, not fatal.
pub trait FileEnumerator {
    fn enumerate(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

/// Provides raw sector data for the signature-based pass. Supplied by the
/// caller; a read returning 0 bytes ends the stream.
pub trait SectorSource {
    fn size(&self) -> u64;
    fn read_chunk(&mut self, offset: u64, buffer: &mut [u8]) -> Result<usize>;
}

/// Externally supplied elevated-access probe; the core never mutates or
/// re-derives the capability itself.
pub trait CapabilityProbe {
    fn has_elevated_access(&self) -> bool;
}

/// ID band bases. Bands let a consumer tell *why* a candidate was flagged
/// without inspecting it: entry-level classifier hits, elevated-scope
/// classifier hits, and signature-pass extent hits.
pub const CLASSIFIER_BAND: u64 = 0;
pub const ELEVATED_BAND: u64 = 1_000_000;
pub const SIGNATURE_BAND: u64 = 2_000_000;

/// Locations only reachable with elevated access, visited by the second
/// classifier pass.
const DEFAULT_ELEVATED_ROOTS: &[&str] = &[
    "/data/tmp",
    "/data/data/.trash",
    "/sdcard/.Trash",
    "/storage/emulated/0/.Trash",
];

/// One flagged recovery candidate.
#[derive(Debug, Clone, Serialize)]
pub struct ScanCandidate {
    /// Stable identifier, monotonically assigned within the band.
    pub id: u64,
    /// Path or `raw@0x..` source label, for display and follow-up recovery.
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FileKind>,
}

/// Aggregated scan outcome: per-band candidate sequences, ordered by
/// discovery, plus counts.
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
    pub classifier: Vec<ScanCandidate>,
    pub elevated: Vec<ScanCandidate>,
    pub signature: Vec<ScanCandidate>,
    pub files_examined: usize,
    pub bytes_streamed: u64,
}

impl ScanReport {
    pub fn total_candidates(&self) -> usize {
        self.classifier.len() + self.elevated.len() + self.signature.len()
    }

    pub fn candidate_ids(&self) -> Vec<u64> {
        self.classifier
            .iter()
            .chain(&self.elevated)
            .chain(&self.signature)
            .map(|c| c.id)
            .collect()
    }
}

/// Composes classifier and signature passes over injected providers.
pub struct ScanOrchestrator<E: FileEnumerator> {
    table: Arc<SignatureTable>,
    enumerator: E,
    extent_config: ExtentConfig,
    elevated_roots: Vec<PathBuf>,
    chunk_bytes: usize,
}

impl<E: FileEnumerator> ScanOrchestrator<E> {
    pub fn new(table: Arc<SignatureTable>, enumerator: E) -> Self {
        Self {
            table,
            enumerator,
            extent_config: ExtentConfig::default(),
            elevated_roots: DEFAULT_ELEVATED_ROOTS.iter().map(PathBuf::from).collect(),
            chunk_bytes: 4 * 1024 * 1024,
        }
    }

    pub fn with_extent_config(mut self, config: ExtentConfig) -> Self {
        self.extent_config = config;
        self
    }

    pub fn with_elevated_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.elevated_roots = roots;
        self
    }

    /// Runs the entry-level classifier pass, and the elevated pass when the
    /// capability grants it.
    pub fn scan(&self, root: &Path, capability: bool) -> Result<ScanReport> {
        if root.as_os_str().is_empty() {
            return Err(RecoveryError::InvalidInput("empty scan root".into()));
        }

        let mut report = ScanReport::default();

        let paths = self.enumerator.enumerate(root)?;
        tracing::info!(root = %root.display(), files = paths.len(), "entry-level pass");
        self.classify_into(&paths, CLASSIFIER_BAND, &mut report.classifier);
        report.files_examined += paths.len();

        if capability {
            for elevated_root in &self.elevated_roots {
                let paths = match self.enumerator.enumerate(elevated_root) {
                    Ok(p) => p,
                    Err(err) => {
                        tracing::debug!(
                            root = %elevated_root.display(),
                            %err,
                            "elevated location unavailable"
                        );
                        continue;
                    }
                };
                tracing::info!(
                    root = %elevated_root.display(),
                    files = paths.len(),
                    "elevated pass"
                );
                self.classify_into(&paths, ELEVATED_BAND, &mut report.elevated);
                report.files_examined += paths.len();
            }
        }

        Ok(report)
    }

    /// Streams a raw source through the extent identifier, appending
    /// signature-band candidates to the report. Chunks are whole multiples
    /// of the sector size so extent starts stay aligned across chunks.
    pub fn signature_pass<S: SectorSource>(
        &self,
        source: &mut S,
        report: &mut ScanReport,
    ) -> Result<()> {
        let sector = self.extent_config.sector_size.max(1);
        let chunk_len = (self.chunk_bytes / sector).max(1) * sector;
        let scanner = ExtentScanner::with_config(&self.table, self.extent_config);

        let mut buffer = vec![0u8; chunk_len];
        let mut offset = 0u64;

        while offset < source.size() {
            let n = source.read_chunk(offset, &mut buffer)?;
            if n == 0 {
                break;
            }

            for extent in scanner.scan(&buffer[..n]) {
                let id = SIGNATURE_BAND + report.signature.len() as u64;
                report.signature.push(ScanCandidate {
                    id,
                    source: format!("raw@{:#x}", offset + extent.start),
                    kind: Some(extent.kind),
                });
            }

            report.bytes_streamed += n as u64;
            offset += n as u64;
        }

        tracing::info!(
            candidates = report.signature.len(),
            bytes = report.bytes_streamed,
            "signature pass complete"
        );
        Ok(())
    }

    /// Classifies paths in parallel, then appends candidates sequentially
    /// so IDs follow discovery order.
    fn classify_into(&self, paths: &[PathBuf], band: u64, out: &mut Vec<ScanCandidate>) {
        let classes: Vec<PathClass> = paths.par_iter().map(|p| classify_path(p)).collect();

        for (path, class) in paths.iter().zip(classes) {
            if class.is_candidate() {
                let id = band + out.len() as u64;
                tracing::debug!(
                    path = %path.display(),
                    deleted = class.deleted,
                    corrupted = class.corrupted,
                    id,
                    "recovery candidate"
                );
                out.push(ScanCandidate {
                    id,
                    source: path.display().to_string(),
                    kind: None,
                });
            }
        }
    }
}
