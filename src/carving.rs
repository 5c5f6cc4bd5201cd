//! Extent materialization.
//!
//! Copies candidate extents out of a raw buffer into owned artifacts.
//! Carving is pure and allocation-only; the source buffer is never
//! mutated.

use std::collections::HashMap;

use crate::types::{Extent, FileKind, RecoveredArtifact, RecoveryStrategy};

/// Carves every eligible extent out of `buffer`.
///
/// An extent is eligible when it is marked deleted and lies fully inside
/// the buffer. Extents failing the bounds check are skipped silently: a
/// heuristic end-of-file estimate running past the actual data is a normal
/// outcome, not an error.
pub fn carve_extents(buffer: &[u8], extents: &[Extent]) -> Vec<RecoveredArtifact> {
    let mut artifacts = Vec::new();
    let mut skipped = 0usize;

    for extent in extents {
        if !extent.deleted || extent.is_empty() || extent.end > buffer.len() as u64 {
            skipped += 1;
            continue;
        }

        let bytes = buffer[extent.start as usize..extent.end as usize].to_vec();
        artifacts.push(RecoveredArtifact::new(
            bytes,
            extent.kind,
            RecoveryStrategy::Carved,
        ));
    }

    let total_bytes: u64 = artifacts.iter().map(RecoveredArtifact::size_bytes).sum();
    tracing::info!(
        artifacts = artifacts.len(),
        skipped,
        total_bytes,
        "carving pass complete"
    );

    artifacts
}

/// Per-kind tallies over one carving pass, for reporting.
#[derive(Debug, Default)]
pub struct CarveStats {
    pub files: usize,
    pub bytes: u64,
    pub by_kind: HashMap<FileKind, usize>,
}

impl CarveStats {
    pub fn from_artifacts(artifacts: &[RecoveredArtifact]) -> Self {
        let mut stats = Self::default();
        for artifact in artifacts {
            stats.files += 1;
            stats.bytes += artifact.size_bytes();
            *stats.by_kind.entry(artifact.kind).or_insert(0) += 1;
        }
        stats
    }

    pub fn count_for(&self, kind: FileKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}
