//! Deleted-file recovery pipeline.
//!
//! Signature-based file-type identification, raw-buffer carving of file
//! extents out of unstructured sector data, and a multi-strategy fallback
//! chain that tries increasingly invasive recovery techniques until one
//! yields data. Works with or without elevated filesystem access; all
//! device and directory access goes through caller-supplied providers.

pub mod carving;
pub mod classify;
pub mod error;
pub mod extents;
pub mod fallback;
pub mod io;
pub mod scan;
pub mod signatures;
pub mod types;

pub use carving::{CarveStats, carve_extents};
pub use classify::{PathClass, classify_path, is_corrupted, is_deleted};
pub use error::{RecoveryError, Result};
pub use extents::{ExtentConfig, ExtentScanner};
pub use fallback::RecoveryChain;
pub use scan::{
    CapabilityProbe, FileEnumerator, ScanCandidate, ScanOrchestrator, ScanReport, SectorSource,
};
pub use signatures::{Signature, SignatureTable};
pub use types::{Extent, FileKind, RecoveredArtifact, RecoveryStrategy};
