//! Reference provider implementations.
//!
//! The core consumes `SectorSource` and `FileEnumerator` traits; these are
//! the stock implementations used by the CLI and tests — a memory-mapped
//! image file and a recursive std-fs walk.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::error::{RecoveryError, Result};
use crate::scan::{FileEnumerator, SectorSource};

/// Memory-mapped disk image serving raw sector data.
pub struct ImageSectorSource {
    mmap: Mmap,
    size: u64,
}

impl ImageSectorSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let size = file.metadata()?.len();

        if size == 0 {
            return Err(RecoveryError::Mmap(format!(
                "cannot map empty image {}",
                path.display()
            )));
        }

        let mmap =
            unsafe { Mmap::map(&file) }.map_err(|e| RecoveryError::Mmap(e.to_string()))?;

        #[cfg(target_os = "linux")]
        {
            let _ = mmap.advise(memmap2::Advice::Sequential);
        }

        Ok(Self { mmap, size })
    }

    /// The full mapped image, for direct in-memory carving.
    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }
}

impl SectorSource for ImageSectorSource {
    fn size(&self) -> u64 {
        self.size
    }

    fn read_chunk(&mut self, offset: u64, buffer: &mut [u8]) -> Result<usize> {
        let start = offset as usize;
        if start >= self.mmap.len() {
            return Ok(0);
        }
        let end = start.saturating_add(buffer.len()).min(self.mmap.len());
        let chunk = &self.mmap[start..end];
        buffer[..chunk.len()].copy_from_slice(chunk);
        Ok(chunk.len())
    }
}

/// Recursive directory walk over std-fs.
///
/// Yields regular files only, does not follow symlinks, and skips
/// unreadable entries instead of aborting the walk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsEnumerator;

impl FsEnumerator {
    pub fn new() -> Self {
        Self
    }

    fn walk(&self, dir: &Path, out: &mut Vec<PathBuf>) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!(dir = %dir.display(), %err, "skipping unreadable directory");
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::debug!(dir = %dir.display(), %err, "skipping unreadable entry");
                    continue;
                }
            };

            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(_) => continue,
            };

            if file_type.is_dir() {
                self.walk(&entry.path(), out);
            } else if file_type.is_file() {
                out.push(entry.path());
            }
        }
    }
}

impl FileEnumerator for FsEnumerator {
    fn enumerate(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(RecoveryError::InvalidInput(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        let mut out = Vec::new();
        self.walk(root, &mut out);
        Ok(out)
    }
}
