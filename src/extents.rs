//! Extent identification over raw sector buffers.
//!
//! Walks a buffer at sector-aligned strides, probing each stride with the
//! signature matcher. A match opens an extent whose end is either the
//! format's terminating pattern or a hard cap, whichever comes first.

use memchr::memmem;

use crate::signatures::{Signature, SignatureTable};
use crate::types::{DEFAULT_SECTOR_SIZE, Extent, LOOKAHEAD_BYTES, MAX_EXTENT_BYTES};

#[derive(Debug, Clone, Copy)]
pub struct ExtentConfig {
    /// Stride and alignment granularity. Extent starts are multiples of this.
    pub sector_size: usize,
    /// Upper bound on a single extent's length.
    pub max_extent_bytes: u64,
}

impl Default for ExtentConfig {
    fn default() -> Self {
        Self {
            sector_size: DEFAULT_SECTOR_SIZE,
            max_extent_bytes: MAX_EXTENT_BYTES,
        }
    }
}

/// Stateless scanner over raw buffers; holds only the injected signature
/// table and configuration, so repeated scans of the same buffer yield
/// identical extents.
pub struct ExtentScanner<'t> {
    table: &'t SignatureTable,
    config: ExtentConfig,
}

impl<'t> ExtentScanner<'t> {
    pub fn new(table: &'t SignatureTable) -> Self {
        Self::with_config(table, ExtentConfig::default())
    }

    pub fn with_config(table: &'t SignatureTable, config: ExtentConfig) -> Self {
        Self { table, config }
    }

    pub fn config(&self) -> ExtentConfig {
        self.config
    }

    /// Lazily yields extents in ascending start order. Extents may overlap
    /// when two headers fall inside the same cap window; deduplication is
    /// left to the carver's consumers.
    pub fn scan<'b>(&self, buffer: &'b [u8]) -> ExtentIter<'t, 'b> {
        ExtentIter {
            table: self.table,
            buffer,
            config: self.config,
            cursor: 0,
        }
    }

    /// Collects the full extent sequence for one buffer.
    pub fn scan_to_vec(&self, buffer: &[u8]) -> Vec<Extent> {
        self.scan(buffer).collect()
    }
}

/// Iterator over the extents of a single buffer.
pub struct ExtentIter<'t, 'b> {
    table: &'t SignatureTable,
    buffer: &'b [u8],
    config: ExtentConfig,
    cursor: usize,
}

impl Iterator for ExtentIter<'_, '_> {
    type Item = Extent;

    fn next(&mut self) -> Option<Extent> {
        let sector = self.config.sector_size;
        if sector == 0 {
            return None;
        }

        // Headers in a trailing partial sector are discarded as incomplete;
        // buffers smaller than one sector therefore yield nothing.
        while self.cursor + sector <= self.buffer.len() {
            let start = self.cursor;
            self.cursor += sector;

            let window_end = (start + LOOKAHEAD_BYTES).min(self.buffer.len());
            let window = &self.buffer[start..window_end];

            if let Some(sig) = self.table.lookup(window) {
                let end = self.extent_end(start, sig);
                return Some(Extent::new(start as u64, end, sig.kind()));
            }
        }

        None
    }
}

impl ExtentIter<'_, '_> {
    /// Determines where an extent opened at `start` ends: at the format's
    /// terminating pattern when the signature defines one and it occurs
    /// inside the cap window, otherwise by extending whole sectors until
    /// the buffer ends or the cap is reached. The sector-stepped end may
    /// overshoot a ragged buffer tail; the carver's bounds check drops
    /// such extents.
    fn extent_end(&self, start: usize, sig: &Signature) -> u64 {
        let sector = self.config.sector_size;
        let cap = (start as u64 + self.config.max_extent_bytes).min(self.buffer.len() as u64);

        if let Some(footer) = sig.footer() {
            let search_from = start + sig.offset() + sig.pattern().len();
            let search_to = cap as usize;
            if search_from < search_to {
                let haystack = &self.buffer[search_from..search_to];
                if let Some(pos) = memmem::find(haystack, footer) {
                    return (search_from + pos + footer.len()) as u64;
                }
            }
        }

        let mut end = start as u64 + sector as u64;
        while end < self.buffer.len() as u64 && end - (start as u64) < self.config.max_extent_bytes {
            end += sector as u64;
        }
        end.min(start as u64 + self.config.max_extent_bytes)
    }
}
