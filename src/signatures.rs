//! Signature table and matcher.
//!
//! Magic-byte patterns at fixed offsets identify file formats in raw data.
//! The table is immutable once built and passed by reference wherever
//! identification is needed; there is no process-wide registry.

use crate::types::{FileKind, LOOKAHEAD_BYTES};

/// A magic-byte pattern at a fixed offset, identifying one file format.
#[derive(Debug, Clone)]
pub struct Signature {
    kind: FileKind,
    pattern: Vec<u8>,
    offset: usize,
    footer: Option<Vec<u8>>,
}

impl Signature {
    pub fn new(kind: FileKind, pattern: Vec<u8>, offset: usize) -> Self {
        Self {
            kind,
            pattern,
            offset,
            footer: None,
        }
    }

    /// Attaches a terminating pattern for formats that define one; the
    /// extent identifier uses it to close extents before the hard cap.
    pub fn with_footer(mut self, footer: Vec<u8>) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn footer(&self) -> Option<&[u8]> {
        self.footer.as_deref()
    }

    /// Tests this signature against a byte window. Never reads past the
    /// window: a window too short for `offset + pattern` is a non-match.
    pub fn matches(&self, window: &[u8]) -> bool {
        let end = self.offset + self.pattern.len();
        window.len() >= end && window[self.offset..end] == self.pattern[..]
    }
}

/// Immutable registry of file signatures, matched in registration order.
///
/// Registration order is a deliberate tie-break: the first signature whose
/// pattern matches at its fixed offset wins, so more specific formats are
/// registered ahead of generic container magics.
#[derive(Debug, Default)]
pub struct SignatureTable {
    signatures: Vec<Signature>,
}

impl SignatureTable {
    pub fn new() -> Self {
        Self {
            signatures: Vec::new(),
        }
    }

    /// The built-in signature set, ordered most-specific first.
    pub fn default_set() -> Self {
        let mut table = Self::new();

        table.register(
            Signature::new(FileKind::Jpeg, vec![0xFF, 0xD8, 0xFF], 0)
                .with_footer(vec![0xFF, 0xD9]),
        );
        table.register(
            Signature::new(
                FileKind::Png,
                vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
                0,
            )
            .with_footer(vec![0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82]),
        );
        table.register(
            Signature::new(FileKind::Gif, b"GIF8".to_vec(), 0).with_footer(vec![0x00, 0x3B]),
        );
        table.register(
            Signature::new(FileKind::Pdf, b"%PDF".to_vec(), 0).with_footer(b"%%EOF".to_vec()),
        );
        // OLE compound document; DOC/XLS share this container magic and
        // cannot be split further without parsing the directory stream.
        table.register(Signature::new(
            FileKind::Doc,
            vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1],
            0,
        ));
        table.register(Signature::new(
            FileKind::Zip,
            vec![0x50, 0x4B, 0x03, 0x04],
            0,
        ));
        table.register(Signature::new(FileKind::Mp3, b"ID3".to_vec(), 0));
        table.register(Signature::new(FileKind::Mp4, b"ftyp".to_vec(), 4));

        table
    }

    /// Adds a signature. The pattern must fit inside the matcher lookahead
    /// window at its offset.
    pub fn register(&mut self, signature: Signature) {
        assert!(
            signature.offset + signature.pattern.len() <= LOOKAHEAD_BYTES,
            "signature for {} exceeds the {}-byte lookahead window",
            signature.kind,
            LOOKAHEAD_BYTES,
        );
        self.signatures.push(signature);
    }

    /// Identifies the file kind of a byte window, or `None` if no
    /// registered signature matches.
    pub fn identify(&self, window: &[u8]) -> Option<FileKind> {
        self.lookup(window).map(Signature::kind)
    }

    /// Returns the first registered signature matching the window.
    pub fn lookup(&self, window: &[u8]) -> Option<&Signature> {
        self.signatures.iter().find(|sig| sig.matches(window))
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}
