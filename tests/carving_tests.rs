//! Carver tests.

use salvage::carving::{CarveStats, carve_extents};
use salvage::extents::ExtentScanner;
use salvage::signatures::SignatureTable;
use salvage::types::{Extent, FileKind, RecoveryStrategy};

#[test]
fn artifact_length_matches_extent() {
    let buf = vec![0xABu8; 4096];
    let extents = vec![
        Extent::new(0, 512, FileKind::Jpeg),
        Extent::new(512, 2048, FileKind::Png),
    ];

    let artifacts = carve_extents(&buf, &extents);
    assert_eq!(artifacts.len(), 2);
    assert_eq!(artifacts[0].size_bytes(), 512);
    assert_eq!(artifacts[1].size_bytes(), 1536);
    assert!(artifacts.iter().all(|a| a.strategy == RecoveryStrategy::Carved));
}

#[test]
fn out_of_bounds_extent_is_skipped() {
    let buf = vec![0u8; 1024];
    let extents = vec![
        Extent::new(0, 512, FileKind::Jpeg),
        Extent::new(512, 1536, FileKind::Pdf),
    ];

    let artifacts = carve_extents(&buf, &extents);
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].kind, FileKind::Jpeg);
}

#[test]
fn non_deleted_extent_is_skipped() {
    let buf = vec![0u8; 1024];
    let mut extent = Extent::new(0, 512, FileKind::Jpeg);
    extent.deleted = false;

    assert!(carve_extents(&buf, &[extent]).is_empty());
}

#[test]
fn carving_does_not_mutate_source() {
    let buf = vec![0x5Au8; 2048];
    let before = buf.clone();
    let _ = carve_extents(&buf, &[Extent::new(0, 2048, FileKind::Zip)]);
    assert_eq!(buf, before);
}

#[test]
fn carved_bytes_equal_source_range() {
    let buf: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
    let extents = vec![Extent::new(512, 1024, FileKind::Unknown)];

    let artifacts = carve_extents(&buf, &extents);
    assert_eq!(artifacts[0].bytes, &buf[512..1024]);
}

#[test]
fn end_to_end_scan_then_carve_jpeg() {
    let table = SignatureTable::default_set();
    let scanner = ExtentScanner::new(&table);

    let mut buf = vec![0u8; 4096];
    buf[..3].copy_from_slice(&[0xFF, 0xD8, 0xFF]);

    let extents = scanner.scan_to_vec(&buf);
    assert_eq!(extents.len(), 1);

    let artifacts = carve_extents(&buf, &extents);
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].size_bytes(), 4096);
    assert_eq!(artifacts[0].bytes, buf);
    assert_eq!(artifacts[0].kind, FileKind::Jpeg);
}

#[test]
fn stats_tally_by_kind() {
    let buf = vec![0u8; 4096];
    let extents = vec![
        Extent::new(0, 512, FileKind::Jpeg),
        Extent::new(512, 1024, FileKind::Jpeg),
        Extent::new(1024, 2048, FileKind::Pdf),
    ];

    let artifacts = carve_extents(&buf, &extents);
    let stats = CarveStats::from_artifacts(&artifacts);

    assert_eq!(stats.files, 3);
    assert_eq!(stats.bytes, 2048);
    assert_eq!(stats.count_for(FileKind::Jpeg), 2);
    assert_eq!(stats.count_for(FileKind::Pdf), 1);
    assert_eq!(stats.count_for(FileKind::Png), 0);
}

#[test]
fn artifact_digest_is_stable() {
    let buf = vec![1u8; 1024];
    let artifacts = carve_extents(&buf, &[Extent::new(0, 1024, FileKind::Unknown)]);
    let digest = artifacts[0].sha256_hex();
    assert_eq!(digest.len(), 64);
    assert_eq!(digest, artifacts[0].sha256_hex());
}
