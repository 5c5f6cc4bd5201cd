//! Integrity classifier tests.

use std::fs;

use rstest::*;
use salvage::classify::{classify_path, is_corrupted, is_deleted};
use tempfile::TempDir;

#[fixture]
fn dir() -> TempDir {
    TempDir::new().expect("tempdir")
}

#[rstest]
fn nonexistent_path_is_deleted(dir: TempDir) {
    let class = classify_path(&dir.path().join("gone.jpg"));
    assert!(class.deleted);
    assert!(class.is_candidate());
}

#[rstest]
fn zero_length_file_is_deleted(dir: TempDir) {
    let path = dir.path().join("empty.dat");
    fs::write(&path, b"").unwrap();

    assert!(is_deleted(&path));
    assert!(classify_path(&path).is_candidate());
}

#[rstest]
fn directory_is_deleted(dir: TempDir) {
    assert!(is_deleted(dir.path()));
}

#[rstest]
fn healthy_file_is_neither(dir: TempDir) {
    let path = dir.path().join("photo.jpg");
    let mut content = vec![0xFF, 0xD8, 0xFF, 0xE0];
    content.extend_from_slice(&[0x42; 32]);
    fs::write(&path, &content).unwrap();

    let class = classify_path(&path);
    assert!(!class.deleted);
    assert!(!class.corrupted);
    assert!(!class.is_candidate());
}

#[rstest]
#[case(0x00)]
#[case(0xFF)]
fn degenerate_header_is_corrupted(dir: TempDir, #[case] fill: u8) {
    let path = dir.path().join("blasted.bin");
    fs::write(&path, vec![fill; 64]).unwrap();

    assert!(is_corrupted(&path));
    assert!(classify_path(&path).is_candidate());
}

#[rstest]
fn mixed_header_is_not_corrupted(dir: TempDir) {
    let path = dir.path().join("mixed.bin");
    let mut content = vec![0x00; 15];
    content.push(0x01);
    content.extend_from_slice(&[0u8; 16]);
    fs::write(&path, &content).unwrap();

    assert!(!is_corrupted(&path));
}

#[rstest]
fn short_file_skips_header_heuristic(dir: TempDir) {
    // Fewer than 16 bytes: the probe cannot apply, so only the zero-fill
    // content does not condemn the file.
    let path = dir.path().join("tiny.bin");
    fs::write(&path, vec![0u8; 8]).unwrap();

    assert!(!is_corrupted(&path));
    assert!(!is_deleted(&path));
}

#[cfg(unix)]
#[rstest]
fn dangling_symlink_is_deleted(dir: TempDir) {
    let link = dir.path().join("dangling");
    std::os::unix::fs::symlink(dir.path().join("nowhere"), &link).unwrap();

    assert!(is_deleted(&link));
}
