use criterion::{Criterion, criterion_group, criterion_main};

use salvage::carving::carve_extents;
use salvage::extents::ExtentScanner;
use salvage::signatures::SignatureTable;
use salvage::types::DEFAULT_SECTOR_SIZE;

fn synthetic_image(sectors: usize) -> Vec<u8> {
    let mut buf = vec![0u8; sectors * DEFAULT_SECTOR_SIZE];
    // Plant a header every 64 sectors, alternating JPEG and PDF.
    for (i, sector) in (0..sectors).step_by(64).enumerate() {
        let at = sector * DEFAULT_SECTOR_SIZE;
        if i % 2 == 0 {
            buf[at..at + 3].copy_from_slice(&[0xFF, 0xD8, 0xFF]);
        } else {
            buf[at..at + 4].copy_from_slice(b"%PDF");
        }
    }
    buf
}

fn bench_extent_scan(c: &mut Criterion) {
    let table = SignatureTable::default_set();
    let scanner = ExtentScanner::new(&table);
    let image = synthetic_image(16 * 1024); // 8 MiB

    c.bench_function("extent_scan_8mib", |b| {
        b.iter(|| std::hint::black_box(scanner.scan_to_vec(&image)))
    });

    c.bench_function("scan_and_carve_8mib", |b| {
        b.iter(|| {
            let extents = scanner.scan_to_vec(&image);
            std::hint::black_box(carve_extents(&image, &extents))
        })
    });
}

fn bench_identify(c: &mut Criterion) {
    let table = SignatureTable::default_set();
    let window = [0x00u8, 0x00, 0x00, 0x18, b'f', b't', b'y', b'p'];

    c.bench_function("identify_window", |b| {
        b.iter(|| std::hint::black_box(table.identify(&window)))
    });
}

criterion_group!(benches, bench_extent_scan, bench_identify);
criterion_main!(benches);
