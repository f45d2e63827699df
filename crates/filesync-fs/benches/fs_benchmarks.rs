use criterion::{Criterion, black_box, criterion_group, criterion_main};
use filesync_fs::io::{self, RobustnessConfig};
use filesync_fs::compute_file_checksum;
use tempfile::tempdir;

fn write_atomic_benchmark(c: &mut Criterion) {
    c.bench_function("io::write_atomic", |b| {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_file.txt");
        let content = "hello world".as_bytes();
        let config = RobustnessConfig {
            enable_fsync: false,
            ..RobustnessConfig::default()
        };

        b.iter(|| {
            io::write_atomic(black_box(&path), black_box(content), config).unwrap();
        })
    });
}

fn file_digest_benchmark(c: &mut Criterion) {
    c.bench_function("checksum::compute_file_checksum (1 MiB)", |b| {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, vec![7u8; 1024 * 1024]).unwrap();

        b.iter(|| {
            compute_file_checksum(black_box(&path)).unwrap();
        })
    });
}

criterion_group!(benches, write_atomic_benchmark, file_digest_benchmark);
criterion_main!(benches);
