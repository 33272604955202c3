//! Criterion benchmarks for the streaming reader.
//!
//! Run with:
//!   cargo bench --bench read_partition
//!
//! One store file is written up front; each benchmark loads it back with a
//! fixed request size, covering both the buffered and the immediate strategy.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use zstore_core::session::{Mode, Session};

const PAYLOAD_LEN: usize = 4 * 1024 * 1024;

fn synthetic_payload(len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len + 64);
    let mut i = 0u64;
    while out.len() < len {
        out.extend_from_slice(format!("{i:012} sample={} flag={}\n", i.wrapping_mul(2654435761) % 1000, i % 3).as_bytes());
        i += 1;
    }
    out.truncate(len);
    out
}

fn bench_read_partition(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.zst");
    let payload = synthetic_payload(PAYLOAD_LEN);
    {
        let mut s = Session::open(Mode::Store, &path).unwrap();
        s.write(&payload).unwrap();
        s.close().unwrap();
    }

    let mut group = c.benchmark_group("read_partition");
    group.sample_size(20);
    group.throughput(Throughput::Bytes(PAYLOAD_LEN as u64));

    // 64 and 4096 stay under the default output window; 1 MiB and the whole
    // payload take the immediate path.
    for &request in &[64usize, 4096, 1 << 20, PAYLOAD_LEN] {
        let mut out = vec![0u8; PAYLOAD_LEN];
        group.bench_with_input(BenchmarkId::new("load", request), &request, |b, &request| {
            b.iter(|| {
                let mut s = Session::open(Mode::Load, &path).unwrap();
                for chunk in out.chunks_mut(request) {
                    s.read_draining(chunk).unwrap();
                }
                s.close().unwrap()
            })
        });
    }

    group.bench_function("store", |b| {
        b.iter(|| {
            let mut s = Session::open(Mode::Store, dir.path().join("bench_store.zst")).unwrap();
            s.write(&payload).unwrap();
            s.close().unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_read_partition);
criterion_main!(benches);
