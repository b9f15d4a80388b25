//! Detector fan-out over one worker-sized chunk: the pipeline's hot path.

use core_detect::{DetectorParams, default_detectors};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// Deterministic 50 kb chunk: LCG background with motif blocks planted
/// every ~2 kb, roughly the density of a motif-rich genomic region.
fn synthetic_chunk() -> Vec<u8> {
    const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];
    const BLOCKS: [&[u8]; 6] = [
        b"TTAGGGTTAGGGTTAGGGTTAGGG",
        b"CAGCAGCAGCAGCAGCAGCAGCAG",
        b"CCCCACCCCACCCCACCCC",
        b"CGCGCGCGCGCGCGCGCG",
        b"GAAGAAGAAGAAGAAGAA",
        b"AAAAAAAAAAAAAA",
    ];
    let mut state = 0x2545F491_4F6CDD1Du64;
    let mut seq = Vec::with_capacity(50_000);
    let mut block = 0usize;
    while seq.len() < 50_000 {
        for _ in 0..2_000 {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            seq.push(BASES[(state >> 33) as usize % 4]);
        }
        seq.extend_from_slice(BLOCKS[block % BLOCKS.len()]);
        block += 1;
    }
    seq.truncate(50_000);
    seq
}

fn bench_chunk_scan(c: &mut Criterion) {
    let detectors = default_detectors(&DetectorParams::default());
    let seq = synthetic_chunk();
    c.bench_function("detector_fanout_50kb", |b| {
        b.iter(|| {
            let mut found = 0usize;
            for det in &detectors {
                found += det.scan(black_box(&seq), "bench", 0).len();
            }
            black_box(found)
        })
    });
    for det in &detectors {
        c.bench_function(&format!("detect_{}_50kb", det.class()), |b| {
            b.iter(|| black_box(det.scan(black_box(&seq), "bench", 0).len()))
        });
    }
}

criterion_group!(benches, bench_chunk_scan);
criterion_main!(benches);
