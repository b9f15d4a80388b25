//! Chunking invariance and boundary behaviour.
//!
//! The contract under test: for any chunk-tier configuration, the emitted
//! motif set is identical to the direct (unchunked) run on the same
//! sequence, provided motifs fit the chunk overlap or belong to a
//! consolidated run/repeat subclass. Overlaps here are sized past the
//! longest non-mergeable motif (a direct repeat spans up to ~700 bp).
//! R-Loop is excluded because its exit zone may legitimately exceed any
//! reasonable test overlap.

mod common;

use common::{scan_with, shape};
use core_engine::{ChunkTierOverrides, ScanConfig};
use core_taxonomy::Class;

fn chunked_cfg(chunk: u64, overlap: u64) -> ScanConfig {
    ScanConfig {
        chunk_tier_overrides: Some(ChunkTierOverrides {
            micro_chunk: chunk,
            micro_overlap: overlap,
        }),
        enabled_classes: Some(classes_without_rloop()),
        ..ScanConfig::default()
    }
}

fn direct_cfg() -> ScanConfig {
    ScanConfig {
        enabled_classes: Some(classes_without_rloop()),
        ..ScanConfig::default()
    }
}

fn classes_without_rloop() -> Vec<String> {
    Class::STRUCTURAL
        .into_iter()
        .filter(|c| *c != Class::RLoop)
        .map(|c| c.name().to_string())
        .collect()
}

/// Motif blocks spread over several kilobases, separated by fillers with no
/// internal repeats and distinct per block (so no spurious direct repeats
/// link the blocks).
fn composite_sequence() -> Vec<u8> {
    let fillers: [&[u8]; 6] = [
        b"ACTGTCAGTCATGCAGTACTGATCGTACAGT",
        b"TGCATCAGTGCAAGCTAGTCAGATCCGTACA",
        b"GATCCATGACTAGCATGCAAGTCATGACCGT",
        b"CATGCTAGACGTAGCATCAGACGATGTCCAT",
        b"AGTCAGATGCCATAGCTGACATGCATGACGT",
        b"TACGATCAGCATGCTACAGTCAGCATGCATC",
    ];
    let blocks: [&[u8]; 5] = [
        b"TTAGGGTTAGGGTTAGGGTTAGGG",
        b"CAGCAGCAGCAGCAGCAGCAGCAG",
        b"CCCCACCCCACCCCACCCC",
        b"CGCGCGCGCGCGCGCGCG",
        b"GAAGAAGAAGAAGAAGAA",
    ];
    let mut seq = Vec::new();
    for round in 0..4 {
        for (i, block) in blocks.iter().enumerate() {
            // ~500 bp of filler pushes blocks apart so nothing pairs as a
            // direct repeat (offset cap is 400 bp).
            for k in 0..16 {
                seq.extend_from_slice(fillers[(round + i + k) % fillers.len()]);
            }
            seq.extend_from_slice(block);
        }
    }
    seq
}

#[test]
fn chunked_equals_direct_on_composite_sequence() {
    let seq = composite_sequence();
    let direct = scan_with(&seq, direct_cfg());
    for (chunk, overlap) in [(4_000u64, 800u64), (3_000, 900), (2_000, 850)] {
        let chunked = scan_with(&seq, chunked_cfg(chunk, overlap));
        assert_eq!(
            shape(&direct),
            shape(&chunked),
            "chunk {chunk}/{overlap} diverged from direct"
        );
    }
}

#[test]
fn run_twice_is_deterministic() {
    let seq = composite_sequence();
    let a = scan_with(&seq, chunked_cfg(2_000, 850));
    let b = scan_with(&seq, chunked_cfg(2_000, 850));
    assert_eq!(a, b);
}

#[test]
fn long_tract_spanning_chunks_consolidates_to_one_motif() {
    // A 3 kb A-tract across three 1 kb chunks.
    let mut seq = Vec::new();
    seq.extend_from_slice(b"GCGTACGTAC");
    seq.extend_from_slice(&b"A".repeat(3_000));
    seq.extend_from_slice(b"GCGTACGTAC");
    let motifs = scan_with(&seq, chunked_cfg(1_000, 200));
    let local: Vec<_> = motifs
        .iter()
        .filter(|m| m.subclass == "Local Curvature")
        .collect();
    assert_eq!(local.len(), 1);
    assert_eq!((local[0].start, local[0].end), (10, 3_010));
    // Score reflects the full merged tract, same as the direct run.
    let direct = scan_with(&seq, direct_cfg());
    let direct_local: Vec<_> = direct
        .iter()
        .filter(|m| m.subclass == "Local Curvature")
        .collect();
    assert_eq!(direct_local[0].raw_score, local[0].raw_score);
}

#[test]
fn motif_on_core_boundary_is_reported_exactly_once() {
    // Place a telomeric repeat straddling the 800 core boundary of a
    // 1000/200 chunking.
    let mut seq = b"ACTGTCAGTCATGCAGTACTGATCGTACAGT"
        .repeat(26)[..790]
        .to_vec();
    seq.extend_from_slice(&b"TTAGGG".repeat(4));
    seq.extend_from_slice(&b"TGCATCAGTGCAAGCTAGTCAGATCCGTACA".repeat(10));
    let motifs = scan_with(&seq, chunked_cfg(1_000, 200));
    let telomeric: Vec<_> = motifs
        .iter()
        .filter(|m| m.subclass == "Telomeric")
        .collect();
    assert_eq!(telomeric.len(), 1);
    assert_eq!(telomeric[0].start, 790);
}

#[test]
fn tiny_sequences_produce_no_motifs_and_are_skipped() {
    use core_engine::{ScanEngine, SequenceStatus};
    use core_store::ResultStore;

    let dir = tempfile::tempdir().unwrap();
    let mut store = ResultStore::create(dir.path().join("out.ndjson")).unwrap();
    let engine = ScanEngine::new(ScanConfig {
        max_workers: 2,
        ..ScanConfig::default()
    })
    .unwrap();
    let inputs: Vec<(String, Vec<u8>)> = (0..10)
        .map(|n| (format!("s{n}"), b"ACGTACGTA"[..n].to_vec()))
        .collect();
    let summary = engine.run(inputs, &mut store).unwrap();
    assert_eq!(summary.sequences.len(), 10);
    for s in &summary.sequences {
        assert_eq!(s.status, SequenceStatus::Skipped);
        assert_eq!(s.motif_count, 0);
    }
    assert_eq!(store.summary().total_count, 0);
}

#[test]
fn zero_timeout_marks_sequence_timed_out() {
    use core_engine::{ScanEngine, SequenceStatus};
    use core_store::ResultStore;

    let dir = tempfile::tempdir().unwrap();
    let mut store = ResultStore::create(dir.path().join("out.ndjson")).unwrap();
    let engine = ScanEngine::new(ScanConfig {
        max_workers: 2,
        per_sequence_timeout_ms: Some(0),
        ..ScanConfig::default()
    })
    .unwrap();
    let summary = engine
        .run(
            vec![("s".to_string(), composite_sequence())],
            &mut store,
        )
        .unwrap();
    assert_eq!(summary.status_of("s"), Some(SequenceStatus::TimedOut));
    assert_eq!(summary.error_counts["timeout"], 1);
}
