#![allow(dead_code)] // Shared across several integration tests; each binary uses a subset.

use core_engine::{ScanConfig, ScanEngine};
use core_model::Motif;
use core_seq::Sequence;
use core_taxonomy::Class;

/// Engine with deterministic worker count and otherwise default config.
pub fn engine() -> ScanEngine {
    engine_with(ScanConfig::default())
}

pub fn engine_with(mut cfg: ScanConfig) -> ScanEngine {
    if cfg.max_workers == 0 {
        cfg.max_workers = 2;
    }
    ScanEngine::new(cfg).expect("valid test config")
}

/// Run the full pipeline over one in-memory sequence.
pub fn scan(seq: &[u8]) -> Vec<Motif> {
    scan_with(seq, ScanConfig::default())
}

pub fn scan_with(seq: &[u8], cfg: ScanConfig) -> Vec<Motif> {
    let sequence = Sequence::new("test", seq).expect("valid test sequence");
    engine_with(cfg).scan_sequence(&sequence).expect("scan")
}

/// Motifs of one class.
pub fn of_class(motifs: &[Motif], class: Class) -> Vec<Motif> {
    motifs.iter().filter(|m| m.class == class).cloned().collect()
}

/// Comparable shape of a motif set, ignoring features (multiset semantics).
pub fn shape(motifs: &[Motif]) -> Vec<(String, String, u64, u64)> {
    let mut v: Vec<(String, String, u64, u64)> = motifs
        .iter()
        .map(|m| (m.class.to_string(), m.subclass.clone(), m.start, m.end))
        .collect();
    v.sort();
    v
}
