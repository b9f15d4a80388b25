//! Static scoring tables and thermodynamic parameters.
//!
//! Everything in this crate is process-wide read-only data: the tables are
//! compiled in, and the hashed lookup maps over them are built once behind a
//! `OnceLock` and shared by reference across worker threads. Mutating any of
//! it is a bug by definition.

use core_seq::index::encode_kmer;
use std::collections::HashMap;
use std::sync::OnceLock;

pub mod aphilic10;
pub mod nn;
pub mod zdna10;

pub use aphilic10::APHILIC_10MER;
pub use nn::{NN_DELTA_G, hairpin_loop_penalty, nn_delta_g};
pub use zdna10::ZDNA_10MER;

/// Length of the propensity-table k-mers.
pub const TABLE_K: usize = 10;

fn build_map(entries: &[(&[u8; 10], f64)]) -> HashMap<u64, f64> {
    entries
        .iter()
        .map(|&(kmer, score)| {
            let code = encode_kmer(kmer).expect("table 10-mers are ACGT-only");
            (code, score)
        })
        .collect()
}

fn zdna_map() -> &'static HashMap<u64, f64> {
    static MAP: OnceLock<HashMap<u64, f64>> = OnceLock::new();
    MAP.get_or_init(|| build_map(&ZDNA_10MER))
}

fn aphilic_map() -> &'static HashMap<u64, f64> {
    static MAP: OnceLock<HashMap<u64, f64>> = OnceLock::new();
    MAP.get_or_init(|| build_map(&APHILIC_10MER))
}

/// Z-DNA propensity of a 2-bit-encoded 10-mer; `None` when untabulated.
#[inline]
pub fn zdna_score_code(code: u64) -> Option<f64> {
    zdna_map().get(&code).copied()
}

/// Z-DNA propensity of a 10-mer slice; `None` for untabulated or non-ACGT.
pub fn zdna_score(kmer: &[u8]) -> Option<f64> {
    debug_assert_eq!(kmer.len(), TABLE_K);
    encode_kmer(kmer).and_then(zdna_score_code)
}

/// A-philic log2 propensity of a 2-bit-encoded 10-mer.
#[inline]
pub fn aphilic_log2_code(code: u64) -> Option<f64> {
    aphilic_map().get(&code).copied()
}

/// A-philic log2 propensity of a 10-mer slice.
pub fn aphilic_log2(kmer: &[u8]) -> Option<f64> {
    debug_assert_eq!(kmer.len(), TABLE_K);
    encode_kmer(kmer).and_then(aphilic_log2_code)
}

/// G4Hunter run weight: a base inside a G (or C) run of length `run_len`
/// contributes ±`min(run_len, 4)`.
#[inline]
pub fn g4_run_weight(run_len: usize) -> f64 {
    run_len.min(4) as f64
}
