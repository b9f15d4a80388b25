//! Triplex detection: H-DNA mirror repeats and sticky GAA·TTC expansions.
//!
//! Mirror repeats reuse the seed-and-extend machinery shape of the cruciform
//! scan with reversal instead of reverse complement: the right arm reads the
//! left arm backwards, base for base. Geometry is arm 10..100 and loop ≤ 8,
//! and the arm must be ≥ 90% one chemistry (purine or pyrimidine) to donate
//! a third strand.
//!
//! Sticky DNA is a plain tandem-repeat count over GAA/TTC with the piecewise
//! copy-number score; its normalization range is deliberately narrow (the
//! curve saturates quickly, so long Friedreich-scale expansions all pin at
//! the top of the scale).

use crate::zdna::tandem_runs;
use crate::{Detector, build_motif, resolve_by_priority};
use core_model::{Features, Motif, NormSpec, Strand};
use core_seq::index::KmerIndex;
use core_taxonomy::Class;
use serde_json::json;
use std::collections::HashSet;

const SEED_K: usize = 6;
const MIN_ARM: usize = 10;
const MAX_ARM: usize = 100;
const MAX_LOOP: usize = 8;
const MIN_PURITY: f64 = 0.90;
const MIRROR_NORM: NormSpec = NormSpec::linear(1.0, 3.0);

const STICKY_UNITS: [&[u8; 3]; 2] = [b"GAA", b"TTC"];
const STICKY_MIN_COPIES: usize = 4;
pub const STICKY_NORM: NormSpec = NormSpec::linear(1.0, 1.15);

pub struct TriplexDetector;

impl TriplexDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TriplexDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Piecewise sticky-DNA score by copy number.
pub fn sticky_score(copies: usize) -> f64 {
    let n = copies as f64;
    match copies {
        0..20 => 1.0 + 0.015 * n,
        20..40 => 1.3 + 0.03 * (n - 20.0),
        40..60 => 2.0 + 0.02 * (n - 40.0),
        _ => 2.6 + 0.01 * (n - 60.0),
    }
}

#[inline]
fn mirror_ok(a: u8, b: u8) -> bool {
    a == b && a != b'N'
}

fn scan_mirror(seq: &[u8], seq_id: &str, offset: u64, out: &mut Vec<Motif>) {
    if seq.len() < 2 * SEED_K {
        return;
    }
    let index = KmerIndex::build(seq, SEED_K);
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut cands = Vec::new();

    for p in 0..=seq.len() - SEED_K {
        let seed = &seq[p..p + SEED_K];
        let reversed: Vec<u8> = seed.iter().rev().copied().collect();
        for &q in index.positions(&reversed) {
            let q = q as usize;
            if q < p + SEED_K {
                continue;
            }
            let (mut la, mut ae, mut bs, mut be) = (p, p + SEED_K, q, q + SEED_K);
            while ae - la < MAX_ARM && bs - ae >= 2 && mirror_ok(seq[ae], seq[bs - 1]) {
                ae += 1;
                bs -= 1;
            }
            while ae - la < MAX_ARM && la > 0 && be < seq.len() && mirror_ok(seq[la - 1], seq[be])
            {
                la -= 1;
                be += 1;
            }
            let arm_len = ae - la;
            let loop_len = bs - ae;
            if arm_len < MIN_ARM || loop_len > MAX_LOOP {
                continue;
            }
            if !seen.insert((la, be)) {
                continue;
            }
            let arm = &seq[la..ae];
            let purines = arm.iter().filter(|&&b| b == b'A' || b == b'G').count();
            let pyrimidines = arm.iter().filter(|&&b| b == b'C' || b == b'T').count();
            let majority = purines.max(pyrimidines);
            let purity = majority as f64 / arm_len as f64;
            if purity < MIN_PURITY {
                continue;
            }
            let interruptions = arm_len - majority;
            let l_term = ((arm_len as f64).ln() / 35f64.ln()).min(1.0);
            let h_term = (-0.4 * loop_len as f64).exp();
            let p_term = ((purity - 0.8) / 0.2).max(0.0);
            let i_term = 1.0 / (1.0 + interruptions as f64);
            let raw = 1.0
                + 2.0
                    * (l_term * 0.35 + h_term * 0.20 + p_term * 0.30 + i_term * 0.15).min(1.0);
            let features = Features::from([
                ("arm_len".to_string(), json!(arm_len)),
                ("loop_len".to_string(), json!(loop_len)),
                ("purity".to_string(), json!(purity)),
                ("interruptions".to_string(), json!(interruptions)),
            ]);
            cands.push(build_motif(
                Class::Triplex,
                "Triplex",
                seq_id,
                offset,
                la,
                be,
                Strand::Unstranded,
                raw,
                MIRROR_NORM,
                "triplex_mirror",
                features,
            ));
        }
    }

    out.extend(resolve_by_priority(cands, &["Triplex"]));
}

fn scan_sticky(seq: &[u8], seq_id: &str, offset: u64, out: &mut Vec<Motif>) {
    for unit in STICKY_UNITS {
        for (start, copies) in tandem_runs(seq, unit, STICKY_MIN_COPIES) {
            let end = start + copies * unit.len();
            let raw = sticky_score(copies);
            let features = Features::from([
                ("unit".to_string(), json!(String::from_utf8_lossy(unit))),
                ("copy_number".to_string(), json!(copies)),
            ]);
            out.push(build_motif(
                Class::Triplex,
                "Sticky DNA",
                seq_id,
                offset,
                start,
                end,
                Strand::Unstranded,
                raw,
                STICKY_NORM,
                "sticky_gaa",
                features,
            ));
        }
    }
}

impl Detector for TriplexDetector {
    fn class(&self) -> Class {
        Class::Triplex
    }

    fn subclasses(&self) -> &'static [&'static str] {
        Class::Triplex.subclasses()
    }

    fn norm_spec(&self) -> NormSpec {
        MIRROR_NORM
    }

    fn scan(&self, seq: &[u8], seq_id: &str, offset: u64) -> Vec<Motif> {
        let mut out = Vec::new();
        scan_mirror(seq, seq_id, offset, &mut out);
        scan_sticky(seq, seq_id, offset, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(seq: &[u8]) -> Vec<Motif> {
        TriplexDetector::new().scan(seq, "t", 0)
    }

    #[test]
    fn purine_mirror_repeat_is_h_dna() {
        // AGGGAGGGAG | TT | GAGGGAGGGA: pure-purine arms read the same
        // backwards; the symmetric TT centre folds into the arms (loop 0).
        let out = scan(b"AGGGAGGGAGTTGAGGGAGGGA");
        assert_eq!(out.len(), 1);
        let m = &out[0];
        assert_eq!(m.subclass, "Triplex");
        assert!(m.features["arm_len"].as_u64().unwrap() >= 10);
        assert!(m.features["purity"].as_f64().unwrap() >= 0.9);
        assert!((1.0..=3.0).contains(&m.raw_score));
    }

    #[test]
    fn mixed_chemistry_arms_fail_purity() {
        // Mirror-symmetric but alternating purine/pyrimidine: purity 0.5.
        assert!(scan(b"ACACACACACACACACACAC").is_empty());
    }

    #[test]
    fn sticky_gaa_expansion() {
        let out = scan(b"GAAGAAGAAGAAGAAGAA");
        assert_eq!(out.len(), 1);
        let m = &out[0];
        assert_eq!(m.subclass, "Sticky DNA");
        assert_eq!(m.features["copy_number"], json!(6));
        assert!((m.raw_score - 1.09).abs() < 1e-12);
        assert!((2.0..=2.6).contains(&m.normalized_score));
    }

    #[test]
    fn sticky_score_is_piecewise_and_monotone() {
        assert!((sticky_score(4) - 1.06).abs() < 1e-12);
        assert!((sticky_score(20) - 1.3).abs() < 1e-12);
        assert!((sticky_score(40) - 2.0).abs() < 1e-12);
        assert!((sticky_score(60) - 2.6).abs() < 1e-12);
        let mut prev = 0.0;
        for n in 4..200 {
            let s = sticky_score(n);
            assert!(s >= prev);
            prev = s;
        }
    }

    #[test]
    fn ttc_strand_counts_too() {
        let out = scan(b"TTCTTCTTCTTC");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].features["unit"], json!("TTC"));
    }

    #[test]
    fn three_copies_are_not_sticky() {
        assert!(scan(b"GAAGAAGAATTTT").is_empty());
    }
}
