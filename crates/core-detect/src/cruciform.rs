//! Cruciform detection: inverted repeats found by seed-and-extend, validated
//! thermodynamically.
//!
//! A 6-mer index pairs every seed with upstream occurrences of its reverse
//! complement; arms are grown outward and inward to their mismatch-free
//! maximum, then geometry (arm 8..50, loop 0..12) and a nearest-neighbour
//! ΔG gate (stem sum plus loop entropy, accept at ≤ −5 kcal/mol) decide
//! whether the stem could plausibly extrude.

use crate::{Detector, DetectorParams, build_motif, resolve_by_priority};
use core_model::{Features, Motif, NormSpec, Strand};
use core_seq::index::KmerIndex;
use core_seq::{pairs, revcomp};
use core_taxonomy::Class;
use core_tables::{hairpin_loop_penalty, nn_delta_g};
use serde_json::json;
use std::collections::HashSet;

const SEED_K: usize = 6;
const ACCEPT_DELTA_G: f64 = -5.0;
const NORM: NormSpec = NormSpec::linear(0.25, 1.0);
const SUBCLASS: &str = "Cruciform forming IRs";

pub struct CruciformDetector {
    min_arm: usize,
    max_arm: usize,
    max_loop: usize,
}

impl CruciformDetector {
    pub fn new(params: &DetectorParams) -> Self {
        Self {
            min_arm: params.cruciform_min_arm,
            max_arm: params.cruciform_max_arm,
            max_loop: params.cruciform_max_loop,
        }
    }
}

/// Stem ΔG: nearest-neighbour sum over the left arm's steps.
fn stem_delta_g(arm: &[u8]) -> Option<f64> {
    let mut dg = 0.0;
    for pair in arm.windows(2) {
        dg += nn_delta_g(pair[0], pair[1])?;
    }
    Some(dg)
}

impl Detector for CruciformDetector {
    fn class(&self) -> Class {
        Class::Cruciform
    }

    fn subclasses(&self) -> &'static [&'static str] {
        Class::Cruciform.subclasses()
    }

    fn norm_spec(&self) -> NormSpec {
        NORM
    }

    fn scan(&self, seq: &[u8], seq_id: &str, offset: u64) -> Vec<Motif> {
        if seq.len() < 2 * SEED_K {
            return Vec::new();
        }
        let index = KmerIndex::build(seq, SEED_K);
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        let mut cands = Vec::new();

        for p in 0..=seq.len() - SEED_K {
            let seed = &seq[p..p + SEED_K];
            let rc = revcomp(seed);
            for &q in index.positions(&rc) {
                let q = q as usize;
                if q < p + SEED_K {
                    continue;
                }
                // Arms: left [la, ae), right [bs, be); seq[la+t] pairs
                // seq[be-1-t] throughout.
                let (mut la, mut ae, mut bs, mut be) = (p, p + SEED_K, q, q + SEED_K);
                // Inward growth shrinks the loop two bases at a time.
                while ae - la < self.max_arm && bs - ae >= 2 && pairs(seq[ae], seq[bs - 1]) {
                    ae += 1;
                    bs -= 1;
                }
                // Outward growth.
                while ae - la < self.max_arm
                    && la > 0
                    && be < seq.len()
                    && pairs(seq[la - 1], seq[be])
                {
                    la -= 1;
                    be += 1;
                }
                let arm_len = ae - la;
                let loop_len = bs - ae;
                if arm_len < self.min_arm || loop_len > self.max_loop {
                    continue;
                }
                if !seen.insert((la, be)) {
                    continue;
                }
                let Some(stem) = stem_delta_g(&seq[la..ae]) else {
                    continue;
                };
                let delta_g = stem + hairpin_loop_penalty(loop_len);
                if delta_g > ACCEPT_DELTA_G {
                    continue;
                }
                let raw = (-delta_g / 20.0).clamp(0.0, 1.0);
                let features = Features::from([
                    ("arm_len".to_string(), json!(arm_len)),
                    ("loop_len".to_string(), json!(loop_len)),
                    ("delta_g".to_string(), json!(delta_g)),
                ]);
                cands.push(build_motif(
                    Class::Cruciform,
                    SUBCLASS,
                    seq_id,
                    offset,
                    la,
                    be,
                    Strand::Unstranded,
                    raw,
                    NORM,
                    "cruciform_ir",
                    features,
                ));
            }
        }

        resolve_by_priority(cands, &[SUBCLASS])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(seq: &[u8]) -> Vec<Motif> {
        CruciformDetector::new(&DetectorParams::default()).scan(seq, "t", 0)
    }

    #[test]
    fn perfect_inverted_repeat_with_loop() {
        let out = scan(b"ATCGATCGATCGNNNCGATCGATCGAT");
        assert_eq!(out.len(), 1);
        let m = &out[0];
        assert_eq!(m.features["arm_len"], json!(12));
        assert_eq!(m.features["loop_len"], json!(3));
        assert!(m.features["delta_g"].as_f64().unwrap() < -5.0);
        assert_eq!((m.start, m.end), (0, 27));
    }

    #[test]
    fn short_arms_are_rejected() {
        // 6 bp arms fall under the 8 bp minimum.
        assert!(scan(b"GAATTCAAAGAATTC").is_empty());
    }

    #[test]
    fn weak_at_stem_fails_the_energy_gate() {
        // AT-only stems stack poorly; an 8 bp arm of TA steps stays above
        // -5 kcal/mol after the loop penalty.
        let out = scan(b"ATATATATGCGTATATATAT");
        assert!(out.iter().all(|m| m.features["delta_g"].as_f64().unwrap() <= -5.0));
    }

    #[test]
    fn gc_stem_passes_comfortably() {
        let out = scan(b"GCGCGCGCTTTGCGCGCGC");
        assert!(!out.is_empty());
        assert!(out[0].raw_score > 0.5);
    }

    #[test]
    fn no_candidates_without_inverted_match() {
        assert!(scan(b"AAAAAAAAAAAAAAAAAAAA").is_empty());
    }
}
