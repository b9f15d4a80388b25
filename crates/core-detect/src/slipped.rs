//! Slipped-structure detection: short tandem repeats and longer direct
//! repeats, the two substrates of replication slippage.
//!
//! STRs are maximal perfect tandem arrays of a primitive unit (1..6 bp);
//! copy-number floors scale with unit length so that mononucleotide runs
//! need 12 copies while hexamers need 3. Direct repeats are seed-and-extend
//! duplications (unit 10..300, spacer ≤ 100, zero mismatches); any arm whose
//! smallest period is ≤ 6 belongs to the STR subclass and is skipped here.

use crate::{Detector, build_motif, resolve_by_priority};
use core_model::{Features, Motif, NormSpec, Strand};
use core_seq::index::KmerIndex;
use core_taxonomy::Class;
use serde_json::json;
use std::collections::HashSet;

/// Both slipped subclasses share the plain unit-interval profile.
pub const STR_NORM: NormSpec = NormSpec::linear(0.0, 1.0);

/// STR raw score: length-saturating at 50 bp.
pub fn str_raw(total_len: usize) -> f64 {
    (total_len as f64 / 50.0).min(1.0)
}

const STR_MIN_TOTAL: usize = 12;
const DR_SEED_K: usize = 10;
const DR_MIN_UNIT: usize = 10;
const DR_MAX_UNIT: usize = 300;
const DR_MAX_SPACER: usize = 100;

pub struct SlippedDetector;

impl SlippedDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SlippedDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy-number floor by unit length.
fn str_min_copies(unit_len: usize) -> usize {
    match unit_len {
        1 => 12,
        2 => 6,
        3 => 4,
        _ => 3,
    }
}

/// Smallest period of `s` (brute force; callers only ask about short
/// windows or bounded periods).
fn smallest_period(s: &[u8]) -> usize {
    for p in 1..s.len() {
        if s.len().is_multiple_of(p) && s.chunks(p).all(|c| c == &s[..p]) {
            return p;
        }
    }
    s.len()
}

/// True when `s` is not a whole-number repetition of a shorter unit.
fn is_primitive(s: &[u8]) -> bool {
    smallest_period(s) == s.len()
}

/// True when every window of `s` has local period ≤ 6, i.e. the region is
/// STR-like rather than a genuine long-unit duplication.
fn str_like(s: &[u8]) -> bool {
    if s.len() < 2 {
        return true;
    }
    for p in 1..=6.min(s.len() - 1) {
        if s[p..] == s[..s.len() - p] {
            return true;
        }
    }
    false
}

fn scan_str(seq: &[u8], seq_id: &str, offset: u64, out: &mut Vec<Motif>) {
    for unit_len in 1..=6usize {
        let min_copies = str_min_copies(unit_len);
        let mut i = 0;
        while i + unit_len * min_copies <= seq.len() {
            let unit = &seq[i..i + unit_len];
            if unit.contains(&b'N') || !is_primitive(unit) {
                i += 1;
                continue;
            }
            let mut copies = 1;
            while i + (copies + 1) * unit_len <= seq.len()
                && &seq[i + copies * unit_len..i + (copies + 1) * unit_len] == unit
            {
                copies += 1;
            }
            let total = copies * unit_len;
            if copies >= min_copies && total >= STR_MIN_TOTAL {
                let raw = (total as f64 / 50.0).min(1.0);
                let features = Features::from([
                    ("unit".to_string(), json!(String::from_utf8_lossy(unit))),
                    ("unit_len".to_string(), json!(unit_len)),
                    ("copy_number".to_string(), json!(copies)),
                    ("total_len".to_string(), json!(total)),
                ]);
                out.push(build_motif(
                    Class::SlippedDna,
                    "STR",
                    seq_id,
                    offset,
                    i,
                    i + total,
                    Strand::Unstranded,
                    raw,
                    STR_NORM,
                    "str_tandem",
                    features,
                ));
                i += total;
            } else {
                i += 1;
            }
        }
    }
}

fn scan_direct_repeat(seq: &[u8], seq_id: &str, offset: u64, out: &mut Vec<Motif>) {
    if seq.len() < 2 * DR_SEED_K {
        return;
    }
    let index = KmerIndex::build(seq, DR_SEED_K);
    let mut seen: HashSet<(usize, usize, usize)> = HashSet::new();
    let mut cands = Vec::new();

    for p0 in 0..=seq.len() - DR_SEED_K {
        let seed = &seq[p0..p0 + DR_SEED_K];
        if str_like(seed) {
            continue;
        }
        for &q0 in index.positions(seed) {
            let q0 = q0 as usize;
            let d = q0.saturating_sub(p0);
            if d < DR_MIN_UNIT || d > DR_MAX_UNIT + DR_MAX_SPACER {
                continue;
            }
            let (mut p, mut q, mut len) = (p0, q0, DR_SEED_K);
            // Unit length is bounded by the offset (copies must not overlap).
            let max_len = d.min(DR_MAX_UNIT);
            while len < max_len && q + len < seq.len() && seq[p + len] == seq[q + len] {
                len += 1;
            }
            while len < max_len && p > 0 && seq[p - 1] == seq[q - 1] {
                p -= 1;
                q -= 1;
                len += 1;
            }
            let spacer = q - p - len;
            if len < DR_MIN_UNIT || spacer > DR_MAX_SPACER {
                continue;
            }
            if !seen.insert((p, q, len)) {
                continue;
            }
            if str_like(&seq[p..p + len]) {
                continue;
            }
            let raw = (len as f64 / 50.0).min(1.0);
            let features = Features::from([
                ("unit_len".to_string(), json!(len)),
                ("spacer_len".to_string(), json!(spacer)),
            ]);
            cands.push(build_motif(
                Class::SlippedDna,
                "Direct Repeat",
                seq_id,
                offset,
                p,
                q + len,
                Strand::Unstranded,
                raw,
                STR_NORM,
                "direct_repeat",
                features,
            ));
        }
    }

    out.extend(resolve_by_priority(cands, &["Direct Repeat"]));
}

impl Detector for SlippedDetector {
    fn class(&self) -> Class {
        Class::SlippedDna
    }

    fn subclasses(&self) -> &'static [&'static str] {
        Class::SlippedDna.subclasses()
    }

    fn norm_spec(&self) -> NormSpec {
        STR_NORM
    }

    fn scan(&self, seq: &[u8], seq_id: &str, offset: u64) -> Vec<Motif> {
        let mut out = Vec::new();
        scan_str(seq, seq_id, offset, &mut out);
        scan_direct_repeat(seq, seq_id, offset, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(seq: &[u8]) -> Vec<Motif> {
        SlippedDetector::new().scan(seq, "t", 0)
    }

    #[test]
    fn cag_expansion_is_a_single_str() {
        let out = scan(b"CAGCAGCAGCAGCAGCAGCAGCAG");
        assert_eq!(out.len(), 1);
        let m = &out[0];
        assert_eq!(m.subclass, "STR");
        assert_eq!(m.features["unit"], json!("CAG"));
        assert_eq!(m.features["copy_number"], json!(8));
        assert_eq!((m.start, m.end), (0, 24));
    }

    #[test]
    fn mononucleotide_needs_twelve_copies() {
        assert!(scan(b"AAAAAAAAAAA").is_empty()); // 11
        let out = scan(b"AAAAAAAAAAAA"); // 12
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].features["unit_len"], json!(1));
    }

    #[test]
    fn non_primitive_units_are_not_double_counted() {
        // (AT)8: only the dinucleotide framing is reported, not ATAT etc.
        let out = scan(b"ATATATATATATATAT");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].features["unit"], json!("AT"));
    }

    #[test]
    fn direct_repeat_with_spacer() {
        // A 14 bp non-periodic unit, a 5 bp spacer, then the unit again.
        let unit = b"ACGTTGCAGGATCC";
        let mut seq = Vec::new();
        seq.extend_from_slice(unit);
        seq.extend_from_slice(b"TTTTT");
        seq.extend_from_slice(unit);
        let out = scan(&seq);
        assert_eq!(out.len(), 1);
        let m = &out[0];
        assert_eq!(m.subclass, "Direct Repeat");
        assert_eq!(m.features["unit_len"], json!(14));
        assert_eq!(m.features["spacer_len"], json!(5));
        assert_eq!((m.start, m.end), (0, seq.len() as u64));
    }

    #[test]
    fn tandem_repeats_do_not_masquerade_as_direct_repeats() {
        let out = scan(b"CAGCAGCAGCAGCAGCAGCAGCAG");
        assert!(out.iter().all(|m| m.subclass == "STR"));
    }

    #[test]
    fn unique_sequence_is_silent() {
        assert!(scan(b"ACGTTGCAGGATCCAATTGGCCAA").is_empty());
    }
}
