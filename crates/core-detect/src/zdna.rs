//! Z-DNA detection: the classical 10-mer propensity scan and the eGZ
//! trinucleotide expansion, reported independently.
//!
//! Classical scoring distributes every tabulated 10-mer's propensity as
//! `score/10` onto each of its ten positions, then extracts maximal
//! positive-contribution regions and keeps those whose cumulative per-base
//! sum reaches 50.0. The rolling 2-bit window makes the table lookup O(n);
//! a prefix sum over the contribution array makes region sums O(1).
//!
//! eGZ is a tandem-repeat scan over {CGG, GGC, CCG, GCC} (and, behind a
//! config flag, (GC)n dinucleotide runs); three copies is the floor.

use crate::{Detector, DetectorParams, build_motif};
use core_model::{Features, Motif, NormSpec, Strand};
use core_seq::gc_fraction;
use core_taxonomy::Class;
use core_tables::{TABLE_K, zdna_score_code};
use serde_json::json;

/// Region acceptance threshold on the cumulative per-base sum.
const MIN_CUMULATIVE: f64 = 50.0;

const EGZ_UNITS: [&[u8; 3]; 4] = [b"CGG", b"GGC", b"CCG", b"GCC"];
const EGZ_MIN_COPIES: usize = 3;
const EGZ_ACCEPT: f64 = 0.80;
pub const EGZ_NORM: NormSpec = NormSpec::linear(0.8, 3.0);
/// (GC)n admission floor when the dinucleotide flag is on.
const GC_DINUC_MIN_COPIES: usize = 6;

/// eGZ raw score: copy count against the unit's admission floor.
pub fn egz_raw(copies: usize, unit_len: usize) -> f64 {
    let floor = if unit_len == 2 {
        GC_DINUC_MIN_COPIES
    } else {
        EGZ_MIN_COPIES
    };
    0.85 * copies as f64 / floor as f64
}

pub struct ZDnaDetector {
    include_gc_dinucleotide: bool,
}

impl ZDnaDetector {
    pub fn new(params: &DetectorParams) -> Self {
        Self {
            include_gc_dinucleotide: params.egz_include_gc_dinucleotide,
        }
    }

    fn scan_classical(&self, seq: &[u8], seq_id: &str, offset: u64, out: &mut Vec<Motif>) {
        if seq.len() < TABLE_K {
            return;
        }
        let mut contrib = vec![0.0f64; seq.len()];
        let mask = (1u64 << (2 * TABLE_K)) - 1;
        let mut code = 0u64;
        let mut valid = 0usize;
        for (i, &b) in seq.iter().enumerate() {
            let two = match b {
                b'A' => 0u64,
                b'C' => 1,
                b'G' => 2,
                b'T' => 3,
                _ => {
                    valid = 0;
                    code = 0;
                    continue;
                }
            };
            code = ((code << 2) | two) & mask;
            valid += 1;
            if valid >= TABLE_K
                && let Some(score) = zdna_score_code(code)
            {
                let start = i + 1 - TABLE_K;
                let per_base = score / TABLE_K as f64;
                contrib[start..=i].iter_mut().for_each(|c| *c += per_base);
            }
        }

        // Maximal positive regions; cumulative sum per region.
        let mut i = 0;
        while i < contrib.len() {
            if contrib[i] > 0.0 {
                let start = i;
                let mut sum = 0.0;
                while i < contrib.len() && contrib[i] > 0.0 {
                    sum += contrib[i];
                    i += 1;
                }
                if sum >= MIN_CUMULATIVE {
                    let features = Features::from([
                        ("cumulative_score".to_string(), json!(sum)),
                        ("gc_fraction".to_string(), json!(gc_fraction(&seq[start..i]))),
                    ]);
                    out.push(build_motif(
                        Class::ZDna,
                        "Z-DNA",
                        seq_id,
                        offset,
                        start,
                        i,
                        Strand::Unstranded,
                        sum,
                        NormSpec::zdna_cumulative(),
                        "zdna_10mer",
                        features,
                    ));
                }
            } else {
                i += 1;
            }
        }
    }

    fn scan_egz(&self, seq: &[u8], seq_id: &str, offset: u64, out: &mut Vec<Motif>) {
        for unit in EGZ_UNITS {
            for (start, copies) in tandem_runs(seq, unit, EGZ_MIN_COPIES) {
                let raw = egz_raw(copies, unit.len());
                if raw < EGZ_ACCEPT {
                    continue;
                }
                let end = start + copies * unit.len();
                let features = Features::from([
                    ("unit".to_string(), json!(String::from_utf8_lossy(unit))),
                    ("repeat_count".to_string(), json!(copies)),
                ]);
                out.push(build_motif(
                    Class::ZDna,
                    "eGZ",
                    seq_id,
                    offset,
                    start,
                    end,
                    Strand::Unstranded,
                    raw,
                    EGZ_NORM,
                    "egz_repeat",
                    features,
                ));
            }
        }
        if self.include_gc_dinucleotide {
            for unit in [b"GC", b"CG"] {
                for (start, copies) in tandem_runs(seq, unit, GC_DINUC_MIN_COPIES) {
                    let raw = egz_raw(copies, unit.len());
                    if raw < EGZ_ACCEPT {
                        continue;
                    }
                    let end = start + copies * unit.len();
                    let features = Features::from([
                        ("unit".to_string(), json!(String::from_utf8_lossy(unit))),
                        ("repeat_count".to_string(), json!(copies)),
                    ]);
                    out.push(build_motif(
                        Class::ZDna,
                        "eGZ",
                        seq_id,
                        offset,
                        start,
                        end,
                        Strand::Unstranded,
                        raw,
                        EGZ_NORM,
                        "egz_repeat",
                        features,
                    ));
                }
            }
        }
    }
}

/// Maximal tandem runs of `unit` with at least `min_copies` full copies:
/// `(start, copies)` pairs, non-overlapping for a fixed unit.
pub(crate) fn tandem_runs(seq: &[u8], unit: &[u8], min_copies: usize) -> Vec<(usize, usize)> {
    let u = unit.len();
    let mut found = Vec::new();
    let mut i = 0;
    while i + u * min_copies <= seq.len() {
        let mut copies = 0;
        while i + (copies + 1) * u <= seq.len() && &seq[i + copies * u..i + (copies + 1) * u] == unit
        {
            copies += 1;
        }
        if copies >= min_copies {
            found.push((i, copies));
            i += copies * u;
        } else {
            i += 1;
        }
    }
    found
}

impl Detector for ZDnaDetector {
    fn class(&self) -> Class {
        Class::ZDna
    }

    fn subclasses(&self) -> &'static [&'static str] {
        Class::ZDna.subclasses()
    }

    fn norm_spec(&self) -> NormSpec {
        NormSpec::zdna_cumulative()
    }

    fn scan(&self, seq: &[u8], seq_id: &str, offset: u64) -> Vec<Motif> {
        let mut out = Vec::new();
        self.scan_classical(seq, seq_id, offset, &mut out);
        self.scan_egz(seq, seq_id, offset, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(seq: &[u8]) -> Vec<Motif> {
        ZDnaDetector::new(&DetectorParams::default()).scan(seq, "t", 0)
    }

    #[test]
    fn cg_sixteen_mer_clears_cumulative_threshold() {
        let out = scan(b"CGCGCGCGCGCGCGCG");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].subclass, "Z-DNA");
        assert!(out[0].raw_score >= 50.0);
        assert_eq!((out[0].start, out[0].end), (0, 16));
    }

    #[test]
    fn short_cg_tract_stays_below_threshold() {
        assert!(scan(b"CGCGCGCGCGCG").is_empty());
    }

    #[test]
    fn ca_alternation_needs_more_length_than_cg() {
        // (CA)8 scores tabulated windows but the cumulative sum is below 50.
        assert!(scan(b"CACACACACACACACA").is_empty());
    }

    #[test]
    fn egz_trinucleotide_run() {
        let out = scan(b"CGGCGGCGGCGGCGG");
        let egz: Vec<&Motif> = out.iter().filter(|m| m.subclass == "eGZ").collect();
        assert_eq!(egz.len(), 1);
        assert_eq!(egz[0].features["repeat_count"], json!(5));
        assert_eq!(egz[0].features["unit"], json!("CGG"));
        assert!((egz[0].raw_score - 0.85 * 5.0 / 3.0).abs() < 1e-12);
        // No classical region: CGG repeats are not tabulated alternations.
        assert!(out.iter().all(|m| m.subclass == "eGZ"));
    }

    #[test]
    fn gc_dinucleotide_repeat_needs_the_flag() {
        let seq = b"ATGCGCGCGCGCGCATAT";
        let off = ZDnaDetector::new(&DetectorParams::default());
        assert!(
            off.scan(seq, "t", 0)
                .iter()
                .all(|m| m.subclass != "eGZ")
        );
        let params = DetectorParams {
            egz_include_gc_dinucleotide: true,
            ..DetectorParams::default()
        };
        let on = ZDnaDetector::new(&params);
        assert!(
            on.scan(seq, "t", 0)
                .iter()
                .any(|m| m.subclass == "eGZ")
        );
    }

    #[test]
    fn n_breaks_the_rolling_window() {
        assert!(scan(b"CGCGCGCGNCGCGCGCG").is_empty());
    }
}
