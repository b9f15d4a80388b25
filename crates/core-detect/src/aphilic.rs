//! A-philic DNA detection: 10-mer log2-propensity lookup with per-base
//! spreading, identical machinery to the classical Z-DNA scan but over the
//! A-form table and a much lower region threshold (the table is log-odds,
//! not a cumulative propensity scale).

use crate::{Detector, build_motif};
use core_model::{Features, Motif, NormSpec, Strand};
use core_seq::gc_fraction;
use core_taxonomy::Class;
use core_tables::{TABLE_K, aphilic_log2_code};
use serde_json::json;

/// Region acceptance threshold on the summed log2 propensity.
const MIN_SUM_LOG2: f64 = 0.5;
const NORM: NormSpec = NormSpec::log(0.5, 50.0);
const SUBCLASS: &str = "A-philic DNA";

pub struct APhilicDetector;

impl APhilicDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for APhilicDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for APhilicDetector {
    fn class(&self) -> Class {
        Class::APhilicDna
    }

    fn subclasses(&self) -> &'static [&'static str] {
        Class::APhilicDna.subclasses()
    }

    fn norm_spec(&self) -> NormSpec {
        NORM
    }

    fn scan(&self, seq: &[u8], seq_id: &str, offset: u64) -> Vec<Motif> {
        if seq.len() < TABLE_K {
            return Vec::new();
        }
        let mut contrib = vec![0.0f64; seq.len()];
        let mut hits = vec![0u32; seq.len()];
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
                && let Some(log2) = aphilic_log2_code(code)
            {
                let start = i + 1 - TABLE_K;
                let per_base = log2 / TABLE_K as f64;
                contrib[start..=i].iter_mut().for_each(|c| *c += per_base);
                hits[start..=i].iter_mut().for_each(|h| *h += 1);
            }
        }

        let mut out = Vec::new();
        let mut i = 0;
        while i < contrib.len() {
            if contrib[i] > 0.0 {
                let start = i;
                let mut sum = 0.0;
                let mut max_hits = 0u32;
                while i < contrib.len() && contrib[i] > 0.0 {
                    sum += contrib[i];
                    max_hits = max_hits.max(hits[i]);
                    i += 1;
                }
                if sum >= MIN_SUM_LOG2 {
                    let features = Features::from([
                        ("sum_log2".to_string(), json!(sum)),
                        ("window_hits".to_string(), json!(max_hits)),
                        ("gc_fraction".to_string(), json!(gc_fraction(&seq[start..i]))),
                    ]);
                    out.push(build_motif(
                        Class::APhilicDna,
                        SUBCLASS,
                        seq_id,
                        offset,
                        start,
                        i,
                        Strand::Unstranded,
                        sum,
                        NORM,
                        "aphilic_10mer",
                        features,
                    ));
                }
            } else {
                i += 1;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(seq: &[u8]) -> Vec<Motif> {
        APhilicDetector::new().scan(seq, "t", 0)
    }

    #[test]
    fn poly_g_region_is_a_philic() {
        let out = scan(b"GGGGGGGGGGGG");
        assert_eq!(out.len(), 1);
        let m = &out[0];
        assert_eq!(m.subclass, "A-philic DNA");
        assert_eq!((m.start, m.end), (0, 12));
        assert!(m.raw_score >= MIN_SUM_LOG2);
        assert!((1.0..=3.0).contains(&m.normalized_score));
    }

    #[test]
    fn at_rich_sequence_is_not() {
        assert!(scan(b"ATATATATATATATAT").is_empty());
        assert!(scan(b"AAAAAAAAAATTTTTTTTTT").is_empty());
    }

    #[test]
    fn flanked_gc_block_reports_tight_region() {
        let out = scan(b"ATATATGGGGGGCCCCCCATATAT");
        assert_eq!(out.len(), 1);
        let m = &out[0];
        // The region covers exactly the positions reached by tabulated
        // windows inside the G/C block.
        assert!(m.start >= 6 && m.end <= 18);
        assert_eq!(m.features["window_hits"], json!(3));
    }

    #[test]
    fn untabulated_composition_is_silent() {
        // CGG-family repeats sit below the table cutoff.
        assert!(scan(b"CGGCGGCGGCGGCGG").is_empty());
    }
}
