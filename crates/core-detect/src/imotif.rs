//! i-Motif detection: canonical C-run chains and the HUR AC-motif.
//!
//! Canonical grammar mirrors the G-quadruplex one on the C-rich strand:
//! four C runs of length ≥ 3 with loops 1..7. The AC-motif is six fixed
//! templates: an A3 tract leading or trailing three C3 tracts, all linkers
//! a uniform 4, 5 or 6 nt. Canonical outranks AC-motif on overlap.

use crate::{Detector, build_motif, resolve_by_priority};
use core_model::{Features, Motif, NormSpec, Strand};
use core_seq::runs::find_runs;
use core_taxonomy::Class;
use regex::bytes::Regex;
use serde_json::json;

/// Subclass priority, highest first.
pub const PRIORITY: &[&str] = &["Canonical", "AC-motif (HUR)"];
const NORM: NormSpec = NormSpec::linear(0.0, 1.0);
const MAX_LOOP: usize = 7;

pub struct IMotifDetector {
    /// `(pattern, linker_len)` for the six AC-motif templates.
    ac_templates: Vec<(Regex, usize)>,
}

impl IMotifDetector {
    pub fn new() -> Self {
        let mut ac_templates = Vec::with_capacity(6);
        for linker in 4..=6usize {
            let leading = format!("AAA[ACGT]{{{linker}}}(?:CCC[ACGT]{{{linker}}}){{2}}CCC");
            let trailing = format!("(?:CCC[ACGT]{{{linker}}}){{3}}AAA");
            for pat in [leading, trailing] {
                ac_templates.push((Regex::new(&pat).expect("static pattern"), linker));
            }
        }
        Self { ac_templates }
    }
}

impl Default for IMotifDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn base_count(seq: &[u8], bases: &[u8]) -> usize {
    seq.iter().filter(|b| bases.contains(b)).count()
}

impl Detector for IMotifDetector {
    fn class(&self) -> Class {
        Class::IMotif
    }

    fn subclasses(&self) -> &'static [&'static str] {
        Class::IMotif.subclasses()
    }

    fn norm_spec(&self) -> NormSpec {
        NORM
    }

    fn overlap_priority(&self) -> Option<&'static [&'static str]> {
        Some(PRIORITY)
    }

    fn scan(&self, seq: &[u8], seq_id: &str, offset: u64) -> Vec<Motif> {
        let mut cands = Vec::new();

        // Canonical: four C≥3 runs, loops 1..7.
        let runs = find_runs(seq, b'C', 3);
        for w in runs.windows(4) {
            let gaps: Vec<usize> = w
                .windows(2)
                .map(|p| p[1].start - p[0].end)
                .collect();
            if !gaps.iter().all(|&g| (1..=MAX_LOOP).contains(&g)) {
                continue;
            }
            let (start, end) = (w[0].start, w[3].end);
            let len = end - start;
            let c_count = base_count(&seq[start..end], b"C");
            let raw = (c_count as f64 / len as f64 + (0.12f64 * 2.0).min(0.4)).clamp(0.0, 1.0);
            let features = Features::from([
                ("c_tracts".to_string(), json!(4)),
                ("loops".to_string(), json!(gaps)),
                ("c_fraction".to_string(), json!(c_count as f64 / len as f64)),
            ]);
            cands.push(build_motif(
                Class::IMotif,
                "Canonical",
                seq_id,
                offset,
                start,
                end,
                Strand::Plus,
                raw,
                NORM,
                "imotif_crun",
                features,
            ));
        }

        // AC-motif (HUR): six fixed templates.
        for (re, linker) in &self.ac_templates {
            for m in re.find_iter(seq) {
                let (start, end) = (m.start(), m.end());
                let len = end - start;
                let body = &seq[start..end];
                let ac = base_count(body, b"AC");
                let linker_boost = if *linker <= 5 { 0.25 } else { 0.12 };
                let raw = ((0.8 * ac as f64 / len as f64).min(0.6)
                    + (0.12f64 * 2.0).min(0.2)
                    + linker_boost)
                    .clamp(0.0, 1.0);
                let features = Features::from([
                    ("c_tracts".to_string(), json!(3)),
                    ("linker_len".to_string(), json!(linker)),
                    ("ac_fraction".to_string(), json!(ac as f64 / len as f64)),
                ]);
                cands.push(build_motif(
                    Class::IMotif,
                    "AC-motif (HUR)",
                    seq_id,
                    offset,
                    start,
                    end,
                    Strand::Plus,
                    raw,
                    NORM,
                    "imotif_acmotif",
                    features,
                ));
            }
        }

        resolve_by_priority(cands, PRIORITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(seq: &[u8]) -> Vec<Motif> {
        IMotifDetector::new().scan(seq, "t", 0)
    }

    #[test]
    fn canonical_four_c_tracts() {
        let out = scan(b"CCCCACCCCACCCCACCCC");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].subclass, "Canonical");
        assert_eq!((out[0].start, out[0].end), (0, 19));
        assert_eq!(out[0].features["c_tracts"], json!(4));
        // 16 C over 19 bases plus the tract bonus, clamped to 1.0.
        assert!((out[0].raw_score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ac_motif_with_short_linkers() {
        // A3-(4)-C3-(4)-C3-(4)-C3 with uniform linkers of 4.
        let out = scan(b"AAAGTGACCCGTGACCCGTGACCC");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].subclass, "AC-motif (HUR)");
        assert_eq!(out[0].features["linker_len"], json!(4));
        // Short linkers take the 0.25 boost.
        assert!(out[0].raw_score > 0.8);
    }

    #[test]
    fn ac_motif_long_linker_scores_lower() {
        let short = scan(b"AAAGTGACCCGTGACCCGTGACCC");
        let long = scan(b"AAAGTGTGACCCGTGTGACCCGTGTGACCC");
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].subclass, "AC-motif (HUR)");
        assert_eq!(long[0].features["linker_len"], json!(6));
        assert!(long[0].raw_score < short[0].raw_score);
    }

    #[test]
    fn canonical_outranks_ac_motif_on_overlap() {
        // The AC-motif region plus a fourth C tract: the canonical chain
        // overlaps the template and wins on class priority.
        let out = scan(b"AAAGTGACCCGTGACCCGTGACCCACCC");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].subclass, "Canonical");
    }

    #[test]
    fn g_rich_strand_is_silent() {
        assert!(scan(b"GGGAGGGAGGGAGGG").is_empty());
    }

    #[test]
    fn loops_longer_than_seven_break_the_chain() {
        let out = scan(b"CCCAAAAAAAACCCAAAAAAAACCCAAAAAAAACCC");
        assert!(out.is_empty());
    }
}
