//! Curved DNA detection: long A/T tracts (local curvature) and A-phased
//! repeats on the helical period (global curvature).
//!
//! Global curvature chains ≥3 A/T tracts of length 3..9 whose
//! center-to-center spacing sits in the 9.9..11.1 window around the 10.5 bp
//! helical repeat; the score decays with mean deviation from 10.5.

use crate::{Detector, build_motif};
use core_model::{Features, Motif, NormSpec, Strand};
use core_seq::runs::{Run, find_runs_of_any};
use core_taxonomy::Class;
use serde_json::json;

/// Minimum tract length for a local-curvature call.
const LOCAL_MIN_TRACT: usize = 7;

/// Phased-tract geometry.
const APR_MIN_TRACT: usize = 3;
const APR_MAX_TRACT: usize = 9;
const APR_MIN_TRACTS: usize = 3;
const APR_TARGET_SPACING: f64 = 10.5;
const APR_MAX_DEVIATION: f64 = 0.6;

pub const LOCAL_NORM: NormSpec = NormSpec::linear(0.5, 1.0);
const GLOBAL_NORM: NormSpec = NormSpec::linear(0.0, 1.0);

/// Local-curvature raw score for a tract of `len` bases.
pub fn local_tract_raw(len: usize) -> f64 {
    len as f64 / (len + 6) as f64
}

pub struct CurvedDetector;

impl CurvedDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CurvedDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn center(run: &Run) -> f64 {
    (run.start + run.end) as f64 / 2.0
}

impl Detector for CurvedDetector {
    fn class(&self) -> Class {
        Class::CurvedDna
    }

    fn subclasses(&self) -> &'static [&'static str] {
        Class::CurvedDna.subclasses()
    }

    fn norm_spec(&self) -> NormSpec {
        GLOBAL_NORM
    }

    fn scan(&self, seq: &[u8], seq_id: &str, offset: u64) -> Vec<Motif> {
        let mut out = Vec::new();

        // Local curvature: single A or T run of length ≥ 7.
        for run in find_runs_of_any(seq, b"AT", LOCAL_MIN_TRACT) {
            let len = run.len();
            let raw = local_tract_raw(len);
            let features = Features::from([
                ("tract_len".to_string(), json!(len)),
                ("tract_base".to_string(), json!((run.base as char).to_string())),
            ]);
            out.push(build_motif(
                Class::CurvedDna,
                "Local Curvature",
                seq_id,
                offset,
                run.start,
                run.end,
                Strand::Unstranded,
                raw,
                LOCAL_NORM,
                "curved_tract",
                features,
            ));
        }

        // Global curvature: maximal chains of phased tracts.
        let tracts: Vec<Run> = find_runs_of_any(seq, b"AT", APR_MIN_TRACT)
            .into_iter()
            .filter(|r| r.len() <= APR_MAX_TRACT)
            .collect();
        let phased = |a: &Run, b: &Run| {
            let spacing = center(b) - center(a);
            (APR_TARGET_SPACING - APR_MAX_DEVIATION..=APR_TARGET_SPACING + APR_MAX_DEVIATION)
                .contains(&spacing)
        };
        let mut i = 0;
        while i < tracts.len() {
            let mut j = i;
            while j + 1 < tracts.len() && phased(&tracts[j], &tracts[j + 1]) {
                j += 1;
            }
            let n = j - i + 1;
            if n >= APR_MIN_TRACTS {
                let chain = &tracts[i..=j];
                let deviations: Vec<f64> = chain
                    .windows(2)
                    .map(|p| (center(&p[1]) - center(&p[0]) - APR_TARGET_SPACING).abs())
                    .collect();
                let mean_dev = deviations.iter().sum::<f64>() / deviations.len() as f64;
                let raw = (1.0 - mean_dev / APR_MAX_DEVIATION).clamp(0.0, 1.0);
                let mean_spacing = chain
                    .windows(2)
                    .map(|p| center(&p[1]) - center(&p[0]))
                    .sum::<f64>()
                    / deviations.len() as f64;
                let features = Features::from([
                    ("n_tracts".to_string(), json!(n)),
                    ("mean_spacing".to_string(), json!(mean_spacing)),
                ]);
                out.push(build_motif(
                    Class::CurvedDna,
                    "Global Curvature",
                    seq_id,
                    offset,
                    chain[0].start,
                    chain[n - 1].end,
                    Strand::Unstranded,
                    raw,
                    GLOBAL_NORM,
                    "curved_phased",
                    features,
                ));
            }
            i = j + 1;
        }

        out
    }
}
