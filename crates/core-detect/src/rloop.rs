//! R-loop forming sequence detection (QmRLFS-style), models M1 and M2.
//!
//! Each model anchors an RNA-invasion zone (RIZ) on a G run (≥3 for M1,
//! ≥4 for M2) grown downstream while G content stays ≥ 50%, then searches
//! for an RNA-exit zone (REZ) within a 50 nt linker: the longest downstream
//! stretch, extended in ~100 nt steps up to 2 kb, holding G content ≥ 40%.
//! Windowed G percentages come from a prefix-sum table, one subtraction per
//! query.

use crate::{Detector, build_motif};
use core_model::{Features, Motif, NormSpec, Strand};
use core_seq::index::PrefixCounts;
use core_seq::runs::find_runs;
use core_taxonomy::Class;
use serde_json::json;

const RIZ_MIN_LEN: usize = 20;
const RIZ_MAX_LEN: usize = 50;
const RIZ_MIN_G: f64 = 0.50;
const REZ_LINKER_MAX: usize = 50;
const REZ_STEP: usize = 100;
const REZ_MAX_LEN: usize = 2000;
const REZ_MIN_LEN: usize = 20;
const REZ_MIN_G: f64 = 0.40;
const ACCEPT: f64 = 0.4;
const NORM: NormSpec = NormSpec::linear(0.4, 1.0);

struct Model {
    subclass: &'static str,
    method_tag: &'static str,
    min_g_run: usize,
}

const MODELS: [Model; 2] = [
    Model {
        subclass: "R-loop formation sites (M1)",
        method_tag: "qmrlfs_m1",
        min_g_run: 3,
    },
    Model {
        subclass: "R-loop formation sites (M2)",
        method_tag: "qmrlfs_m2",
        min_g_run: 4,
    },
];

pub struct RLoopDetector;

impl RLoopDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RLoopDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Longest RIZ end for a zone anchored at `start`: the farthest `end` within
/// the length cap keeping G fraction ≥ 50%. `None` when even the minimum
/// length fails.
fn extend_riz(prefix: &PrefixCounts, start: usize, seq_len: usize) -> Option<usize> {
    let lo = start + RIZ_MIN_LEN;
    let hi = (start + RIZ_MAX_LEN).min(seq_len);
    if lo > seq_len {
        return None;
    }
    (lo..=hi)
        .rev()
        .find(|&end| prefix.g_fraction(start, end) >= RIZ_MIN_G)
}

/// Longest REZ from `start`, grown in `REZ_STEP` increments (final step
/// clipped to the sequence end) while G fraction holds ≥ 40%.
fn extend_rez(prefix: &PrefixCounts, start: usize, seq_len: usize) -> Option<usize> {
    let cap = (start + REZ_MAX_LEN).min(seq_len);
    let mut best = None;
    let mut end = (start + REZ_STEP).min(cap);
    loop {
        if end - start >= REZ_MIN_LEN && prefix.g_fraction(start, end) >= REZ_MIN_G {
            best = Some(end);
        }
        if end == cap {
            break;
        }
        end = (end + REZ_STEP).min(cap);
    }
    // A short tail below one step still counts if the whole of it qualifies.
    if best.is_none() && cap - start >= REZ_MIN_LEN && prefix.g_fraction(start, cap) >= REZ_MIN_G {
        best = Some(cap);
    }
    best
}

impl Detector for RLoopDetector {
    fn class(&self) -> Class {
        Class::RLoop
    }

    fn subclasses(&self) -> &'static [&'static str] {
        Class::RLoop.subclasses()
    }

    fn norm_spec(&self) -> NormSpec {
        NORM
    }

    fn scan(&self, seq: &[u8], seq_id: &str, offset: u64) -> Vec<Motif> {
        let prefix = PrefixCounts::build(seq);
        let mut out = Vec::new();
        for model in &MODELS {
            let mut covered_to = 0usize;
            for run in find_runs(seq, b'G', model.min_g_run) {
                if run.start < covered_to {
                    continue;
                }
                let Some(riz_end) = extend_riz(&prefix, run.start, seq.len()) else {
                    continue;
                };
                // REZ search across the allowed linker widths; first hit wins.
                let mut found = None;
                for linker in 0..=REZ_LINKER_MAX {
                    let rez_start = riz_end + linker;
                    if rez_start >= seq.len() {
                        break;
                    }
                    if let Some(rez_end) = extend_rez(&prefix, rez_start, seq.len()) {
                        found = Some((rez_start, rez_end));
                        break;
                    }
                }
                let Some((rez_start, rez_end)) = found else {
                    continue;
                };
                let riz_g = prefix.g_fraction(run.start, riz_end);
                let rez_g = prefix.g_fraction(rez_start, rez_end);
                let raw = (riz_g + rez_g).min(1.0);
                if raw < ACCEPT {
                    continue;
                }
                let features = Features::from([
                    ("riz_len".to_string(), json!(riz_end - run.start)),
                    ("rez_len".to_string(), json!(rez_end - rez_start)),
                    ("linker_len".to_string(), json!(rez_start - riz_end)),
                    ("riz_g_pct".to_string(), json!(riz_g * 100.0)),
                    ("rez_g_pct".to_string(), json!(rez_g * 100.0)),
                ]);
                out.push(build_motif(
                    Class::RLoop,
                    model.subclass,
                    seq_id,
                    offset,
                    run.start,
                    rez_end,
                    Strand::Plus,
                    raw,
                    NORM,
                    model.method_tag,
                    features,
                ));
                covered_to = rez_end;
            }
        }
        out
    }
}
