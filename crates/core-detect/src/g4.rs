//! G-quadruplex detection: eight subclasses over one G4Hunter scoring core.
//!
//! Candidate generation is G-run chaining (runs found once, subclass grammars
//! expressed as constraints on run lengths and gap widths) except for the
//! telomeric repeat, which is a literal tandem-repeat template. Scoring is
//! seeded G4Hunter: per-base signal `+min(run,4)` inside G runs and
//! `−min(run,4)` inside C runs, maximum sliding-window mean over the
//! candidate region, window width `min(W, region_len)` with `W` = 25 by
//! default.
//!
//! Subclass priority (earlier wins any overlap):
//! Telomeric > Higher-order/G-wire > Stacked > Canonical > Bulged >
//! Extended-loop > G-triplex > Weak PQS.

use crate::{Detector, DetectorParams, build_motif, resolve_by_priority};
use core_model::{Features, Motif, NormSpec, Strand};
use core_seq::runs::{Run, find_runs};
use core_taxonomy::Class;
use core_tables::g4_run_weight;
use regex::bytes::Regex;
use serde_json::json;

/// Subclass priority, highest first.
pub const PRIORITY: &[&str] = &[
    "Telomeric",
    "Higher-order/G-wire",
    "Stacked",
    "Canonical",
    "Bulged",
    "Extended-loop",
    "G-triplex",
    "Weak PQS",
];

/// Acceptance floor for the window mean, all subclasses.
const MIN_WINDOW_MEAN: f64 = 0.5;
/// Loop bounds for the standard grammar.
const MAX_LOOP: usize = 7;
/// One loop of an extended-loop candidate may stretch to this.
const MAX_EXTENDED_LOOP: usize = 12;
/// Maximum separation between stacked canonical units.
const MAX_STACK_GAP: usize = 20;
/// Minimum run count for Higher-order/G-wire chains.
const GWIRE_MIN_RUNS: usize = 7;

const NORM: NormSpec = NormSpec::g4hunter(0.5, 2.0);
const METHOD: &str = "g4hunter_seeded";

/// A G tract usable in a chain: either a perfect run or a single-substitution
/// (bulged) composite.
#[derive(Debug, Clone, Copy)]
struct Tract {
    start: usize,
    end: usize,
    bulged: bool,
}

pub struct G4Detector {
    window: usize,
    telomeric: [Regex; 2],
}

impl G4Detector {
    pub fn new(params: &DetectorParams) -> Self {
        Self {
            window: params.g4_window,
            telomeric: [
                Regex::new(r"(?:TTAGGG){4,}").expect("static pattern"),
                Regex::new(r"(?:TTGGGG){4,}").expect("static pattern"),
            ],
        }
    }

    /// Window mean of the G4Hunter signal over `[start, end)`, width
    /// `min(self.window, len)`.
    fn window_mean(&self, prefix: &[f64], start: usize, end: usize) -> f64 {
        let len = end - start;
        let w = self.window.min(len);
        if w == 0 {
            return 0.0;
        }
        let mut best = f64::NEG_INFINITY;
        for i in start..=end - w {
            best = best.max(prefix[i + w] - prefix[i]);
        }
        best / w as f64
    }

    fn candidate(
        &self,
        seq_id: &str,
        offset: u64,
        prefix: &[f64],
        subclass: &'static str,
        start: usize,
        end: usize,
        mut features: Features,
    ) -> Option<Motif> {
        let raw = self.window_mean(prefix, start, end);
        if raw < MIN_WINDOW_MEAN {
            return None;
        }
        let region_score = raw * (end - start) as f64 / self.window as f64;
        features.insert("window_score".to_string(), json!(raw));
        features.insert("region_score".to_string(), json!(region_score));
        Some(build_motif(
            Class::GQuadruplex,
            subclass,
            seq_id,
            offset,
            start,
            end,
            Strand::Plus,
            raw,
            NORM,
            METHOD,
            features,
        ))
    }
}

/// Per-base run-weighted G4Hunter signal as a prefix-sum array
/// (`prefix[i+1] − prefix[i]` is the signal of base `i`).
fn signal_prefix(seq: &[u8]) -> Vec<f64> {
    let mut signal = vec![0.0f64; seq.len()];
    for run in find_runs(seq, b'G', 1) {
        let w = g4_run_weight(run.len());
        signal[run.start..run.end].iter_mut().for_each(|s| *s = w);
    }
    for run in find_runs(seq, b'C', 1) {
        let w = g4_run_weight(run.len());
        signal[run.start..run.end].iter_mut().for_each(|s| *s = -w);
    }
    let mut prefix = Vec::with_capacity(seq.len() + 1);
    prefix.push(0.0);
    let mut acc = 0.0;
    for s in signal {
        acc += s;
        prefix.push(acc);
    }
    prefix
}

/// Single-substitution composite tracts. A composite is only formed when
/// neither flank alone is long enough to count as a tract, so the bulge is
/// load-bearing; composites therefore never overlap a perfect tract and the
/// merged tract list stays disjoint.
fn bulged_tracts(seq: &[u8], runs: &[Run]) -> Vec<Tract> {
    let mut tracts = Vec::new();
    for pair in runs.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b.start != a.end + 1 {
            continue;
        }
        let gap = seq[a.end];
        if gap == b'N' {
            continue;
        }
        if a.len() + b.len() >= 3 && a.len() < 3 && b.len() < 3 {
            tracts.push(Tract {
                start: a.start,
                end: b.end,
                bulged: true,
            });
        }
    }
    tracts
}

/// Chain `count` consecutive tracts whose gaps satisfy the closure.
fn chains<'a>(
    tracts: &'a [Tract],
    count: usize,
    gap_ok: impl Fn(&[usize]) -> bool + 'a,
) -> impl Iterator<Item = (&'a [Tract], Vec<usize>)> {
    tracts.windows(count).filter_map(move |w| {
        let mut gaps = Vec::with_capacity(count - 1);
        for pair in w.windows(2) {
            if pair[1].start <= pair[0].end {
                return None; // overlapping tracts never chain
            }
            gaps.push(pair[1].start - pair[0].end);
        }
        gap_ok(&gaps).then_some((w, gaps))
    })
}

fn standard_gaps(gaps: &[usize]) -> bool {
    gaps.iter().all(|&g| (1..=MAX_LOOP).contains(&g))
}

impl Detector for G4Detector {
    fn class(&self) -> Class {
        Class::GQuadruplex
    }

    fn subclasses(&self) -> &'static [&'static str] {
        Class::GQuadruplex.subclasses()
    }

    fn norm_spec(&self) -> NormSpec {
        NORM
    }

    fn overlap_priority(&self) -> Option<&'static [&'static str]> {
        Some(PRIORITY)
    }

    fn scan(&self, seq: &[u8], seq_id: &str, offset: u64) -> Vec<Motif> {
        let prefix = signal_prefix(seq);
        let all_runs = find_runs(seq, b'G', 1);
        let perfect: Vec<Tract> = all_runs
            .iter()
            .filter(|r| r.len() >= 3)
            .map(|r| Tract {
                start: r.start,
                end: r.end,
                bulged: false,
            })
            .collect();
        let weak: Vec<Tract> = all_runs
            .iter()
            .filter(|r| r.len() >= 2)
            .map(|r| Tract {
                start: r.start,
                end: r.end,
                bulged: false,
            })
            .collect();

        let mut cands: Vec<Motif> = Vec::new();

        // Telomeric tandem repeats.
        for re in &self.telomeric {
            for m in re.find_iter(seq) {
                let copies = m.len() / 6;
                let features = Features::from([
                    ("repeat_unit".to_string(), json!("TTAGGG")),
                    ("copies".to_string(), json!(copies)),
                ]);
                if let Some(c) = self.candidate(
                    seq_id,
                    offset,
                    &prefix,
                    "Telomeric",
                    m.start(),
                    m.end(),
                    features,
                ) {
                    cands.push(c);
                }
            }
        }

        // Higher-order/G-wire: maximal standard-loop chains of ≥7 runs.
        let mut i = 0;
        while i < perfect.len() {
            let mut j = i;
            while j + 1 < perfect.len() {
                let gap = perfect[j + 1].start.saturating_sub(perfect[j].end);
                if perfect[j + 1].start > perfect[j].end && (1..=MAX_LOOP).contains(&gap) {
                    j += 1;
                } else {
                    break;
                }
            }
            let n_runs = j - i + 1;
            if n_runs >= GWIRE_MIN_RUNS {
                let features = Features::from([("g_tracts".to_string(), json!(n_runs))]);
                if let Some(c) = self.candidate(
                    seq_id,
                    offset,
                    &prefix,
                    "Higher-order/G-wire",
                    perfect[i].start,
                    perfect[j].end,
                    features,
                ) {
                    cands.push(c);
                }
            }
            i = j + 1;
        }

        // Canonical: four G≥3 runs, loops 1..7.
        let mut canonical_units: Vec<(usize, usize)> = Vec::new();
        for (w, gaps) in chains(&perfect, 4, standard_gaps) {
            let features = Features::from([
                ("g_tracts".to_string(), json!(4)),
                ("loops".to_string(), json!(gaps)),
            ]);
            if let Some(c) = self.candidate(
                seq_id,
                offset,
                &prefix,
                "Canonical",
                w[0].start,
                w[3].end,
                features,
            ) {
                // Units for the stacked scan: greedy leftmost non-overlap.
                let unit = (w[0].start, w[3].end);
                if canonical_units
                    .last()
                    .is_none_or(|&(_, prev_end)| unit.0 >= prev_end)
                {
                    canonical_units.push(unit);
                }
                cands.push(c);
            }
        }

        // Stacked: ≥2 canonical units separated by ≤20 nt.
        let mut u = 0;
        while u < canonical_units.len() {
            let mut v = u;
            while v + 1 < canonical_units.len()
                && canonical_units[v + 1].0 - canonical_units[v].1 <= MAX_STACK_GAP
            {
                v += 1;
            }
            if v > u {
                let features =
                    Features::from([("stacked_units".to_string(), json!(v - u + 1))]);
                if let Some(c) = self.candidate(
                    seq_id,
                    offset,
                    &prefix,
                    "Stacked",
                    canonical_units[u].0,
                    canonical_units[v].1,
                    features,
                ) {
                    cands.push(c);
                }
            }
            u = v + 1;
        }

        // Bulged: four tracts, at least one carrying a single substitution.
        let mut with_bulged: Vec<Tract> = perfect.clone();
        with_bulged.extend(bulged_tracts(seq, &all_runs));
        with_bulged.sort_by_key(|t| (t.start, t.end));
        for (w, gaps) in chains(&with_bulged, 4, standard_gaps) {
            if !w.iter().any(|t| t.bulged) {
                continue;
            }
            let features = Features::from([
                ("g_tracts".to_string(), json!(4)),
                ("bulged_tracts".to_string(), json!(w.iter().filter(|t| t.bulged).count())),
                ("loops".to_string(), json!(gaps)),
            ]);
            if let Some(c) = self.candidate(
                seq_id,
                offset,
                &prefix,
                "Bulged",
                w[0].start,
                w[3].end,
                features,
            ) {
                cands.push(c);
            }
        }

        // Extended-loop: exactly one loop 8..12, the rest standard.
        for (w, gaps) in chains(&perfect, 4, |gaps| {
            let long = gaps
                .iter()
                .filter(|&&g| (MAX_LOOP + 1..=MAX_EXTENDED_LOOP).contains(&g))
                .count();
            long == 1
                && gaps
                    .iter()
                    .all(|&g| (1..=MAX_EXTENDED_LOOP).contains(&g))
        }) {
            let features = Features::from([
                ("g_tracts".to_string(), json!(4)),
                ("loops".to_string(), json!(gaps)),
            ]);
            if let Some(c) = self.candidate(
                seq_id,
                offset,
                &prefix,
                "Extended-loop",
                w[0].start,
                w[3].end,
                features,
            ) {
                cands.push(c);
            }
        }

        // G-triplex: three G≥3 runs.
        for (w, gaps) in chains(&perfect, 3, standard_gaps) {
            let features = Features::from([
                ("g_tracts".to_string(), json!(3)),
                ("loops".to_string(), json!(gaps)),
            ]);
            if let Some(c) = self.candidate(
                seq_id,
                offset,
                &prefix,
                "G-triplex",
                w[0].start,
                w[2].end,
                features,
            ) {
                cands.push(c);
            }
        }

        // Weak PQS: four G≥2 runs.
        for (w, gaps) in chains(&weak, 4, standard_gaps) {
            let features = Features::from([
                ("g_tracts".to_string(), json!(4)),
                ("loops".to_string(), json!(gaps)),
            ]);
            if let Some(c) = self.candidate(
                seq_id,
                offset,
                &prefix,
                "Weak PQS",
                w[0].start,
                w[3].end,
                features,
            ) {
                cands.push(c);
            }
        }

        resolve_by_priority(cands, PRIORITY)
    }
}
