//! Hybrid annotation: cross-class overlap records.
//!
//! For every unordered pair of primary motifs of *different* classes whose
//! overlap fraction (relative to the shorter member) falls in the configured
//! band, a derived record is emitted spanning the union of the two. The
//! pairwise scan is a sweep over start-sorted motifs with a min-heap on
//! interval ends, so only genuinely overlapping pairs are ever examined:
//! O((N + P) log N) with P the number of overlapping pairs.
//!
//! Hybrid records reference their members by arena index
//! (`component_ids`); the display subclass `"<A>_<B>_Overlap"` is derived
//! from the structured `component_classes` field, never parsed back.

use core_model::{Features, Motif, MotifId, Strand};
use core_taxonomy::Class;
use serde_json::json;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

#[derive(Debug, Clone, Copy)]
pub struct HybridParams {
    /// Minimum overlap fraction (of the shorter motif), inclusive.
    pub min_overlap: f64,
    /// Maximum overlap fraction, inclusive; full containment (1.0) is
    /// never annotated.
    pub max_overlap: f64,
}

impl Default for HybridParams {
    fn default() -> Self {
        Self {
            min_overlap: 0.50,
            max_overlap: 0.99,
        }
    }
}

/// Scan the deduplicated primary arena and emit hybrid records.
///
/// `motifs` must be sorted by start (the canonical order guarantees this);
/// indices into it serve as [`MotifId`]s.
pub fn annotate_hybrids(motifs: &[Motif], params: &HybridParams) -> Vec<Motif> {
    let mut out = Vec::new();
    let mut seen: HashSet<(u64, u64, Class, Class)> = HashSet::new();
    // Min-heap of (end, arena index) for motifs whose interval is still open.
    let mut active: BinaryHeap<Reverse<(u64, usize)>> = BinaryHeap::new();

    for (bi, b) in motifs.iter().enumerate() {
        if b.class.is_derived() {
            continue;
        }
        while let Some(&Reverse((end, _))) = active.peek() {
            if end <= b.start {
                active.pop();
            } else {
                break;
            }
        }
        for &Reverse((_, ai)) in active.iter() {
            let a = &motifs[ai];
            if a.class == b.class {
                continue;
            }
            let overlap = a.overlap_len(b);
            let shorter = a.len().min(b.len());
            if shorter == 0 {
                continue;
            }
            let frac = overlap as f64 / shorter as f64;
            if frac < params.min_overlap || frac > params.max_overlap || frac >= 1.0 {
                continue;
            }
            let (first, second) = if a.class <= b.class { (a, b) } else { (b, a) };
            let (start, end) = (a.start.min(b.start), a.end.max(b.end));
            if !seen.insert((start, end, first.class, second.class)) {
                continue;
            }
            let subclass = format!("{}_{}_Overlap", first.class, second.class);
            let features = Features::from([
                (
                    "component_classes".to_string(),
                    json!([first.class.name(), second.class.name()]),
                ),
                (
                    "component_ids".to_string(),
                    json!([ai as MotifId, bi as MotifId]),
                ),
                ("overlap_len".to_string(), json!(overlap)),
                ("overlap_frac".to_string(), json!(frac)),
            ]);
            out.push(Motif {
                class: Class::Hybrid,
                subclass,
                seq_id: b.seq_id.clone(),
                start,
                end,
                strand: Strand::Unstranded,
                raw_score: (a.raw_score + b.raw_score) / 2.0,
                normalized_score: (a.normalized_score + b.normalized_score) / 2.0,
                method_tag: "hybrid_overlap",
                features,
            });
        }
        active.push(Reverse((b.end, bi)));
    }
    out
}
