//! Within-subclass overlap deduplication.
//!
//! Contract: per `(class, subclass)` group, sort by `(start, −score)` and
//! greedily retain candidates whose interval does not overlap any
//! already-kept interval. Cross-class and cross-subclass overlap is left
//! untouched; it is the raw material for hybrid annotation.

use core_model::Motif;
use core_taxonomy::Class;
use std::collections::BTreeMap;

pub fn dedup_within_subclass(motifs: Vec<Motif>) -> Vec<Motif> {
    let mut groups: BTreeMap<(Class, String), Vec<Motif>> = BTreeMap::new();
    for m in motifs {
        groups
            .entry((m.class, m.subclass.clone()))
            .or_default()
            .push(m);
    }
    let mut kept = Vec::new();
    for (_, mut group) in groups {
        group.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then(b.raw_score.total_cmp(&a.raw_score))
                .then(a.end.cmp(&b.end))
        });
        // Kept intervals are disjoint and visited in start order, so a
        // single high-water mark is enough to detect overlap.
        let mut max_end = 0u64;
        for m in group {
            if m.start >= max_end {
                max_end = m.end;
                kept.push(m);
            }
        }
    }
    kept
}
