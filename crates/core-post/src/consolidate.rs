//! Seam consolidation: rejoin run/repeat motifs split by chunk boundaries.
//!
//! Chunked execution truncates a motif at its chunk's edge; the continuation
//! is reported by the next chunk. For the length-scored subclasses (Local
//! Curvature tracts, STRs, sticky GAA·TTC arrays, eGZ repeats) the merged
//! motif's score is a pure function of the merged extent, so fragments that
//! overlap or abut are merged and rescored exactly, and chunked output
//! equals direct output for these classes. Pattern-grammar motifs (G4,
//! cruciform, and the rest) are bounded by the chunk overlap instead and
//! never need this pass.
//!
//! Must run BEFORE within-subclass dedup: dedup would otherwise discard one
//! fragment instead of merging the pair.

use core_detect::{curved, slipped, triplex, zdna};
use core_model::Motif;
use serde_json::json;

/// True for method tags whose motifs may be merged across seams.
fn mergeable(tag: &str) -> bool {
    matches!(tag, "curved_tract" | "str_tandem" | "sticky_gaa" | "egz_repeat")
}

/// Rotation-equivalence for repeat units ("CAG" continues as "AGC" when a
/// seam lands mid-unit).
fn rotation_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && !a.is_empty() && [a, a].concat().contains(b)
}

/// Whether `b` continues `a` (same subclass fragment, overlapping or
/// abutting, compatible repeat unit).
fn continues(a: &Motif, b: &Motif) -> bool {
    if a.class != b.class
        || a.subclass != b.subclass
        || a.method_tag != b.method_tag
        || a.strand != b.strand
        || b.start > a.end
    {
        return false;
    }
    match (a.features.get("unit"), b.features.get("unit")) {
        (Some(ua), Some(ub)) => match (ua.as_str(), ub.as_str()) {
            (Some(ua), Some(ub)) => rotation_eq(ua, ub),
            _ => false,
        },
        (None, None) => {
            // Tract motifs: same base on both sides of the seam.
            a.features.get("tract_base") == b.features.get("tract_base")
        }
        _ => false,
    }
}

/// Recompute scores and length-derived features for a merged extent.
fn rescore(m: &mut Motif) {
    let len = (m.end - m.start) as usize;
    match m.method_tag {
        "curved_tract" => {
            m.raw_score = curved::local_tract_raw(len);
            m.normalized_score = curved::LOCAL_NORM.normalize(m.raw_score);
            m.features.insert("tract_len".to_string(), json!(len));
        }
        "str_tandem" => {
            let unit_len = m
                .features
                .get("unit_len")
                .and_then(serde_json::Value::as_u64)
                .unwrap_or(1) as usize;
            let copies = len / unit_len;
            m.raw_score = slipped::str_raw(len);
            m.normalized_score = slipped::STR_NORM.normalize(m.raw_score);
            m.features.insert("copy_number".to_string(), json!(copies));
            m.features.insert("total_len".to_string(), json!(len));
        }
        "sticky_gaa" => {
            let copies = len / 3;
            m.raw_score = triplex::sticky_score(copies);
            m.normalized_score = triplex::STICKY_NORM.normalize(m.raw_score);
            m.features.insert("copy_number".to_string(), json!(copies));
        }
        "egz_repeat" => {
            let unit_len = m
                .features
                .get("unit")
                .and_then(serde_json::Value::as_str)
                .map(str::len)
                .unwrap_or(3);
            let copies = len / unit_len;
            m.raw_score = zdna::egz_raw(copies, unit_len);
            m.normalized_score = zdna::EGZ_NORM.normalize(m.raw_score);
            m.features.insert("repeat_count".to_string(), json!(copies));
        }
        _ => {}
    }
}

/// Merge seam fragments in place over the full per-sequence candidate set.
pub fn merge_seam_fragments(motifs: Vec<Motif>) -> Vec<Motif> {
    let (mut stable, mut candidates): (Vec<Motif>, Vec<Motif>) =
        motifs.into_iter().partition(|m| !mergeable(m.method_tag));
    candidates.sort_by(|a, b| {
        a.class
            .cmp(&b.class)
            .then(a.subclass.cmp(&b.subclass))
            .then(a.start.cmp(&b.start))
            .then(a.end.cmp(&b.end))
    });

    let mut merged: Vec<Motif> = Vec::with_capacity(candidates.len());
    for m in candidates {
        match merged.last_mut() {
            Some(last) if continues(last, &m) => {
                if m.end > last.end {
                    last.end = m.end;
                    rescore(last);
                }
                tracing::debug!(
                    target: "post.consolidate",
                    subclass = last.subclass.as_str(),
                    start = last.start,
                    end = last.end,
                    "seam_merge"
                );
            }
            _ => merged.push(m),
        }
    }
    stable.extend(merged);
    stable
}
