//! Cluster annotation: windows dense in motifs from several classes.
//!
//! A sliding window (default 300 nt) is anchored at every motif start; a
//! window containing at least `min_motifs` primaries from at least
//! `min_classes` distinct classes becomes a Cluster record covering
//! `[min_start, max_end)` of its members. Membership queries are a binary
//! search on the start-sorted arena (`partition_point`), O(log N + k) per
//! anchor.

use core_model::{Features, Motif, MotifId, Strand};
use core_taxonomy::Class;
use serde_json::json;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Copy)]
pub struct ClusterParams {
    pub window: u64,
    pub min_motifs: usize,
    pub min_classes: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            window: 300,
            min_motifs: 4,
            min_classes: 3,
        }
    }
}

/// Scan the deduplicated primary arena (sorted by start) for mixed-class
/// dense windows.
pub fn annotate_clusters(motifs: &[Motif], params: &ClusterParams) -> Vec<Motif> {
    let primaries: Vec<(usize, &Motif)> = motifs
        .iter()
        .enumerate()
        .filter(|(_, m)| !m.class.is_derived())
        .collect();
    let starts: Vec<u64> = primaries.iter().map(|(_, m)| m.start).collect();
    let mut out = Vec::new();
    let mut seen: HashSet<(u64, u64)> = HashSet::new();

    for anchor in 0..primaries.len() {
        let s = primaries[anchor].1.start;
        let hi = starts.partition_point(|&x| x < s + params.window);
        let members = &primaries[anchor..hi];
        if members.len() < params.min_motifs {
            continue;
        }
        let classes: BTreeSet<Class> = members.iter().map(|(_, m)| m.class).collect();
        if classes.len() < params.min_classes {
            continue;
        }
        let start = s;
        let end = members.iter().map(|(_, m)| m.end).max().unwrap_or(start);
        if !seen.insert((start, end)) {
            continue;
        }
        let score = members
            .iter()
            .map(|(_, m)| m.normalized_score)
            .sum::<f64>()
            / members.len() as f64;
        let raw = members.iter().map(|(_, m)| m.raw_score).sum::<f64>() / members.len() as f64;
        let class_names: Vec<&str> = classes.iter().map(|c| c.name()).collect();
        let features = Features::from([
            ("component_classes".to_string(), json!(class_names)),
            (
                "component_ids".to_string(),
                json!(
                    members
                        .iter()
                        .map(|(i, _)| *i as MotifId)
                        .collect::<Vec<_>>()
                ),
            ),
            ("motif_count".to_string(), json!(members.len())),
        ]);
        out.push(Motif {
            class: Class::Clusters,
            subclass: format!("Mixed_Cluster_{}_classes", classes.len()),
            seq_id: primaries[anchor].1.seq_id.clone(),
            start,
            end,
            strand: Strand::Unstranded,
            raw_score: raw,
            normalized_score: score,
            method_tag: "cluster_window",
            features,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::Features;

    fn mk(class: Class, start: u64, end: u64) -> Motif {
        Motif {
            class,
            subclass: class.subclasses().first().unwrap_or(&"x").to_string(),
            seq_id: "s".to_string(),
            start,
            end,
            strand: Strand::Unstranded,
            raw_score: 1.0,
            normalized_score: 2.0,
            method_tag: "test",
            features: Features::new(),
        }
    }

    #[test]
    fn four_motifs_three_classes_cluster() {
        let motifs = vec![
            mk(Class::GQuadruplex, 0, 20),
            mk(Class::ZDna, 50, 70),
            mk(Class::Cruciform, 100, 130),
            mk(Class::APhilicDna, 200, 220),
        ];
        let out = annotate_clusters(&motifs, &ClusterParams::default());
        assert_eq!(out.len(), 1);
        let c = &out[0];
        assert_eq!(c.subclass, "Mixed_Cluster_4_classes");
        assert_eq!((c.start, c.end), (0, 220));
        assert_eq!(c.features["motif_count"], json!(4));
        assert_eq!(c.normalized_score, 2.0);
    }

    #[test]
    fn two_classes_are_not_enough() {
        let motifs = vec![
            mk(Class::GQuadruplex, 0, 20),
            mk(Class::GQuadruplex, 250, 270),
            mk(Class::ZDna, 50, 70),
            mk(Class::ZDna, 100, 130),
        ];
        assert!(annotate_clusters(&motifs, &ClusterParams::default()).is_empty());
    }

    #[test]
    fn spread_beyond_window_does_not_cluster() {
        let motifs = vec![
            mk(Class::GQuadruplex, 0, 20),
            mk(Class::ZDna, 400, 420),
            mk(Class::Cruciform, 800, 830),
            mk(Class::APhilicDna, 1200, 1220),
        ];
        assert!(annotate_clusters(&motifs, &ClusterParams::default()).is_empty());
    }

    #[test]
    fn three_motifs_are_not_enough() {
        let motifs = vec![
            mk(Class::GQuadruplex, 0, 20),
            mk(Class::ZDna, 50, 70),
            mk(Class::Cruciform, 100, 130),
        ];
        assert!(annotate_clusters(&motifs, &ClusterParams::default()).is_empty());
    }

    #[test]
    fn length_is_max_end_minus_min_start() {
        let motifs = vec![
            mk(Class::GQuadruplex, 10, 290),
            mk(Class::ZDna, 20, 40),
            mk(Class::Cruciform, 30, 60),
            mk(Class::Triplex, 40, 80),
        ];
        let out = annotate_clusters(&motifs, &ClusterParams::default());
        assert_eq!(out.len(), 1);
        assert_eq!((out[0].start, out[0].end), (10, 290));
        assert_eq!(out[0].len(), 280);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(annotate_clusters(&[], &ClusterParams::default()).is_empty());
    }
}
