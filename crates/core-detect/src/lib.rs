//! The detection engine: nine detectors behind one contract.
//!
//! Every detector is a pure function of `(sequence bytes, parameters)` with
//! no shared mutable state anywhere, which is what allows the chunk executor
//! to fan detectors out across worker threads without coordination. Detectors
//! receive the absolute offset of their chunk and emit absolute coordinates;
//! scoring and normalization happen at candidate construction, so a
//! [`Motif`] is fully formed the moment a detector returns it.
//!
//! Overlap policy is two-layered: detectors that define an internal priority
//! order (G-quadruplex, i-motif) resolve their own overlaps here; everything
//! else is left to the within-subclass deduplication stage downstream.

use core_model::{Features, Motif, NormSpec, Strand};
use core_taxonomy::Class;

pub mod aphilic;
pub mod cruciform;
pub mod curved;
pub mod g4;
pub mod imotif;
pub mod rloop;
pub mod slipped;
pub mod triplex;
pub mod zdna;

/// Tunable detector parameters with their published defaults. The engine maps its
/// configuration record onto this before building the detector set.
#[derive(Debug, Clone)]
pub struct DetectorParams {
    /// G4Hunter sliding-window width.
    pub g4_window: usize,
    pub cruciform_min_arm: usize,
    pub cruciform_max_arm: usize,
    pub cruciform_max_loop: usize,
    /// Admit (GC)n dinucleotide runs as eGZ in addition to the CGG-family
    /// trinucleotides.
    pub egz_include_gc_dinucleotide: bool,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            g4_window: 25,
            cruciform_min_arm: 8,
            cruciform_max_arm: 50,
            cruciform_max_loop: 12,
            egz_include_gc_dinucleotide: false,
        }
    }
}

/// The detector contract: constant identity, declared normalization,
/// and a pure scan over one chunk.
pub trait Detector: Send + Sync {
    /// The structural class this detector reports.
    fn class(&self) -> Class;

    /// Canonical subclasses this detector can emit.
    fn subclasses(&self) -> &'static [&'static str];

    /// Subclass priority order for overlap resolution; `None` when the
    /// class resolves overlaps by subclass independence instead.
    fn overlap_priority(&self) -> Option<&'static [&'static str]> {
        None
    }

    /// Primary normalization declaration. Subclass-specific bindings are an
    /// internal matter: detectors normalize at candidate construction, so
    /// every returned motif already carries its normalized score.
    fn norm_spec(&self) -> NormSpec;

    /// Scan a chunk. `seq` is the chunk's bytes, `offset` the absolute
    /// position of `seq[0]` in the full sequence; returned motifs carry
    /// absolute coordinates.
    fn scan(&self, seq: &[u8], seq_id: &str, offset: u64) -> Vec<Motif>;
}

/// Construct the full detector set with the given parameters, in taxonomy
/// order. Class filtering (`enabled_classes`) happens in the engine, not
/// here.
pub fn default_detectors(params: &DetectorParams) -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(curved::CurvedDetector::new()),
        Box::new(slipped::SlippedDetector::new()),
        Box::new(cruciform::CruciformDetector::new(params)),
        Box::new(rloop::RLoopDetector::new()),
        Box::new(triplex::TriplexDetector::new()),
        Box::new(g4::G4Detector::new(params)),
        Box::new(imotif::IMotifDetector::new()),
        Box::new(zdna::ZDnaDetector::new(params)),
        Box::new(aphilic::APhilicDetector::new()),
    ]
}

/// Shared candidate constructor: shifts chunk-local coordinates by the chunk
/// offset and applies the declared normalization in one place.
#[allow(clippy::too_many_arguments)]
pub(crate) fn build_motif(
    class: Class,
    subclass: &str,
    seq_id: &str,
    offset: u64,
    start: usize,
    end: usize,
    strand: Strand,
    raw: f64,
    spec: NormSpec,
    method_tag: &'static str,
    features: Features,
) -> Motif {
    Motif {
        class,
        subclass: subclass.to_string(),
        seq_id: seq_id.to_string(),
        start: offset + start as u64,
        end: offset + end as u64,
        strand,
        raw_score: raw,
        normalized_score: spec.normalize(raw),
        method_tag,
        features,
    }
}

/// Priority-based overlap resolution: for any two overlapping candidates,
/// keep the one whose subclass ranks earlier in `priority`; on ties, the
/// higher raw score; on equal scores, the earlier start (determinism).
///
/// Detectors with an internal priority order apply this per chunk; the
/// post-processing pipeline re-applies it per class over the whole sequence
/// so that clipped lower-priority variants produced at chunk seams lose to
/// the full-length call from the neighbouring chunk.
pub fn resolve_by_priority(mut candidates: Vec<Motif>, priority: &[&str]) -> Vec<Motif> {
    let rank = |m: &Motif| {
        priority
            .iter()
            .position(|&p| p == m.subclass)
            .unwrap_or(priority.len())
    };
    candidates.sort_by(|a, b| {
        rank(a)
            .cmp(&rank(b))
            .then(b.raw_score.total_cmp(&a.raw_score))
            .then(a.start.cmp(&b.start))
            .then(a.end.cmp(&b.end))
    });
    let mut kept: Vec<Motif> = Vec::new();
    for cand in candidates {
        let overlaps = kept
            .iter()
            .any(|k| cand.start < k.end && k.start < cand.end);
        if !overlaps {
            kept.push(cand);
        }
    }
    kept.sort_by_key(|m| (m.start, m.end));
    kept
}
