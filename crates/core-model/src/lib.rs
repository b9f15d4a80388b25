//! Motif data model: the record every detector produces, the universal score
//! normalizer, and the coordinate translation to the external schema.
//!
//! Internally the whole pipeline speaks 0-based half-open `[start, end)`.
//! The exported schema is 1-based inclusive on both ends; the translation
//! lives in [`coords`] and is applied exactly once, at serialization.
//!
//! Primary motifs live in a flat arena (`Vec<Motif>`) owned by the
//! orchestrator; derived records (hybrids, clusters) reference members by
//! [`MotifId`] index rather than holding pointers, so the full dataset stays
//! serializable as a flat stream.

use core_taxonomy::Class;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub mod coords;
pub mod error;
pub mod norm;

pub use error::ScanError;
pub use norm::{NormProfile, NormSpec};

/// Index of a primary motif in the per-run arena.
pub type MotifId = u32;

/// Detector-specific auxiliary fields (loop lengths, GC%, ΔG, copy number…).
/// A `BTreeMap` keeps serialized output deterministic.
pub type Features = BTreeMap<String, Value>;

/// Strandedness of a motif call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = ".")]
    Unstranded,
}

impl Strand {
    pub fn symbol(self) -> &'static str {
        match self {
            Strand::Plus => "+",
            Strand::Minus => "-",
            Strand::Unstranded => ".",
        }
    }
}

/// One annotated motif. Coordinates are absolute (sequence-level), 0-based
/// half-open; detectors emit chunk-local coordinates and the orchestrator
/// shifts them by the chunk offset before anything else sees them.
#[derive(Debug, Clone, PartialEq)]
pub struct Motif {
    pub class: Class,
    pub subclass: String,
    pub seq_id: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
    pub raw_score: f64,
    pub normalized_score: f64,
    pub method_tag: &'static str,
    pub features: Features,
}

impl Motif {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Overlap length with another interval, 0 when disjoint.
    pub fn overlap_len(&self, other: &Motif) -> u64 {
        let lo = self.start.max(other.start);
        let hi = self.end.min(other.end);
        hi.saturating_sub(lo)
    }

    /// Contract check for detector output (`InternalDetectorFailure`): a
    /// violating candidate is dropped and logged, never fatal. The same check
    /// failing on a record that already passed dedup indicates a pipeline bug
    /// and IS fatal; that distinction belongs to the caller.
    pub fn validate(&self, seq_len: u64) -> Result<(), ScanError> {
        let fail = |detail: String| {
            Err(ScanError::InternalDetectorFailure {
                seq_id: self.seq_id.clone(),
                class: self.class,
                detail,
            })
        };
        if self.start >= self.end {
            return fail(format!("empty interval [{}, {})", self.start, self.end));
        }
        if self.end > seq_len {
            return fail(format!(
                "interval end {} past sequence length {}",
                self.end, seq_len
            ));
        }
        if core_taxonomy::canonical_subclass(self.class, &self.subclass).is_err() {
            return fail(format!(
                "subclass {:?} not registered for {}",
                self.subclass, self.class
            ));
        }
        if !(1.0..=3.0).contains(&self.normalized_score) {
            return fail(format!(
                "normalized score {} outside [1.0, 3.0]",
                self.normalized_score
            ));
        }
        Ok(())
    }
}

/// The exported record schema, canonical field order. External coordinates
/// are 1-based inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub seq_id: String,
    pub class_id: Class,
    pub subclass_id: String,
    pub start_1based: u64,
    pub end_inclusive: u64,
    pub length: u64,
    pub strand: Strand,
    pub raw_score: f64,
    pub normalized_score: f64,
    pub method_tag: String,
    pub features_json: Features,
}

impl From<&Motif> for ExportRecord {
    fn from(m: &Motif) -> Self {
        let (start_1based, end_inclusive) = coords::to_external(m.start, m.end);
        ExportRecord {
            seq_id: m.seq_id.clone(),
            class_id: m.class,
            subclass_id: m.subclass.clone(),
            start_1based,
            end_inclusive,
            length: m.len(),
            strand: m.strand,
            raw_score: m.raw_score,
            normalized_score: m.normalized_score,
            method_tag: m.method_tag.to_string(),
            features_json: m.features.clone(),
        }
    }
}
