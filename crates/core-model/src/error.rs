//! Error taxonomy for the scan pipeline.
//!
//! The orchestrator catches and classifies; detectors never terminate the
//! pipeline. Per-variant handling policy:
//!
//! * `InvalidSequence`: skip the sequence, record a warning, continue.
//! * `UnknownTaxonomy`: fail ingestion of the offending record.
//! * `ChunkReadFailed`: retry once, then abort the sequence (recorded as a
//!   per-sequence failure, run continues).
//! * `Timeout`: flush completed motifs, mark the sequence `timed_out`.
//! * `InternalDetectorFailure`: drop the offending candidate only.
//! * `Store`: I/O or serialization failure in a backing store.

use core_seq::SequenceError;
use core_taxonomy::{Class, UnknownTaxonomy};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid sequence {seq_id:?}: {source}")]
    InvalidSequence {
        seq_id: String,
        #[source]
        source: SequenceError,
    },

    #[error(transparent)]
    UnknownTaxonomy(#[from] UnknownTaxonomy),

    #[error("chunk read failed for {seq_id:?} at [{start}, {end}): {detail}")]
    ChunkReadFailed {
        seq_id: String,
        start: u64,
        end: u64,
        detail: String,
    },

    #[error("per-sequence timeout exceeded for {seq_id:?} after {elapsed_ms} ms")]
    Timeout { seq_id: String, elapsed_ms: u64 },

    #[error("detector contract violation ({class} on {seq_id:?}): {detail}")]
    InternalDetectorFailure {
        seq_id: String,
        class: Class,
        detail: String,
    },

    #[error("store failure: {0}")]
    Store(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScanError {
    /// Stable counter key for the run-level error tally.
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::InvalidSequence { .. } => "invalid_sequence",
            ScanError::UnknownTaxonomy(_) => "unknown_taxonomy",
            ScanError::ChunkReadFailed { .. } => "chunk_read_failed",
            ScanError::Timeout { .. } => "timeout",
            ScanError::InternalDetectorFailure { .. } => "internal_detector_failure",
            ScanError::Store(_) => "store",
            ScanError::Config(_) => "config",
        }
    }
}

impl From<std::io::Error> for ScanError {
    fn from(e: std::io::Error) -> Self {
        ScanError::Store(e.to_string())
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(e: serde_json::Error) -> Self {
        ScanError::Store(e.to_string())
    }
}
