//! The orchestrator: the single-threaded owner of the pipeline.
//!
//! Per sequence: normalize → pick a chunk plan → fan chunks out to the
//! worker pool → barrier → consolidate seam fragments → within-subclass
//! dedup → invariant check (violations here are pipeline bugs and abort the
//! run) → hybrid + cluster annotation → canonical sort → append to the
//! result store. Sequences are processed in input order, so cross-sequence
//! ordering in the store is input order; within a sequence the canonical
//! sort fixes `(start, end, class, subclass)` order.
//!
//! The orchestrator is the only writer to the result store and the only
//! poller of cancellation and deadlines; detectors stay pure.

use crate::chunker::{self, DISK_STAGING_MIN};
use crate::config::ScanConfig;
use crate::pool::{self, Interruption};
use crate::summary::{RunSummary, SequenceStatus, SequenceSummary};
use core_detect::{Detector, default_detectors};
use core_model::{Motif, ScanError};
use core_post as post;
use core_seq::Sequence;
use core_store::{DiskSequenceStore, InMemorySource, ResultStore, SequenceSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

pub struct ScanEngine {
    config: ScanConfig,
    detectors: Vec<Box<dyn Detector>>,
    cancel: Arc<AtomicBool>,
}

/// One input sequence: an opaque id and its raw bytes.
pub type SequenceInput = (String, Vec<u8>);

impl ScanEngine {
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        let config = config.validated()?;
        let enabled = config.classes();
        let detectors: Vec<Box<dyn Detector>> = default_detectors(&config.detector_params())
            .into_iter()
            .filter(|d| enabled.contains(&d.class()))
            .collect();
        info!(
            target: "engine",
            detectors = detectors.len(),
            workers = config.workers(),
            "engine_ready"
        );
        Ok(Self {
            config,
            detectors,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Shared flag; setting it stops the run at the next chunk boundary.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Full pipeline for one already-validated sequence held in memory.
    /// Library-level entry point; `run` is the batch driver on top.
    pub fn scan_sequence(&self, seq: &Sequence) -> Result<Vec<Motif>, ScanError> {
        let source = InMemorySource::new(seq.id(), seq.bytes().to_vec());
        let plan = chunker::plan(source.len(), &self.config);
        let outcome = pool::execute(
            &self.detectors,
            &source,
            &plan,
            self.config.workers(),
            &self.cancel,
            None,
        );
        if let Some(i) = outcome.interruption {
            return Err(ScanError::Store(format!("scan interrupted: {i:?}")));
        }
        self.post_process(outcome.motifs)
    }

    /// Consolidate, dedup, verify, annotate, sort.
    fn post_process(&self, motifs: Vec<Motif>) -> Result<Vec<Motif>, ScanError> {
        let mut motifs = post::merge_seam_fragments(motifs);
        // Re-run subclass priority resolution over whole-sequence candidate
        // sets: a clipped lower-priority variant emitted at a chunk seam
        // must lose to the full-length call owned by the neighbouring
        // chunk, exactly as it would in an unchunked scan.
        for det in &self.detectors {
            if let Some(priority) = det.overlap_priority() {
                let class = det.class();
                let (of_class, rest): (Vec<Motif>, Vec<Motif>) =
                    motifs.into_iter().partition(|m| m.class == class);
                motifs = rest;
                motifs.extend(core_detect::resolve_by_priority(of_class, priority));
            }
        }
        let mut primaries = post::dedup_within_subclass(motifs);
        post::sort_canonical(&mut primaries);

        // Post-dedup invariant check: a violation past this point is a
        // pipeline bug, not a data defect, and must abort loudly.
        verify_no_subclass_overlap(&primaries)?;

        let hybrids = post::annotate_hybrids(&primaries, &self.config.hybrid_params());
        let clusters = post::annotate_clusters(&primaries, &self.config.cluster_params());
        primaries.extend(hybrids);
        primaries.extend(clusters);
        post::sort_canonical(&mut primaries);
        Ok(primaries)
    }

    /// Scan a batch of sequences, appending all records to `store`.
    ///
    /// Every sequence gets a summary entry (`ok`/`skipped`/`timed_out`/
    /// `failed`); partial results are retained on timeout and failure.
    /// Returns an error only for pipeline-integrity violations.
    pub fn run(
        &self,
        inputs: impl IntoIterator<Item = SequenceInput>,
        store: &mut ResultStore,
    ) -> Result<RunSummary, ScanError> {
        let mut summary = RunSummary::default();
        let mut staging: Option<DiskSequenceStore> = None;

        for (seq_id, raw) in inputs {
            if self.cancel.load(Ordering::Relaxed) {
                warn!(target: "engine", seq_id = seq_id.as_str(), "run_cancelled");
                break;
            }
            let seq = match Sequence::new(seq_id.clone(), &raw) {
                Ok(seq) => seq,
                Err(e) => {
                    let err = ScanError::InvalidSequence {
                        seq_id: seq_id.clone(),
                        source: e,
                    };
                    warn!(target: "engine", seq_id = seq_id.as_str(), error = %err, "sequence_skipped");
                    summary.count_error(err.kind());
                    summary.sequences.push(SequenceSummary {
                        seq_id,
                        length: raw.len() as u64,
                        status: SequenceStatus::Skipped,
                        motif_count: 0,
                        warnings: vec![err.to_string()],
                    });
                    continue;
                }
            };
            drop(raw);

            let mut warnings = Vec::new();
            let stats = seq.normalization_stats();
            if stats.ambiguity_to_n > 0 {
                warnings.push(format!("{} ambiguous bases mapped to N", stats.ambiguity_to_n));
            }

            let seq_len = seq.len() as u64;
            let deadline = self
                .config
                .per_sequence_timeout_ms
                .map(|ms| Instant::now() + Duration::from_millis(ms));
            let plan = chunker::plan(seq_len, &self.config);
            info!(
                target: "engine",
                seq_id = seq.id(),
                length = seq_len,
                tier = ?plan.tier,
                chunks = plan.chunk_count(),
                "sequence_start"
            );

            // Big sequences go through the disk store; the in-memory copy is
            // dropped before detection starts.
            let outcome = if seq_len >= DISK_STAGING_MIN {
                if staging.is_none() {
                    let dir = self
                        .config
                        .staging_dir
                        .clone()
                        .unwrap_or_else(std::env::temp_dir)
                        .join("nonbscan-staging");
                    staging = Some(DiskSequenceStore::create(dir)?);
                }
                let Some(stage) = staging.as_mut() else {
                    return Err(ScanError::Store("staging store unavailable".to_string()));
                };
                stage.save(seq.id(), seq.bytes())?;
                let source = stage.open_source(seq.id())?;
                let seq_id_owned = seq.id().to_string();
                drop(seq);
                let outcome = pool::execute(
                    &self.detectors,
                    &source,
                    &plan,
                    self.config.workers(),
                    &self.cancel,
                    deadline,
                );
                stage.delete(&seq_id_owned)?;
                outcome
            } else {
                let source = InMemorySource::new(seq.id(), seq.bytes().to_vec());
                pool::execute(
                    &self.detectors,
                    &source,
                    &plan,
                    self.config.workers(),
                    &self.cancel,
                    deadline,
                )
            };

            summary.count_errors("internal_detector_failure", outcome.dropped_candidates);

            let status = match &outcome.interruption {
                None => SequenceStatus::Ok,
                Some(Interruption::TimedOut) => {
                    summary.count_error("timeout");
                    warnings.push("per-sequence timeout exceeded".to_string());
                    SequenceStatus::TimedOut
                }
                Some(Interruption::Cancelled) => {
                    warnings.push("cancelled".to_string());
                    SequenceStatus::Failed
                }
                Some(Interruption::Failed(detail)) => {
                    summary.count_error("chunk_read_failed");
                    warnings.push(detail.clone());
                    SequenceStatus::Failed
                }
            };

            // Partial results are retained for timed-out and failed
            // sequences; cancelled chunks already dropped their motifs.
            let motifs = match self.post_process(outcome.motifs) {
                Ok(motifs) => motifs,
                Err(e) => {
                    error!(target: "engine", seq_id = seq_id.as_str(), error = %e, "pipeline_invariant_violation");
                    return Err(e);
                }
            };
            store.append_batch(&motifs)?;
            store.flush()?;
            summary.sequences.push(SequenceSummary {
                seq_id,
                length: seq_len,
                status,
                motif_count: motifs.len() as u64,
                warnings,
            });
        }
        Ok(summary)
    }
}

/// Post-dedup invariant: no two primaries of one `(class, subclass)` may
/// overlap.
fn verify_no_subclass_overlap(sorted: &[Motif]) -> Result<(), ScanError> {
    for (i, a) in sorted.iter().enumerate() {
        for b in sorted[i + 1..].iter() {
            if b.start >= a.end {
                break;
            }
            if a.class == b.class && a.subclass == b.subclass {
                return Err(ScanError::InternalDetectorFailure {
                    seq_id: a.seq_id.clone(),
                    class: a.class,
                    detail: format!(
                        "post-dedup overlap in {}/{}: [{}, {}) vs [{}, {})",
                        a.class, a.subclass, a.start, a.end, b.start, b.end
                    ),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ScanEngine {
        ScanEngine::new(ScanConfig {
            max_workers: 2,
            ..ScanConfig::default()
        })
        .unwrap()
    }

    fn scan(seq: &[u8]) -> Vec<Motif> {
        let sequence = Sequence::new("t", seq).unwrap();
        engine().scan_sequence(&sequence).unwrap()
    }

    #[test]
    fn telomeric_sequence_end_to_end() {
        let motifs = scan(b"TTAGGGTTAGGGTTAGGGTTAGGG");
        let g4: Vec<&Motif> = motifs
            .iter()
            .filter(|m| m.class == core_taxonomy::Class::GQuadruplex)
            .collect();
        assert_eq!(g4.len(), 1);
        assert_eq!(g4[0].subclass, "Telomeric");
        assert!(g4[0].normalized_score >= 2.3);
    }

    #[test]
    fn run_skips_short_and_invalid_sequences() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ResultStore::create(dir.path().join("out.ndjson")).unwrap();
        let summary = engine()
            .run(
                vec![
                    ("tiny".to_string(), b"ACGT".to_vec()),
                    ("bad".to_string(), b"ACGT-ACGTACGT".to_vec()),
                    ("good".to_string(), b"TTAGGGTTAGGGTTAGGGTTAGGG".to_vec()),
                ],
                &mut store,
            )
            .unwrap();
        assert_eq!(summary.status_of("tiny"), Some(SequenceStatus::Skipped));
        assert_eq!(summary.status_of("bad"), Some(SequenceStatus::Skipped));
        assert_eq!(summary.status_of("good"), Some(SequenceStatus::Ok));
        assert_eq!(summary.error_counts["invalid_sequence"], 2);
        assert!(store.summary().total_count >= 1);
    }

    #[test]
    fn output_is_sorted_canonically() {
        let mut seq = Vec::new();
        seq.extend_from_slice(&b"CGCGCGCGCGCGCGCGCG".repeat(2));
        seq.extend_from_slice(b"TTTTTTTTTTTT");
        seq.extend_from_slice(b"GGGAGGGAGGGAGGG");
        let motifs = scan(&seq);
        for pair in motifs.windows(2) {
            assert!(
                (pair[0].start, pair[0].end) <= (pair[1].start, pair[1].end),
                "not sorted"
            );
        }
    }

    #[test]
    fn no_subclass_overlap_after_pipeline() {
        let mut seq = Vec::new();
        for _ in 0..5 {
            seq.extend_from_slice(b"GGGAGGGAGGGAGGGTTAGGGTTAGGGTTAGGGTTAGGGAAACAGCAGCAGCAGCAGCAGCAGCAG");
        }
        let motifs = scan(&seq);
        let primaries: Vec<Motif> = motifs
            .into_iter()
            .filter(|m| !m.class.is_derived())
            .collect();
        verify_no_subclass_overlap(&primaries).unwrap();
    }
}
