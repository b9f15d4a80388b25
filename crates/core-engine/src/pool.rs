//! Chunk execution over a worker pool.
//!
//! One bounded job channel fans chunks out to scoped worker threads; one
//! unbounded result channel fans candidate batches back in. The dispatching
//! thread is the only reader of the sequence source (reads are a declared
//! blocking point) and the only place cancellation and the per-sequence
//! deadline are polled: between chunks, never inside a detector call.
//! Workers never block on the result side, so a slow consumer cannot wedge
//! the pool.
//!
//! Timeout semantics: chunks not yet dispatched are dropped; chunks already
//! in flight run to completion and their motifs are kept ("flush completed
//! motifs"). Cancellation is stricter: in-flight results are discarded.

use crate::chunker::{Chunk, ChunkPlan};
use core_detect::Detector;
use core_model::{Motif, ScanError};
use core_store::SequenceSource;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

/// Why execution stopped early, if it did.
#[derive(Debug, PartialEq)]
pub enum Interruption {
    TimedOut,
    Cancelled,
    Failed(String),
}

/// Everything the orchestrator needs from one sequence's chunk run.
pub struct ExecOutcome {
    pub motifs: Vec<Motif>,
    /// Candidates dropped for violating the detector contract.
    pub dropped_candidates: u64,
    pub detector_errors: Vec<ScanError>,
    pub interruption: Option<Interruption>,
    pub chunks_done: usize,
}

struct Job {
    chunk: Chunk,
    batch_bytes: Arc<Vec<u8>>,
    batch_start: u64,
}

struct ChunkResult {
    motifs: Vec<Motif>,
    dropped: u64,
    errors: Vec<ScanError>,
}

/// Run one chunk on the calling worker thread.
fn run_chunk(detectors: &[Box<dyn Detector>], seq_id: &str, seq_len: u64, job: &Job) -> ChunkResult {
    let lo = (job.chunk.start - job.batch_start) as usize;
    let hi = (job.chunk.end - job.batch_start) as usize;
    let local = &job.batch_bytes[lo..hi];
    let mut motifs = Vec::new();
    let mut dropped = 0u64;
    let mut errors = Vec::new();
    for det in detectors {
        for cand in det.scan(local, seq_id, job.chunk.start) {
            if !job.chunk.owns(cand.start) {
                continue; // another chunk's core reports it
            }
            match cand.validate(seq_len) {
                Ok(()) => motifs.push(cand),
                Err(e) => {
                    warn!(
                        target: "engine.worker",
                        seq_id,
                        chunk = job.chunk.index,
                        class = %cand.class,
                        error = %e,
                        "candidate_dropped"
                    );
                    dropped += 1;
                    errors.push(e);
                }
            }
        }
    }
    ChunkResult {
        motifs,
        dropped,
        errors,
    }
}

fn worker_loop(
    detectors: &[Box<dyn Detector>],
    seq_id: &str,
    seq_len: u64,
    jobs: Receiver<Job>,
    results: Sender<(usize, ChunkResult)>,
) {
    for job in jobs.iter() {
        let index = job.chunk.index;
        let result = run_chunk(detectors, seq_id, seq_len, &job);
        if results.send((index, result)).is_err() {
            return; // collector went away; nothing left to do
        }
    }
}

/// Execute a chunk plan against a sequence source.
pub fn execute(
    detectors: &[Box<dyn Detector>],
    source: &dyn SequenceSource,
    plan: &ChunkPlan,
    workers: usize,
    cancel: &AtomicBool,
    deadline: Option<Instant>,
) -> ExecOutcome {
    let seq_id = source.id().to_string();
    let seq_len = source.len();
    let workers = workers.max(1);
    let (job_tx, job_rx) = bounded::<Job>(workers * 2);
    let (res_tx, res_rx) = unbounded::<(usize, ChunkResult)>();

    let mut interruption: Option<Interruption> = None;
    let mut dispatched = 0usize;

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let jobs = job_rx.clone();
            let results = res_tx.clone();
            let seq_id = seq_id.clone();
            scope.spawn(move || worker_loop(detectors, &seq_id, seq_len, jobs, results));
        }
        drop(job_rx);
        drop(res_tx);

        'dispatch: for batch in &plan.batches {
            if cancel.load(Ordering::Relaxed) {
                interruption = Some(Interruption::Cancelled);
                break;
            }
            if let Some(d) = deadline
                && Instant::now() >= d
            {
                interruption = Some(Interruption::TimedOut);
                break;
            }
            // Blocking point: read the batch from the source, one retry.
            let bytes = match source
                .read_range(batch.start, batch.end)
                .or_else(|first| {
                    debug!(
                        target: "engine.chunk",
                        seq_id = seq_id.as_str(),
                        start = batch.start,
                        end = batch.end,
                        error = %first,
                        "batch_read_retry"
                    );
                    source.read_range(batch.start, batch.end)
                }) {
                Ok(b) => Arc::new(b),
                Err(e) => {
                    interruption = Some(Interruption::Failed(e.to_string()));
                    break;
                }
            };
            for &chunk in &batch.chunks {
                if cancel.load(Ordering::Relaxed) {
                    interruption = Some(Interruption::Cancelled);
                    break 'dispatch;
                }
                if let Some(d) = deadline
                    && Instant::now() >= d
                {
                    interruption = Some(Interruption::TimedOut);
                    break 'dispatch;
                }
                let job = Job {
                    chunk,
                    batch_bytes: Arc::clone(&bytes),
                    batch_start: batch.start,
                };
                if job_tx.send(job).is_err() {
                    break 'dispatch;
                }
                dispatched += 1;
            }
        }
        drop(job_tx);
    });

    // Workers are joined; drain everything they produced.
    let mut per_chunk: Vec<(usize, ChunkResult)> = res_rx.try_iter().collect();
    per_chunk.sort_by_key(|(index, _)| *index);

    let cancelled = matches!(interruption, Some(Interruption::Cancelled));
    let mut outcome = ExecOutcome {
        motifs: Vec::new(),
        dropped_candidates: 0,
        detector_errors: Vec::new(),
        interruption,
        chunks_done: per_chunk.len(),
    };
    if cancelled {
        // In-flight results are dropped on cancellation.
        return outcome;
    }
    for (_, result) in per_chunk {
        outcome.motifs.extend(result.motifs);
        outcome.dropped_candidates += result.dropped;
        outcome.detector_errors.extend(result.errors);
    }
    debug!(
        target: "engine.chunk",
        seq_id = seq_id.as_str(),
        dispatched,
        done = outcome.chunks_done,
        motifs = outcome.motifs.len(),
        "chunks_complete"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker;
    use crate::config::{ChunkTierOverrides, ScanConfig};
    use core_detect::{DetectorParams, default_detectors};
    use core_store::InMemorySource;

    fn small_cfg() -> ScanConfig {
        ScanConfig {
            chunk_tier_overrides: Some(ChunkTierOverrides {
                micro_chunk: 1_000,
                micro_overlap: 200,
            }),
            ..ScanConfig::default()
        }
    }

    fn run(seq: Vec<u8>, cfg: &ScanConfig) -> ExecOutcome {
        let detectors = default_detectors(&cfg.detector_params());
        let source = InMemorySource::new("s", seq);
        let plan = chunker::plan(source.len(), cfg);
        execute(&detectors, &source, &plan, 2, &AtomicBool::new(false), None)
    }

    #[test]
    fn chunked_run_reports_each_motif_once() {
        // A telomeric repeat straddling a core boundary at 800.
        let mut seq = b"A".repeat(790);
        seq.extend_from_slice(&b"TTAGGG".repeat(4));
        seq.extend_from_slice(&b"C".repeat(790));
        let out = run(seq, &small_cfg());
        let telomeric: Vec<&Motif> = out
            .motifs
            .iter()
            .filter(|m| m.subclass == "Telomeric")
            .collect();
        assert_eq!(telomeric.len(), 1);
        assert_eq!(telomeric[0].start, 790);
    }

    #[test]
    fn cancellation_discards_results() {
        let cancel = AtomicBool::new(true);
        let cfg = small_cfg();
        let detectors = default_detectors(&DetectorParams::default());
        let source = InMemorySource::new("s", b"GGGAGGGAGGGAGGG".repeat(100));
        let plan = chunker::plan(source.len(), &cfg);
        let out = execute(&detectors, &source, &plan, 2, &cancel, None);
        assert_eq!(out.interruption, Some(Interruption::Cancelled));
        assert!(out.motifs.is_empty());
    }

    #[test]
    fn expired_deadline_times_out_immediately() {
        let cfg = small_cfg();
        let detectors = default_detectors(&DetectorParams::default());
        let source = InMemorySource::new("s", b"GGGAGGGAGGGAGGG".repeat(100));
        let plan = chunker::plan(source.len(), &cfg);
        let past = Instant::now() - std::time::Duration::from_millis(1);
        let out = execute(&detectors, &source, &plan, 2, &AtomicBool::new(false), Some(past));
        assert_eq!(out.interruption, Some(Interruption::TimedOut));
    }
}
