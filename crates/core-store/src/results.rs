//! Streaming result store: append-only NDJSON with an incremental summary.
//!
//! One line per motif in the canonical export schema. The summary (total
//! count, per-class distribution, coverage in bases) is maintained at append
//! time, coverage by insert-merging intervals per sequence, so `summary()`
//! never re-reads the file. `iter()` replays the file lazily for consumers
//! that want the full stream back.

use core_model::{ExportRecord, Motif, ScanError};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Aggregate answers the store keeps current as records are appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSummary {
    pub total_count: u64,
    pub class_distribution: BTreeMap<String, u64>,
    /// Bases covered by at least one motif, across all sequences.
    pub coverage_bp: u64,
}

/// Sorted, disjoint interval set per sequence; insert-merge keeps the
/// covered-base count exact under arbitrary overlap.
#[derive(Debug, Default)]
struct CoverageTracker {
    per_seq: BTreeMap<String, BTreeMap<u64, u64>>,
    covered: u64,
}

impl CoverageTracker {
    fn add(&mut self, seq_id: &str, start: u64, end: u64) {
        let intervals = self.per_seq.entry(seq_id.to_string()).or_default();
        let (mut s, mut e) = (start, end);
        // Absorb every stored interval touching [s, e). Stored intervals are
        // disjoint, so walking right-to-left from the last start ≤ e and
        // stopping at the first interval ending before s visits exactly the
        // touching set.
        let overlapping: Vec<(u64, u64)> = intervals
            .range(..=e)
            .rev()
            .take_while(|&(_, &iend)| iend >= s)
            .map(|(&istart, &iend)| (istart, iend))
            .collect();
        for (istart, iend) in overlapping {
            intervals.remove(&istart);
            self.covered -= iend - istart;
            s = s.min(istart);
            e = e.max(iend);
        }
        intervals.insert(s, e);
        self.covered += e - s;
    }
}

/// Append-only disk-backed motif stream.
pub struct ResultStore {
    path: PathBuf,
    writer: BufWriter<File>,
    summary: StoreSummary,
    coverage: CoverageTracker,
}

impl ResultStore {
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, ScanError> {
        let path = path.into();
        let file = File::create(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            summary: StoreSummary::default(),
            coverage: CoverageTracker::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one motif as a JSON line and fold it into the summary.
    pub fn append(&mut self, motif: &Motif) -> Result<(), ScanError> {
        let record = ExportRecord::from(motif);
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.summary.total_count += 1;
        *self
            .summary
            .class_distribution
            .entry(motif.class.name().to_string())
            .or_insert(0) += 1;
        self.coverage.add(&motif.seq_id, motif.start, motif.end);
        self.summary.coverage_bp = self.coverage.covered;
        Ok(())
    }

    /// Append a batch, in order.
    pub fn append_batch<'a>(
        &mut self,
        motifs: impl IntoIterator<Item = &'a Motif>,
    ) -> Result<(), ScanError> {
        for m in motifs {
            self.append(m)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ScanError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn summary(&self) -> &StoreSummary {
        &self.summary
    }

    /// Replay the stream from disk; `limit` caps the number of records.
    pub fn iter(
        &mut self,
        limit: Option<usize>,
    ) -> Result<impl Iterator<Item = Result<ExportRecord, ScanError>> + use<>, ScanError> {
        self.flush()?;
        let reader = BufReader::new(File::open(&self.path)?);
        let cap = limit.unwrap_or(usize::MAX);
        Ok(reader
            .lines()
            .take(cap)
            .map(|line| -> Result<ExportRecord, ScanError> {
                let line = line?;
                Ok(serde_json::from_str(&line)?)
            }))
    }
}
