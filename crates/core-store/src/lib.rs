//! Backing stores: random-access sequence storage and the streaming result
//! store.
//!
//! Two storage concerns live here, both deliberately dumb:
//!
//! * [`seqstore`]: one raw-ASCII file per sequence with an in-memory
//!   `{seq_id -> (path, length, gc)}` index; range reads go through a memory
//!   map, so a worker reading its 50 kb chunk of a 3 Gb genome touches only
//!   those pages.
//! * [`results`]: append-only newline-delimited JSON, one record per motif,
//!   with a summary (count, per-class distribution, coverage) maintained
//!   incrementally at append time so answering it never replays the file.

pub mod results;
pub mod seqstore;

pub use results::{ResultStore, StoreSummary};
pub use seqstore::{DiskSequenceStore, InMemorySource, SequenceSource};
