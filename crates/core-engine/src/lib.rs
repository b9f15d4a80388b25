//! Scan engine: configuration, adaptive chunking, the worker pool, and the
//! orchestrator that ties detection to post-processing and storage.
//!
//! The library entry point is [`ScanEngine`]: build it from a [`ScanConfig`],
//! then either [`ScanEngine::scan_sequence`] for one in-memory sequence or
//! [`ScanEngine::run`] for a batch feeding a result store. Everything below
//! it (chunk planning, pool execution) is public for tests and tooling but
//! not needed by ordinary callers.

pub mod chunker;
pub mod config;
pub mod orchestrator;
pub mod pool;
pub mod summary;

pub use chunker::{ChunkPlan, Tier};
pub use config::{ChunkTierOverrides, ScanConfig};
pub use orchestrator::{ScanEngine, SequenceInput};
pub use summary::{RunSummary, SequenceStatus, SequenceSummary};
