//! Adaptive three-tier chunk planning.
//!
//! Tier selection by sequence length:
//!
//! | length      | tier   | read batch | scan chunk        |
//! |-------------|--------|------------|-------------------|
//! | < 1 Mbp     | direct | whole seq  | whole seq         |
//! | 1–10 Mbp    | micro  | whole seq  | 50 kb, 2 kb olap  |
//! | 10–100 Mbp  | meso   | 5 Mb       | 50 kb, 2 kb olap  |
//! | ≥ 100 Mbp   | macro  | 5 Mb       | 50 kb, 2 kb olap  |
//!
//! The deeper tiers change read granularity, not detection semantics: the
//! same micro chunks are scanned either way, so chunked output is
//! independent of tier. Macro-length sequences additionally always run
//! against the disk-backed store.
//!
//! **Core regions.** A chunk `[start, end)` with overlap `o` owns the core
//! `[start, end - o)`; the final chunk's core extends to the sequence end.
//! Cores tile the sequence exactly, and a motif is assigned to the single
//! chunk whose core contains its start. That rule is the sole mechanism
//! preventing boundary double-counting.

use crate::config::ScanConfig;

pub const TIER_DIRECT_MAX: u64 = 1_000_000;
pub const TIER_MICRO_MAX: u64 = 10_000_000;
pub const TIER_MESO_MAX: u64 = 100_000_000;

pub const MICRO_CHUNK: u64 = 50_000;
pub const MICRO_OVERLAP: u64 = 2_000;
pub const MESO_BATCH: u64 = 5_000_000;

/// Sequences at or above this length are staged to the disk store.
pub const DISK_STAGING_MIN: u64 = 5_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Direct,
    Micro,
    Meso,
    Macro,
}

/// One unit of detector work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub start: u64,
    pub end: u64,
    /// End of the authoritative core region (`start..core_end`).
    pub core_end: u64,
}

impl Chunk {
    /// True when this chunk is the authoritative reporter for a motif
    /// starting at `pos`.
    pub fn owns(&self, pos: u64) -> bool {
        (self.start..self.core_end).contains(&pos)
    }
}

/// A read unit: one contiguous range fetched from the sequence source, and
/// the chunks scanned inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub start: u64,
    pub end: u64,
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    pub tier: Tier,
    pub batches: Vec<Batch>,
}

impl ChunkPlan {
    pub fn chunk_count(&self) -> usize {
        self.batches.iter().map(|b| b.chunks.len()).sum()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.batches.iter().flat_map(|b| b.chunks.iter())
    }
}

fn select_tier(len: u64) -> Tier {
    match len {
        0..TIER_DIRECT_MAX => Tier::Direct,
        TIER_DIRECT_MAX..TIER_MICRO_MAX => Tier::Micro,
        TIER_MICRO_MAX..TIER_MESO_MAX => Tier::Meso,
        _ => Tier::Macro,
    }
}

/// Generate the chunk list for one sequence. Cores tile `[0, len)` exactly.
fn chunk_list(len: u64, chunk_size: u64, overlap: u64) -> Vec<Chunk> {
    debug_assert!(overlap < chunk_size);
    let stride = chunk_size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0u64;
    let mut index = 0usize;
    loop {
        let end = (start + chunk_size).min(len);
        let core_end = if end == len { len } else { end - overlap };
        chunks.push(Chunk {
            index,
            start,
            end,
            core_end,
        });
        if end == len {
            break;
        }
        start += stride;
        index += 1;
    }
    chunks
}

/// Build the execution plan for a sequence of `len` bases.
pub fn plan(len: u64, config: &ScanConfig) -> ChunkPlan {
    let tier = select_tier(len);
    let (chunk_size, overlap) = match (tier, &config.chunk_tier_overrides) {
        (Tier::Direct, None) => (len.max(1), 0),
        (_, None) => (MICRO_CHUNK, MICRO_OVERLAP),
        (_, Some(o)) => (o.micro_chunk, o.micro_overlap),
    };
    let chunks = chunk_list(len, chunk_size, overlap);

    let batch_size = match tier {
        Tier::Direct | Tier::Micro => u64::MAX,
        Tier::Meso | Tier::Macro => MESO_BATCH.max(chunk_size),
    };
    let mut batches: Vec<Batch> = Vec::new();
    for chunk in chunks {
        let need_new = match batches.last() {
            None => true,
            // A batch spans a fixed address window; a chunk belongs to the
            // batch its core starts in.
            Some(b) => chunk.start >= b.start.saturating_add(batch_size),
        };
        if need_new {
            batches.push(Batch {
                start: chunk.start,
                end: chunk.end,
                chunks: Vec::new(),
            });
        }
        let batch = batches.last_mut().expect("just pushed");
        batch.end = batch.end.max(chunk.end);
        batch.chunks.push(chunk);
    }
    ChunkPlan { tier, batches }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkTierOverrides;

    fn cfg() -> ScanConfig {
        ScanConfig::default()
    }

    #[test]
    fn short_sequence_is_direct() {
        let p = plan(500_000, &cfg());
        assert_eq!(p.tier, Tier::Direct);
        assert_eq!(p.chunk_count(), 1);
        let c = p.chunks().next().unwrap();
        assert_eq!((c.start, c.end, c.core_end), (0, 500_000, 500_000));
    }

    #[test]
    fn micro_tier_uses_fifty_kb_chunks() {
        let p = plan(2_000_000, &cfg());
        assert_eq!(p.tier, Tier::Micro);
        assert_eq!(p.batches.len(), 1);
        let first = p.chunks().next().unwrap();
        assert_eq!((first.start, first.end, first.core_end), (0, 50_000, 48_000));
    }

    #[test]
    fn cores_tile_the_sequence_exactly() {
        for len in [999u64, 100_000, 123_457, 2_000_001] {
            let cfg = ScanConfig {
                chunk_tier_overrides: Some(ChunkTierOverrides {
                    micro_chunk: 10_000,
                    micro_overlap: 1_000,
                }),
                ..ScanConfig::default()
            };
            let p = plan(len, &cfg);
            let mut expected_start = 0u64;
            for c in p.chunks() {
                assert_eq!(c.start, expected_start);
                assert!(c.core_end > c.start);
                expected_start = c.core_end;
            }
            assert_eq!(expected_start, len);
        }
    }

    #[test]
    fn every_position_has_exactly_one_owner() {
        let cfg = ScanConfig {
            chunk_tier_overrides: Some(ChunkTierOverrides {
                micro_chunk: 1_000,
                micro_overlap: 100,
            }),
            ..ScanConfig::default()
        };
        let p = plan(3_456, &cfg);
        for pos in 0..3_456u64 {
            let owners = p.chunks().filter(|c| c.owns(pos)).count();
            assert_eq!(owners, 1, "position {pos}");
        }
    }

    #[test]
    fn last_chunk_core_extends_to_the_end() {
        let p = plan(1_500_000, &cfg());
        let last = p.chunks().last().unwrap();
        assert_eq!(last.core_end, last.end);
        assert_eq!(last.end, 1_500_000);
    }

    #[test]
    fn meso_tier_batches_reads() {
        let p = plan(20_000_000, &cfg());
        assert_eq!(p.tier, Tier::Meso);
        assert!(p.batches.len() >= 4);
        // Batches overlap only by chunk overlap; their chunk sets partition
        // the chunk list.
        let total: usize = p.batches.iter().map(|b| b.chunks.len()).sum();
        assert_eq!(total, p.chunk_count());
    }

    #[test]
    fn macro_tier_selected_above_hundred_mbp() {
        let p = plan(150_000_000, &cfg());
        assert_eq!(p.tier, Tier::Macro);
        assert!(p.batches.len() >= 30);
    }
}
