//! Disk-backed sequence storage with memory-mapped range reads.
//!
//! Sequences at or above the staging threshold (5 Mbp, decided by the
//! engine) are written here once and then read back range-by-range as
//! chunks are scheduled. Layout: one file of raw ASCII bases per sequence,
//! nothing else; the index lives in memory and dies with the store.

use core_model::ScanError;
use core_seq::gc_fraction;
use memmap2::Mmap;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// The sequence-source contract the chunk executor consumes: an identifier,
/// a total length, and random-access range reads.
pub trait SequenceSource: Send + Sync {
    fn id(&self) -> &str;
    fn len(&self) -> u64;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Read `[start, end)`; both bounds must be within the sequence.
    fn read_range(&self, start: u64, end: u64) -> Result<Vec<u8>, ScanError>;
}

/// Whole-sequence-in-RAM source for small inputs.
pub struct InMemorySource {
    id: String,
    bytes: Arc<Vec<u8>>,
}

impl InMemorySource {
    pub fn new(id: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            bytes: Arc::new(bytes),
        }
    }
}

impl SequenceSource for InMemorySource {
    fn id(&self) -> &str {
        &self.id
    }

    fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn read_range(&self, start: u64, end: u64) -> Result<Vec<u8>, ScanError> {
        let (s, e) = (start as usize, end as usize);
        if s > e || e > self.bytes.len() {
            return Err(ScanError::ChunkReadFailed {
                seq_id: self.id.clone(),
                start,
                end,
                detail: "range out of bounds".to_string(),
            });
        }
        Ok(self.bytes[s..e].to_vec())
    }
}

/// Per-sequence metadata held by the index.
#[derive(Debug, Clone)]
pub struct SeqMeta {
    pub path: PathBuf,
    pub length: u64,
    pub gc_fraction: f64,
}

/// One file per sequence under a root directory.
pub struct DiskSequenceStore {
    root: PathBuf,
    index: HashMap<String, SeqMeta>,
}

impl DiskSequenceStore {
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, ScanError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            index: HashMap::new(),
        })
    }

    fn path_for(&self, seq_id: &str) -> PathBuf {
        // seq ids can carry path-hostile characters; file names are derived,
        // not taken verbatim.
        let safe: String = seq_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.root.join(format!("{safe}.seq"))
    }

    /// Persist a sequence and index it. Overwrites a previous save under the
    /// same id.
    pub fn save(&mut self, seq_id: &str, bytes: &[u8]) -> Result<(), ScanError> {
        let path = self.path_for(seq_id);
        let mut file = File::create(&path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        self.index.insert(
            seq_id.to_string(),
            SeqMeta {
                path,
                length: bytes.len() as u64,
                gc_fraction: gc_fraction(bytes),
            },
        );
        tracing::debug!(
            target: "store.seq",
            seq_id,
            length = bytes.len(),
            "sequence_staged"
        );
        Ok(())
    }

    /// O(1) metadata lookup.
    pub fn metadata(&self, seq_id: &str) -> Option<&SeqMeta> {
        self.index.get(seq_id)
    }

    /// Read `[start, end)` of a staged sequence.
    pub fn read_range(&self, seq_id: &str, start: u64, end: u64) -> Result<Vec<u8>, ScanError> {
        self.open_source(seq_id)?.read_range(start, end)
    }

    /// A standalone, thread-shareable source over one staged sequence.
    pub fn open_source(&self, seq_id: &str) -> Result<DiskSource, ScanError> {
        let meta = self.index.get(seq_id).ok_or_else(|| ScanError::ChunkReadFailed {
            seq_id: seq_id.to_string(),
            start: 0,
            end: 0,
            detail: "sequence not staged".to_string(),
        })?;
        let file = File::open(&meta.path)?;
        // Safety: the store owns the file for the run; it is not truncated
        // while mapped.
        let map = unsafe { Mmap::map(&file) }.map_err(|e| ScanError::ChunkReadFailed {
            seq_id: seq_id.to_string(),
            start: 0,
            end: meta.length,
            detail: e.to_string(),
        })?;
        Ok(DiskSource {
            id: seq_id.to_string(),
            length: meta.length,
            map: Arc::new(map),
        })
    }

    pub fn delete(&mut self, seq_id: &str) -> Result<(), ScanError> {
        if let Some(meta) = self.index.remove(seq_id) {
            fs::remove_file(meta.path)?;
        }
        Ok(())
    }

    pub fn delete_all(&mut self) -> Result<(), ScanError> {
        let ids: Vec<String> = self.index.keys().cloned().collect();
        for id in ids {
            self.delete(&id)?;
        }
        Ok(())
    }

    pub fn seq_ids(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }
}

/// Memory-mapped view of one staged sequence.
#[derive(Clone)]
pub struct DiskSource {
    id: String,
    length: u64,
    map: Arc<Mmap>,
}

impl SequenceSource for DiskSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn len(&self) -> u64 {
        self.length
    }

    fn read_range(&self, start: u64, end: u64) -> Result<Vec<u8>, ScanError> {
        let (s, e) = (start as usize, end as usize);
        if s > e || e > self.map.len() {
            return Err(ScanError::ChunkReadFailed {
                seq_id: self.id.clone(),
                start,
                end,
                detail: "range out of bounds".to_string(),
            });
        }
        Ok(self.map[s..e].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_read_range_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DiskSequenceStore::create(dir.path()).unwrap();
        store.save("chr1", b"ACGTACGTACGTACGT").unwrap();
        assert_eq!(store.read_range("chr1", 4, 8).unwrap(), b"ACGT");
        assert_eq!(store.read_range("chr1", 0, 16).unwrap().len(), 16);
    }

    #[test]
    fn metadata_carries_length_and_gc() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DiskSequenceStore::create(dir.path()).unwrap();
        store.save("s", b"GGCCAATT").unwrap();
        let meta = store.metadata("s").unwrap();
        assert_eq!(meta.length, 8);
        assert!((meta.gc_fraction - 0.5).abs() < 1e-12);
    }

    #[test]
    fn out_of_bounds_read_is_a_chunk_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DiskSequenceStore::create(dir.path()).unwrap();
        store.save("s", b"ACGTACGTAC").unwrap();
        let err = store.read_range("s", 5, 20).unwrap_err();
        assert_eq!(err.kind(), "chunk_read_failed");
    }

    #[test]
    fn delete_removes_file_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DiskSequenceStore::create(dir.path()).unwrap();
        store.save("s", b"ACGTACGTAC").unwrap();
        let path = store.metadata("s").unwrap().path.clone();
        store.delete("s").unwrap();
        assert!(store.metadata("s").is_none());
        assert!(!path.exists());
    }

    #[test]
    fn hostile_seq_ids_become_safe_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DiskSequenceStore::create(dir.path()).unwrap();
        store.save("chr1|../../etc", b"ACGTACGTAC").unwrap();
        assert!(store.metadata("chr1|../../etc").unwrap().path.starts_with(dir.path()));
        assert_eq!(store.read_range("chr1|../../etc", 0, 4).unwrap(), b"ACGT");
    }

    #[test]
    fn in_memory_source_reads() {
        let src = InMemorySource::new("s", b"ACGTACGTAC".to_vec());
        assert_eq!(src.len(), 10);
        assert_eq!(src.read_range(2, 6).unwrap(), b"GTAC");
        assert!(src.read_range(8, 12).is_err());
    }
}
