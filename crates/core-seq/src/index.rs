//! Positional k-mer index and prefix-sum base counters.
//!
//! [`KmerIndex`] backs the seed-and-extend detectors (cruciform, mirror
//! triplex, direct repeats): k-mers are 2-bit packed so lookups are integer
//! hashing, and any window containing `N` is simply absent from the index.
//!
//! [`PrefixCounts`] gives O(1) G/C counts over arbitrary windows, which the
//! R-loop detector queries heavily (G-content of every candidate zone) and
//! the Z-DNA region extraction uses for cumulative sums.

use std::collections::HashMap;

/// 2-bit encode a k-mer; `None` if it contains a non-ACGT byte or `k > 32`.
pub fn encode_kmer(kmer: &[u8]) -> Option<u64> {
    if kmer.len() > 32 {
        return None;
    }
    let mut code = 0u64;
    for &b in kmer {
        let two = match b {
            b'A' => 0u64,
            b'C' => 1,
            b'G' => 2,
            b'T' => 3,
            _ => return None,
        };
        code = (code << 2) | two;
    }
    Some(code)
}

/// Positions of every ACGT-only k-mer in a buffer.
#[derive(Debug)]
pub struct KmerIndex {
    k: usize,
    map: HashMap<u64, Vec<u32>>,
}

impl KmerIndex {
    /// Build the index with a rolling 2-bit encoding; one pass, O(n).
    pub fn build(seq: &[u8], k: usize) -> Self {
        assert!(k >= 1 && k <= 32, "k must be in 1..=32");
        let mut map: HashMap<u64, Vec<u32>> = HashMap::new();
        if seq.len() < k {
            return Self { k, map };
        }
        let mask = if k == 32 { u64::MAX } else { (1u64 << (2 * k)) - 1 };
        let mut code = 0u64;
        // Number of valid (ACGT) bases currently rolled into `code`.
        let mut valid = 0usize;
        for (i, &b) in seq.iter().enumerate() {
            let two = match b {
                b'A' => 0u64,
                b'C' => 1,
                b'G' => 2,
                b'T' => 3,
                _ => {
                    valid = 0;
                    code = 0;
                    continue;
                }
            };
            code = ((code << 2) | two) & mask;
            valid += 1;
            if valid >= k {
                let start = i + 1 - k;
                map.entry(code).or_default().push(start as u32);
            }
        }
        Self { k, map }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Start positions of `kmer`, ascending. Empty for unseen or invalid k-mers.
    pub fn positions(&self, kmer: &[u8]) -> &[u32] {
        debug_assert_eq!(kmer.len(), self.k);
        encode_kmer(kmer)
            .and_then(|code| self.map.get(&code))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

/// Prefix sums of G and C counts for O(1) windowed content queries.
#[derive(Debug)]
pub struct PrefixCounts {
    g: Vec<u32>,
    c: Vec<u32>,
}

impl PrefixCounts {
    pub fn build(seq: &[u8]) -> Self {
        let mut g = Vec::with_capacity(seq.len() + 1);
        let mut c = Vec::with_capacity(seq.len() + 1);
        g.push(0);
        c.push(0);
        let (mut gs, mut cs) = (0u32, 0u32);
        for &b in seq {
            if b == b'G' {
                gs += 1;
            } else if b == b'C' {
                cs += 1;
            }
            g.push(gs);
            c.push(cs);
        }
        Self { g, c }
    }

    /// G count in `[start, end)`.
    pub fn g_in(&self, start: usize, end: usize) -> usize {
        (self.g[end] - self.g[start]) as usize
    }

    /// C count in `[start, end)`.
    pub fn c_in(&self, start: usize, end: usize) -> usize {
        (self.c[end] - self.c[start]) as usize
    }

    /// G fraction of `[start, end)`; 0.0 for an empty window.
    pub fn g_fraction(&self, start: usize, end: usize) -> f64 {
        if end <= start {
            return 0.0;
        }
        self.g_in(start, end) as f64 / (end - start) as f64
    }

    /// GC fraction of `[start, end)`; 0.0 for an empty window.
    pub fn gc_fraction(&self, start: usize, end: usize) -> f64 {
        if end <= start {
            return 0.0;
        }
        (self.g_in(start, end) + self.c_in(start, end)) as f64 / (end - start) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_rejects_n() {
        assert!(encode_kmer(b"ACGNT").is_none());
        assert_eq!(encode_kmer(b"AAAA"), Some(0));
        assert_eq!(encode_kmer(b"T"), Some(3));
    }

    #[test]
    fn index_finds_all_occurrences() {
        let idx = KmerIndex::build(b"GAATTCGAATTC", 6);
        assert_eq!(idx.positions(b"GAATTC"), &[0, 6]);
        assert_eq!(idx.positions(b"AATTCG"), &[1]);
        assert!(idx.positions(b"CCCCCC").is_empty());
    }

    #[test]
    fn index_skips_windows_with_n() {
        let idx = KmerIndex::build(b"ACGTNACGTA", 4);
        assert_eq!(idx.positions(b"ACGT"), &[0, 5]);
        // Windows straddling the N at position 4 are absent.
        assert!(idx.positions(b"CGTN").is_empty());
        assert!(idx.positions(b"GTNA").is_empty());
    }

    #[test]
    fn prefix_counts_windows() {
        let p = PrefixCounts::build(b"GGCATG");
        assert_eq!(p.g_in(0, 6), 3);
        assert_eq!(p.c_in(0, 6), 1);
        assert_eq!(p.g_in(2, 5), 0);
        assert!((p.g_fraction(0, 2) - 1.0).abs() < f64::EPSILON);
        assert!((p.gc_fraction(0, 3) - 1.0).abs() < f64::EPSILON);
    }
}
