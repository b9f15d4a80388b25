//! Z-DNA dinucleotide-alternation propensity, expressed as a fixed 10-mer
//! table (48 entries, after Ho 1986). Every entry is a strict
//! purine/pyrimidine alternation; CG-alternating 10-mers score highest,
//! CA/TG-containing alternations intermediate, TA-rich lowest.
//!
//! The detector spreads each matched 10-mer's score uniformly across its ten
//! positions (score/10 per base), which is equivalent to averaging all
//! overlapping windows, then extracts maximal positive regions by cumulative
//! sum.

/// `(10-mer, propensity)`; sorted by descending propensity.
pub const ZDNA_10MER: [(&[u8; 10], f64); 48] = [
    (b"CGCGCGCGCG", 8.92),
    (b"GCGCGCGCGC", 8.90),
    (b"ACGCGCGCGC", 8.54),
    (b"CGCGCGCGCA", 8.54),
    (b"GCGCGCGCGT", 8.54),
    (b"TGCGCGCGCG", 8.54),
    (b"CACGCGCGCG", 8.18),
    (b"CGCACGCGCG", 8.18),
    (b"CGCGCACGCG", 8.18),
    (b"CGCGCGCACG", 8.18),
    (b"CGCGCGCGTG", 8.18),
    (b"CGCGCGTGCG", 8.18),
    (b"CGCGTGCGCG", 8.18),
    (b"CGTGCGCGCG", 8.18),
    (b"GCACGCGCGC", 8.16),
    (b"GCGCACGCGC", 8.16),
    (b"GCGCGCACGC", 8.16),
    (b"GCGCGCGCAC", 8.16),
    (b"GCGCGCGTGC", 8.16),
    (b"GCGCGTGCGC", 8.16),
    (b"GCGTGCGCGC", 8.16),
    (b"GTGCGCGCGC", 8.16),
    (b"CGCGCGCGTA", 7.94),
    (b"TACGCGCGCG", 7.94),
    (b"ATGCGCGCGC", 7.92),
    (b"GCGCGCGCAT", 7.92),
    (b"CGCGCGTACG", 7.58),
    (b"CGCGTACGCG", 7.58),
    (b"CGTACGCGCG", 7.58),
    (b"GCATGCGCGC", 7.54),
    (b"GCGCATGCGC", 7.54),
    (b"GCGCGCATGC", 7.54),
    (b"ACACACACGT", 5.96),
    (b"TGCACACACA", 5.94),
    (b"ACACACGTAC", 5.72),
    (b"ACACGTACAC", 5.72),
    (b"ACGTACACAC", 5.72),
    (b"CACACATGCA", 5.70),
    (b"CACATGCACA", 5.70),
    (b"CATGCACACA", 5.70),
    (b"ACACACACAC", 5.58),
    (b"CACACACACA", 5.58),
    (b"GTGTGTGTGT", 5.58),
    (b"TGTGTGTGTG", 5.58),
    (b"CACACACATG", 5.34),
    (b"GTACACACAC", 5.34),
    (b"ATATATATAT", 3.42),
    (b"TATATATATA", 3.42),
];
