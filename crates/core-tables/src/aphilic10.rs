//! A-form (A-philic) propensity of 10-mers, log2-odds style (208 entries,
//! after Vinogradov 2003). Positive values mark 10-mers whose step
//! composition favours the A-form helix; anything absent from the table is
//! treated as zero by the detector.

/// `(10-mer, log2 propensity)`; sorted by descending propensity.
pub const APHILIC_10MER: [(&[u8; 10], f64); 208] = [
    (b"CCCCCCCCCC", 1.10),
    (b"GGGGGGGGGG", 1.10),
    (b"GGGGCCCCCC", 1.05),
    (b"GGGGGCCCCC", 1.05),
    (b"GGGGGGCCCC", 1.05),
    (b"GGGGGGGCCC", 1.05),
    (b"GGGGGGGGCC", 1.05),
    (b"GGGGGGGGGC", 1.05),
    (b"GCCCCCCCCC", 1.05),
    (b"GGCCCCCCCC", 1.05),
    (b"GGGCCCCCCC", 1.05),
    (b"CCCCCGGGGG", 1.00),
    (b"CCCCGGGGGG", 1.00),
    (b"CCCCCCCCCG", 1.00),
    (b"CCCCCCCCGG", 1.00),
    (b"CCCCCCCGGG", 1.00),
    (b"CCCCCCGGGG", 1.00),
    (b"CCCGGGGGGG", 1.00),
    (b"CCGGGGGGGG", 1.00),
    (b"CGGGGGGGGG", 1.00),
    (b"CCCCCGGCCC", 0.95),
    (b"CCCCCGGGCC", 0.95),
    (b"CCCCCGGGGC", 0.95),
    (b"CCCCGGCCCC", 0.95),
    (b"CCCCGGGCCC", 0.95),
    (b"CCCCGGGGCC", 0.95),
    (b"CCCCGGGGGC", 0.95),
    (b"GGGGCGGGGG", 0.95),
    (b"CCCCCCCCGC", 0.95),
    (b"CCCCCCCGCC", 0.95),
    (b"CCCCCCCGGC", 0.95),
    (b"CCCCCCGCCC", 0.95),
    (b"CCCCCCGGCC", 0.95),
    (b"CCCCCCGGGC", 0.95),
    (b"CCCCCGCCCC", 0.95),
    (b"CCCCGCCCCC", 0.95),
    (b"CCCGCCCCCC", 0.95),
    (b"CCCGGCCCCC", 0.95),
    (b"CCCGGGCCCC", 0.95),
    (b"CCCGGGGCCC", 0.95),
    (b"CCCGGGGGCC", 0.95),
    (b"CCCGGGGGGC", 0.95),
    (b"CCGGCCCCCC", 0.95),
    (b"CCGGGCCCCC", 0.95),
    (b"CCGGGGCCCC", 0.95),
    (b"CCGGGGGCCC", 0.95),
    (b"CCGGGGGGCC", 0.95),
    (b"CCGGGGGGGC", 0.95),
    (b"CGGGCCCCCC", 0.95),
    (b"CGGGGCCCCC", 0.95),
    (b"CGGGGGCCCC", 0.95),
    (b"CGGGGGGCCC", 0.95),
    (b"CGGGGGGGCC", 0.95),
    (b"CGGGGGGGGC", 0.95),
    (b"GCCCCGGGGG", 0.95),
    (b"GCCCGGGGGG", 0.95),
    (b"GCCGGGGGGG", 0.95),
    (b"GGCCCGGGGG", 0.95),
    (b"GGCCGGGGGG", 0.95),
    (b"GGCGGGGGGG", 0.95),
    (b"GGGCCGGGGG", 0.95),
    (b"GGGCGGGGGG", 0.95),
    (b"GGGGCCCCCG", 0.95),
    (b"GGGGCCCCGG", 0.95),
    (b"GGGGCCCGGG", 0.95),
    (b"GGGGCCGGGG", 0.95),
    (b"GGGGGCCCCG", 0.95),
    (b"GGGGGCCCGG", 0.95),
    (b"GGGGGCCGGG", 0.95),
    (b"GGGGGCGGGG", 0.95),
    (b"GGGGGGCCCG", 0.95),
    (b"GGGGGGCCGG", 0.95),
    (b"GGGGGGCGGG", 0.95),
    (b"GGGGGGGCCG", 0.95),
    (b"GGGGGGGCGG", 0.95),
    (b"GGGGGGGGCG", 0.95),
    (b"CCGCCCCCCC", 0.95),
    (b"CGCCCCCCCC", 0.95),
    (b"CGGCCCCCCC", 0.95),
    (b"GCCCCCCCCG", 0.95),
    (b"GCCCCCCCGG", 0.95),
    (b"GCCCCCCGGG", 0.95),
    (b"GCCCCCGGGG", 0.95),
    (b"GCGGGGGGGG", 0.95),
    (b"GGCCCCCCCG", 0.95),
    (b"GGCCCCCCGG", 0.95),
    (b"GGCCCCCGGG", 0.95),
    (b"GGCCCCGGGG", 0.95),
    (b"GGGCCCCCCG", 0.95),
    (b"GGGCCCCCGG", 0.95),
    (b"GGGCCCCGGG", 0.95),
    (b"GGGCCCGGGG", 0.95),
    (b"CCCCCCCCCT", 0.92),
    (b"GGGGGGGGGA", 0.92),
    (b"AGGGGGGGGG", 0.92),
    (b"TCCCCCCCCC", 0.92),
    (b"GGGGCGGCCC", 0.90),
    (b"GGGGCGGGCC", 0.90),
    (b"GGGGCGGGGC", 0.90),
    (b"GCCCCGGCCC", 0.90),
    (b"GCCCCGGGCC", 0.90),
    (b"GCCCCGGGGC", 0.90),
    (b"GCCCGGCCCC", 0.90),
    (b"GCCCGGGCCC", 0.90),
    (b"GCCCGGGGCC", 0.90),
    (b"GCCCGGGGGC", 0.90),
    (b"GCCGGCCCCC", 0.90),
    (b"GCCGGGCCCC", 0.90),
    (b"GCCGGGGCCC", 0.90),
    (b"GCCGGGGGCC", 0.90),
    (b"GCCGGGGGGC", 0.90),
    (b"GGCCCGGCCC", 0.90),
    (b"GGCCCGGGCC", 0.90),
    (b"GGCCCGGGGC", 0.90),
    (b"GGCCGGCCCC", 0.90),
    (b"GGCCGGGCCC", 0.90),
    (b"GGCCGGGGCC", 0.90),
    (b"GGCCGGGGGC", 0.90),
    (b"GGCGGCCCCC", 0.90),
    (b"GGCGGGCCCC", 0.90),
    (b"GGCGGGGCCC", 0.90),
    (b"GGCGGGGGCC", 0.90),
    (b"GGCGGGGGGC", 0.90),
    (b"GGGCCGGCCC", 0.90),
    (b"GGGCCGGGCC", 0.90),
    (b"GGGCCGGGGC", 0.90),
    (b"GGGCGGCCCC", 0.90),
    (b"GGGCGGGCCC", 0.90),
    (b"GGGCGGGGCC", 0.90),
    (b"GGGCGGGGGC", 0.90),
    (b"GGGGCCCCGC", 0.90),
    (b"GGGGCCCGCC", 0.90),
    (b"GGGGCCCGGC", 0.90),
    (b"GGGGCCGCCC", 0.90),
    (b"GGGGCCGGCC", 0.90),
    (b"GGGGCCGGGC", 0.90),
    (b"GGGGCGCCCC", 0.90),
    (b"GGGGGCCCGC", 0.90),
    (b"GGGGGCCGCC", 0.90),
    (b"GGGGGCCGGC", 0.90),
    (b"GGGGGCGCCC", 0.90),
    (b"GGGGGCGGCC", 0.90),
    (b"GGGGGCGGGC", 0.90),
    (b"GGGGGGCCGC", 0.90),
    (b"GGGGGGCGCC", 0.90),
    (b"GGGGGGCGGC", 0.90),
    (b"GGGGGGGCGC", 0.90),
    (b"GCCCCCCCGC", 0.90),
    (b"GCCCCCCGCC", 0.90),
    (b"GCCCCCCGGC", 0.90),
    (b"GCCCCCGCCC", 0.90),
    (b"GCCCCCGGCC", 0.90),
    (b"GCCCCCGGGC", 0.90),
    (b"GCCCCGCCCC", 0.90),
    (b"GCCCGCCCCC", 0.90),
    (b"GCCGCCCCCC", 0.90),
    (b"GCGCCCCCCC", 0.90),
    (b"GCGGCCCCCC", 0.90),
    (b"GCGGGCCCCC", 0.90),
    (b"GCGGGGCCCC", 0.90),
    (b"GCGGGGGCCC", 0.90),
    (b"GCGGGGGGCC", 0.90),
    (b"GCGGGGGGGC", 0.90),
    (b"GGCCCCCCGC", 0.90),
    (b"GGCCCCCGCC", 0.90),
    (b"GGCCCCCGGC", 0.90),
    (b"GGCCCCGCCC", 0.90),
    (b"GGCCCCGGCC", 0.90),
    (b"GGCCCCGGGC", 0.90),
    (b"GGCCCGCCCC", 0.90),
    (b"GGCCGCCCCC", 0.90),
    (b"GGCGCCCCCC", 0.90),
    (b"GGGCCCCCGC", 0.90),
    (b"GGGCCCCGCC", 0.90),
    (b"GGGCCCCGGC", 0.90),
    (b"GGGCCCGCCC", 0.90),
    (b"GGGCCCGGCC", 0.90),
    (b"GGGCCCGGGC", 0.90),
    (b"GGGCCGCCCC", 0.90),
    (b"GGGCGCCCCC", 0.90),
    (b"GGGGCCCCCT", 0.87),
    (b"GGGGGCCCCT", 0.87),
    (b"GGGGGGCCCT", 0.87),
    (b"GGGGGGGCCT", 0.87),
    (b"GGGGGGGGCT", 0.87),
    (b"AGCCCCCCCC", 0.87),
    (b"AGGCCCCCCC", 0.87),
    (b"AGGGCCCCCC", 0.87),
    (b"AGGGGCCCCC", 0.87),
    (b"AGGGGGCCCC", 0.87),
    (b"AGGGGGGCCC", 0.87),
    (b"AGGGGGGGCC", 0.87),
    (b"AGGGGGGGGC", 0.87),
    (b"GCCCCCCCCT", 0.87),
    (b"GGCCCCCCCT", 0.87),
    (b"GGGCCCCCCT", 0.87),
    (b"CCCCCGGCCG", 0.85),
    (b"CCCCCGGCGG", 0.85),
    (b"CCCCCGGGCG", 0.85),
    (b"CCCCGGCCCG", 0.85),
    (b"CCCCGGCCGG", 0.85),
    (b"CCCCGGCGGG", 0.85),
    (b"CCCCGGGCCG", 0.85),
    (b"CCCCGGGCGG", 0.85),
    (b"CCCCGGGGCG", 0.85),
    (b"CCCGCGGGGG", 0.85),
    (b"CCGGCGGGGG", 0.85),
    (b"CGGGCGGGGG", 0.85),
];
