//! Nearest-neighbour duplex stability (SantaLucia 1998, unified parameters)
//! and the hairpin loop entropy penalty used for cruciform validation.
//!
//! ΔG° values are kcal/mol at 37 °C for the sixteen dinucleotide steps read
//! 5'→3' on the top strand; the ten unique published values expand to
//! sixteen by reverse-complement symmetry.

/// `(dinucleotide, ΔG°37 kcal/mol)`.
pub const NN_DELTA_G: [(&[u8; 2], f64); 16] = [
    (b"AA", -1.00),
    (b"AC", -1.44),
    (b"AG", -1.28),
    (b"AT", -0.88),
    (b"CA", -1.45),
    (b"CC", -1.84),
    (b"CG", -2.17),
    (b"CT", -1.28),
    (b"GA", -1.30),
    (b"GC", -2.24),
    (b"GG", -1.84),
    (b"GT", -1.44),
    (b"TA", -0.58),
    (b"TC", -1.30),
    (b"TG", -1.45),
    (b"TT", -1.00),
];

/// ΔG° of one stacked step; `None` for steps touching `N`.
pub fn nn_delta_g(a: u8, b: u8) -> Option<f64> {
    let idx = |x: u8| match x {
        b'A' => Some(0usize),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    };
    let (i, j) = (idx(a)?, idx(b)?);
    Some(NN_DELTA_G[i * 4 + j].1)
}

/// Entropic cost of closing a hairpin loop of `loop_len` unpaired bases:
/// `1.75 + 0.6·ln(loop_len)` kcal/mol, with the zero-length (blunt
/// extrusion) case costing the bare closure term.
pub fn hairpin_loop_penalty(loop_len: usize) -> f64 {
    if loop_len == 0 {
        return 1.75;
    }
    1.75 + 0.6 * (loop_len as f64).ln()
}
