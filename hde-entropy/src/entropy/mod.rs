// hde-entropy/src/entropy/mod.rs
use libm::log2;

/// Contribution of a single outcome with probability `p` to a Shannon entropy,
/// using the convention `0 * log2(0) = 0`.
#[inline]
fn surprisal_term(p: f64) -> f64 {
    if p <= 0.0 {
        0.0
    } else {
        -p * log2(p)
    }
}

/// Binary entropy `H(p) = -p*log2(p) - (1-p)*log2(1-p)` in bits.
///
/// `p` is clamped to `[0, 1]`; both ends yield exactly `0.0`.
pub fn binary_entropy(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    if p == 0.0 || p == 1.0 {
        return 0.0;
    }
    surprisal_term(p) + surprisal_term(1.0 - p)
}
