//! Shannon entropy primitives over discrete frequency counts.
//!
//! All quantities are in bits (log base 2). Every function is total: empty
//! or degenerate inputs yield `0.0` rather than NaN or infinity, so callers
//! can render results without guarding each division.

/// Shannon entropy `H = -Σ p_i·log2(p_i)` with `p_i = count_i / total`.
///
/// Zero counts contribute nothing. Returns 0 when `total` is 0. The result is
/// clamped to `[0, log2(total)]` so accumulated rounding never pushes a
/// uniform table past its theoretical ceiling.
pub fn entropy_bits<I>(counts: I, total: u64) -> f64
where
    I: IntoIterator<Item = u64>,
{
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    let mut h = 0.0;
    for count in counts {
        if count == 0 {
            continue;
        }
        let p = count as f64 / n;
        h -= p * p.log2();
    }
    h.clamp(0.0, max_entropy(total))
}

/// Shannon entropy of a count vector, using the sum of counts as the total.
pub fn shannon_entropy(counts: &[u64]) -> f64 {
    let total: u64 = counts.iter().sum();
    entropy_bits(counts.iter().copied(), total)
}

/// Entropy ceiling for `n` observations: `log2(n)`, reached when every
/// observation is distinct. Returns 0 for `n <= 1`.
pub fn max_entropy(n: u64) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    (n as f64).log2()
}

/// `h / log2(n)`, clamped to `[0, 1]`. Returns 0 when the ceiling is 0.
pub fn normalized_entropy(h: f64, n: u64) -> f64 {
    let max = max_entropy(n);
    if max <= 0.0 || h.is_nan() {
        return 0.0;
    }
    (h / max).clamp(0.0, 1.0)
}

/// Effective number of equally likely outcomes supported by `h` bits: `2^h`.
pub fn perplexity(h: f64) -> f64 {
    if h.is_nan() {
        return 1.0;
    }
    h.max(0.0).exp2()
}
