use libm::sqrt;

/// Frequency-weighted summary of a set of entropy values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedStats {
    /// The weighted arithmetic mean of the sampled values.
    pub mean: f64,
    /// The weighted (population) standard deviation around `mean`.
    pub std_dev: f64,
    /// Sum of all weights that contributed.
    pub total_weight: u64,
}

/// Calculates the weighted mean and standard deviation of `(value, weight)` pairs.
///
/// Zero-weight samples are ignored. Returns `None` when no sample carries weight,
/// so an empty input can never be mistaken for a mean of zero.
pub fn compute_weighted_stats(samples: &[(f64, u64)]) -> Option<WeightedStats> {
    let total_weight: u64 = samples.iter().map(|&(_, weight)| weight).sum();
    if total_weight == 0 {
        return None;
    }

    let denom = total_weight as f64;

    // 1. Weighted mean
    let mean = samples
        .iter()
        .map(|&(value, weight)| value * weight as f64)
        .sum::<f64>()
        / denom;

    // 2. Weighted variance around that mean
    let variance = samples
        .iter()
        .map(|&(value, weight)| {
            let diff = mean - value;
            diff * diff * weight as f64
        })
        .sum::<f64>()
        / denom;

    Some(WeightedStats {
        mean,
        std_dev: sqrt(variance),
        total_weight,
    })
}
