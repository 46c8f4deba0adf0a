//! Entropy over a truncated top-K distribution.
//!
//! The backend only reports the K most likely candidates for each position,
//! so every quantity here is computed over that window treated as the whole
//! support. Entropy is in nats.

/// `exp(logprob)` for each candidate, in order.
pub fn linear_probabilities(log_probs: &[f64]) -> Vec<f64> {
    log_probs.iter().map(|lp| lp.exp()).collect()
}

/// Rebuilds a distribution that sums to 1 from top-K log-probabilities.
///
/// The mass outside the window is redistributed proportionally over the
/// observed candidates. Returns an empty vector when there is no positive
/// mass to rescale (e.g. no candidates).
pub fn reconstruct_probabilities(log_probs: &[f64]) -> Vec<f64> {
    normalize_probabilities(&linear_probabilities(log_probs))
}

/// Rescales linear probabilities to sum to 1.
pub fn normalize_probabilities(probs: &[f64]) -> Vec<f64> {
    let total: f64 = probs.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Vec::new();
    }
    probs.iter().map(|p| p / total).collect()
}

/// Shannon entropy `-Σ p ln p`, skipping non-positive entries.
pub fn shannon_entropy(probs: &[f64]) -> f64 {
    let entropy: f64 = probs
        .iter()
        .filter(|p| **p > 0.0)
        .map(|p| -p * p.ln())
        .sum();
    // Also folds the -0.0 produced by a lone p = 1 into 0.0.
    if entropy.is_finite() && entropy > 0.0 {
        entropy
    } else {
        0.0
    }
}

/// Largest entropy reachable with `num_candidates` outcomes.
///
/// For `num_candidates <= 1` this returns the sentinel `1.0`: the entropy of
/// such a set is already 0, so it normalizes to 0 without dividing by zero.
pub fn max_entropy(num_candidates: usize) -> f64 {
    if num_candidates <= 1 {
        return 1.0;
    }
    (num_candidates as f64).ln()
}

/// Entropy scaled into `[0, 1]` against `max_entropy`.
pub fn normalized_entropy(entropy: f64, max_entropy: f64) -> f64 {
    if max_entropy <= 0.0 || max_entropy.is_nan() {
        return 0.0;
    }
    let ratio = entropy / max_entropy;
    if ratio.is_nan() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0)
}
