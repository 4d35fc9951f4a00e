/// Shannon entropy of the distribution proportional to `weights`
///
/// Uses `H = ln(sum w) - sum(w ln w) / sum w`, which avoids normalizing each
/// weight first. Non-positive weights are skipped, and an input without any
/// positive weight has entropy 0.
pub fn shannon_entropy(weights: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut sum_weight_log_weight = 0.0;
    for weight in weights {
        if weight > 0.0 {
            sum += weight;
            sum_weight_log_weight += weight * weight.ln();
        }
    }

    if sum <= 0.0 {
        return 0.0;
    }

    // Single-candidate domains cancel to zero up to rounding; clamp the drift
    (sum.ln() - sum_weight_log_weight / sum).max(0.0)
}

/// Map a uniform sample in `[0, 1)` through the cumulative weight distribution
///
/// Returns the index of the first weight whose cumulative share exceeds the
/// sample. Zero and negative weights are never selected unless every weight
/// is non-positive, in which case index 0 is returned.
pub fn cumulative_index(weights: &[f64], sample: f64) -> usize {
    let total: f64 = weights.iter().filter(|&&w| w > 0.0).sum();
    if total <= 0.0 {
        return 0;
    }

    let mut remaining = sample.clamp(0.0, 1.0) * total;
    let mut last_positive = 0;
    for (index, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        last_positive = index;
        if remaining < weight {
            return index;
        }
        remaining -= weight;
    }
    last_positive
}
