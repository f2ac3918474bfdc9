//! Decision threshold selection
//!
//! Treats each candidate pair's match probability as the expected chance it
//! is a true duplicate. Walking the pairs from most to least likely, the
//! expected precision and recall at every cut follow from cumulative sums,
//! and the cut with the best F-beta score gives the threshold.

use ordered_float::OrderedFloat;

/// Threshold used when there is nothing to evaluate
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Probability cut that maximizes expected F-beta.
///
/// `recall_weight` is beta: values above 1 favor recall over precision.
pub fn fbeta_threshold(probabilities: &[f64], recall_weight: f64) -> f64 {
    let mut sorted: Vec<OrderedFloat<f64>> = probabilities.iter().map(|&p| OrderedFloat(p)).collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let expected_dupes: f64 = sorted.iter().map(|p| p.0).sum();
    if sorted.is_empty() || expected_dupes <= 0.0 {
        return DEFAULT_THRESHOLD;
    }

    let beta_sq = recall_weight * recall_weight;
    let mut true_positives = 0.0;
    let mut best = (f64::MIN, sorted[0].0);

    for (rank, p) in sorted.iter().enumerate() {
        true_positives += p.0;
        let precision = true_positives / (rank + 1) as f64;
        let recall = true_positives / expected_dupes;
        let denom = beta_sq * precision + recall;
        let score = if denom > 0.0 {
            (1.0 + beta_sq) * precision * recall / denom
        } else {
            0.0
        };

        if score > best.0 {
            best = (score, p.0);
        }
    }

    best.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_split() {
        let probs = [0.99, 0.97, 0.95, 0.02, 0.01, 0.01];
        let t = fbeta_threshold(&probs, 1.0);
        assert_eq!(t, 0.95);
    }

    #[test]
    fn test_recall_weight_lowers_threshold() {
        let probs = [0.9, 0.8, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1];
        let precise = fbeta_threshold(&probs, 0.5);
        let recall_heavy = fbeta_threshold(&probs, 3.0);
        assert!(recall_heavy <= precise, "{} > {}", recall_heavy, precise);
    }

    #[test]
    fn test_order_independent() {
        let a = fbeta_threshold(&[0.1, 0.9, 0.5], 1.5);
        let b = fbeta_threshold(&[0.9, 0.5, 0.1], 1.5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(fbeta_threshold(&[], 1.5), DEFAULT_THRESHOLD);
        assert_eq!(fbeta_threshold(&[0.0, 0.0], 1.5), DEFAULT_THRESHOLD);
        assert_eq!(fbeta_threshold(&[0.8], 1.5), 0.8);
    }
}
