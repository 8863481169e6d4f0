// ============ Scorers ============

pub(crate) mod emotion;
pub(crate) mod sarcasm;

pub use emotion::EmotionScores;

/// Independent per-unit activation for multi-label outputs.
pub(crate) fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Numerically stable softmax over a logit slice.
pub(crate) fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum > 0.0 {
        exps.iter().map(|&e| e / sum).collect()
    } else {
        exps
    }
}

/// Confidence values are reported as fractions in [0, 1], rounded to
/// three decimals, uniformly across the API surface.
pub(crate) fn round_confidence(p: f32) -> f32 {
    (p * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_midpoint() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-6);
        assert!(sigmoid(-5.0) < 0.01);
        assert!(sigmoid(5.0) > 0.99);
    }

    #[test]
    fn softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn softmax_of_empty_is_empty() {
        assert!(softmax(&[]).is_empty());
    }

    #[test]
    fn confidence_rounds_to_three_decimals() {
        assert_eq!(round_confidence(0.123_456), 0.123);
        assert_eq!(round_confidence(0.999_9), 1.0);
    }
}
