//! Multi-label emotion scoring.
//!
//! A message can carry several emotions at once ("joy" and "surprise"),
//! so each label's probability comes from an independent sigmoid over
//! its logit, never a softmax across the label set. A label counts as
//! detected when its probability strictly exceeds [`EMOTION_THRESHOLD`].

use std::collections::BTreeMap;

use crate::error::Result;
use crate::lang::{self, Language};
use crate::registry::{EmotionBackend, ModelRegistry};
use crate::scoring::{round_confidence, sigmoid};

/// Detection cutoff. Deliberately low for broad emotion detection.
pub const EMOTION_THRESHOLD: f32 = 0.15;

/// Threshold-filtered emotion result for one message.
#[derive(Debug, Clone, Default)]
pub struct EmotionScores {
    /// Detected labels, in label-set order (not score order).
    pub detected: Vec<String>,
    /// Confidence per detected label; the key set always equals
    /// `detected` exactly.
    pub confidence: BTreeMap<String, f32>,
}

pub(crate) fn score(
    registry: &ModelRegistry,
    language: Language,
    text: &str,
) -> Result<EmotionScores> {
    match registry.emotion(language)? {
        EmotionBackend::Multilabel(model) => {
            let logits = model.logits(text)?;
            Ok(multilabel_scores(&logits, lang::emotion_labels(language)))
        }
        EmotionBackend::TopLabel(analyzer) => {
            let prediction = analyzer.predict(text)?;
            let mut scores = EmotionScores::default();
            scores.detected.push(prediction.label.clone());
            scores
                .confidence
                .insert(prediction.label, round_confidence(prediction.probability));
            Ok(scores)
        }
    }
}

/// Apply the independent activation and the strict threshold.
///
/// Label set and logit width are not guaranteed to match; iteration
/// covers only the shorter of the two. A zero-length logit vector
/// yields an empty result.
fn multilabel_scores(logits: &[f32], labels: &[&str]) -> EmotionScores {
    let mut scores = EmotionScores::default();

    for (&label, &logit) in labels.iter().zip(logits.iter()) {
        let p = sigmoid(logit);
        if p > EMOTION_THRESHOLD {
            scores.detected.push(label.to_string());
            scores.confidence.insert(label.to_string(), round_confidence(p));
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    // sigmoid(-2.0) ≈ 0.119 < 0.15 < sigmoid(-1.5) ≈ 0.182

    #[test]
    fn threshold_is_strict() {
        let scores = multilabel_scores(&[-2.0, -1.5, 3.0], &["a", "b", "c"]);
        assert_eq!(scores.detected, vec!["b", "c"]);
    }

    #[test]
    fn confidence_keys_match_detected_exactly() {
        let scores = multilabel_scores(&[2.0, -4.0, 0.0, -4.0], &["a", "b", "c", "d"]);
        assert_eq!(scores.detected, vec!["a", "c"]);
        let keys: Vec<&str> = scores.confidence.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn detected_order_follows_label_set() {
        let scores = multilabel_scores(&[0.5, 0.4, 0.6], &["z", "m", "a"]);
        assert_eq!(scores.detected, vec!["z", "m", "a"]);
    }

    #[test]
    fn length_mismatch_truncates() {
        // More logits than labels.
        let scores = multilabel_scores(&[3.0, 3.0, 3.0, 3.0], &["a", "b"]);
        assert_eq!(scores.detected, vec!["a", "b"]);

        // More labels than logits.
        let scores = multilabel_scores(&[3.0], &["a", "b", "c"]);
        assert_eq!(scores.detected, vec!["a"]);
    }

    #[test]
    fn empty_logits_yield_empty_result() {
        let scores = multilabel_scores(&[], &["a", "b"]);
        assert!(scores.detected.is_empty());
        assert!(scores.confidence.is_empty());
    }

    #[test]
    fn confidence_is_rounded_fraction() {
        let scores = multilabel_scores(&[0.0], &["a"]);
        assert_eq!(scores.confidence["a"], 0.5);
    }
}
