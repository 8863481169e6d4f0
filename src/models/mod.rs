// ============ Classifier seams ============

pub(crate) mod bert;
pub(crate) mod robertuito;
pub(crate) mod xlm_roberta;

pub use robertuito::RobertuitoAnalyzer;

use crate::error::Result;

/// Inputs longer than this are truncated at tokenization, never rejected.
pub(crate) const MAX_TOKENS: usize = 512;

/// A loaded (tokenizer, classifier) pair pinned to one device.
///
/// Implementations tokenize `text` (truncating overlong input), run the
/// classifier and return the raw logits, one per output unit. The
/// activation (sigmoid vs. softmax) is the scorer's decision, not the
/// model's. Calls take `&self` and must not mutate shared state; one
/// instance is shared across requests for the process lifetime.
pub trait TextClassifier: Send + Sync {
    /// Raw, unnormalized logits for `text`.
    fn logits(&self, text: &str) -> Result<Vec<f32>>;

    /// Device the classifier runs on.
    fn device(&self) -> &candle_core::Device;
}

/// A single prediction from a third-party style analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerPrediction {
    /// The analyzer's top label.
    pub label: String,
    /// Probability of the top label.
    pub probability: f32,
    /// The analyzer's own per-label probability output.
    pub probas: Vec<(String, f32)>,
}

/// A self-contained emotion analyzer with its own label set and output
/// convention (top prediction only).
///
/// This is the seam for the preferred Spanish path; construction failure
/// marks the language permanently fallback for the process lifetime.
pub trait EmotionAnalyzer: Send + Sync {
    /// Predict the dominant emotion of `text`.
    fn predict(&self, text: &str) -> Result<AnalyzerPrediction>;
}
