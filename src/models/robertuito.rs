use candle_core::Device;

use crate::error::{PipelineError, Result};
use crate::loaders::{self, ClassifierConfigJson};
use crate::models::xlm_roberta::XlmRobertaClassifier;
use crate::models::{AnalyzerPrediction, EmotionAnalyzer, TextClassifier};
use crate::scoring::softmax;

/// The preferred Spanish emotion analyzer.
///
/// Wraps the robertuito emotion checkpoint with its own label set and
/// the analyzer output convention: softmax probabilities over all
/// classes, top prediction reported as *the* result. This path reports
/// only the argmax label, not a threshold-filtered multi-label set.
pub struct RobertuitoAnalyzer {
    classifier: XlmRobertaClassifier,
    labels: Vec<String>,
}

impl RobertuitoAnalyzer {
    /// Hub id of the analyzer checkpoint.
    pub const MODEL_ID: &'static str = "pysentimiento/robertuito-emotion-analysis";

    /// Download and construct the analyzer. A failure here marks the
    /// language permanently fallback; callers must not retry within the
    /// process lifetime.
    pub fn from_hub(device: Device) -> Result<Self> {
        let files = loaders::fetch_classifier_files(Self::MODEL_ID)?;
        let labels = ClassifierConfigJson::read(&files.config)?.ordered_labels();
        let classifier = XlmRobertaClassifier::from_files(&files, device)?;

        Ok(Self { classifier, labels })
    }
}

impl EmotionAnalyzer for RobertuitoAnalyzer {
    fn predict(&self, text: &str) -> Result<AnalyzerPrediction> {
        let logits = self.classifier.logits(text)?;
        if logits.is_empty() {
            return Err(PipelineError::Inference(
                "analyzer produced an empty probability vector".to_string(),
            ));
        }

        let probs = softmax(&logits);
        let (top_idx, top_prob) = probs
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .unwrap_or((0, 0.0));

        let label = self
            .labels
            .get(top_idx)
            .cloned()
            .unwrap_or_else(|| format!("label_{top_idx}"));

        let probas = self
            .labels
            .iter()
            .cloned()
            .zip(probs.iter().copied())
            .collect();

        Ok(AnalyzerPrediction {
            label,
            probability: top_prob,
            probas,
        })
    }
}
