use candle_core::{Device, Tensor};
use candle_transformers::models::xlm_roberta::{
    Config as XlmRobertaConfig, XLMRobertaForSequenceClassification,
};
use tokenizers::{Tokenizer, TruncationDirection};

use crate::error::{PipelineError, Result};
use crate::loaders::{self, ClassifierConfigJson, HubModelFiles};
use crate::models::{TextClassifier, MAX_TOKENS};

/// RoBERTa-family sequence classifier, covering the Spanish checkpoints
/// (bertweet, BNE) whose layout matches the XLM-RoBERTa loader.
pub(crate) struct XlmRobertaClassifier {
    tokenizer: Tokenizer,
    model: XLMRobertaForSequenceClassification,
    device: Device,
}

impl XlmRobertaClassifier {
    pub fn from_hub(model_id: &str, device: Device) -> Result<Self> {
        let files = loaders::fetch_classifier_files(model_id)?;
        Self::from_files(&files, device)
    }

    pub fn from_files(files: &HubModelFiles, device: Device) -> Result<Self> {
        let tokenizer = loaders::load_tokenizer(&files.tokenizer)?;

        let config_str = std::fs::read_to_string(&files.config)?;
        let config: XlmRobertaConfig = serde_json::from_str(&config_str)?;
        let class_cfg: ClassifierConfigJson = serde_json::from_str(&config_str)?;
        let num_labels = class_cfg.num_labels();

        let vb = loaders::load_var_builder(&files.weights, &device)?;
        let model = load_sequence_model(num_labels, &config, &vb)?;

        tracing::info!(
            config = %files.config.display(),
            num_labels,
            "loaded RoBERTa classifier"
        );

        Ok(Self {
            tokenizer,
            model,
            device,
        })
    }
}

fn load_sequence_model(
    num_labels: usize,
    config: &XlmRobertaConfig,
    vb: &candle_nn::VarBuilder,
) -> Result<XLMRobertaForSequenceClassification> {
    let mut errors = Vec::new();

    for prefix in ["", "model"] {
        let vb_prefix = if prefix.is_empty() {
            vb.clone()
        } else {
            vb.pp(prefix)
        };

        match XLMRobertaForSequenceClassification::new(num_labels, config, vb_prefix) {
            Ok(model) => return Ok(model),
            Err(e) => errors.push(format!(
                "{}: {}",
                if prefix.is_empty() { "<root>" } else { prefix },
                e
            )),
        }
    }

    Err(PipelineError::Unexpected(format!(
        "Failed to load RoBERTa sequence model, tried prefixes [{}]",
        errors.join(" | ")
    )))
}

impl TextClassifier for XlmRobertaClassifier {
    fn logits(&self, text: &str) -> Result<Vec<f32>> {
        let mut encoding = self.tokenizer.encode(text, true).map_err(|e| {
            PipelineError::Tokenization(format!(
                "Tokenization failed on '{}': {}",
                &text.chars().take(50).collect::<String>(),
                e
            ))
        })?;
        encoding.truncate(MAX_TOKENS, 0, TruncationDirection::Right);

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let logits = self
            .model
            .forward(&input_ids, &attention_mask, &token_type_ids)?;

        Ok(logits.squeeze(0)?.to_vec1::<f32>()?)
    }

    fn device(&self) -> &Device {
        &self.device
    }
}
