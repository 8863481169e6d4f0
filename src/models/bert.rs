use candle_core::{Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::{Tokenizer, TruncationDirection};

use crate::error::{PipelineError, Result};
use crate::loaders::{self, ClassifierConfigJson, HubModelFiles};
use crate::models::{TextClassifier, MAX_TOKENS};

/// BERT-family sequence classifier: backbone, CLS pooling and a linear
/// head, loaded from a fine-tuned hub checkpoint.
pub(crate) struct BertClassifier {
    tokenizer: Tokenizer,
    model: BertModel,
    pooler: Option<Linear>,
    classifier: Linear,
    device: Device,
}

impl BertClassifier {
    pub fn from_hub(model_id: &str, device: Device) -> Result<Self> {
        let files = loaders::fetch_classifier_files(model_id)?;
        Self::from_files(&files, device)
    }

    pub fn from_files(files: &HubModelFiles, device: Device) -> Result<Self> {
        let tokenizer = loaders::load_tokenizer(&files.tokenizer)?;

        let config_str = std::fs::read_to_string(&files.config)?;
        let config: BertConfig = serde_json::from_str(&config_str)?;
        let class_cfg: ClassifierConfigJson = serde_json::from_str(&config_str)?;
        let num_labels = class_cfg.num_labels();

        let vb = loaders::load_var_builder(&files.weights, &device)?;

        let model = load_backbone(&vb, &config, &["bert", ""])?;
        // BertForSequenceClassification checkpoints carry a tanh pooler
        // over the CLS token; older exports sometimes drop it.
        let pooler = candle_nn::linear(
            config.hidden_size,
            config.hidden_size,
            vb.pp("bert").pp("pooler").pp("dense"),
        )
        .ok();
        let classifier =
            candle_nn::linear(config.hidden_size, num_labels, vb.pp("classifier")).map_err(
                |e| PipelineError::Unexpected(format!("Failed to load classification head: {e}")),
            )?;

        tracing::info!(
            config = %files.config.display(),
            num_labels,
            pooler = pooler.is_some(),
            "loaded BERT classifier"
        );

        Ok(Self {
            tokenizer,
            model,
            pooler,
            classifier,
            device,
        })
    }
}

fn load_backbone(vb: &VarBuilder, config: &BertConfig, prefixes: &[&str]) -> Result<BertModel> {
    let mut errors = Vec::new();

    for prefix in prefixes {
        let vb_prefix = if prefix.is_empty() {
            vb.clone()
        } else {
            vb.pp(prefix)
        };

        match BertModel::load(vb_prefix, config) {
            Ok(model) => return Ok(model),
            Err(e) => errors.push(format!(
                "{}: {}",
                if prefix.is_empty() { "<root>" } else { prefix },
                e
            )),
        }
    }

    Err(PipelineError::Unexpected(format!(
        "Failed to load BERT backbone, tried prefixes [{}]",
        errors.join(" | ")
    )))
}

impl TextClassifier for BertClassifier {
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

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        let cls = hidden.i((0, 0, ..))?.unsqueeze(0)?;
        let pooled = match &self.pooler {
            Some(pooler) => pooler.forward(&cls)?.tanh()?,
            None => cls,
        };

        let logits = self.classifier.forward(&pooled)?;
        Ok(logits.squeeze(0)?.to_vec1::<f32>()?)
    }

    fn device(&self) -> &Device {
        &self.device
    }
}
