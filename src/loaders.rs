use std::collections::HashMap;
use std::path::{Path, PathBuf};

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use serde::Deserialize;
use tokenizers::Tokenizer;

use crate::error::{PipelineError, Result};

/// Files retrieved from the hub for one classifier checkpoint.
pub(crate) struct HubModelFiles {
    pub config: PathBuf,
    pub weights: PathBuf,
    pub tokenizer: PathBuf,
}

pub(crate) fn fetch_classifier_files(repo_id: &str) -> Result<HubModelFiles> {
    let api = Api::new()?;
    let repo = api.repo(Repo::new(repo_id.to_string(), RepoType::Model));

    let config = repo.get("config.json")?;
    let tokenizer = repo.get("tokenizer.json")?;
    let weights = repo
        .get("model.safetensors")
        .or_else(|_| repo.get("pytorch_model.bin"))?;

    Ok(HubModelFiles {
        config,
        weights,
        tokenizer,
    })
}

pub(crate) fn load_tokenizer(path: &Path) -> Result<Tokenizer> {
    Tokenizer::from_file(path).map_err(|e| {
        PipelineError::Tokenization(format!(
            "Failed to load tokenizer from '{}': {}",
            path.display(),
            e
        ))
    })
}

pub(crate) fn load_var_builder(weights: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let vb = if weights.extension().is_some_and(|e| e == "safetensors") {
        unsafe { VarBuilder::from_mmaped_safetensors(&[weights.to_path_buf()], DType::F32, device)? }
    } else {
        VarBuilder::from_pth(weights, DType::F32, device)?
    };
    Ok(vb)
}

#[derive(Deserialize)]
pub(crate) struct ClassifierConfigJson {
    #[serde(default)]
    pub id2label: HashMap<String, String>,
    #[serde(default)]
    pub label2id: HashMap<String, u32>,
}

impl ClassifierConfigJson {
    pub fn read(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)?;
        Ok(serde_json::from_str(&config_str)?)
    }

    pub fn num_labels(&self) -> usize {
        self.label2id.len().max(self.id2label.len())
    }

    /// Label names ordered by numeric id. Gaps are filled with `label_{i}`.
    pub fn ordered_labels(&self) -> Vec<String> {
        let n = self.num_labels();
        (0..n)
            .map(|i| {
                self.id2label
                    .get(&i.to_string())
                    .cloned()
                    .unwrap_or_else(|| format!("label_{i}"))
            })
            .collect()
    }
}
