//! Pipeline configuration.

use candle_core::Device;
use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::lang::Language;

/// Which device classifiers are placed on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceRequest {
    /// CPU inference (default).
    #[default]
    Cpu,
    /// A specific CUDA GPU.
    Cuda(usize),
}

impl DeviceRequest {
    /// Resolve the request to a concrete device.
    pub fn resolve(self) -> Result<Device> {
        match self {
            DeviceRequest::Cpu => Ok(Device::Cpu),
            DeviceRequest::Cuda(i) => Device::new_cuda(i).map_err(|e| {
                PipelineError::Device(format!(
                    "Failed to init CUDA device {i}: {e}. Try CPU as fallback."
                ))
            }),
        }
    }
}

/// Settings for an [`EmotionPipeline`](crate::pipeline::EmotionPipeline).
///
/// Deserializable so embedders can read it from their own config file;
/// every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Language substituted whenever detection misses or the detected
    /// language is unsupported.
    pub default_language: Language,
    /// Device classifiers are placed on.
    pub device: DeviceRequest,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_language: Language::En,
            device: DeviceRequest::Cpu,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.default_language, Language::En);
        assert_eq!(config.device, DeviceRequest::Cpu);
    }

    #[test]
    fn config_from_json() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"default_language": "es", "device": {"cuda": 0}}"#).unwrap();
        assert_eq!(config.default_language, Language::Es);
        assert_eq!(config.device, DeviceRequest::Cuda(0));
    }
}
