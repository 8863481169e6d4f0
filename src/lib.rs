//! Language-routed emotion and sarcasm classification with supportive,
//! rule-based recommendations.
//!
//! Powered by [Candle](https://github.com/huggingface/candle). Each
//! message is normalized, routed to a language-appropriate classifier
//! pair (multi-label emotion + binary sarcasm), thresholded, and mapped
//! to at most one supportive message; the classification is handed to a
//! pluggable log sink best-effort.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use empath::{ClassifyRequest, EmotionPipeline, MemoryLogStore, PipelineConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> empath::error::Result<()> {
//! let store = Arc::new(MemoryLogStore::new());
//! let pipeline = EmotionPipeline::new(&PipelineConfig::default(), store)?;
//!
//! // Blocks until every classifier is loaded and warmed; run it before
//! // accepting traffic.
//! pipeline.warm_up()?;
//!
//! let response = pipeline
//!     .classify(ClassifyRequest::new("I am so grateful, thank you!"), None)
//!     .await?;
//!
//! println!("{:?} (sarcasm: {})", response.detected_emotions, response.sarcasm_detected);
//! if let Some(message) = response.recommendation {
//!     println!("{message}");
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

// ============ Internal API ============

pub(crate) mod loaders;
pub(crate) mod models;
pub(crate) mod scoring;

// ============ Public API ============

pub mod config;
pub mod error;
pub mod lang;
pub mod pipeline;
pub mod recommend;
pub mod registry;
pub mod text;

pub use config::{DeviceRequest, PipelineConfig};
pub use lang::Language;
pub use models::{AnalyzerPrediction, EmotionAnalyzer, RobertuitoAnalyzer, TextClassifier};
pub use pipeline::{
    ClassifyRequest, ClassifyResponse, EmotionPipeline, LogRecord, LogStore, MemoryLogStore,
};
pub use recommend::recommend;
pub use registry::{ClassifierFactory, ModelRegistry, Task};
pub use scoring::emotion::EMOTION_THRESHOLD;
pub use scoring::sarcasm::SARCASM_PROB_FLOOR;
pub use scoring::EmotionScores;
