//! Error types for this crate.
//!
//! All fallible operations return [`Result<T>`] which uses [`PipelineError`] as the error type.

use thiserror::Error;

/// A [`Result`](std::result::Result) alias using [`PipelineError`] as the error type.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// The unified error type for all crate errors.
///
/// Only [`InvalidInput`](PipelineError::InvalidInput) maps to a client-class
/// failure at a serving boundary; everything else is server-side. See
/// [`PipelineError::is_client_error`].
///
/// # Example
///
/// ```rust,no_run
/// use empath::error::PipelineError;
///
/// fn status_code(e: &PipelineError) -> u16 {
///     if e.is_client_error() {
///         400
///     } else {
///         500
///     }
/// }
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PipelineError {
    /// Empty or malformed message text. No model work was performed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No classifier could be produced for a (task, language) key.
    /// Unreachable at request time when warm-up ran at startup.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// Network or download failure. Retry may help.
    #[error("{0}")]
    Download(String),

    /// Tokenization failure. Check input text.
    #[error("{0}")]
    Tokenization(String),

    /// Device initialization failure. Fall back to CPU.
    #[error("{0}")]
    Device(String),

    /// Tokenization succeeded but the forward pass failed.
    #[error("inference failed: {0}")]
    Inference(String),

    /// A log record could not be stored. Swallowed at the orchestrator
    /// boundary; never surfaced to the caller.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// Internal error. Report if seen.
    #[error("{0}")]
    Unexpected(String),
}

impl PipelineError {
    /// Whether this error is the caller's fault (4xx-class at a boundary).
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::InvalidInput(_))
    }
}

impl From<hf_hub::api::sync::ApiError> for PipelineError {
    fn from(value: hf_hub::api::sync::ApiError) -> Self {
        PipelineError::Download(format!("HuggingFace API error: {value}"))
    }
}

impl From<candle_core::Error> for PipelineError {
    fn from(value: candle_core::Error) -> Self {
        PipelineError::Inference(value.to_string())
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(value: std::io::Error) -> Self {
        PipelineError::Unexpected(value.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(value: serde_json::Error) -> Self {
        PipelineError::Unexpected(value.to_string())
    }
}
