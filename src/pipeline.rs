//! The request orchestrator.
//!
//! Drives one message through the full sequence: normalize, resolve
//! language, score emotion and sarcasm, derive a recommendation,
//! persist a log record best-effort, assemble the response. Scoring
//! failures abort the request; persistence failures never do.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::lang::{self, Language};
use crate::recommend::recommend;
use crate::registry::ModelRegistry;
use crate::scoring::{emotion, sarcasm};

/// Messages longer than this are rejected before any model work.
pub const MAX_MESSAGE_CHARS: usize = 1000;

// ============ Request / response contract ============

/// One inbound classification request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    /// The message text, 1 to [`MAX_MESSAGE_CHARS`] characters.
    pub message: String,
    /// Free-text context tag; logged as "general" when absent.
    #[serde(default)]
    pub context: Option<String>,
    /// Session grouping key; generated when absent. Not an
    /// authorization token.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Explicit language override; still collapsed to the supported
    /// set.
    #[serde(default)]
    pub language: Option<String>,
}

impl ClassifyRequest {
    /// A request carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            session_id: None,
            language: None,
        }
    }
}

/// The versioned response contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    /// Echoed or freshly generated session id.
    pub session_id: String,
    /// The collapsed language the message was scored under.
    pub language: Language,
    /// Detected emotion labels, in label-set order.
    pub detected_emotions: Vec<String>,
    /// Confidence per detected label, rounded fraction in [0, 1]. The
    /// key set equals `detected_emotions` exactly.
    pub confidence_scores: BTreeMap<String, f32>,
    /// Whether the message reads as sarcastic.
    pub sarcasm_detected: bool,
    /// At most one supportive message from the rule table.
    pub recommendation: Option<String>,
}

// ============ Persistence collaborator ============

/// One classification, as handed to the persistence collaborator.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Session grouping key.
    pub session_id: String,
    /// The raw message as received (not the normalized form).
    pub message: String,
    /// Detected emotion labels.
    pub emotions: Vec<String>,
    /// Context tag, "general" when the request carried none.
    pub context: String,
    /// Sarcasm flag.
    pub sarcasm_detected: bool,
    /// Opaque caller identity from the authentication collaborator.
    pub user_id: Option<String>,
    /// When the classification happened.
    pub timestamp: SystemTime,
}

/// Where log records go.
///
/// Called fire-and-forget: the orchestrator logs and swallows
/// [`PipelineError::Persistence`] failures, so implementations should
/// report storage trouble through that variant and nothing else.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Durably store one record.
    async fn persist(&self, record: LogRecord) -> Result<()>;
}

/// In-memory [`LogStore`] with history retrieval, for tests and for
/// embedders running without a database.
#[derive(Default)]
pub struct MemoryLogStore {
    records: tokio::sync::Mutex<Vec<LogRecord>>,
}

impl MemoryLogStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for one session, in insertion order.
    pub async fn session_history(&self, session_id: &str) -> Vec<LogRecord> {
        self.records
            .lock()
            .await
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect()
    }

    /// Records for one user, in insertion order.
    pub async fn user_history(&self, user_id: &str) -> Vec<LogRecord> {
        self.records
            .lock()
            .await
            .iter()
            .filter(|r| r.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn persist(&self, record: LogRecord) -> Result<()> {
        self.records.lock().await.push(record);
        Ok(())
    }
}

// ============ Orchestrator ============

/// The language-routed classification pipeline.
pub struct EmotionPipeline {
    registry: ModelRegistry,
    store: Arc<dyn LogStore>,
    default_language: Language,
}

impl EmotionPipeline {
    /// Pipeline backed by hub checkpoints per `config`.
    pub fn new(config: &PipelineConfig, store: Arc<dyn LogStore>) -> Result<Self> {
        Ok(Self::with_registry(
            ModelRegistry::new(config)?,
            store,
            config.default_language,
        ))
    }

    /// Pipeline over an explicitly constructed registry.
    pub fn with_registry(
        registry: ModelRegistry,
        store: Arc<dyn LogStore>,
        default_language: Language,
    ) -> Self {
        Self {
            registry,
            store,
            default_language,
        }
    }

    /// Load and warm every classifier. Run this before accepting
    /// traffic; a partially warmed process must not serve requests.
    pub fn warm_up(&self) -> Result<()> {
        self.registry.warm_up()
    }

    /// Classify one message for an (optionally authenticated) caller.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidInput`] for empty, whitespace-only or
    /// overlong messages; [`PipelineError::ModelUnavailable`] or
    /// [`PipelineError::Inference`] when scoring fails. Persistence
    /// failures are swallowed and never surface here.
    pub async fn classify(
        &self,
        request: ClassifyRequest,
        user_id: Option<&str>,
    ) -> Result<ClassifyResponse> {
        if request.message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(PipelineError::InvalidInput(format!(
                "message exceeds {MAX_MESSAGE_CHARS} characters"
            )));
        }

        let cleaned = crate::text::normalize(&request.message)?;

        let language = match &request.language {
            Some(code) => lang::resolve(code, self.default_language),
            None => lang::resolve(
                &lang::detect_code(&cleaned, self.default_language),
                self.default_language,
            ),
        };

        let session_id = request
            .session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let emotions = emotion::score(&self.registry, language, &cleaned)?;
        let sarcasm_detected = sarcasm::score(&self.registry, language, &cleaned)?;

        tracing::debug!(
            %language,
            detected = emotions.detected.len(),
            sarcasm_detected,
            "scored message"
        );

        let recommendation =
            recommend(&emotions.detected, sarcasm_detected, language).map(str::to_string);

        let record = LogRecord {
            session_id: session_id.clone(),
            message: request.message,
            emotions: emotions.detected.clone(),
            context: request.context.unwrap_or_else(|| "general".to_string()),
            sarcasm_detected,
            user_id: user_id.map(str::to_string),
            timestamp: SystemTime::now(),
        };

        // Fire-and-forget: a storage failure must not affect the
        // response. Anything other than a persistence error is a bug
        // in the sink and still propagates.
        if let Err(e) = self.store.persist(record).await {
            match e {
                PipelineError::Persistence(_) => {
                    tracing::warn!(error = %e, "failed to persist log record");
                }
                other => return Err(other),
            }
        }

        Ok(ClassifyResponse {
            session_id,
            language,
            detected_emotions: emotions.detected,
            confidence_scores: emotions.confidence,
            sarcasm_detected,
            recommendation,
        })
    }
}
