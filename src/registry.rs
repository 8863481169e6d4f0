//! The model registry: one lazily-loaded, permanently cached classifier
//! per (task, language) key.
//!
//! The key space is fixed and small (two tasks, two languages), entries
//! live for the process lifetime and are never evicted. Loading is
//! single-flight: the registry lock is held across a first load, so
//! concurrent first requests for an uninitialized key wait on one
//! construction instead of duplicating it. [`ModelRegistry::warm_up`]
//! performs all loading at startup so steady-state lookups are cheap
//! map reads and request-time load failures become unreachable.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::lang::{self, Arch, Language};
use crate::models::bert::BertClassifier;
use crate::models::xlm_roberta::XlmRobertaClassifier;
use crate::models::{EmotionAnalyzer, RobertuitoAnalyzer, TextClassifier};

/// Text fed through each classifier once at load time to force any
/// deferred initialization before real traffic arrives.
const WARM_UP_TEXT: &str = "test";

/// A classification task the registry routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Multi-label emotion classification.
    Emotion,
    /// Binary sarcasm classification.
    Sarcasm,
}

impl Task {
    const ALL: [Task; 2] = [Task::Emotion, Task::Sarcasm];
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Task::Emotion => "emotion",
            Task::Sarcasm => "sarcasm",
        })
    }
}

/// Produces classifier instances for the registry.
///
/// The default factory pulls checkpoints from the hub; tests inject
/// fakes through [`ModelRegistry::with_factory`].
pub trait ClassifierFactory: Send + Sync {
    /// Build the classifier for one (task, language) key.
    fn load(&self, task: Task, language: Language) -> Result<Arc<dyn TextClassifier>>;

    /// Build the preferred Spanish emotion analyzer.
    fn spanish_analyzer(&self) -> Result<Arc<dyn EmotionAnalyzer>>;
}

/// How emotions are scored for a given language.
pub(crate) enum EmotionBackend {
    /// Threshold-filtered multi-label transformer path.
    Multilabel(Arc<dyn TextClassifier>),
    /// Analyzer path: only the argmax label is reported.
    TopLabel(Arc<dyn EmotionAnalyzer>),
}

/// Preference for the Spanish emotion path, resolved exactly once.
enum SpanishEmotion {
    Analyzer(Arc<dyn EmotionAnalyzer>),
    Fallback,
}

/// Owns every cached model for the process lifetime.
pub struct ModelRegistry {
    factory: Box<dyn ClassifierFactory>,
    entries: Mutex<HashMap<(Task, Language), Arc<dyn TextClassifier>>>,
    spanish_emotion: Mutex<Option<SpanishEmotion>>,
}

impl ModelRegistry {
    /// Registry backed by hub checkpoints on the configured device.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let device = config.device.resolve()?;
        Ok(Self::with_factory(Box::new(HubFactory { device })))
    }

    /// Registry backed by a custom factory (tests, alternative model
    /// sources).
    pub fn with_factory(factory: Box<dyn ClassifierFactory>) -> Self {
        Self {
            factory,
            entries: Mutex::new(HashMap::new()),
            spanish_emotion: Mutex::new(None),
        }
    }

    /// Load and warm every (task, language) key, then resolve the
    /// Spanish analyzer preference.
    ///
    /// Expected to run at startup, before traffic: any failure here is
    /// fatal and should block process readiness, which keeps
    /// [`PipelineError::ModelUnavailable`] unreachable at request time.
    pub fn warm_up(&self) -> Result<()> {
        for language in Language::ALL {
            for task in Task::ALL {
                tracing::info!(%task, %language, "warming up classifier");
                self.get(task, language)?;
            }
        }
        // Resolve the Spanish preference now rather than on the first
        // Spanish request.
        self.emotion(Language::Es)?;
        tracing::info!("all classifiers warmed up");
        Ok(())
    }

    /// The cached classifier for a key, loading it on first use.
    pub fn get(&self, task: Task, language: Language) -> Result<Arc<dyn TextClassifier>> {
        let mut entries = self.entries.lock().unwrap();

        if let Some(model) = entries.get(&(task, language)) {
            return Ok(model.clone());
        }

        let model = self
            .factory
            .load(task, language)
            .and_then(|model| {
                // Throwaway inference bounds steady-state latency and
                // fails the load rather than a later request.
                model.logits(WARM_UP_TEXT)?;
                Ok(model)
            })
            .map_err(|e| {
                PipelineError::ModelUnavailable(format!("{task}/{language}: {e}"))
            })?;

        entries.insert((task, language), model.clone());
        Ok(model)
    }

    /// The sarcasm classifier for a language.
    pub(crate) fn sarcasm(&self, language: Language) -> Result<Arc<dyn TextClassifier>> {
        self.get(Task::Sarcasm, language)
    }

    /// The emotion backend for a language.
    ///
    /// Spanish prefers the third-party analyzer; the preference is
    /// resolved on first use and pinned for the process lifetime, so a
    /// failed construction is never retried.
    pub(crate) fn emotion(&self, language: Language) -> Result<EmotionBackend> {
        if language != Language::Es {
            return Ok(EmotionBackend::Multilabel(self.get(Task::Emotion, language)?));
        }

        let analyzer = {
            let mut slot = self.spanish_emotion.lock().unwrap();
            let resolved = slot.get_or_insert_with(|| match self.factory.spanish_analyzer() {
                Ok(analyzer) => SpanishEmotion::Analyzer(analyzer),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Spanish analyzer failed to construct; using transformer fallback permanently"
                    );
                    SpanishEmotion::Fallback
                }
            });

            match resolved {
                SpanishEmotion::Analyzer(analyzer) => Some(analyzer.clone()),
                SpanishEmotion::Fallback => None,
            }
        };

        match analyzer {
            Some(analyzer) => Ok(EmotionBackend::TopLabel(analyzer)),
            None => Ok(EmotionBackend::Multilabel(self.get(Task::Emotion, Language::Es)?)),
        }
    }
}

// ============ Hub-backed factory ============

struct HubFactory {
    device: candle_core::Device,
}

impl ClassifierFactory for HubFactory {
    fn load(&self, task: Task, language: Language) -> Result<Arc<dyn TextClassifier>> {
        let profile = lang::profile_for(language);
        let (model_id, arch) = match task {
            Task::Emotion => (profile.emotion_model, profile.emotion_arch),
            Task::Sarcasm => (profile.sarcasm_model, profile.sarcasm_arch),
        };

        tracing::info!(%task, %language, model_id, "loading classifier from hub");

        Ok(match arch {
            Arch::Bert => Arc::new(BertClassifier::from_hub(model_id, self.device.clone())?),
            Arch::XlmRoberta => {
                Arc::new(XlmRobertaClassifier::from_hub(model_id, self.device.clone())?)
            }
        })
    }

    fn spanish_analyzer(&self) -> Result<Arc<dyn EmotionAnalyzer>> {
        Ok(Arc::new(RobertuitoAnalyzer::from_hub(self.device.clone())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedClassifier {
        logits: Vec<f32>,
        device: candle_core::Device,
    }

    impl FixedClassifier {
        fn new(logits: Vec<f32>) -> Self {
            Self {
                logits,
                device: candle_core::Device::Cpu,
            }
        }
    }

    impl TextClassifier for FixedClassifier {
        fn logits(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.logits.clone())
        }

        fn device(&self) -> &candle_core::Device {
            &self.device
        }
    }

    #[derive(Default)]
    struct CountingFactory {
        loads: AtomicUsize,
        analyzer_attempts: AtomicUsize,
        fail_analyzer: bool,
        fail_all: bool,
    }

    impl ClassifierFactory for Arc<CountingFactory> {
        fn load(&self, _task: Task, _language: Language) -> Result<Arc<dyn TextClassifier>> {
            if self.fail_all {
                return Err(PipelineError::Download("offline".to_string()));
            }
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(FixedClassifier::new(vec![0.0])))
        }

        fn spanish_analyzer(&self) -> Result<Arc<dyn EmotionAnalyzer>> {
            self.analyzer_attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail_analyzer {
                return Err(PipelineError::Download("no analyzer".to_string()));
            }
            struct Fixed;
            impl EmotionAnalyzer for Fixed {
                fn predict(&self, _text: &str) -> Result<crate::models::AnalyzerPrediction> {
                    Ok(crate::models::AnalyzerPrediction {
                        label: "joy".to_string(),
                        probability: 0.9,
                        probas: vec![("joy".to_string(), 0.9)],
                    })
                }
            }
            Ok(Arc::new(Fixed))
        }
    }

    fn registry(factory: CountingFactory) -> (ModelRegistry, Arc<CountingFactory>) {
        let factory = Arc::new(factory);
        (
            ModelRegistry::with_factory(Box::new(factory.clone())),
            factory,
        )
    }

    #[test]
    fn second_get_reuses_cached_instance() {
        let (registry, factory) = registry(CountingFactory::default());

        let first = registry.get(Task::Emotion, Language::En).unwrap();
        let second = registry.get(Task::Emotion, Language::En).unwrap();

        assert_eq!(factory.loads.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn keys_are_independent() {
        let (registry, factory) = registry(CountingFactory::default());

        registry.get(Task::Emotion, Language::En).unwrap();
        registry.get(Task::Sarcasm, Language::En).unwrap();
        registry.get(Task::Emotion, Language::Es).unwrap();

        assert_eq!(factory.loads.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn warm_up_loads_every_key_and_resolves_analyzer() {
        let (registry, factory) = registry(CountingFactory::default());

        registry.warm_up().unwrap();

        assert_eq!(factory.loads.load(Ordering::SeqCst), 4);
        assert_eq!(factory.analyzer_attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn analyzer_failure_falls_back_without_retry() {
        let (registry, factory) = registry(CountingFactory {
            fail_analyzer: true,
            ..CountingFactory::default()
        });

        for _ in 0..3 {
            match registry.emotion(Language::Es).unwrap() {
                EmotionBackend::Multilabel(_) => {}
                EmotionBackend::TopLabel(_) => panic!("expected fallback path"),
            }
        }

        // One construction attempt, never retried.
        assert_eq!(factory.analyzer_attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn analyzer_preference_sticks() {
        let (registry, factory) = registry(CountingFactory::default());

        for _ in 0..3 {
            match registry.emotion(Language::Es).unwrap() {
                EmotionBackend::TopLabel(_) => {}
                EmotionBackend::Multilabel(_) => panic!("expected analyzer path"),
            }
        }

        assert_eq!(factory.analyzer_attempts.load(Ordering::SeqCst), 1);
        // The transformer entry was never needed.
        assert_eq!(factory.loads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn load_failure_maps_to_model_unavailable() {
        let (registry, _factory) = registry(CountingFactory {
            fail_all: true,
            ..CountingFactory::default()
        });

        let err = registry.get(Task::Emotion, Language::En).err().unwrap();
        assert!(matches!(err, PipelineError::ModelUnavailable(_)));
        assert!(!err.is_client_error());
    }
}
