//! Language identification and the per-language routing tables.
//!
//! Detection is advisory: a miss, a short/ambiguous text, or an
//! unsupported guess all collapse to the configured default language.
//! Every table in this module is indexed by a collapsed [`Language`],
//! never by raw detector output.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use whatlang::{Detector, Lang};

/// A supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    En,
    /// Spanish.
    Es,
}

impl Language {
    /// Every supported language, in warm-up order.
    pub const ALL: [Language; 2] = [Language::En, Language::Es];

    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }

    /// Parse an ISO 639-1 code, case-insensitively.
    pub fn from_code(code: &str) -> Option<Language> {
        match code.to_lowercase().as_str() {
            "en" => Some(Language::En),
            "es" => Some(Language::Es),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Best-guess language code for `text`.
///
/// Returns whatever the detector guesses ("en", "es", "fra", ...), or
/// `default`'s code when the detector has no answer. Never errors:
/// detection is advisory, not safety-critical. Callers must still
/// collapse the result through [`resolve`] before touching any
/// per-language table.
pub fn detect_code(text: &str, default: Language) -> String {
    static DETECTOR: Lazy<Detector> = Lazy::new(Detector::new);

    match DETECTOR.detect_lang(text) {
        Some(Lang::Eng) => "en".to_string(),
        Some(Lang::Spa) => "es".to_string(),
        Some(other) => other.code().to_string(),
        None => default.code().to_string(),
    }
}

/// Collapse a raw language code to the supported set.
pub fn resolve(code: &str, default: Language) -> Language {
    Language::from_code(code).unwrap_or(default)
}

// ============ Per-language routing tables ============

/// Which backbone a hub checkpoint uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Arch {
    Bert,
    XlmRoberta,
}

/// Model ids, label set and sarcasm cues for one language.
pub(crate) struct LanguageProfile {
    pub emotion_model: &'static str,
    pub emotion_arch: Arch,
    pub emotion_labels: &'static [&'static str],
    pub sarcasm_model: &'static str,
    pub sarcasm_arch: Arch,
    pub sarcasm_cues: &'static [&'static str],
}

/// GoEmotions label set, in the model's output order.
const EMOTION_LABELS_EN: &[&str] = &[
    "admiration",
    "amusement",
    "anger",
    "annoyance",
    "approval",
    "caring",
    "confusion",
    "curiosity",
    "desire",
    "disappointment",
    "disapproval",
    "disgust",
    "embarrassment",
    "excitement",
    "fear",
    "gratitude",
    "grief",
    "joy",
    "love",
    "nervousness",
    "optimism",
    "pride",
    "realization",
    "relief",
    "remorse",
    "sadness",
    "surprise",
    "neutral",
];

const EMOTION_LABELS_ES: &[&str] = &[
    "others",
    "joy",
    "sadness",
    "anger",
    "surprise",
    "disgust",
    "fear",
];

const SARCASM_CUES_EN: &[&str] = &[
    "yeah right",
    "sure you did",
    "oh great",
    "just great",
    "just perfect",
    "how original",
    "totally",
    "obviously",
    "as if",
    "...",
    "🙄",
    "😒",
    "🙃",
];

const SARCASM_CUES_ES: &[&str] = &[
    "sí claro",
    "si claro",
    "no me digas",
    "qué sorpresa",
    "qué bien",
    "genial, justo",
    "obvio",
    "...",
    "🙄",
    "😒",
    "🙃",
];

const PROFILE_EN: LanguageProfile = LanguageProfile {
    emotion_model: "bhadresh-savani/bert-base-go-emotion",
    emotion_arch: Arch::Bert,
    emotion_labels: EMOTION_LABELS_EN,
    sarcasm_model: "helinivan/english-sarcasm-detector",
    sarcasm_arch: Arch::Bert,
    sarcasm_cues: SARCASM_CUES_EN,
};

const PROFILE_ES: LanguageProfile = LanguageProfile {
    emotion_model: "finiteautomata/bertweet-base-emotion-analysis",
    emotion_arch: Arch::XlmRoberta,
    emotion_labels: EMOTION_LABELS_ES,
    sarcasm_model: "dtomas/roberta-base-bne-irony",
    sarcasm_arch: Arch::XlmRoberta,
    sarcasm_cues: SARCASM_CUES_ES,
};

pub(crate) fn profile_for(language: Language) -> &'static LanguageProfile {
    match language {
        Language::En => &PROFILE_EN,
        Language::Es => &PROFILE_ES,
    }
}

/// The ordered emotion label set scored for `language`.
///
/// Label sets differ in size and content between languages; the English
/// model scores 28 GoEmotions labels, the Spanish one 7.
pub fn emotion_labels(language: Language) -> &'static [&'static str] {
    profile_for(language).emotion_labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
        assert_eq!(Language::from_code("ES"), Some(Language::Es));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn resolve_collapses_to_default() {
        assert_eq!(resolve("es", Language::En), Language::Es);
        assert_eq!(resolve("fr", Language::En), Language::En);
        assert_eq!(resolve("zz", Language::Es), Language::Es);
        assert_eq!(resolve("", Language::En), Language::En);
    }

    #[test]
    fn detects_clear_english_and_spanish() {
        let en = detect_code(
            "This is a longer English sentence to make detection unambiguous.",
            Language::Es,
        );
        assert_eq!(en, "en");

        let es = detect_code(
            "Hoy estoy muy agradecido por todo lo que tengo en mi vida, muchas gracias a todos ustedes.",
            Language::En,
        );
        assert_eq!(es, "es");
    }

    #[test]
    fn unsupported_detection_collapses() {
        // French detects as French; resolution collapses it.
        let code = detect_code("Bonjour tout le monde, comment allez-vous aujourd'hui?", Language::En);
        assert_eq!(resolve(&code, Language::En), Language::En);
    }

    #[test]
    fn label_sets_differ_per_language() {
        assert_eq!(emotion_labels(Language::En).len(), 28);
        assert_eq!(emotion_labels(Language::Es).len(), 7);
        assert!(emotion_labels(Language::En).contains(&"gratitude"));
        assert!(emotion_labels(Language::Es).contains(&"others"));
    }
}
