//! Binary sarcasm scoring with a lexical cue blend.
//!
//! The classifier's argmax is the primary signal (class 1 = sarcastic
//! by convention). A cue-list heuristic raises sensitivity: when the
//! model leans sarcastic without committing (class-1 probability above
//! [`SARCASM_PROB_FLOOR`]) and the text carries a known cue, the result
//! is still positive. The heuristic alone never triggers.

use crate::error::Result;
use crate::lang::{self, Language};
use crate::registry::ModelRegistry;
use crate::scoring::softmax;

/// Secondary threshold for heuristic-assisted positives.
pub const SARCASM_PROB_FLOOR: f32 = 0.15;

pub(crate) fn score(registry: &ModelRegistry, language: Language, text: &str) -> Result<bool> {
    let model = registry.sarcasm(language)?;
    let probs = softmax(&model.logits(text)?);
    let cues = lang::profile_for(language).sarcasm_cues;
    Ok(decide(&probs, cue_match(text, cues)))
}

fn decide(probs: &[f32], cue_matched: bool) -> bool {
    let argmax = probs
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i);

    if argmax == Some(1) {
        return true;
    }

    // A single-class vector has no sarcastic-class probability to read;
    // only the argmax signal applies.
    if probs.len() < 2 {
        return false;
    }

    probs[1] > SARCASM_PROB_FLOOR && cue_matched
}

/// Case-insensitive cue lookup against the raw text and against a
/// punctuation-stripped copy, so "just, perfect" still matches the
/// "just perfect" cue while "..." and emoji cues match verbatim.
fn cue_match(text: &str, cues: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();

    cues.iter()
        .any(|cue| lowered.contains(cue) || stripped.contains(cue))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confident_model_needs_no_cue() {
        assert!(decide(&[0.2, 0.8], false));
    }

    #[test]
    fn weak_model_plus_cue_triggers() {
        assert!(decide(&[0.7, 0.3], true));
    }

    #[test]
    fn weak_model_without_cue_stays_negative() {
        assert!(!decide(&[0.7, 0.3], false));
    }

    #[test]
    fn cue_alone_never_triggers() {
        assert!(!decide(&[0.9, 0.1], true));
    }

    #[test]
    fn single_class_vector_short_circuits() {
        assert!(!decide(&[1.0], true));
        assert!(!decide(&[], true));
    }

    #[test]
    fn cues_match_through_case_and_punctuation() {
        let cues = lang::profile_for(Language::En).sarcasm_cues;
        assert!(cue_match("Oh great, ANOTHER meeting, just perfect...", cues));
        assert!(cue_match("Well... fine", cues));
        assert!(cue_match("that went great 🙄", cues));
        assert!(!cue_match("I had a lovely afternoon", cues));
    }

    #[test]
    fn spanish_cues_match() {
        let cues = lang::profile_for(Language::Es).sarcasm_cues;
        assert!(cue_match("Sí, claro, eso fue increíble", cues));
        assert!(!cue_match("Hoy fue un buen día", cues));
    }
}
