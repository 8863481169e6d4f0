//! Rule-table recommendation engine.
//!
//! Pure and deterministic: no inference, no side effects. The rule
//! tables are evaluated top to bottom, first match wins, at most one
//! message comes back. Language selects the string table only; it never
//! changes the predicate logic.

use crate::lang::Language;

/// One fixed message per rule, for one language.
struct MessageTable {
    sarcastic_positive: &'static str,
    sarcastic_frustration: &'static str,
    sarcastic_humor: &'static str,
    no_emotion: &'static str,
    remorse: &'static str,
    gratitude: &'static str,
    anger: &'static str,
    sadness: &'static str,
    joy: &'static str,
}

const TABLE_EN: MessageTable = MessageTable {
    sarcastic_positive: "It sounds like you might be joking or using sarcasm—want to explore how you really feel?",
    sarcastic_frustration: "Seems like you're expressing frustration through sarcasm. Maybe try writing what’s really bothering you?",
    sarcastic_humor: "Using humor is totally okay—just be sure you're not masking something deeper.",
    no_emotion: "I'm not picking up strong feelings—try writing a bit more or being more specific.",
    remorse: "Be gentle with yourself—everyone makes mistakes. You’re doing your best.",
    gratitude: "That’s wonderful to hear. Maybe note what you're thankful for to revisit later.",
    anger: "Feeling angry? That’s valid. Think about what boundary was crossed or what you need.",
    sadness: "Sounds like you're feeling down. It’s okay to feel that way—consider reaching out or writing more.",
    joy: "I'm glad you're feeling good. You might want to capture what’s bringing you joy today.",
};

const TABLE_ES: MessageTable = MessageTable {
    sarcastic_positive: "Parece que estás bromeando o usando sarcasmo—¿quieres explorar cómo te sientes realmente?",
    sarcastic_frustration: "Parece que estás expresando frustración con sarcasmo. Tal vez podrías escribir lo que realmente te molesta.",
    sarcastic_humor: "El humor está bien—solo asegúrate de que no estés ocultando algo más profundo.",
    no_emotion: "No detecté emociones claras—puedes ser un poco más específico.",
    remorse: "Sé amable contigo mismo—todos cometemos errores.",
    gratitude: "¡Eso es maravilloso! Puedes anotar por qué estás agradecido.",
    anger: "Está bien estar enojado. Piensa si alguien cruzó un límite personal.",
    sadness: "Parece que estás triste. Está bien sentirse así—considera escribir más o hablar con alguien.",
    joy: "¡Qué bien que te sientes feliz! Tal vez escribe qué te dio alegría hoy.",
};

const SARCASM_POSITIVE: [&str; 3] = ["admiration", "gratitude", "approval"];
const SARCASM_FRUSTRATION: [&str; 3] = ["anger", "annoyance", "disappointment"];

fn table_for(language: Language) -> &'static MessageTable {
    match language {
        Language::En => &TABLE_EN,
        Language::Es => &TABLE_ES,
    }
}

/// Derive at most one supportive message from a classification.
///
/// Sarcasm-specific rules run first and only when `is_sarcastic`; when
/// none of them fires, the general chain still applies (empty detected
/// set, then remorse, gratitude, anger, sadness, joy in that priority
/// order). No match yields `None`, which is not an error.
pub fn recommend(
    detected_emotions: &[String],
    is_sarcastic: bool,
    language: Language,
) -> Option<&'static str> {
    let table = table_for(language);
    let has = |label: &str| detected_emotions.iter().any(|e| e == label);

    if is_sarcastic {
        if SARCASM_POSITIVE.iter().any(|l| has(l)) {
            return Some(table.sarcastic_positive);
        }
        if SARCASM_FRUSTRATION.iter().any(|l| has(l)) {
            return Some(table.sarcastic_frustration);
        }
        if has("amusement") {
            return Some(table.sarcastic_humor);
        }
    }

    if detected_emotions.is_empty() {
        return Some(table.no_emotion);
    }

    [
        ("remorse", table.remorse),
        ("gratitude", table.gratitude),
        ("anger", table.anger),
        ("sadness", table.sadness),
        ("joy", table.joy),
    ]
    .into_iter()
    .find(|(label, _)| has(label))
    .map(|(_, message)| message)
}
