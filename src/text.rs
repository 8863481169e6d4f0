//! Input normalization. Runs before any model sees the text.

use crate::error::{PipelineError, Result};

/// Clean up a raw message.
///
/// Trims surrounding whitespace, collapses embedded newlines to single
/// spaces and drops bytes that did not survive UTF-8 decoding at the
/// boundary (the `U+FFFD` replacement character). Pure; no I/O.
///
/// # Errors
///
/// [`PipelineError::InvalidInput`] when the message is empty or
/// whitespace-only.
pub fn normalize(text: &str) -> Result<String> {
    if text.trim().is_empty() {
        return Err(PipelineError::InvalidInput(
            "empty or whitespace-only message".to_string(),
        ));
    }

    let cleaned: String = text
        .trim()
        .replace("\r\n", " ")
        .replace('\n', " ")
        .chars()
        .filter(|&c| c != '\u{FFFD}')
        .collect();

    Ok(cleaned)
}
