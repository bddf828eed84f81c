use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationError, ValidationErrors};

use crate::shared::constants::{MAX_REPORT_TEXT_CHARS, MIN_REPORT_TEXT_CHARS};

lazy_static! {
    /// Word tokens of at least two word characters, Unicode aware
    /// - "Glas auf dem Radweg!" -> ["Glas", "auf", "dem", "Radweg"]
    /// - "a b" -> []
    pub static ref TOKEN_REGEX: Regex = Regex::new(r"\b\w\w+\b").unwrap();
}

/// Validates free report text after trimming.
///
/// Length is counted in characters, not bytes, so umlauts count once.
pub fn validate_report_text(text: &str) -> Result<(), ValidationError> {
    let trimmed = text.trim();
    let len = trimmed.chars().count();

    if len < MIN_REPORT_TEXT_CHARS {
        return Err(ValidationError::new("text_too_short").with_message(
            format!("Text must be at least {} characters.", MIN_REPORT_TEXT_CHARS).into(),
        ));
    }
    if len > MAX_REPORT_TEXT_CHARS {
        return Err(ValidationError::new("text_too_long").with_message(
            format!("Text must be at most {} characters.", MAX_REPORT_TEXT_CHARS).into(),
        ));
    }
    if !trimmed.chars().any(char::is_alphanumeric) {
        return Err(ValidationError::new("text_no_alphanumeric").with_message(
            "Text must contain letters or numbers (not only emojis/symbols).".into(),
        ));
    }

    Ok(())
}

/// Flattens field errors into a single user-facing sentence list.
///
/// Falls back to the `validator` rendering for errors without a message.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect();
    messages.sort();

    if messages.is_empty() {
        errors.to_string()
    } else {
        messages.join(" ")
    }
}
