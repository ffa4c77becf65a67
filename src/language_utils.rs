use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for the translation settings
///
/// This module owns the table of languages the tool translates between:
/// ISO 639-1 (2-letter) codes paired with display names. Lookups fall back
/// to English rather than failing, matching how the settings surface treats
/// unknown values.
/// Supported languages as (ISO 639-1 code, display name) pairs.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("pt", "Portuguese"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("it", "Italian"),
    ("de", "German"),
    ("ja", "Japanese"),
    ("zh", "Chinese"),
    ("ru", "Russian"),
    ("ar", "Arabic"),
    ("ko", "Korean"),
    ("nl", "Dutch"),
    ("el", "Greek"),
    ("sv", "Swedish"),
    ("hi", "Hindi"),
    ("tr", "Turkish"),
];

/// Fallback code when a name is not in the supported table
const DEFAULT_LANGUAGE_CODE: &str = "en";

/// Fallback name when a code is not in the supported table
const DEFAULT_LANGUAGE_NAME: &str = "English";

/// Get the display name for a language code, defaulting to English
pub fn get_language_name(code: &str) -> &'static str {
    let normalized = code.trim().to_lowercase();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == normalized)
        .map(|(_, name)| *name)
        .unwrap_or(DEFAULT_LANGUAGE_NAME)
}

/// Get the language code for a display name, defaulting to "en"
pub fn get_language_code(name: &str) -> &'static str {
    let trimmed = name.trim();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(_, n)| n.eq_ignore_ascii_case(trimmed))
        .map(|(c, _)| *c)
        .unwrap_or(DEFAULT_LANGUAGE_CODE)
}

/// All supported language codes, in table order
pub fn supported_language_codes() -> Vec<&'static str> {
    SUPPORTED_LANGUAGES.iter().map(|(c, _)| *c).collect()
}

/// All supported language display names, in table order
pub fn supported_language_names() -> Vec<&'static str> {
    SUPPORTED_LANGUAGES.iter().map(|(_, n)| *n).collect()
}

/// Check whether a code is in the supported table
pub fn is_supported(code: &str) -> bool {
    let normalized = code.trim().to_lowercase();
    SUPPORTED_LANGUAGES.iter().any(|(c, _)| *c == normalized)
}

/// Validate that a code is a well-formed ISO 639-1 code and supported here
///
/// Used by configuration validation before the monitor starts; a code can
/// be a real ISO code and still be rejected when the translation engines
/// have no instruction wording for it.
pub fn validate_language_code(code: &str) -> Result<()> {
    let normalized = code.trim().to_lowercase();

    if normalized.len() != 2 || Language::from_639_1(&normalized).is_none() {
        return Err(anyhow!("Invalid ISO 639-1 language code: {}", code));
    }

    if !is_supported(&normalized) {
        return Err(anyhow!(
            "Unsupported language code: {} (supported: {})",
            code,
            supported_language_codes().join(", ")
        ));
    }

    Ok(())
}
