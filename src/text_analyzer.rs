/*!
 * Text analysis utilities for clipboard content.
 *
 * Everything here is a pure function over the clipboard string: the
 * code-vs-prose heuristic that gates translation, a word counter for
 * status reporting, and a marker-based language guess.
 */

/// Substrings whose presence classifies a clipboard string as code.
/// Matched case-insensitively against the lower-cased input, not
/// word-boundary aware.
const CODE_INDICATORS: &[&str] = &[
    "function", "def ", "class ", "import ", "<script", "<html",
    "{ }", "[]", "{}", "()", "headers", "payload", "const ", "var ",
    "let ", "=>", "->", "#include", "namespace", "public:", "private:",
    "@Override", "package ", "using ", "pragma", "typedef", "sudo ",
    "return ", "val ", "fun ", "interface ", "impl", "trait", "module",
];

/// Symbols counted for the density check.
const CODE_SYMBOLS: [char; 23] = [
    '{', '}', '[', ']', '(', ')', '<', '>', ';', '=', '+', '-',
    '*', '/', '\\', '|', '&', '^', '%', '$', '#', '@', '!',
];

/// Ratio of symbol characters above which text is treated as code.
const SYMBOL_DENSITY_THRESHOLD: f64 = 0.08;

/// Ratio of indented lines above which multi-line text is treated as code.
const INDENTATION_RATIO_THRESHOLD: f64 = 0.3;

/// Minimum number of lines before the indentation check applies.
const INDENTATION_MIN_LINES: usize = 3;

/// Detect whether text appears to be source code rather than prose.
///
/// Three checks, any one of which classifies the input as code: a scan for
/// known programming tokens, the density of punctuation symbols, and the
/// share of indented lines. The thresholds are behavioral constants carried
/// over unchanged from the tool this replaces; false positives on prose that
/// happens to contain a token are accepted.
pub fn is_code(text: &str) -> bool {
    let text_lower = text.to_lowercase();
    for &indicator in CODE_INDICATORS {
        if text_lower.contains(indicator) {
            return true;
        }
    }

    let symbol_count = text.chars().filter(|c| CODE_SYMBOLS.contains(c)).count();
    let total_chars = text.chars().count();
    if total_chars > 0 && symbol_count as f64 / total_chars as f64 > SYMBOL_DENSITY_THRESHOLD {
        return true;
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let indented_lines = lines
        .iter()
        .filter(|line| line.starts_with("    ") || line.starts_with('\t'))
        .count();
    if lines.len() > INDENTATION_MIN_LINES
        && indented_lines as f64 / lines.len() as f64 > INDENTATION_RATIO_THRESHOLD
    {
        return true;
    }

    false
}

/// Count whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Marker substrings that are distinctive for a handful of languages,
/// in priority order for tie-breaking.
const LANGUAGE_MARKERS: &[(&str, &[&str])] = &[
    ("Portuguese", &["ção", "ões", "á", "é", "ê", "ã", "õ", "ç"]),
    ("English", &["the", "and", "that", "have", "with"]),
    ("Spanish", &["ción", "que", "ñ", "á", "é", "í", "ó", "ú"]),
    ("French", &["les", "des", "que", "dans", "est", "ê", "ç", "à", "â", "î", "ï"]),
    ("Italian", &["gli", "sono", "che", "per", "questa"]),
    ("German", &["der", "die", "das", "und", "ist", "ß", "ä", "ö", "ü"]),
];

/// Minimum marker hits before a language guess is reported.
const DETECTION_MIN_SCORE: usize = 2;

/// Guess the language of a text by scoring marker substrings.
///
/// This is intentionally crude. It exists for status display only, so a
/// wrong guess costs nothing; returns `"unknown"` when no language scores
/// at least two marker hits.
pub fn detect_language(text: &str) -> &'static str {
    let text_lower = text.to_lowercase();

    let mut detected = "unknown";
    let mut max_score = 0;
    for &(language, markers) in LANGUAGE_MARKERS {
        let mut score = 0;
        for &marker in markers {
            if text_lower.contains(marker) {
                score += 1;
            }
        }
        if score > max_score {
            max_score = score;
            detected = language;
        }
    }

    if max_score < DETECTION_MIN_SCORE {
        return "unknown";
    }
    detected
}
