// ==========================================
// Exam Ops - Name Normalizer
// ==========================================
// Pure, total helpers shared by the matcher and correlator.
// Output alphabet: lowercase alphanumerics and single spaces.
// ==========================================

use std::collections::BTreeSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize a person name for comparison
///
/// Steps: lowercase, compatibility-decompose, drop combining marks
/// (diacritics), replace anything that is not alphanumeric with a space,
/// collapse whitespace. Titles are kept.
///
/// # Examples
/// ```
/// use exam_ops::engine::normalizer::normalize_name;
/// assert_eq!(normalize_name("  Dr. José   O'Neil-Smith "), "dr jose o neil smith");
/// assert_eq!(normalize_name("..."), "");
/// ```
pub fn normalize_name(raw: &str) -> String {
    let folded: String = raw
        .chars()
        .flat_map(char::to_lowercase)
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Surname token of an already-normalized name
///
/// Takes the last token. With `skip_initials`, trailing single-character
/// tokens are skipped while an earlier token exists ("smith j" -> "smith").
/// Empty input yields "".
pub fn surname_token(normalized: &str, skip_initials: bool) -> &str {
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    let Some((last, rest)) = tokens.split_last() else {
        return "";
    };

    if !skip_initials {
        return *last;
    }

    let mut surname = *last;
    for token in rest.iter().rev() {
        if surname.chars().count() > 1 {
            break;
        }
        surname = *token;
    }
    surname
}

/// First letter of every token of a normalized name
pub fn initials(normalized: &str) -> BTreeSet<char> {
    normalized
        .split_whitespace()
        .filter_map(|token| token.chars().next())
        .collect()
}

/// Canonical form of a timetable time label
///
/// "9 AM" -> "9:00am", "10.30 pm" -> "10:30pm", "14:00" -> "14:00".
/// Labels without an am/pm suffix only lose whitespace and case.
pub fn normalize_time_label(raw: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .map(|c| if c == '.' { ':' } else { c })
        .collect();

    let suffix = if compact.ends_with("am") {
        "am"
    } else if compact.ends_with("pm") {
        "pm"
    } else {
        return compact;
    };

    let clock = &compact[..compact.len() - suffix.len()];
    if clock.is_empty() || clock.contains(':') {
        return compact;
    }
    format!("{}:00{}", clock, suffix)
}
