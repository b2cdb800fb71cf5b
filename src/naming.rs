//! Identifier normalization shared by column, schema and table names.

use std::sync::OnceLock;

use regex::Regex;

struct NamePatterns {
    parenthesized: Regex,
    separators: Regex,
    capitalized_word: Regex,
    lower_upper: Regex,
    underscores: Regex,
}

static PATTERNS: OnceLock<NamePatterns> = OnceLock::new();

fn patterns() -> &'static NamePatterns {
    PATTERNS.get_or_init(|| NamePatterns {
        parenthesized: compile(r"\([^)]*\)"),
        separators: compile(r"[\s\-]+"),
        capitalized_word: compile(r"(.)([A-Z][a-z]+)"),
        lower_upper: compile(r"([a-z0-9])([A-Z])"),
        underscores: compile(r"_+"),
    })
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static identifier pattern compiles")
}

/// Converts a raw header token or path segment into a lowercase,
/// underscore-separated identifier.
///
/// Parenthesized text is dropped, whitespace and hyphen runs become a single
/// underscore, camel/Pascal case boundaries are split, and the result is
/// lowercased with duplicate and surrounding underscores removed:
///
/// ```
/// use raw_schema_gen::naming::normalize_name;
///
/// assert_eq!(normalize_name("Overall Rating (1-10)"), "overall_rating");
/// assert_eq!(normalize_name("HotelID"), "hotel_id");
/// assert_eq!(normalize_name("check-in  date"), "check_in_date");
/// ```
pub fn normalize_name(raw: &str) -> String {
    let patterns = patterns();
    let trimmed = raw.trim();
    let without_notes = patterns.parenthesized.replace_all(trimmed, "");
    let separated = patterns.separators.replace_all(&without_notes, "_");
    let words = patterns
        .capitalized_word
        .replace_all(&separated, "${1}_${2}");
    let split = patterns.lower_upper.replace_all(&words, "${1}_${2}");
    let lowered = split.to_lowercase();
    let collapsed = patterns.underscores.replace_all(&lowered, "_");
    collapsed.trim_matches('_').to_string()
}
