//! Text canonicalization for exact-match comparisons.

use unicode_normalization::UnicodeNormalization;

/// Phrases answered locally with the brand description, in normalized form.
const BRAND_PHRASES: &[&str] = &["what is loreal"];

/// Canonical form of `text`: canonically decomposed, combining diacritics and
/// apostrophes dropped, lowercased and trimmed.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .nfd()
        .filter(|c| !is_combining_diacritic(*c) && !is_apostrophe(*c))
        .collect();
    stripped.to_lowercase().trim().to_string()
}

/// True when the question asks what the brand is, ignoring case, accents,
/// apostrophes and trailing sentence punctuation.
pub fn is_brand_query(question: &str) -> bool {
    let normalized = normalize(question);
    let phrase = normalized.trim_end_matches(|c: char| matches!(c, '?' | '!' | '.') || c.is_whitespace());
    BRAND_PHRASES.contains(&phrase)
}

fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}')
}
