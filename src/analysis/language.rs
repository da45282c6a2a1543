// src/analysis/language.rs
//
// Stopword-profile language guess. Each profile lists very frequent
// function words; the language whose profile covers the most tokens wins.

use serde::Serialize;

use super::text::tokenize;

pub const UNKNOWN_LANGUAGE: &str = "unknown";

const PROFILES: &[(&str, &str, &[&str])] = &[
    (
        "en",
        "English",
        &["the", "and", "is", "are", "was", "to", "of", "in", "that", "it", "you", "this", "with", "for", "have", "not", "be", "on", "we", "they"],
    ),
    (
        "es",
        "Spanish",
        &["el", "la", "los", "las", "y", "es", "que", "de", "en", "un", "una", "por", "con", "para", "no", "se", "del", "al", "muy", "pero"],
    ),
    (
        "fr",
        "French",
        &["le", "la", "les", "et", "est", "que", "de", "des", "un", "une", "pour", "avec", "pas", "dans", "ce", "qui", "sur", "nous", "vous", "je"],
    ),
    (
        "de",
        "German",
        &["der", "die", "das", "und", "ist", "nicht", "ein", "eine", "zu", "mit", "den", "von", "auf", "ich", "sie", "es", "wir", "auch", "sich", "dem"],
    ),
    (
        "it",
        "Italian",
        &["il", "lo", "gli", "e", "di", "che", "un", "una", "per", "con", "non", "sono", "della", "nel", "questo", "anche", "come", "mi", "ma", "ho"],
    ),
    (
        "pt",
        "Portuguese",
        &["o", "os", "as", "e", "de", "que", "um", "uma", "para", "com", "não", "do", "da", "em", "no", "na", "mas", "você", "muito", "são"],
    ),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageGuess {
    pub language: String,
    pub name: String,
    pub confidence: f64,
}

impl LanguageGuess {
    pub fn unknown() -> Self {
        Self {
            language: UNKNOWN_LANGUAGE.to_string(),
            name: "Unknown".to_string(),
            confidence: 0.0,
        }
    }
}

/// Confidence is the share of tokens found in the winning profile.
/// Ties keep profile order (English first).
pub fn detect_language(text: &str) -> LanguageGuess {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return LanguageGuess::unknown();
    }

    let mut best: Option<(&str, &str, usize)> = None;
    for (code, name, words) in PROFILES {
        let hits = tokens
            .iter()
            .filter(|token| words.contains(&token.as_str()))
            .count();
        if hits > best.map(|(_, _, h)| h).unwrap_or(0) {
            best = Some((code, name, hits));
        }
    }

    match best {
        Some((code, name, hits)) => LanguageGuess {
            language: code.to_string(),
            name: name.to_string(),
            confidence: hits as f64 / tokens.len() as f64,
        },
        None => LanguageGuess::unknown(),
    }
}
