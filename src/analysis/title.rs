// src/analysis/title.rs
use serde::Serialize;

use super::text::{content_words, FreqDist};

const TITLE_WORDS: usize = 3;

const POWER_WORDS: &[&str] = &[
    "how", "why", "best", "guide", "ultimate", "easy", "secret", "new", "complete", "tips",
    "free", "proven", "beginner", "beginners", "tutorial",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleScore {
    pub score: u32,
    pub length: usize,
    pub keyword_hits: usize,
}

/// Title made of the three most frequent non-stopword words, capitalized
/// like a sentence ("Rust async tokio").
pub fn generate_title(content: &str) -> String {
    let dist: FreqDist = content_words(content).into_iter().collect();
    let words: Vec<String> = dist
        .most_common(TITLE_WORDS)
        .into_iter()
        .map(|(word, _)| word)
        .collect();
    capitalize(&words.join(" "))
}

/// First character uppercased, the rest lowercased.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Score a title from 0 to 100.
///
/// * length: 40 points inside 40..=70 characters, 20 inside 20..=100
/// * keyword coverage: up to 30 points for the share of `keywords` present
/// * a digit: 10 points
/// * a power word ("how", "guide", "tips", ...): 20 points
pub fn score_title(title: &str, keywords: &[String]) -> TitleScore {
    let trimmed = title.trim();
    let length = trimmed.chars().count();
    if length == 0 {
        return TitleScore { score: 0, length: 0, keyword_hits: 0 };
    }

    let lowered = trimmed.to_lowercase();
    let mut score = match length {
        40..=70 => 40,
        20..=100 => 20,
        _ => 5,
    };

    let keyword_hits = keywords
        .iter()
        .filter(|keyword| !keyword.is_empty() && lowered.contains(keyword.as_str()))
        .count();
    if !keywords.is_empty() {
        score += (30 * keyword_hits / keywords.len()) as u32;
    }

    if trimmed.chars().any(|c| c.is_ascii_digit()) {
        score += 10;
    }

    let title_words = super::text::tokenize(trimmed);
    if title_words.iter().any(|word| POWER_WORDS.contains(&word.as_str())) {
        score += 20;
    }

    TitleScore {
        score: score.min(100),
        length,
        keyword_hits,
    }
}
