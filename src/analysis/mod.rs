// src/analysis/mod.rs
//
// Metadata heuristics: titles, descriptions, playlists, tags, categories,
// language. Every function here is pure and never fails; empty or
// unmatched input degrades to a default value.

pub mod category;
pub mod description;
pub mod language;
pub mod playlist;
pub mod tags;
pub mod text;
pub mod title;

use serde::Serialize;

pub use category::{suggest_category, CategorySuggestion};
pub use description::{enhance_description, SocialLinks};
pub use language::{detect_language, LanguageGuess};
pub use playlist::{assign_playlist, score_playlists, PlaylistAssignment, PlaylistScore};
pub use tags::{analyze_tags, generate_tags, KeywordCount, TagAnalysis, DEFAULT_MAX_TAGS};
pub use title::{generate_title, score_title, TitleScore};

const WORDS_PER_MINUTE: usize = 200;
const TOP_KEYWORDS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct ContentAnalysis {
    pub word_count: usize,
    pub unique_words: usize,
    pub sentence_count: usize,
    pub avg_sentence_length: f64,
    pub reading_time_minutes: usize,
    pub top_keywords: Vec<KeywordCount>,
    pub suggested_title: String,
    pub title_score: TitleScore,
    pub playlist: PlaylistAssignment,
    pub category: CategorySuggestion,
    pub language: LanguageGuess,
    pub tags: Vec<String>,
}

pub fn reading_time_minutes(word_count: usize) -> usize {
    if word_count == 0 {
        0
    } else {
        word_count.div_ceil(WORDS_PER_MINUTE)
    }
}

pub fn analyze_content(content: &str) -> ContentAnalysis {
    let words = text::tokenize(content);
    let word_count = words.len();
    let unique_words = words.iter().collect::<std::collections::HashSet<_>>().len();
    let sentence_count = text::sentence_count(content);
    let avg_sentence_length = if sentence_count == 0 {
        0.0
    } else {
        word_count as f64 / sentence_count as f64
    };

    let dist: text::FreqDist = text::content_words(content).into_iter().collect();
    let top_keywords: Vec<KeywordCount> = dist
        .most_common(TOP_KEYWORDS)
        .into_iter()
        .map(|(keyword, count)| KeywordCount { keyword, count })
        .collect();

    let suggested_title = generate_title(content);
    let keyword_list: Vec<String> = top_keywords.iter().map(|k| k.keyword.clone()).collect();
    let title_score = score_title(&suggested_title, &keyword_list);

    ContentAnalysis {
        word_count,
        unique_words,
        sentence_count,
        avg_sentence_length,
        reading_time_minutes: reading_time_minutes(word_count),
        top_keywords,
        suggested_title,
        title_score,
        playlist: assign_playlist(content),
        category: suggest_category(content),
        language: detect_language(content),
        tags: generate_tags(content, DEFAULT_MAX_TAGS),
    }
}
