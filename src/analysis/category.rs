// src/analysis/category.rs
use serde::Serialize;

use super::text::tokenize;

pub const DEFAULT_CATEGORY_ID: &str = "22";
pub const DEFAULT_CATEGORY_NAME: &str = "People & Blogs";

/// YouTube video categories (id, name, keywords). Order breaks ties.
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "28",
        "Science & Technology",
        &["technology", "tech", "coding", "programming", "software", "science", "computer", "ai", "robot", "gadget"],
    ),
    (
        "27",
        "Education",
        &["learn", "learning", "study", "school", "lesson", "course", "tutorial", "explained", "university", "teach"],
    ),
    (
        "26",
        "Howto & Style",
        &["howto", "diy", "fashion", "style", "makeup", "recipe", "cooking", "craft", "beauty", "tips"],
    ),
    ("10", "Music", &["music", "song", "album", "guitar", "piano", "concert", "band", "singer", "lyrics"]),
    ("20", "Gaming", &["game", "gaming", "gameplay", "playthrough", "minecraft", "esports", "console", "level"]),
    ("17", "Sports", &["sport", "sports", "football", "soccer", "basketball", "workout", "fitness", "match", "training"]),
    ("24", "Entertainment", &["movie", "film", "comedy", "funny", "prank", "celebrity", "show", "trailer", "reaction"]),
    ("19", "Travel & Events", &["travel", "trip", "vacation", "tour", "flight", "hotel", "festival", "destination"]),
    ("25", "News & Politics", &["news", "politics", "election", "government", "policy", "breaking", "report"]),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySuggestion {
    pub category_id: String,
    pub category_name: String,
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
}

impl CategorySuggestion {
    fn fallback() -> Self {
        Self {
            category_id: DEFAULT_CATEGORY_ID.to_string(),
            category_name: DEFAULT_CATEGORY_NAME.to_string(),
            confidence: 0.0,
            matched_keywords: Vec::new(),
        }
    }
}

/// Look up the YouTube category name for an id, if it is one we know.
pub fn category_name(category_id: &str) -> Option<&'static str> {
    if category_id == DEFAULT_CATEGORY_ID {
        return Some(DEFAULT_CATEGORY_NAME);
    }
    CATEGORIES
        .iter()
        .find(|(id, _, _)| *id == category_id)
        .map(|(_, name, _)| *name)
}

/// Count keyword hits per category over whole tokens. The winner's share
/// of all hits is the confidence.
pub fn suggest_category(content: &str) -> CategorySuggestion {
    let tokens = tokenize(content);
    if tokens.is_empty() {
        return CategorySuggestion::fallback();
    }

    let mut best: Option<(usize, Vec<String>, usize)> = None;
    let mut total_hits = 0;

    for (idx, (_, _, keywords)) in CATEGORIES.iter().enumerate() {
        let mut hits = 0;
        let mut matched: Vec<String> = Vec::new();
        for token in &tokens {
            if keywords.contains(&token.as_str()) {
                hits += 1;
                if !matched.contains(token) {
                    matched.push(token.clone());
                }
            }
        }
        total_hits += hits;
        if hits > best.as_ref().map(|(_, _, h)| *h).unwrap_or(0) {
            best = Some((idx, matched, hits));
        }
    }

    match best {
        Some((idx, matched_keywords, hits)) => {
            let (id, name, _) = CATEGORIES[idx];
            CategorySuggestion {
                category_id: id.to_string(),
                category_name: name.to_string(),
                confidence: hits as f64 / total_hits as f64,
                matched_keywords,
            }
        }
        None => CategorySuggestion::fallback(),
    }
}
