// src/analysis/tags.rs
use serde::Serialize;

use super::playlist::{assign_playlist, FALLBACK_PLAYLIST};
use super::text::{content_words, FreqDist};

pub const DEFAULT_MAX_TAGS: usize = 15;

/// YouTube rejects tag lists longer than 500 characters in total.
pub const TAG_CHAR_BUDGET: usize = 500;

const MIN_TAG_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagAnalysis {
    pub keywords: Vec<KeywordCount>,
    pub suggested_tags: Vec<String>,
    pub characters_used: usize,
    pub character_budget: usize,
}

fn keyword_dist(content: &str) -> FreqDist {
    content_words(content)
        .into_iter()
        .filter(|word| word.chars().count() >= MIN_TAG_LEN)
        .filter(|word| !word.chars().all(|c| c.is_ascii_digit()))
        .collect()
}

pub fn tags_char_len(tags: &[String]) -> usize {
    tags.iter().map(|tag| tag.chars().count()).sum::<usize>() + tags.len().saturating_sub(1)
}

/// The assigned playlist name (when the content matches one), then the
/// most frequent keywords. Deduplicated and capped by count and by the
/// 500-character budget (tags joined by commas).
pub fn generate_tags(content: &str, max_tags: usize) -> Vec<String> {
    let dist = keyword_dist(content);

    let mut candidates: Vec<String> = dist
        .most_common(dist.unique())
        .into_iter()
        .map(|(word, _)| word)
        .collect();

    let playlist = assign_playlist(content).playlist;
    if playlist != FALLBACK_PLAYLIST {
        candidates.insert(0, playlist);
    }

    let mut tags: Vec<String> = Vec::new();
    let mut used = 0;
    for candidate in candidates {
        if tags.len() >= max_tags {
            break;
        }
        if tags.contains(&candidate) {
            continue;
        }
        // every tag after the first costs a separating comma
        let cost = candidate.chars().count() + usize::from(!tags.is_empty());
        if used + cost > TAG_CHAR_BUDGET {
            break;
        }
        used += cost;
        tags.push(candidate);
    }
    tags
}

pub fn analyze_tags(content: &str) -> TagAnalysis {
    let dist = keyword_dist(content);
    let keywords = dist
        .most_common(25)
        .into_iter()
        .map(|(keyword, count)| KeywordCount { keyword, count })
        .collect();
    let suggested_tags = generate_tags(content, DEFAULT_MAX_TAGS);
    let characters_used = tags_char_len(&suggested_tags);

    TagAnalysis {
        keywords,
        suggested_tags,
        characters_used,
        character_budget: TAG_CHAR_BUDGET,
    }
}
