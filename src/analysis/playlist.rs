// src/analysis/playlist.rs
//
// Playlist assignment by keyword overlap against a fixed dictionary.
// Matching is substring-based on the lowercased text, so "learn" also
// hits "learning".

use serde::Serialize;

pub const FALLBACK_PLAYLIST: &str = "miscellaneous";

/// Dictionary order is the tie-break order.
pub const PLAYLISTS: &[(&str, &[&str])] = &[
    ("tech", &["technology", "coding", "programming"]),
    ("lifestyle", &["fashion", "food", "travel"]),
    ("education", &["learn", "study", "school"]),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistAssignment {
    pub playlist: String,
    pub keyword_count: usize,
    pub matched_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistScore {
    pub playlist: String,
    pub matched_keywords: Vec<String>,
    pub occurrences: usize,
    pub share: f64,
}

pub fn score_playlists(text: &str) -> Vec<PlaylistScore> {
    let lowered = text.to_lowercase();

    let mut scores: Vec<PlaylistScore> = PLAYLISTS
        .iter()
        .map(|(playlist, keywords)| {
            let mut matched = Vec::new();
            let mut occurrences = 0;
            for keyword in keywords.iter() {
                let hits = lowered.matches(keyword).count();
                if hits > 0 {
                    matched.push(keyword.to_string());
                    occurrences += hits;
                }
            }
            PlaylistScore {
                playlist: playlist.to_string(),
                matched_keywords: matched,
                occurrences,
                share: 0.0,
            }
        })
        .collect();

    let total: usize = scores.iter().map(|s| s.matched_keywords.len()).sum();
    if total > 0 {
        for score in &mut scores {
            score.share = score.matched_keywords.len() as f64 / total as f64;
        }
    }
    scores
}

/// Highest number of distinct matched keywords wins; ties keep
/// dictionary order; no matches falls back to "miscellaneous".
pub fn assign_playlist(transcription: &str) -> PlaylistAssignment {
    let mut best: Option<PlaylistScore> = None;
    for score in score_playlists(transcription) {
        let better = match &best {
            Some(current) => score.matched_keywords.len() > current.matched_keywords.len(),
            None => !score.matched_keywords.is_empty(),
        };
        if better {
            best = Some(score);
        }
    }

    match best {
        Some(score) => PlaylistAssignment {
            playlist: score.playlist,
            keyword_count: score.matched_keywords.len(),
            matched_keywords: score.matched_keywords,
        },
        None => PlaylistAssignment {
            playlist: FALLBACK_PLAYLIST.to_string(),
            keyword_count: 0,
            matched_keywords: Vec::new(),
        },
    }
}
