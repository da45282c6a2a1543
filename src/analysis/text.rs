// src/analysis/text.rs
//
// Tokenizer, stopwords and an insertion-ordered frequency table shared by
// every metadata heuristic.

use std::collections::{HashMap, HashSet};

lazy_static::lazy_static! {
    static ref ENGLISH_STOPWORDS: HashSet<&'static str> = [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your",
        "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she", "her",
        "hers", "herself", "it", "its", "itself", "they", "them", "their", "theirs",
        "themselves", "what", "which", "who", "whom", "this", "that", "these", "those",
        "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
        "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if",
        "or", "because", "as", "until", "while", "of", "at", "by", "for", "with",
        "about", "against", "between", "into", "through", "during", "before", "after",
        "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
        "under", "again", "further", "then", "once", "here", "there", "when", "where",
        "why", "how", "all", "any", "both", "each", "few", "more", "most", "other",
        "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too",
        "very", "s", "t", "can", "will", "just", "don", "should", "now", "d", "ll", "m",
        "o", "re", "ve", "y", "ain", "aren", "couldn", "didn", "doesn", "hadn", "hasn",
        "haven", "isn", "ma", "mightn", "mustn", "needn", "shan", "shouldn", "wasn",
        "weren", "won", "wouldn",
    ]
    .into_iter()
    .collect();
}

pub fn stopwords() -> &'static HashSet<&'static str> {
    &ENGLISH_STOPWORDS
}

pub fn is_stopword(word: &str) -> bool {
    ENGLISH_STOPWORDS.contains(word)
}

/// Lowercase the text and split it into alphanumeric tokens.
/// Punctuation and apostrophes act as separators ("don't" -> "don", "t").
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokens that are not English stopwords.
pub fn content_words(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|token| !is_stopword(token))
        .collect()
}

/// Sentence count by terminal punctuation; trailing text without a
/// terminator still counts as a sentence.
pub fn sentence_count(text: &str) -> usize {
    text.split(|c| matches!(c, '.' | '!' | '?'))
        .filter(|sentence| sentence.chars().any(char::is_alphanumeric))
        .count()
}

/// Word frequencies that remember first-occurrence order, so ties in
/// `most_common` resolve the same way on every run.
#[derive(Debug, Default, Clone)]
pub struct FreqDist {
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl FreqDist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, word: &str) {
        match self.index.get(word) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(word.to_string(), self.counts.len());
                self.counts.push((word.to_string(), 1));
            }
        }
    }

    pub fn get(&self, word: &str) -> usize {
        self.index
            .get(word)
            .map(|&slot| self.counts[slot].1)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    pub fn unique(&self) -> usize {
        self.counts.len()
    }

    pub fn most_common(&self, n: usize) -> Vec<(String, usize)> {
        let mut sorted = self.counts.clone();
        // stable sort keeps first-occurrence order among equal counts
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }
}

impl<S: AsRef<str>> FromIterator<S> for FreqDist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut dist = FreqDist::new();
        for word in iter {
            dist.add(word.as_ref());
        }
        dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_drops_punctuation() {
        assert_eq!(
            tokenize("Rust, Tokio & Axum!"),
            vec!["rust", "tokio", "axum"]
        );
        assert_eq!(tokenize("don't"), vec!["don", "t"]);
        assert!(tokenize("  ...  ").is_empty());
    }

    #[test]
    fn test_content_words_skip_stopwords() {
        assert_eq!(
            content_words("I love coding and programming"),
            vec!["love", "coding", "programming"]
        );
    }

    #[test]
    fn test_most_common_breaks_ties_by_first_occurrence() {
        let dist: FreqDist = ["beta", "alpha", "beta", "gamma", "alpha", "delta"]
            .into_iter()
            .collect();
        assert_eq!(
            dist.most_common(3),
            vec![
                ("beta".to_string(), 2),
                ("alpha".to_string(), 2),
                ("gamma".to_string(), 1)
            ]
        );
        assert_eq!(dist.total(), 6);
        assert_eq!(dist.unique(), 4);
        assert_eq!(dist.get("missing"), 0);
    }

    #[test]
    fn test_sentence_count() {
        assert_eq!(sentence_count("One. Two! Three? Four"), 4);
        assert_eq!(sentence_count("..."), 0);
        assert_eq!(sentence_count(""), 0);
    }
}
