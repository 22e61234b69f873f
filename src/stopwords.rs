//! Stop-word sets for caption keyword analysis.
//!
//! The set is resolved from a [`StopWordSource`]. A list file that cannot be
//! read degrades to an empty set with a warning; keyword analysis then simply
//! keeps common words instead of failing.

use std::collections::HashSet;
use std::fs;

use tracing::{info, instrument, warn};

use crate::config::StopWordSource;

/// Common English words, lowercase.
const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "ain", "all", "am", "an", "and", "any",
    "are", "aren", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "couldn", "d", "did", "didn", "do", "does", "doesn", "doing",
    "don", "down", "during", "each", "few", "for", "from", "further", "had", "hadn", "has",
    "hasn", "have", "haven", "having", "he", "her", "here", "hers", "herself", "him", "himself",
    "his", "how", "i", "if", "in", "into", "is", "isn", "it", "its", "itself", "just", "ll", "m",
    "ma", "me", "mightn", "more", "most", "mustn", "my", "myself", "needn", "no", "nor", "not",
    "now", "o", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves",
    "out", "over", "own", "re", "s", "same", "shan", "she", "should", "shouldn", "so", "some",
    "such", "t", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "ve", "very", "was", "wasn", "we", "were", "weren", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "won", "wouldn", "y", "you", "your", "yours",
    "yourself", "yourselves",
];

/// A lowercase stop-word set.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The embedded English list.
    pub fn english() -> Self {
        Self::from_words(ENGLISH.iter().copied())
    }

    /// Build a set from arbitrary words; they are trimmed and lowercased.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Resolve a configured source, falling back to an empty set when a list
    /// file is unavailable.
    #[instrument(level = "info")]
    pub fn load(source: &StopWordSource) -> Self {
        let words = match source {
            StopWordSource::Builtin => Self::english(),
            StopWordSource::None => Self::default(),
            StopWordSource::File(path) => match fs::read_to_string(path) {
                Ok(text) => Self::from_words(
                    text.lines()
                        .map(str::trim)
                        .filter(|l| !l.starts_with('#')),
                ),
                Err(e) => {
                    warn!(%path, error = %e, "Stop-word list unavailable; continuing without stop words");
                    Self::default()
                }
            },
        };
        info!(count = words.len(), "Stop words ready");
        words
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
