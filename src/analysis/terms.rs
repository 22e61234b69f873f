//! Hashtag and caption keyword rankings.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use crate::analysis::filter::NicheFilter;
use crate::analysis::frequency::FrequencyTable;
use crate::models::{TermCount, VideoRecord};
use crate::stopwords::StopWords;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Trimmed, lowercased form used for every counted term.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Pool every hashtag of every record into one count and keep the top `k`.
#[instrument(level = "debug", skip_all, fields(records = records.len(), k = k))]
pub fn rank_hashtags(records: &[&VideoRecord], k: usize) -> Vec<TermCount> {
    let table: FrequencyTable = records
        .iter()
        .flat_map(|r| r.hashtags.iter())
        .map(|tag| normalize_term(tag.trim_start_matches('#')))
        .filter(|tag| !tag.is_empty())
        .collect();
    debug!(distinct = table.len(), "Counted hashtags");
    table.top(k)
}

/// Options for caption keyword extraction.
#[derive(Debug, Clone, Copy)]
pub struct KeywordOptions<'a> {
    pub stop_words: &'a StopWords,
    pub niche: &'a NicheFilter,
    /// Minimum token length in characters.
    pub min_len: usize,
}

impl KeywordOptions<'_> {
    fn keeps(&self, token: &str) -> bool {
        token.chars().count() >= self.min_len
            && !token.chars().all(|c| c.is_numeric())
            && !self.stop_words.contains(token)
            && !self.niche.is_keyword(token)
    }
}

/// Rank caption words across all records, excluding stop words, the niche
/// keywords themselves, numbers and short tokens.
#[instrument(level = "debug", skip_all, fields(records = records.len(), k = k))]
pub fn rank_keywords(records: &[&VideoRecord], options: KeywordOptions<'_>, k: usize) -> Vec<TermCount> {
    let text = records
        .iter()
        .map(|r| r.caption.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let table: FrequencyTable = WORD
        .find_iter(&text)
        .map(|m| m.as_str())
        .filter(|token| options.keeps(token))
        .collect();
    debug!(distinct = table.len(), "Counted caption keywords");
    table.top(k)
}
