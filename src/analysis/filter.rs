//! Niche selection by keyword match.

use itertools::Itertools;

use crate::models::VideoRecord;

/// Keyword set selecting the niche.
///
/// Keywords are trimmed, lowercased and de-duplicated on construction, and
/// empty ones are dropped. An empty filter matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NicheFilter {
    keywords: Vec<String>,
    match_hashtags: bool,
}

impl NicheFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .unique()
            .collect();
        Self {
            keywords,
            match_hashtags: false,
        }
    }

    /// Also accept records whose hashtags contain a keyword.
    pub fn with_hashtags(mut self, match_hashtags: bool) -> Self {
        self.match_hashtags = match_hashtags;
        self
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_keyword(&self, token: &str) -> bool {
        self.keywords.iter().any(|k| k == token)
    }

    pub fn matches(&self, record: &VideoRecord) -> bool {
        let caption = record.caption.to_lowercase();
        if self.keywords.iter().any(|k| caption.contains(k.as_str())) {
            return true;
        }
        self.match_hashtags
            && record.hashtags.iter().any(|tag| {
                let tag = tag.to_lowercase();
                self.keywords.iter().any(|k| tag.contains(k.as_str()))
            })
    }
}

/// Records matching `filter`, in their original order.
pub fn filter_records<'a>(records: &'a [VideoRecord], filter: &NicheFilter) -> Vec<&'a VideoRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}
