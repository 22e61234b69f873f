//! Data models for scraped video records and the assembled niche report.
//!
//! - [`VideoRecord`]: one row of the scraper's CSV output
//! - [`TermCount`]: a ranked entry from a frequency table
//! - [`TopVideo`]: a record on the engagement leaderboard
//! - [`NicheReport`]: everything one pipeline run produces

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Sound label the scraper writes when a clip's audio could not be attributed.
pub const UNKNOWN_SOUND: &str = "Unknown Sound";

/// A single scraped short-video item.
///
/// Every field except `caption` is independently optional. A record with an
/// empty caption still takes part in the sound and duration aggregates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Caption text as scraped; empty when the column was missing.
    pub caption: String,
    /// Tags without the leading `#`, in scraped order and case.
    pub hashtags: Vec<String>,
    /// Sound label, possibly [`UNKNOWN_SOUND`].
    pub sound: Option<String>,
    /// Duration in `M:SS` form.
    pub duration: Option<String>,
    /// View count in shorthand form (`"1.2M"`, `"340K"`, `"500"`).
    pub views: Option<String>,
    /// Like count in shorthand form.
    pub likes: Option<String>,
}

impl VideoRecord {
    /// Sound label if it can be attributed to something.
    pub fn known_sound(&self) -> Option<&str> {
        self.sound
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(UNKNOWN_SOUND))
    }
}

/// A normalized term and how many times it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// One entry of the most-viewed leaderboard.
///
/// `views` and `likes` keep the original display strings; the `_count`
/// fields hold the parsed values used for ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopVideo {
    pub rank: usize,
    pub views: String,
    pub likes: String,
    pub views_count: u64,
    pub likes_count: u64,
    pub caption_excerpt: String,
}

/// The structured result of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NicheReport {
    /// When the report was assembled.
    pub generated_at: DateTime<Local>,
    /// Dataset the report was computed from.
    pub input_path: String,
    /// Normalized niche keywords used by the filter.
    pub niche_keywords: Vec<String>,
    /// Number of records in the dataset.
    pub total_records: usize,
    /// Number of records that matched the niche filter.
    pub matched_count: usize,
    pub top_hashtags: Vec<TermCount>,
    pub top_keywords: Vec<TermCount>,
    pub top_sounds: Vec<TermCount>,
    /// Mean of the usable (non-zero) durations, in seconds.
    pub average_duration_secs: Option<f64>,
    pub top_videos: Vec<TopVideo>,
    /// Free-text ideas from the recommendation service, or a placeholder.
    pub recommendations: String,
}

impl NicheReport {
    /// Leading `n` hashtag terms, in rank order.
    pub fn hashtag_terms(&self, n: usize) -> Vec<String> {
        self.top_hashtags.iter().take(n).map(|t| t.term.clone()).collect()
    }

    /// Leading `n` caption keyword terms, in rank order.
    pub fn keyword_terms(&self, n: usize) -> Vec<String> {
        self.top_keywords.iter().take(n).map(|t| t.term.clone()).collect()
    }
}
