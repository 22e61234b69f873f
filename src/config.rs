//! Pipeline configuration.
//!
//! A [`PipelineConfig`] is assembled once per run, from defaults, an optional
//! YAML file and command-line overrides (see [`crate::cli::Cli::apply`]), and
//! passed explicitly into [`crate::pipeline::run`].
//!
//! # YAML example
//!
//! ```yaml
//! input_path: tiktok_recommendations.csv
//! niche_keywords: [barber, fade, taper]
//! top_k: 20
//! min_keyword_len: 3
//! stop_words: builtin        # or "none", or a path to a word list
//! ```

use std::fs;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::errors::PipelineError;

/// Where the keyword analysis gets its stop words from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StopWordSource {
    /// Embedded English list.
    Builtin,
    /// No stop words at all.
    None,
    /// A file with one word per line.
    File(String),
}

impl From<String> for StopWordSource {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "builtin" | "english" => StopWordSource::Builtin,
            "none" | "" => StopWordSource::None,
            _ => StopWordSource::File(value.trim().to_string()),
        }
    }
}

impl From<StopWordSource> for String {
    fn from(value: StopWordSource) -> Self {
        match value {
            StopWordSource::Builtin => "builtin".to_string(),
            StopWordSource::None => "none".to_string(),
            StopWordSource::File(path) => path,
        }
    }
}

/// Every knob of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// CSV produced by the scraper.
    pub input_path: String,
    /// Keywords selecting the niche; matched as case-insensitive substrings.
    pub niche_keywords: Vec<String>,
    /// Also match keywords against hashtags, not only captions.
    pub match_hashtags: bool,
    /// Entries kept per ranked category.
    pub top_k: usize,
    /// Shortest caption token (in characters) kept by keyword analysis.
    pub min_keyword_len: usize,
    pub stop_words: StopWordSource,
    /// How many hashtags and keywords are handed to the recommender.
    pub recommendation_terms: usize,
    /// Size of the most-viewed leaderboard.
    pub top_videos: usize,
    /// Caption excerpt length on the leaderboard, in characters.
    pub excerpt_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: "tiktok_recommendations.csv".to_string(),
            niche_keywords: ["barber", "barbershop", "haircut", "fade", "taper", "hair"]
                .into_iter()
                .map(String::from)
                .collect(),
            match_hashtags: false,
            top_k: 15,
            min_keyword_len: 3,
            stop_words: StopWordSource::Builtin,
            recommendation_terms: 10,
            top_videos: 5,
            excerpt_len: 80,
        }
    }
}

impl PipelineConfig {
    /// Read a YAML config file; missing keys take their defaults.
    #[instrument(level = "info")]
    pub fn from_yaml_file(path: &str) -> Result<Self, PipelineError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        info!(%path, "Loaded pipeline configuration");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, PipelineError> {
        serde_yaml::from_str(text).map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Reject settings no run could use.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.top_k == 0 {
            return Err(PipelineError::Config("top_k must be at least 1".to_string()));
        }
        if self.min_keyword_len == 0 {
            return Err(PipelineError::Config(
                "min_keyword_len must be at least 1".to_string(),
            ));
        }
        if self.input_path.trim().is_empty() {
            return Err(PipelineError::Config("input_path is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.top_k, 15);
        assert_eq!(config.min_keyword_len, 3);
        assert_eq!(config.recommendation_terms, 10);
        assert!(!config.match_hashtags);
        assert!(config.niche_keywords.contains(&"barber".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = PipelineConfig::from_yaml_str(
            "niche_keywords: [tattoo, ink]\ntop_k: 20\nstop_words: none\n",
        )
        .unwrap();
        assert_eq!(config.niche_keywords, vec!["tattoo", "ink"]);
        assert_eq!(config.top_k, 20);
        assert_eq!(config.stop_words, StopWordSource::None);
        assert_eq!(config.min_keyword_len, 3);
        assert_eq!(config.input_path, "tiktok_recommendations.csv");
    }

    #[test]
    fn test_stop_word_source_from_string() {
        assert_eq!(StopWordSource::from("builtin".to_string()), StopWordSource::Builtin);
        assert_eq!(StopWordSource::from("NONE".to_string()), StopWordSource::None);
        assert_eq!(
            StopWordSource::from("lists/en.txt".to_string()),
            StopWordSource::File("lists/en.txt".to_string())
        );
        assert_eq!(String::from(StopWordSource::Builtin), "builtin");
    }

    #[test]
    fn test_bad_yaml_is_config_error() {
        let err = PipelineConfig::from_yaml_str("top_k: [not, a, number]").unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let config = PipelineConfig {
            top_k: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));

        let config = PipelineConfig {
            min_keyword_len: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
