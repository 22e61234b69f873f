//! Command-line interface definitions for Niche Trends.
//!
//! Every option can also come from the environment or a YAML config file.
//! Precedence: command line / environment, then `--config`, then defaults.

use clap::Parser;

use crate::config::{PipelineConfig, StopWordSource};
use crate::errors::PipelineError;

/// Command-line arguments for the Niche Trends application.
///
/// # Examples
///
/// ```sh
/// # Analyze the default dataset for the barbershop niche
/// niche_trends
///
/// # Different file and keywords, top 20, with a JSON copy of the report
/// niche_trends -i feed.csv -k tattoo -k ink -t 20 -j ./reports
///
/// # Ask the configured LLM for content ideas
/// niche_trends --recommend --ai-template niche_ideas
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// CSV file produced by the scraper
    #[arg(short, long, env = "NICHE_INPUT")]
    pub input: Option<String>,

    /// Niche keyword; repeat or comma-separate for several
    #[arg(short, long = "keyword", env = "NICHE_KEYWORDS", value_delimiter = ',')]
    pub keywords: Vec<String>,

    /// Entries kept per ranked category
    #[arg(short, long)]
    pub top_k: Option<usize>,

    /// Shortest caption keyword to keep, in characters
    #[arg(long)]
    pub min_keyword_len: Option<usize>,

    /// Stop words: "builtin", "none", or a path to a word list
    #[arg(long)]
    pub stop_words: Option<String>,

    /// Also match niche keywords against hashtags
    #[arg(long)]
    pub match_hashtags: bool,

    /// Optional path to a YAML pipeline config
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output directory for a JSON copy of the report
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Ask the LLM for content ideas based on the top terms
    #[arg(long)]
    pub recommend: bool,

    /// Path to the LLM config.yaml (defaults to the awful_aj config dir)
    #[arg(long, env = "NICHE_AI_CONFIG")]
    pub ai_config: Option<String>,

    /// Chat template used for recommendations
    #[arg(long, default_value = "niche_ideas")]
    pub ai_template: String,
}

impl Cli {
    /// Build the pipeline config: YAML file (if any), then flag overrides.
    pub fn pipeline_config(&self) -> Result<PipelineConfig, PipelineError> {
        let base = match &self.config {
            Some(path) => PipelineConfig::from_yaml_file(path)?,
            None => PipelineConfig::default(),
        };
        let config = self.apply(base);
        config.validate()?;
        Ok(config)
    }

    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(input) = &self.input {
            config.input_path = input.clone();
        }
        if !self.keywords.is_empty() {
            config.niche_keywords = self.keywords.clone();
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(len) = self.min_keyword_len {
            config.min_keyword_len = len;
        }
        if let Some(source) = &self.stop_words {
            config.stop_words = StopWordSource::from(source.clone());
        }
        if self.match_hashtags {
            config.match_hashtags = true;
        }
        config
    }
}
