//! Error taxonomy for the niche analysis pipeline.
//!
//! Two of the variants are normal alternate outcomes rather than faults:
//! [`PipelineError::DatasetNotFound`] and [`PipelineError::NoMatches`]. The
//! caller reports them with [`PipelineError::user_message`] and exits cleanly.

use std::io;

use thiserror::Error;

/// Errors surfaced by loading, filtering and configuring a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("dataset '{path}' was not found")]
    DatasetNotFound { path: String },
    #[error("no records matched niche keywords [{}]", .keywords.join(", "))]
    NoMatches { keywords: Vec<String> },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("recommendations unavailable: {0}")]
    RecommendationUnavailable(String),
}

impl PipelineError {
    /// True for outcomes the caller should report and move on from.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PipelineError::DatasetNotFound { .. } | PipelineError::NoMatches { .. }
        )
    }

    /// Friendly text for the console.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::DatasetNotFound { path } => format!(
                "The input file '{path}' was not found. Run the data-collection step first to generate it."
            ),
            PipelineError::NoMatches { keywords } if keywords.is_empty() => {
                "No niche keywords were given, so nothing can match. Pass at least one keyword."
                    .to_string()
            }
            PipelineError::NoMatches { keywords } => format!(
                "Nothing found for this niche ({}). Try different keywords or collect more data.",
                keywords.join(", ")
            ),
            other => other.to_string(),
        }
    }
}
