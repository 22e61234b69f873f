//! The niche analysis pipeline: load, filter, rank, assemble.
//!
//! [`analyze`] is the synchronous single pass over an in-memory dataset.
//! [`run`] adds loading from disk and the optional recommendation step, which
//! can only ever degrade to a placeholder string, never fail the run.

use std::path::Path;

use chrono::Local;
use tracing::{info, instrument, warn};

use crate::analysis::aggregates::{average_duration, rank_sounds, top_viewed};
use crate::analysis::filter::{filter_records, NicheFilter};
use crate::analysis::terms::{rank_hashtags, rank_keywords, KeywordOptions};
use crate::api::Recommender;
use crate::config::PipelineConfig;
use crate::dataset::load_records;
use crate::errors::PipelineError;
use crate::models::{NicheReport, VideoRecord};
use crate::stopwords::StopWords;

/// Placeholder prefix used whenever recommendations could not be produced.
pub const RECOMMENDATIONS_UNAVAILABLE: &str = "Recommendations unavailable";

/// Filter `records` to the configured niche and compute every ranking.
///
/// The `recommendations` field is left as a placeholder; [`run`] fills it.
///
/// # Errors
///
/// [`PipelineError::NoMatches`] when the filter selects nothing, including
/// when no usable keyword was configured.
#[instrument(level = "info", skip_all, fields(records = records.len()))]
pub fn analyze(
    records: &[VideoRecord],
    config: &PipelineConfig,
    stop_words: &StopWords,
) -> Result<NicheReport, PipelineError> {
    config.validate()?;
    let niche = NicheFilter::new(&config.niche_keywords).with_hashtags(config.match_hashtags);
    let matched = filter_records(records, &niche);
    if matched.is_empty() {
        return Err(PipelineError::NoMatches {
            keywords: niche.keywords().to_vec(),
        });
    }
    info!(
        total = records.len(),
        matched = matched.len(),
        keywords = ?niche.keywords(),
        "Filtered records to niche"
    );

    let keyword_options = KeywordOptions {
        stop_words,
        niche: &niche,
        min_len: config.min_keyword_len,
    };

    Ok(NicheReport {
        generated_at: Local::now(),
        input_path: config.input_path.clone(),
        niche_keywords: niche.keywords().to_vec(),
        total_records: records.len(),
        matched_count: matched.len(),
        top_hashtags: rank_hashtags(&matched, config.top_k),
        top_keywords: rank_keywords(&matched, keyword_options, config.top_k),
        top_sounds: rank_sounds(&matched, config.top_k),
        average_duration_secs: average_duration(&matched),
        top_videos: top_viewed(&matched, config.top_videos, config.excerpt_len),
        recommendations: format!("{RECOMMENDATIONS_UNAVAILABLE}: not requested"),
    })
}

/// Ask `recommender` for ideas from the report's leading terms.
///
/// Failures are logged and turned into a placeholder.
#[instrument(level = "info", skip_all, fields(terms = terms))]
pub async fn recommendations_for(report: &NicheReport, terms: usize, recommender: &impl Recommender) -> String {
    let hashtags = report.hashtag_terms(terms);
    let keywords = report.keyword_terms(terms);
    if hashtags.is_empty() && keywords.is_empty() {
        warn!("No ranked terms to base recommendations on");
        return format!("{RECOMMENDATIONS_UNAVAILABLE}: no hashtags or keywords were found");
    }

    match recommender.recommend(&hashtags, &keywords).await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Recommendation step failed; using placeholder");
            format!("{RECOMMENDATIONS_UNAVAILABLE}: {e}")
        }
    }
}

/// Run the whole pipeline for `config`.
///
/// # Errors
///
/// - [`PipelineError::DatasetNotFound`] when the input file is missing
/// - [`PipelineError::NoMatches`] when nothing in the dataset fits the niche
/// - [`PipelineError::Config`], [`PipelineError::Io`], [`PipelineError::Csv`]
///   for unusable settings or input
#[instrument(level = "info", skip_all, fields(input = %config.input_path))]
pub async fn run(config: &PipelineConfig, recommender: &impl Recommender) -> Result<NicheReport, PipelineError> {
    config.validate()?;
    let records = load_records(Path::new(&config.input_path))?;
    let stop_words = StopWords::load(&config.stop_words);

    let mut report = analyze(&records, config, &stop_words)?;
    report.recommendations = recommendations_for(&report, config.recommendation_terms, recommender).await;
    info!(matched = report.matched_count, "Niche report assembled");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Unconfigured;
    use crate::config::StopWordSource;
    use crate::dataset::read_records;
    use std::cell::RefCell;
    use std::error::Error;
    use std::fs;

    const SCENARIO: &str = "caption,hashtags,views\n\
        Great #barber fade today,\"barber,fade\",1.2M\n\
        cooking tutorial,food,50\n\
        Amazing BARBER transformation,\"Barber, style\",900K\n";

    /// Records every call and answers with a fixed text.
    #[derive(Default)]
    struct RecordingRecommender {
        calls: RefCell<Vec<(Vec<String>, Vec<String>)>>,
    }

    impl Recommender for RecordingRecommender {
        async fn recommend(&self, h: &[String], k: &[String]) -> Result<String, Box<dyn Error>> {
            self.calls.borrow_mut().push((h.to_vec(), k.to_vec()));
            Ok("Film a fade timelapse".to_string())
        }
    }

    fn barber_config(input_path: &str) -> PipelineConfig {
        PipelineConfig {
            input_path: input_path.to_string(),
            niche_keywords: vec!["barber".to_string()],
            ..Default::default()
        }
    }

    fn write_fixture(name: &str, body: &str) -> String {
        let path = std::env::temp_dir().join(format!("niche_trends_{}_{}.csv", name, std::process::id()));
        fs::write(&path, body).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_scenario_analysis() {
        let records = read_records(SCENARIO.as_bytes()).unwrap();
        let report = analyze(&records, &barber_config("mem"), &StopWords::english()).unwrap();

        assert_eq!(report.total_records, 3);
        assert_eq!(report.matched_count, 2);
        assert_eq!(report.top_hashtags[0].term, "barber");
        assert_eq!(report.top_hashtags[0].count, 2);
        assert_eq!(report.top_videos[0].views, "1.2M");
        assert_eq!(report.top_videos[0].views_count, 1_200_000);
        assert_eq!(report.top_videos[1].views, "900K");
        assert!(report.top_videos[0].caption_excerpt.starts_with("Great #barber"));
        assert!(report.top_sounds.is_empty());
        assert_eq!(report.average_duration_secs, None);
    }

    #[test]
    fn test_keywords_never_echo_niche_or_short_tokens() {
        let records = read_records(SCENARIO.as_bytes()).unwrap();
        let report = analyze(&records, &barber_config("mem"), &StopWords::english()).unwrap();
        let terms: Vec<_> = report.top_keywords.iter().map(|t| t.term.as_str()).collect();

        assert_eq!(terms, vec!["great", "fade", "today", "amazing", "transformation"]);
        for term in terms {
            assert_ne!(term, "barber");
            assert!(term.chars().count() >= 3);
        }
    }

    #[test]
    fn test_empty_keywords_is_no_matches() {
        let records = read_records(SCENARIO.as_bytes()).unwrap();
        let config = PipelineConfig {
            niche_keywords: vec![],
            ..Default::default()
        };
        let err = analyze(&records, &config, &StopWords::default()).unwrap_err();
        match err {
            PipelineError::NoMatches { keywords } => assert!(keywords.is_empty()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_no_matching_records_is_no_matches() {
        let records = read_records(SCENARIO.as_bytes()).unwrap();
        let config = PipelineConfig {
            niche_keywords: vec!["tattoo".to_string()],
            ..Default::default()
        };
        let err = analyze(&records, &config, &StopWords::default()).unwrap_err();
        assert!(matches!(err, PipelineError::NoMatches { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_hashtag_matching_widens_filter() {
        let records = read_records(SCENARIO.as_bytes()).unwrap();
        let mut config = barber_config("mem");
        config.niche_keywords = vec!["food".to_string()];
        assert!(analyze(&records, &config, &StopWords::default()).is_err());

        config.match_hashtags = true;
        let report = analyze(&records, &config, &StopWords::default()).unwrap();
        assert_eq!(report.matched_count, 1);
    }

    #[test]
    fn test_records_without_caption_still_count_for_aggregates() {
        let csv = "caption,hashtags,sound,duration\n\
                   barber cut,,Beat A,1:00\n\
                   ,barber,Beat A,0:30\n";
        let records = read_records(csv.as_bytes()).unwrap();
        let mut config = barber_config("mem");
        config.match_hashtags = true;
        let report = analyze(&records, &config, &StopWords::default()).unwrap();
        assert_eq!(report.matched_count, 2);
        assert_eq!(report.top_sounds[0].term, "beat a");
        assert_eq!(report.top_sounds[0].count, 2);
        assert_eq!(report.average_duration_secs, Some(45.0));
    }

    #[tokio::test]
    async fn test_run_end_to_end_with_recommender() {
        let path = write_fixture("e2e", SCENARIO);
        let recommender = RecordingRecommender::default();
        let report = run(&barber_config(&path), &recommender).await.unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(report.matched_count, 2);
        assert_eq!(report.recommendations, "Film a fade timelapse");
        let calls = recommender.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, vec!["barber", "fade", "style"]);
        assert_eq!(calls[0].1[0], "great");
    }

    #[tokio::test]
    async fn test_run_with_unavailable_recommender_still_reports() {
        let path = write_fixture("unavailable", SCENARIO);
        let report = run(&barber_config(&path), &Unconfigured::new("no API key"))
            .await
            .unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(report.matched_count, 2);
        assert!(report.recommendations.starts_with(RECOMMENDATIONS_UNAVAILABLE));
        assert!(report.recommendations.contains("no API key"));
    }

    #[tokio::test]
    async fn test_run_missing_dataset() {
        let config = barber_config("/nonexistent/niche_trends/feed.csv");
        let err = run(&config, &Unconfigured::new("off")).await.unwrap_err();
        assert!(matches!(err, PipelineError::DatasetNotFound { .. }));
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let path = write_fixture("idempotent", SCENARIO);
        let mut config = barber_config(&path);
        config.stop_words = StopWordSource::Builtin;
        let first = run(&config, &Unconfigured::new("off")).await.unwrap();
        let second = run(&config, &Unconfigured::new("off")).await.unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(first.top_hashtags, second.top_hashtags);
        assert_eq!(first.top_keywords, second.top_keywords);
        assert_eq!(first.top_sounds, second.top_sounds);
        assert_eq!(first.top_videos, second.top_videos);
        assert_eq!(first.average_duration_secs, second.average_duration_secs);
    }

    #[tokio::test]
    async fn test_recommendations_skipped_without_terms() {
        let csv = "caption\nbarber\n";
        let records = read_records(csv.as_bytes()).unwrap();
        let report = analyze(&records, &barber_config("mem"), &StopWords::default()).unwrap();
        let recommender = RecordingRecommender::default();
        let text = recommendations_for(&report, 10, &recommender).await;
        assert!(text.starts_with(RECOMMENDATIONS_UNAVAILABLE));
        assert!(recommender.calls.borrow().is_empty());
    }
}
