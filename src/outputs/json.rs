//! JSON output of a [`NicheReport`].
//!
//! # Output Structure
//!
//! Reports are grouped by the date they were generated:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── niche_report_091512.json
//!     └── niche_report_183004.json
//! ```

use crate::models::NicheReport;
use crate::utils::ensure_writable_dir;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Path the report will be written to under `json_output_dir`.
pub fn report_path(report: &NicheReport, json_output_dir: &str) -> (String, String) {
    let dir = format!(
        "{}/{}",
        json_output_dir.trim_end_matches('/'),
        report.generated_at.format("%Y-%m-%d")
    );
    let file = format!("{}/niche_report_{}.json", dir, report.generated_at.format("%H%M%S"));
    (dir, file)
}

/// Write a [`NicheReport`] as pretty-printed JSON.
///
/// # Returns
///
/// The path of the written file, or an error if the directory is not
/// writable or the write fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_report(report: &NicheReport, json_output_dir: &str) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    let (full_json_dir, output_json_filename) = report_path(report, json_output_dir);

    info!(%full_json_dir, "Ensuring JSON directory exists");
    if let Err(e) = ensure_writable_dir(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "JSON dir is not writable");
        return Err(e);
    }

    info!(path = %output_json_filename, "Writing JSON");
    fs::write(&output_json_filename, json).await?;
    info!(path = %output_json_filename, "Wrote niche report");

    Ok(output_json_filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn report() -> NicheReport {
        NicheReport {
            generated_at: Local.with_ymd_and_hms(2025, 5, 6, 9, 15, 12).unwrap(),
            input_path: "feed.csv".to_string(),
            niche_keywords: vec!["barber".to_string()],
            total_records: 1,
            matched_count: 1,
            top_hashtags: vec![],
            top_keywords: vec![],
            top_sounds: vec![],
            average_duration_secs: None,
            top_videos: vec![],
            recommendations: String::new(),
        }
    }

    #[test]
    fn test_report_path() {
        let (dir, file) = report_path(&report(), "out/");
        assert_eq!(dir, "out/2025-05-06");
        assert_eq!(file, "out/2025-05-06/niche_report_091512.json");
    }

    #[tokio::test]
    async fn test_write_report() {
        let base = std::env::temp_dir().join(format!("niche_trends_json_{}", std::process::id()));
        let base = base.display().to_string();
        let path = write_report(&report(), &base).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let back: NicheReport = serde_json::from_str(&written).unwrap();
        assert_eq!(back.niche_keywords, vec!["barber"]);
        std::fs::remove_dir_all(&base).unwrap();
    }
}
