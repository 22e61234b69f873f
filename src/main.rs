//! # Niche Trends
//!
//! Analyzes a CSV of scraped short-video recommendations for one niche
//! (barbershop content by default) and reports what is trending there.
//!
//! ## Features
//!
//! - Filters records to the niche by case-insensitive keyword match
//! - Ranks hashtags, caption keywords and sounds
//! - Averages video duration and lists the most-viewed videos
//! - Optionally asks an OpenAI-compatible LLM for content ideas
//! - Prints the report and can write a JSON copy
//!
//! ## Usage
//!
//! ```sh
//! niche_trends -i tiktok_recommendations.csv -k barber -k fade -j ./reports
//! ```
//!
//! ## Architecture
//!
//! 1. **Loading**: read the scraper's CSV into video records
//! 2. **Filtering**: keep records whose caption mentions a niche keyword
//! 3. **Analysis**: rank and aggregate the matched records
//! 4. **Recommendations**: hand the top terms to the LLM (optional)
//! 5. **Output**: console report and JSON file

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod analysis;
mod api;
mod cli;
mod config;
mod dataset;
mod errors;
mod models;
mod outputs;
mod pipeline;
mod stopwords;
mod utils;

use api::{AwfulJadeRecommender, Unconfigured};
use cli::Cli;
use models::NicheReport;
use outputs::{console, json};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("niche_trends starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match args.pipeline_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    info!(
        input = %config.input_path,
        keywords = ?config.niche_keywords,
        top_k = config.top_k,
        "Configuration ready"
    );

    let result = if args.recommend {
        match AwfulJadeRecommender::load(args.ai_config.as_deref(), &args.ai_template).await {
            Ok(recommender) => pipeline::run(&config, &recommender).await,
            Err(e) => {
                warn!(error = %e, "LLM not configured; continuing without recommendations");
                let reason = format!("LLM configuration could not be loaded ({e})");
                pipeline::run(&config, &Unconfigured::new(reason)).await
            }
        }
    } else {
        pipeline::run(&config, &Unconfigured::new("not requested (pass --recommend)")).await
    };

    match result {
        Ok(report) => publish(&report, args.json_output_dir.as_deref()).await,
        Err(e) if e.is_recoverable() => {
            warn!(error = %e, "Nothing to report");
            println!("{}", e.user_message());
        }
        Err(e) => {
            error!(error = %e, "Analysis failed");
            println!("Error: {}", e.user_message());
            report_elapsed(start_time);
            return Err(e.into());
        }
    }

    report_elapsed(start_time);
    Ok(())
}

/// Print the report and, when asked, write the JSON copy.
async fn publish(report: &NicheReport, json_output_dir: Option<&str>) {
    println!("{}", console::render_report(report));

    if let Some(dir) = json_output_dir {
        match json::write_report(report, dir).await {
            Ok(path) => println!("Report saved to {path}"),
            Err(e) => {
                error!(error = %e, "Failed to write JSON report");
            }
        }
    }
}

fn report_elapsed(start_time: std::time::Instant) {
    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
}
