//! Plain-text rendering of a [`NicheReport`] for the terminal.

use std::fmt::Write;

use crate::models::{NicheReport, TermCount};

fn ranked_section(out: &mut String, title: &str, entries: &[TermCount], prefix: &str) {
    writeln!(out, "\n## {title}").unwrap();
    if entries.is_empty() {
        writeln!(out, "  (none found)").unwrap();
        return;
    }
    for (i, entry) in entries.iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. {prefix}{}: {} times",
            i + 1,
            entry.term,
            entry.count
        )
        .unwrap();
    }
}

/// Render every section of the report, in the order the pipeline computes them.
pub fn render_report(report: &NicheReport) -> String {
    let mut out = String::new();

    writeln!(
        out,
        "# Niche report: {}",
        report.niche_keywords.join(", ")
    )
    .unwrap();
    writeln!(
        out,
        "Found {} of {} videos in '{}' matching the niche.",
        report.matched_count, report.total_records, report.input_path
    )
    .unwrap();

    ranked_section(&mut out, "Most common hashtags", &report.top_hashtags, "#");
    ranked_section(&mut out, "Most common caption keywords", &report.top_keywords, "");
    ranked_section(&mut out, "Most used sounds", &report.top_sounds, "");

    writeln!(out, "\n## Average duration").unwrap();
    match report.average_duration_secs {
        Some(secs) => {
            let whole = secs.round() as u64;
            writeln!(out, "  {:.1} seconds ({}:{:02})", secs, whole / 60, whole % 60).unwrap()
        }
        None => writeln!(out, "  unavailable (no usable durations)").unwrap(),
    }

    writeln!(out, "\n## Most viewed").unwrap();
    if report.top_videos.is_empty() {
        writeln!(out, "  (none found)").unwrap();
    }
    for video in &report.top_videos {
        let views = if video.views.is_empty() { "?" } else { video.views.as_str() };
        let likes = if video.likes.is_empty() { "?" } else { video.likes.as_str() };
        writeln!(
            out,
            "  {:>2}. {views} views, {likes} likes: {}",
            video.rank, video.caption_excerpt
        )
        .unwrap();
    }

    writeln!(out, "\n## Content ideas").unwrap();
    for line in report.recommendations.lines() {
        writeln!(out, "  {line}").unwrap();
    }

    out
}
