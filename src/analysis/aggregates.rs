//! Sound ranking, duration mean and the engagement leaderboard.
//!
//! Field parsing here never fails: a malformed duration or count is replaced
//! by its zero value and the record stays in the batch.

use tracing::{debug, instrument};

use crate::analysis::frequency::FrequencyTable;
use crate::models::{TermCount, TopVideo, VideoRecord};
use crate::utils::excerpt;

/// Rank attributable sounds; the unknown sentinel and blanks are skipped.
#[instrument(level = "debug", skip_all, fields(records = records.len(), k = k))]
pub fn rank_sounds(records: &[&VideoRecord], k: usize) -> Vec<TermCount> {
    let table: FrequencyTable = records
        .iter()
        .filter_map(|r| r.known_sound())
        .map(|s| s.to_lowercase())
        .collect();
    table.top(k)
}

/// Parse `M:SS` into seconds.
///
/// Exactly two colon-separated unsigned integers are accepted, with seconds
/// below 60. Any other shape is `None`.
pub fn parse_duration(value: &str) -> Option<u32> {
    let (minutes, seconds) = value.trim().split_once(':')?;
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(minutes) || !is_digits(seconds) {
        return None;
    }
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    minutes.checked_mul(60)?.checked_add(seconds)
}

/// Mean length in seconds over records with a usable, non-zero duration.
///
/// `None` when no record has one.
#[instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn average_duration(records: &[&VideoRecord]) -> Option<f64> {
    let secs: Vec<u32> = records
        .iter()
        .filter_map(|r| r.duration.as_deref())
        .filter_map(parse_duration)
        .filter(|&s| s > 0)
        .collect();
    debug!(usable = secs.len(), "Collected durations");
    if secs.is_empty() {
        return None;
    }
    let total: u64 = secs.iter().map(|&s| u64::from(s)).sum();
    Some(total as f64 / secs.len() as f64)
}

/// Parse human shorthand counts: `"1.2M"`, `"340K"`, `"1,234"`, `"500"`.
///
/// A `k`/`m` suffix (any case) multiplies by a thousand or a million.
/// Anything unparseable is 0.
pub fn parse_shorthand(value: &str) -> u64 {
    let cleaned: String = value.trim().chars().filter(|&c| c != ',').collect();
    let (number, multiplier) = match cleaned.chars().last() {
        Some('k' | 'K') => (&cleaned[..cleaned.len() - 1], 1_000.0),
        Some('m' | 'M') => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        _ => (cleaned.as_str(), 1.0),
    };
    let number = number.trim();
    let well_formed = number.bytes().any(|b| b.is_ascii_digit())
        && number.bytes().all(|b| b.is_ascii_digit() || b == b'.');
    if !well_formed {
        return 0;
    }
    match number.parse::<f64>() {
        Ok(n) if n.is_finite() => (n * multiplier).round() as u64,
        _ => 0,
    }
}

/// The `n` most-viewed records, ties kept in dataset order.
#[instrument(level = "debug", skip_all, fields(records = records.len(), n = n))]
pub fn top_viewed(records: &[&VideoRecord], n: usize, excerpt_len: usize) -> Vec<TopVideo> {
    let mut scored: Vec<(u64, &VideoRecord)> = records
        .iter()
        .map(|r| (parse_shorthand(r.views.as_deref().unwrap_or_default()), *r))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, (views_count, r))| {
            let likes = r.likes.clone().unwrap_or_default();
            TopVideo {
                rank: i + 1,
                views: r.views.clone().unwrap_or_default(),
                likes_count: parse_shorthand(&likes),
                likes,
                views_count,
                caption_excerpt: excerpt(&r.caption, excerpt_len),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_duration(d: &str) -> VideoRecord {
        VideoRecord {
            duration: Some(d.to_string()),
            ..Default::default()
        }
    }

    fn with_views(caption: &str, views: Option<&str>, likes: Option<&str>) -> VideoRecord {
        VideoRecord {
            caption: caption.to_string(),
            views: views.map(str::to_string),
            likes: likes.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1:30"), Some(90));
        assert_eq!(parse_duration(" 0:07 "), Some(7));
        assert_eq!(parse_duration("12:00"), Some(720));
        assert_eq!(parse_duration("bad"), None);
        assert_eq!(parse_duration("1:75"), None);
        assert_eq!(parse_duration("1:2:3"), None);
        assert_eq!(parse_duration(":30"), None);
        assert_eq!(parse_duration("-1:30"), None);
    }

    #[test]
    fn test_average_duration_skips_malformed() {
        let a = with_duration("1:30");
        let b = with_duration("bad");
        let c = with_duration("0:30");
        let d = with_duration("0:00");
        let e = VideoRecord::default();
        let avg = average_duration(&[&a, &b, &c, &d, &e]).unwrap();
        assert!((avg - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_duration_unavailable() {
        let a = with_duration("bad");
        let b = VideoRecord::default();
        assert_eq!(average_duration(&[&a, &b]), None);
        assert_eq!(average_duration(&[]), None);
    }

    #[test]
    fn test_parse_shorthand() {
        assert_eq!(parse_shorthand("1.2M"), 1_200_000);
        assert_eq!(parse_shorthand("340K"), 340_000);
        assert_eq!(parse_shorthand("340k"), 340_000);
        assert_eq!(parse_shorthand("500"), 500);
        assert_eq!(parse_shorthand("1,234"), 1_234);
        assert_eq!(parse_shorthand(" 2.5m "), 2_500_000);
        assert_eq!(parse_shorthand(""), 0);
        assert_eq!(parse_shorthand("N/A"), 0);
        assert_eq!(parse_shorthand("K"), 0);
        assert_eq!(parse_shorthand("-5"), 0);
        assert_eq!(parse_shorthand("1e5"), 0);
    }

    #[test]
    fn test_rank_sounds_skips_unknown() {
        let records: Vec<VideoRecord> = [
            Some("Original Sound - Joe"),
            Some("Unknown Sound"),
            Some("original sound - joe"),
            None,
            Some("Trending Beat"),
        ]
        .into_iter()
        .map(|s| VideoRecord {
            sound: s.map(str::to_string),
            ..Default::default()
        })
        .collect();
        let refs: Vec<&VideoRecord> = records.iter().collect();
        let ranked = rank_sounds(&refs, 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].term, "original sound - joe");
        assert_eq!(ranked[0].count, 2);
        assert_eq!(ranked[1].term, "trending beat");
    }

    #[test]
    fn test_top_viewed_orders_and_keeps_display_strings() {
        let a = with_views("small", Some("50"), None);
        let b = with_views("big", Some("1.2M"), Some("80K"));
        let c = with_views("mid", Some("900K"), Some("12,000"));
        let d = with_views("unknown", None, None);
        let top = top_viewed(&[&a, &b, &c, &d], 3, 80);

        assert_eq!(top.len(), 3);
        assert_eq!(top[0].rank, 1);
        assert_eq!(top[0].views, "1.2M");
        assert_eq!(top[0].views_count, 1_200_000);
        assert_eq!(top[0].likes_count, 80_000);
        assert_eq!(top[0].caption_excerpt, "big");
        assert_eq!(top[1].views, "900K");
        assert_eq!(top[1].likes_count, 12_000);
        assert_eq!(top[2].views, "50");
    }

    #[test]
    fn test_top_viewed_ties_keep_dataset_order() {
        let a = with_views("first", Some("bad"), None);
        let b = with_views("second", None, None);
        let top = top_viewed(&[&a, &b], 5, 80);
        assert_eq!(top[0].caption_excerpt, "first");
        assert_eq!(top[1].caption_excerpt, "second");
        assert_eq!(top[0].views, "bad");
        assert_eq!(top[0].views_count, 0);
    }
}
