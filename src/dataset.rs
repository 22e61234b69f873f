//! Loading scraped video records from the scraper's CSV output.
//!
//! Only the `caption` column is expected. `hashtags`, `sound`, `duration`,
//! `views` and `likes` are optional and looked up by header name, so column
//! order and extra columns don't matter. A UTF-8 BOM at the start of the file
//! is tolerated.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument};

use crate::errors::PipelineError;
use crate::models::VideoRecord;

static CAPTION_HASHTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").unwrap());

/// Column positions resolved from the header row.
#[derive(Debug, Default)]
struct Columns {
    caption: Option<usize>,
    hashtags: Option<usize>,
    sound: Option<usize>,
    duration: Option<usize>,
    views: Option<usize>,
    likes: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut columns = Columns::default();
        for (i, name) in headers.iter().enumerate() {
            let slot = match name.trim().to_lowercase().as_str() {
                "caption" => &mut columns.caption,
                "hashtags" => &mut columns.hashtags,
                "sound" => &mut columns.sound,
                "duration" => &mut columns.duration,
                "views" => &mut columns.views,
                "likes" => &mut columns.likes,
                _ => continue,
            };
            slot.get_or_insert(i);
        }
        columns
    }
}

/// Load every record from the CSV at `path`.
///
/// # Errors
///
/// - [`PipelineError::DatasetNotFound`] when `path` does not exist
/// - [`PipelineError::Io`] / [`PipelineError::Csv`] for unreadable or
///   syntactically broken files
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_records(path: &Path) -> Result<Vec<VideoRecord>, PipelineError> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PipelineError::DatasetNotFound {
                path: path.display().to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let records = read_records(file)?;
    info!(count = records.len(), "Loaded video records");
    Ok(records)
}

/// Parse records from any CSV byte source.
pub fn read_records<R: Read>(mut reader: R) -> Result<Vec<VideoRecord>, PipelineError> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;
    let body = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let mut csv_reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());
    let columns = Columns::from_headers(csv_reader.headers()?);
    if columns.caption.is_none() {
        debug!("No caption column; captions will be empty");
    }

    let mut records = Vec::new();
    for row in csv_reader.records() {
        records.push(to_record(&row?, &columns));
    }
    Ok(records)
}

fn to_record(row: &StringRecord, columns: &Columns) -> VideoRecord {
    let cell = |idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| row.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let caption = cell(columns.caption).unwrap_or_default();
    let hashtags = match cell(columns.hashtags) {
        Some(list) => split_hashtags(&list),
        None => {
            let derived = hashtags_from_caption(&caption);
            if !derived.is_empty() {
                debug!(count = derived.len(), "Derived hashtags from caption");
            }
            derived
        }
    };

    VideoRecord {
        caption,
        hashtags,
        sound: cell(columns.sound),
        duration: cell(columns.duration),
        views: cell(columns.views),
        likes: cell(columns.likes),
    }
}

/// Split a `"tag1, tag2,#tag3"` cell into tags, dropping empties.
pub fn split_hashtags(list: &str) -> Vec<String> {
    list.split(',')
        .map(|t| t.trim().trim_start_matches('#').trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pull `#tag` occurrences out of free caption text.
pub fn hashtags_from_caption(caption: &str) -> Vec<String> {
    CAPTION_HASHTAG
        .captures_iter(caption)
        .map(|c| c[1].to_string())
        .collect()
}
