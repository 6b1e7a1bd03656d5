//! Landing files: timestamped newline-delimited JSON written before upload.
//!
//! Names are derived from the wall clock, so re-running with the same data
//! lands a new file (and the append load duplicates rows downstream).

use crate::error::Result;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// `<team>_statistics_<season>_<YYYYmmdd_HHMMSS>`
pub fn landing_id(team_slug: &str, season: i32, now: NaiveDateTime) -> String {
    format!(
        "{}_statistics_{}_{}",
        team_slug,
        season,
        now.format("%Y%m%d_%H%M%S")
    )
}

/// File name for a landing file that has been through processing.
pub fn processed_file_name(landing_id: &str) -> String {
    format!("{}_processed.jsonl", landing_id)
}

/// File name for a raw API capture.
pub fn raw_file_name(landing_id: &str) -> String {
    format!("{}.jsonl", landing_id)
}

/// Write records as newline-delimited JSON, one compact object per line.
///
/// Overwrites `path`. Returns the number of rows written.
pub fn write_ndjson<T: Serialize>(path: &Path, records: &[T]) -> Result<usize> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(records.len())
}
