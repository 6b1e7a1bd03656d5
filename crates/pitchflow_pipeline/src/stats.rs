//! Team statistics records.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;

/// One team's statistics row as stored in the raw table.
///
/// Every field is optional: rows are loaded with schema autodetection, so a
/// row missing `statistics` or `name` is still a valid row. Unknown fields are
/// preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStatistics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<MatchStatistics>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

/// Season totals for a team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStatistics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches_played: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wins: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draws: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub losses: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals_for: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals_against: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

/// Payload returned by the statistics API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub response: JsonValue,
    #[serde(default)]
    pub errors: JsonValue,
}

impl ApiEnvelope {
    /// The API reports failures in `errors` (as a non-empty list or map) with a 200 status.
    pub fn error_message(&self) -> Option<String> {
        match &self.errors {
            JsonValue::Array(items) if !items.is_empty() => Some(self.errors.to_string()),
            JsonValue::Object(map) if !map.is_empty() => Some(self.errors.to_string()),
            _ => None,
        }
    }
}

/// Read records from a file holding a JSON array, a single JSON object, or
/// newline-delimited JSON objects.
pub fn read_records(path: &Path) -> Result<Vec<JsonValue>> {
    let content = fs::read_to_string(path)?;
    parse_records(&content)
}

/// Parse records from text (see [`read_records`]).
pub fn parse_records(content: &str) -> Result<Vec<JsonValue>> {
    // A whole-document parse covers arrays, pretty-printed objects and
    // single-line files.
    if let Ok(value) = serde_json::from_str::<JsonValue>(content) {
        return Ok(match value {
            JsonValue::Array(items) => items,
            other => vec![other],
        });
    }

    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: JsonValue =
            serde_json::from_str(line).map_err(|e| PipelineError::InvalidRecord {
                line: index + 1,
                reason: e.to_string(),
            })?;
        records.push(value);
    }
    Ok(records)
}
