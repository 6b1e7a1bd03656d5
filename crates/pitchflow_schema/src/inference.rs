//! Warehouse type inference for a single column.
//!
//! Declared numeric, boolean and temporal kinds map straight to a warehouse
//! type. Text columns are probed for dates: if any value parses, the column is
//! a `DATE` unless the parsed values show more than one distinct time of day,
//! in which case it is a `TIMESTAMP`. Otherwise it stays `STRING`.
//!
//! Mode is always `NULLABLE`, even for columns with no absent values in the
//! sample.

use crate::datetime::parse_datetime;
use crate::types::{FieldMode, FieldType, StorageKind};
use chrono::NaiveTime;
use std::collections::HashSet;

/// Infer the warehouse type and mode of a column.
pub fn infer_field_type(kind: StorageKind, values: &[Option<String>]) -> (FieldType, FieldMode) {
    let field_type = match kind {
        StorageKind::Integer => FieldType::Int64,
        StorageKind::Float => FieldType::Float64,
        StorageKind::Boolean => FieldType::Bool,
        StorageKind::Timestamp | StorageKind::Date => FieldType::Timestamp,
        StorageKind::Text => classify_text(values.iter().filter_map(|v| v.as_deref())),
    };

    (field_type, FieldMode::Nullable)
}

/// Classify text values as `TIMESTAMP`, `DATE` or `STRING`.
pub fn classify_text<'a>(values: impl IntoIterator<Item = &'a str>) -> FieldType {
    let mut parsed_any = false;
    let mut times: HashSet<NaiveTime> = HashSet::new();

    for value in values {
        if let Some(dt) = parse_datetime(value) {
            parsed_any = true;
            times.insert(dt.time());
        }
    }

    if !parsed_any {
        FieldType::String
    } else if times.len() > 1 {
        FieldType::Timestamp
    } else {
        FieldType::Date
    }
}
