//! Schema builder: CSV file in, ordered field descriptors out.

use crate::error::Result;
use crate::inference::infer_field_type;
use crate::naming::sanitize_column_name;
use crate::reader::{read_table, Table};
use crate::types::{FieldDescriptor, Schema};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Infer a schema from a CSV file.
///
/// Never fails: a missing or unreadable file is logged and yields an empty
/// schema. Use [`try_infer_schema`] to keep the error.
pub fn infer_schema(path: &Path) -> Schema {
    match try_infer_schema(path) {
        Ok(schema) => schema,
        Err(err) if err.is_not_found() => {
            error!(path = %path.display(), "Error: {}", err);
            Vec::new()
        }
        Err(err) => {
            error!(path = %path.display(), "Error reading CSV file: {}", err);
            Vec::new()
        }
    }
}

/// Infer a schema from a CSV file, returning read errors.
pub fn try_infer_schema(path: &Path) -> Result<Schema> {
    let table = read_table(path)?;
    info!(
        path = %path.display(),
        columns = table.columns.len(),
        rows = table.row_count,
        "Read CSV for schema inference"
    );
    Ok(build_schema(&table))
}

/// Build the schema for an already materialized table.
///
/// Columns whose sanitized names collide are all kept; a warning is logged.
pub fn build_schema(table: &Table) -> Schema {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut schema = Vec::with_capacity(table.columns.len());

    for column in &table.columns {
        let name = sanitize_column_name(&column.raw_name);
        let (field_type, mode) = infer_field_type(column.storage_kind, &column.values);
        debug!(
            column = %column.raw_name,
            storage_kind = %column.storage_kind,
            field_type = %field_type,
            "Inferred column type"
        );

        if name.is_empty() {
            warn!(column = %column.raw_name, "Column name sanitized to an empty identifier");
        }
        if let Some(previous) = seen.insert(name.clone(), column.raw_name.as_str()) {
            warn!(
                name = %name,
                first = %previous,
                second = %column.raw_name,
                "Columns sanitize to the same name"
            );
        }

        schema.push(FieldDescriptor::inferred(
            name,
            field_type,
            mode,
            &column.raw_name,
        ));
    }

    schema
}

/// Write the schema as a pretty-printed JSON array.
pub fn write_schema_json(schema: &Schema, path: &Path) -> Result<()> {
    let mut json = serde_json::to_string_pretty(schema)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}
