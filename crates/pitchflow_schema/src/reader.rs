//! CSV reader that materializes a file into typed columns.
//!
//! Storage kinds are declared the way a dataframe reader would:
//!
//! - every present value an `i64` and nothing absent -> `Integer`
//! - every present value numeric -> `Float` (integers with gaps widen to float,
//!   and a column whose rows are all absent is `Float`)
//! - every value `True`/`False` and nothing absent -> `Boolean`
//! - no rows at all, or anything else -> `Text`

use crate::error::{Result, SchemaError};
use crate::types::{Column, StorageKind};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Tokens read as absent values (exact, case-sensitive match).
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_TOKENS: &[&str] = &["True", "TRUE", "true"];
const FALSE_TOKENS: &[&str] = &["False", "FALSE", "false"];

/// A fully materialized table, columns in source order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<Column>,
    pub row_count: usize,
}

impl Table {
    pub fn column(&self, raw_name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.raw_name == raw_name)
    }
}

/// Read a comma-separated file with a header row.
pub fn read_table(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SchemaError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => SchemaError::Io(e),
    })?;
    read_table_from(file, path)
}

/// Read CSV data from any reader; `path` is only used in error messages.
pub fn read_table_from<R: Read>(input: R, path: &Path) -> Result<Table> {
    let read_err = |source: csv::Error| SchemaError::InputRead {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .map_err(read_err)?
        .iter()
        .map(|s| s.to_string())
        .collect();
    let headers = normalize_headers(headers);

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    let mut row_count = 0;

    for result in reader.records() {
        let record = result.map_err(read_err)?;
        if record.len() > headers.len() {
            return Err(SchemaError::MalformedRow {
                path: path.to_path_buf(),
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: headers.len(),
                found: record.len(),
            });
        }

        // Short rows are padded with absent values.
        for (i, column) in values.iter_mut().enumerate() {
            column.push(record.get(i).and_then(present_value));
        }
        row_count += 1;
    }

    let columns = headers
        .into_iter()
        .zip(values)
        .map(|(raw_name, values)| {
            let storage_kind = declare_storage_kind(&values);
            let nullable = values.iter().any(Option::is_none);
            Column {
                raw_name,
                storage_kind,
                nullable,
                values,
            }
        })
        .collect();

    Ok(Table { columns, row_count })
}

/// Returns `None` for null tokens, the owned value otherwise.
fn present_value(raw: &str) -> Option<String> {
    if NULL_TOKENS.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Blank headers become `Unnamed: <index>`; repeated headers get `.1`, `.2`, ...
fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut taken: Vec<String> = Vec::with_capacity(headers.len());

    for (index, header) in headers.into_iter().enumerate() {
        let base = if header.is_empty() {
            format!("Unnamed: {}", index)
        } else {
            header
        };

        let mut name = base.clone();
        while taken.contains(&name) {
            let counter = seen.entry(base.clone()).or_insert(0);
            *counter += 1;
            name = format!("{}.{}", base, counter);
        }
        taken.push(name);
    }

    taken
}

/// Declare the storage kind of a column from its values.
pub fn declare_storage_kind(values: &[Option<String>]) -> StorageKind {
    let present: Vec<&str> = values.iter().filter_map(|v| v.as_deref()).collect();
    let has_absent = present.len() < values.len();

    if values.is_empty() {
        return StorageKind::Text;
    }
    if present.is_empty() {
        return StorageKind::Float;
    }

    if present.iter().all(|v| v.trim().parse::<i64>().is_ok()) {
        return if has_absent {
            StorageKind::Float
        } else {
            StorageKind::Integer
        };
    }

    if present.iter().all(|v| is_float(v)) {
        return StorageKind::Float;
    }

    if !has_absent && present.iter().all(|v| is_bool(v)) {
        return StorageKind::Boolean;
    }

    StorageKind::Text
}

fn is_float(value: &str) -> bool {
    let trimmed = value.trim();
    // Rust accepts "infinity"/"NaN" spellings; only plain numerals and inf count here.
    let lowered = trimmed.trim_start_matches(['+', '-']).to_ascii_lowercase();
    if lowered == "nan" || lowered == "infinity" {
        return false;
    }
    trimmed.parse::<f64>().is_ok()
}

fn is_bool(value: &str) -> bool {
    TRUE_TOKENS.contains(&value) || FALSE_TOKENS.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn read(csv: &str) -> Table {
        read_table_from(csv.as_bytes(), &PathBuf::from("test.csv")).unwrap()
    }

    fn vals(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| present_value(v)).collect()
    }

    #[test]
    fn test_read_table_columns_in_order() {
        let table = read("id,name,rating\n1,Dinamo,7.5\n2,Rapid,6.8\n");
        assert_eq!(table.row_count, 2);
        let names: Vec<&str> = table.columns.iter().map(|c| c.raw_name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "rating"]);
        assert_eq!(table.columns[0].storage_kind, StorageKind::Integer);
        assert_eq!(table.columns[1].storage_kind, StorageKind::Text);
        assert_eq!(table.columns[2].storage_kind, StorageKind::Float);
    }

    #[test]
    fn test_null_tokens_are_absent() {
        let table = read("a,b\nNA,x\nN/A,y\nNULL,z\n,w\n");
        let a = table.column("a").unwrap();
        assert!(a.values.iter().all(Option::is_none));
        assert!(a.nullable);
        assert!(!table.column("b").unwrap().nullable);
    }

    #[test]
    fn test_null_tokens_are_case_sensitive() {
        assert_eq!(present_value("Null"), Some("Null".to_string()));
        assert_eq!(present_value("NULL"), None);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = read("a,b,c\n1,2\n3,4,5\n");
        let c = table.column("c").unwrap();
        assert_eq!(c.values, vec![None, Some("5".to_string())]);
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let err = read_table_from("a,b\n1,2,3\n".as_bytes(), &PathBuf::from("bad.csv")).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::MalformedRow {
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_header_normalization() {
        let table = read("team,,team,team\n1,2,3,4\n");
        let names: Vec<&str> = table.columns.iter().map(|c| c.raw_name.as_str()).collect();
        assert_eq!(names, vec!["team", "Unnamed: 1", "team.1", "team.2"]);
    }

    #[test]
    fn test_declare_integer_and_float() {
        assert_eq!(declare_storage_kind(&vals(&["1", "2", "-3"])), StorageKind::Integer);
        assert_eq!(declare_storage_kind(&vals(&["1", "2.5"])), StorageKind::Float);
        assert_eq!(declare_storage_kind(&vals(&["1e3", "inf"])), StorageKind::Float);
    }

    #[test]
    fn test_declare_integer_with_gaps_widens_to_float() {
        assert_eq!(declare_storage_kind(&vals(&["1", "", "3"])), StorageKind::Float);
    }

    #[test]
    fn test_declare_all_absent_is_float() {
        assert_eq!(declare_storage_kind(&vals(&["", "NA"])), StorageKind::Float);
        assert_eq!(declare_storage_kind(&vals(&[""])), StorageKind::Float);
    }

    #[test]
    fn test_declare_no_rows_is_text() {
        assert_eq!(declare_storage_kind(&[]), StorageKind::Text);
    }

    #[test]
    fn test_declare_boolean() {
        assert_eq!(declare_storage_kind(&vals(&["True", "false", "TRUE"])), StorageKind::Boolean);
        // Gaps make a boolean column text.
        assert_eq!(declare_storage_kind(&vals(&["True", "", "False"])), StorageKind::Text);
        // Other spellings are text.
        assert_eq!(declare_storage_kind(&vals(&["yes", "no"])), StorageKind::Text);
    }

    #[test]
    fn test_declare_text() {
        assert_eq!(declare_storage_kind(&vals(&["1", "two"])), StorageKind::Text);
        assert_eq!(declare_storage_kind(&vals(&["Infinity"])), StorageKind::Text);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = read_table(Path::new("/nonexistent/pitchflow/input.csv")).unwrap_err();
        assert!(err.is_not_found());
    }
}
