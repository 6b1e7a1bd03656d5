//! Analytical warehouse seam.

use crate::aggregate::{aggregate_team_averages, AggregationQuery, TeamAverages};
use crate::error::{PipelineError, Result};
use crate::landing::write_ndjson;
use crate::store::{LocalObjectStore, ObjectRef};
use serde_json::Value as JsonValue;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

/// Fully qualified table: `project.dataset.table`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl TableRef {
    pub fn new(project: &str, dataset: &str, table: &str) -> Self {
        Self {
            project: project.to_string(),
            dataset: dataset.to_string(),
            table: table.to_string(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.project, self.dataset, self.table)
    }
}

impl FromStr for TableRef {
    type Err = PipelineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        match parts.as_slice() {
            [project, dataset, table]
                if parts.iter().all(|p| !p.is_empty() && !p.contains(['/', '\\'])) =>
            {
                Ok(Self::new(project, dataset, table))
            }
            _ => Err(PipelineError::InvalidTableRef(s.to_string())),
        }
    }
}

/// What a load does with rows already in the destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDisposition {
    /// Keep existing rows
    Append,
    /// Replace existing rows
    Truncate,
}

/// Result of a load job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub table: TableRef,
    pub rows_loaded: usize,
    pub total_rows: usize,
}

/// Columnar warehouse.
pub trait Warehouse {
    /// Load a newline-delimited JSON object into a table. All-or-nothing: a
    /// bad line rejects the whole load.
    fn load_ndjson(
        &self,
        source: &ObjectRef,
        table: &TableRef,
        disposition: WriteDisposition,
    ) -> Result<LoadSummary>;

    /// Run the aggregation and replace `destination` with its result.
    fn run_aggregation(
        &self,
        query: &AggregationQuery,
        destination: &TableRef,
    ) -> Result<Vec<TeamAverages>>;
}

/// Warehouse keeping each table as an NDJSON file
/// (`<root>/<project>/<dataset>/<table>.jsonl`).
#[derive(Debug, Clone)]
pub struct LocalWarehouse {
    root: PathBuf,
    objects: LocalObjectStore,
}

impl LocalWarehouse {
    /// `objects` resolves the URIs of loaded files.
    pub fn new(root: impl Into<PathBuf>, objects: LocalObjectStore) -> Self {
        Self {
            root: root.into(),
            objects,
        }
    }

    pub fn table_path(&self, table: &TableRef) -> PathBuf {
        self.root
            .join(&table.project)
            .join(&table.dataset)
            .join(format!("{}.jsonl", table.table))
    }

    /// Read every row of a table.
    pub fn read_rows(&self, table: &TableRef) -> Result<Vec<JsonValue>> {
        let path = self.table_path(table);
        if !path.exists() {
            return Err(PipelineError::TableNotFound(table.to_string()));
        }
        read_ndjson_objects(&path)
    }
}

impl Warehouse for LocalWarehouse {
    fn load_ndjson(
        &self,
        source: &ObjectRef,
        table: &TableRef,
        disposition: WriteDisposition,
    ) -> Result<LoadSummary> {
        let source_path = self.objects.local_path(source)?;
        if !source_path.exists() {
            return Err(PipelineError::ObjectNotFound(source.uri()));
        }
        let rows = read_ndjson_objects(&source_path)?;

        let dest = self.table_path(table);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = match disposition {
            WriteDisposition::Append => OpenOptions::new().create(true).append(true).open(&dest)?,
            WriteDisposition::Truncate => OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&dest)?,
        };
        for row in &rows {
            serde_json::to_writer(&mut file, row)?;
            file.write_all(b"\n")?;
        }
        file.flush()?;

        let total_rows = read_ndjson_objects(&dest)?.len();
        info!(
            source = %source,
            table = %table,
            rows_loaded = rows.len(),
            total_rows,
            "Load job completed"
        );
        Ok(LoadSummary {
            table: table.clone(),
            rows_loaded: rows.len(),
            total_rows,
        })
    }

    fn run_aggregation(
        &self,
        query: &AggregationQuery,
        destination: &TableRef,
    ) -> Result<Vec<TeamAverages>> {
        debug!(sql = %query.to_sql(), "Running aggregation");
        let rows = self.read_rows(&query.source)?;
        let averages = aggregate_team_averages(&rows);

        let dest = self.table_path(destination);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        write_ndjson(&dest, &averages)?;

        info!(
            source = %query.source,
            destination = %destination,
            teams = averages.len(),
            "Aggregation completed"
        );
        Ok(averages)
    }
}

/// Read an NDJSON file where every non-blank line must be a JSON object.
fn read_ndjson_objects(path: &std::path::Path) -> Result<Vec<JsonValue>> {
    let reader = BufReader::new(fs::File::open(path)?);
    let mut rows = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: JsonValue =
            serde_json::from_str(&line).map_err(|e| PipelineError::InvalidRecord {
                line: index + 1,
                reason: e.to_string(),
            })?;
        if !value.is_object() {
            return Err(PipelineError::InvalidRecord {
                line: index + 1,
                reason: "expected a JSON object".to_string(),
            });
        }
        rows.push(value);
    }
    Ok(rows)
}
