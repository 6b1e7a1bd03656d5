//! Trigger handler: land, upload, load, aggregate.

use crate::aggregate::{AggregationQuery, TeamAverages};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::event::TriggerMessage;
use crate::landing::{landing_id, processed_file_name, write_ndjson};
use crate::store::{ObjectRef, ObjectStore};
use crate::warehouse::{LoadSummary, Warehouse, WriteDisposition};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// What a handled trigger did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The payload was not a start request
    Ignored { payload: String },
    /// A full run completed
    Processed(ProcessedRun),
}

/// Details of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedRun {
    pub landing_file: PathBuf,
    pub object: ObjectRef,
    pub load: LoadSummary,
    pub aggregates: Vec<TeamAverages>,
}

/// Runs the pipeline steps in order against injected collaborators.
pub struct PipelineHandler<'a, S, W> {
    config: &'a PipelineConfig,
    staging_dir: PathBuf,
    store: S,
    warehouse: W,
}

impl<'a, S: ObjectStore, W: Warehouse> PipelineHandler<'a, S, W> {
    pub fn new(config: &'a PipelineConfig, staging_dir: PathBuf, store: S, warehouse: W) -> Self {
        Self {
            config,
            staging_dir,
            store,
            warehouse,
        }
    }

    /// Handle one trigger. Steps run in order and the first failure stops the
    /// run; nothing already uploaded or loaded is rolled back.
    pub fn handle<T: Serialize>(
        &self,
        trigger: &TriggerMessage,
        records: &[T],
        now: NaiveDateTime,
    ) -> Result<Outcome> {
        match trigger {
            TriggerMessage::Unrecognized(payload) => {
                warn!(payload = %payload, "Invalid pub/sub body.");
                Ok(Outcome::Ignored {
                    payload: payload.clone(),
                })
            }
            TriggerMessage::JobStarted => {
                let run = self.process(records, now).map_err(|e| {
                    error!("An unexpected error occurred: {}", e);
                    e
                })?;
                Ok(Outcome::Processed(run))
            }
        }
    }

    fn process<T: Serialize>(&self, records: &[T], now: NaiveDateTime) -> Result<ProcessedRun> {
        if records.is_empty() {
            return Err(PipelineError::NoRecords);
        }

        let api = &self.config.api;
        let file_name = processed_file_name(&landing_id(&api.team_slug, api.season, now));

        fs::create_dir_all(&self.staging_dir)?;
        let landing_file = self.staging_dir.join(&file_name);
        let rows = write_ndjson(&landing_file, records)?;
        info!(file = %landing_file.display(), rows, "Landing file written");

        let object_name = object_name(&self.config.storage.prefix, &file_name);
        let object = self.store.upload(&landing_file, &object_name)?;
        info!(object = %object, "Statistics uploaded successfully.");

        let raw_table = self.config.warehouse.raw_table_ref();
        let load = self
            .warehouse
            .load_ndjson(&object, &raw_table, WriteDisposition::Append)?;
        info!(table = %raw_table, rows = load.rows_loaded, "Data uploaded to warehouse successfully.");

        let query = AggregationQuery::new(raw_table);
        let aggregates = self
            .warehouse
            .run_aggregation(&query, &self.config.warehouse.aggregate_table_ref())?;
        info!(teams = aggregates.len(), "Data transformation completed successfully.");

        Ok(ProcessedRun {
            landing_file,
            object,
            load,
            aggregates,
        })
    }
}

fn object_name(prefix: &str, file_name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", prefix, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name() {
        assert_eq!(object_name("auto-scraped-files", "a.jsonl"), "auto-scraped-files/a.jsonl");
        assert_eq!(object_name("/nested/dir/", "a.jsonl"), "nested/dir/a.jsonl");
        assert_eq!(object_name("", "a.jsonl"), "a.jsonl");
    }
}
