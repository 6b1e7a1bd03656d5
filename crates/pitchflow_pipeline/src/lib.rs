//! Statistics ingestion pipeline.
//!
//! A trigger message starts a run. The handler lands the team statistics as
//! newline-delimited JSON, uploads the file to object storage, appends it to
//! the raw warehouse table and recomputes the per-team averages table.
//!
//! Object storage and the warehouse are external collaborators behind the
//! [`ObjectStore`] and [`Warehouse`] traits. The crate ships filesystem
//! implementations used by the CLI and tests.

pub mod aggregate;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod landing;
pub mod stats;
pub mod store;
pub mod warehouse;

pub use aggregate::{aggregate_team_averages, AggregationQuery, TeamAverages};
pub use client::StatsClient;
pub use config::{ApiConfig, LocalPaths, PipelineConfig, StorageConfig, WarehouseConfig};
pub use error::{PipelineError, Result};
pub use event::{decode_trigger, PushEnvelope, TriggerMessage};
pub use handler::{Outcome, PipelineHandler, ProcessedRun};
pub use landing::{landing_id, processed_file_name, write_ndjson};
pub use stats::{read_records, MatchStatistics, TeamStatistics};
pub use store::{LocalObjectStore, ObjectRef, ObjectStore};
pub use warehouse::{LoadSummary, LocalWarehouse, TableRef, Warehouse, WriteDisposition};
