//! CLI module for Pitchflow
//!
//! `schema` runs standalone against a CSV file. The pipeline commands
//! (`fetch`, `handle`, `aggregate`) share the effective configuration
//! resolved in [`context`].

pub mod config;
pub mod context;
pub mod error;
pub mod fetch;
pub mod handle;
pub mod output;
pub mod schema;
