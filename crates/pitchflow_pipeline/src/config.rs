//! Pipeline configuration.
//!
//! Loaded from TOML; every section and field is optional and falls back to
//! the production deployment's identifiers. Local filesystem roots default to
//! directories under the Pitchflow home.

use crate::error::{PipelineError, Result};
use crate::warehouse::TableRef;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the statistics API key.
pub const API_KEY_ENV: &str = "PITCHFLOW_API_KEY";

/// Main configuration for the pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Directory for landing files before upload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<PathBuf>,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub warehouse: WarehouseConfig,

    #[serde(default)]
    pub api: ApiConfig,
}

/// Object storage settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Object name prefix for landed files
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Local directory backing the bucket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

/// Warehouse settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WarehouseConfig {
    #[serde(default = "default_project")]
    pub project: String,

    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// Table receiving every landed file (append)
    #[serde(default = "default_raw_table")]
    pub raw_table: String,

    /// Table holding per-team averages (truncated on each run)
    #[serde(default = "default_aggregate_table")]
    pub aggregate_table: String,

    /// Local directory backing the warehouse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

/// Statistics API settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_team_id")]
    pub team_id: u32,

    #[serde(default = "default_league_id")]
    pub league_id: u32,

    #[serde(default = "default_season")]
    pub season: i32,

    /// Short team name used in landing file names
    #[serde(default = "default_team_slug")]
    pub team_slug: String,

    /// Only read from the file if set explicitly; prefer the environment.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

fn default_bucket() -> String {
    "frf-datacamp".to_string()
}

fn default_prefix() -> String {
    "auto-scraped-files".to_string()
}

fn default_project() -> String {
    "spatial-tempo-425409-i2".to_string()
}

fn default_dataset() -> String {
    "main_dataset".to_string()
}

fn default_raw_table() -> String {
    "auto_upload_table".to_string()
}

fn default_aggregate_table() -> String {
    "auto_filtered_latest".to_string()
}

fn default_base_url() -> String {
    "https://v3.football.api-sports.io".to_string()
}

fn default_team_id() -> u32 {
    635
}

fn default_league_id() -> u32 {
    283
}

fn default_season() -> i32 {
    2023
}

fn default_team_slug() -> String {
    "dinamo".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            prefix: default_prefix(),
            root: None,
        }
    }
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            project: default_project(),
            dataset: default_dataset(),
            raw_table: default_raw_table(),
            aggregate_table: default_aggregate_table(),
            root: None,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            team_id: default_team_id(),
            league_id: default_league_id(),
            season: default_season(),
            team_slug: default_team_slug(),
            api_key: None,
        }
    }
}

impl WarehouseConfig {
    pub fn raw_table_ref(&self) -> TableRef {
        TableRef::new(&self.project, &self.dataset, &self.raw_table)
    }

    pub fn aggregate_table_ref(&self) -> TableRef {
        TableRef::new(&self.project, &self.dataset, &self.aggregate_table)
    }
}

impl ApiConfig {
    /// API key from the config file, else from `PITCHFLOW_API_KEY`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Host header value derived from the base URL.
    pub fn host(&self) -> &str {
        let without_scheme = self
            .base_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.base_url);
        without_scheme.split('/').next().unwrap_or(without_scheme)
    }
}

/// Resolved local directories for the filesystem collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPaths {
    pub staging: PathBuf,
    pub objects: PathBuf,
    pub warehouse: PathBuf,
}

impl PipelineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            PipelineError::Config(format!("{}: {}", path.display(), e))
        })
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Resolve local roots, defaulting to subdirectories of `home`.
    pub fn local_paths(&self, home: &Path) -> LocalPaths {
        LocalPaths {
            staging: self
                .staging_dir
                .clone()
                .unwrap_or_else(|| home.join("staging")),
            objects: self
                .storage
                .root
                .clone()
                .unwrap_or_else(|| home.join("objects")),
            warehouse: self
                .warehouse
                .root
                .clone()
                .unwrap_or_else(|| home.join("warehouse")),
        }
    }
}
