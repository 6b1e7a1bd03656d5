//! Effective configuration for pipeline commands.

use anyhow::{Context as _, Result};
use pitchflow_logging::pitchflow_home;
use pitchflow_pipeline::{LocalObjectStore, LocalPaths, LocalWarehouse, PipelineConfig};
use std::path::{Path, PathBuf};

/// Configuration plus the home directory it was resolved against.
#[derive(Debug)]
pub struct CliContext {
    pub home: PathBuf,
    pub config_path: PathBuf,
    pub config: PipelineConfig,
}

impl CliContext {
    /// Load `--config` if given (must exist), otherwise
    /// `$PITCHFLOW_HOME/config.toml` when present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let home = pitchflow_home();
        let (config_path, config) = match explicit {
            Some(path) => {
                let config = PipelineConfig::load(path)
                    .with_context(|| format!("Failed to load config file {}", path.display()))?;
                (path.to_path_buf(), config)
            }
            None => {
                let path = home.join("config.toml");
                let config = PipelineConfig::load_or_default(&path)
                    .with_context(|| format!("Failed to load config file {}", path.display()))?;
                (path, config)
            }
        };

        Ok(Self {
            home,
            config_path,
            config,
        })
    }

    pub fn paths(&self) -> LocalPaths {
        self.config.local_paths(&self.home)
    }

    /// Filesystem object store and warehouse for this configuration.
    pub fn collaborators(&self) -> (LocalObjectStore, LocalWarehouse) {
        let paths = self.paths();
        let store = LocalObjectStore::new(&paths.objects, &self.config.storage.bucket);
        let warehouse = LocalWarehouse::new(&paths.warehouse, store.clone());
        (store, warehouse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[api]\nteam_slug = \"rapid\"\nseason = 2024\n").unwrap();

        let ctx = CliContext::load(Some(&path)).unwrap();
        assert_eq!(ctx.config_path, path);
        assert_eq!(ctx.config.api.team_slug, "rapid");
        assert_eq!(ctx.config.api.season, 2024);
        assert_eq!(ctx.config.storage.bucket, "frf-datacamp");
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = TempDir::new().unwrap();
        let err = CliContext::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to load config file"));
    }
}
