// ============================================================
// Layer 6 — Model Config Store
// ============================================================
// Saves and restores the network's hyperparameters as JSON.
//
// The architecture is fully described by GrConvNetConfig, so a
// config file is all that is needed to rebuild the same topology
// on another machine or backend.
//
// Example file:
//   {
//     "input_channels": 4,
//     "channel_size": 32,
//     "output_channels": 1,
//     "num_residual_blocks": 5
//   }
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::ml::model::GrConvNetConfig;

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save(&self, cfg: &GrConvNetConfig) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write config to '{}'", self.path.display()))?;

        tracing::debug!("Saved model config to '{}'", self.path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<GrConvNetConfig> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read config from '{}'", self.path.display()))?;

        serde_json::from_str(&json)
            .with_context(|| format!("'{}' is not a valid model config", self.path.display()))
    }

    /// Load from `path` if given, otherwise fall back to the default topology.
    pub fn load_or_default(path: Option<&str>) -> Result<GrConvNetConfig> {
        match path {
            Some(p) => {
                let cfg = Self::new(p).load()?;
                tracing::info!("Loaded model config from '{}'", p);
                Ok(cfg)
            }
            None => Ok(GrConvNetConfig::new()),
        }
    }
}
