// ============================================================
// Layer 6 — Split Store
// ============================================================
// Saves what is needed to reproduce a dataset build:
//
//   output/
//     splits.json           {"train": [...], "test": [...]}
//     dataset_config.json   the DatasetConfig used
//
// Splits are example indices into the kept answers, so they
// are only meaningful together with the same annotation files
// and the same config.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::application::config::DatasetConfig;
use crate::data::splitter::Splits;

const SPLITS_FILE: &str = "splits.json";
const CONFIG_FILE: &str = "dataset_config.json";

pub struct SplitStore {
    dir: PathBuf,
}

impl SplitStore {
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn save_splits(&self, splits: &Splits) -> Result<()> {
        let path = self.dir.join(SPLITS_FILE);
        fs::write(&path, serde_json::to_string(splits)?)
            .with_context(|| format!("Cannot write splits to '{}'", path.display()))?;

        tracing::debug!("Saved splits to '{}'", path.display());
        Ok(())
    }

    pub fn load_splits(&self) -> Result<Splits> {
        let path = self.dir.join(SPLITS_FILE);
        let json = fs::read_to_string(&path).with_context(|| {
            format!("Cannot read '{}'. Have you run 'prepare' first?", path.display())
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_config(&self, cfg: &DatasetConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        fs::write(&path, serde_json::to_string_pretty(cfg)?)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved dataset config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<DatasetConfig> {
        DatasetConfig::load(&self.dir.join(CONFIG_FILE))
    }
}
