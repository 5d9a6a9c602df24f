// ============================================================
// Layer 2 — Dataset Configuration
// ============================================================
// Every knob of a dataset build in one serialisable struct.
// The CLI converts its arguments into this, the use cases
// read from it, and SplitStore writes it next to the splits
// so a build can be reproduced later.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::data::image::DEFAULT_IMAGE_SIZE;
use crate::data::splitter::{DEFAULT_SEED, DEFAULT_TEST_FRACTION};

pub const DEFAULT_IMAGE_PREFIX: &str = "COCO_train2014_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub questions_path:   String,
    pub annotations_path: String,
    pub image_dir:        String,
    pub image_prefix:     String,
    pub test_fraction:    f64,
    pub seed:             u64,
    pub image_size:       u32,
    pub load_images:      bool,
    /// Strip punctuation from answers before the single-token check
    pub strip_answer_punctuation: bool,
    pub batch_size:       usize,
    pub output_dir:       String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            questions_path:   "data/questions.json".to_string(),
            annotations_path: "data/annotations.json".to_string(),
            image_dir:        "data/images".to_string(),
            image_prefix:     DEFAULT_IMAGE_PREFIX.to_string(),
            test_fraction:    DEFAULT_TEST_FRACTION,
            seed:             DEFAULT_SEED,
            image_size:       DEFAULT_IMAGE_SIZE,
            load_images:      false,
            strip_answer_punctuation: false,
            batch_size:       32,
            output_dir:       "output".to_string(),
        }
    }
}

impl DatasetConfig {
    /// Reject settings that would make the build meaningless
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.test_fraction) {
            bail!("test_fraction must be within [0, 1], got {}", self.test_fraction);
        }
        if self.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        if self.image_size == 0 {
            bail!("image_size must be at least 1");
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&json)
            .with_context(|| format!("Cannot parse config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = DatasetConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.seed, 9001);
        assert_eq!(cfg.test_fraction, 0.2);
    }

    #[test]
    fn test_rejects_bad_values() {
        let cfg = DatasetConfig { test_fraction: 1.2, ..Default::default() };
        assert!(cfg.validate().is_err());

        let cfg = DatasetConfig { batch_size: 0, ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{"seed": 5, "image_dir": "/imgs"}"#).unwrap();

        let cfg = DatasetConfig::load(&path).unwrap();
        assert_eq!(cfg.seed, 5);
        assert_eq!(cfg.image_dir, "/imgs");
        assert_eq!(cfg.batch_size, 32);
    }
}
