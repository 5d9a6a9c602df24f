// ============================================================
// Layer 2 — IterateUseCase
// ============================================================
// Walks every batch a DataLoader yields for one split, the
// same way a training loop would, and reports what came out.
// Useful for checking padding and image loading end to end
// before wiring the loader into a model.

use anyhow::Result;
use burn::data::dataloader::DataLoader;
use std::sync::Arc;

use crate::application::config::DatasetConfig;
use crate::data::{batcher::build_data_loader, dataset::VqaDataSet, loader::VqaJsonLoader, splitter::Split};

type CpuBackend = burn::backend::NdArray;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IterationReport {
    pub batches:       usize,
    pub items:         usize,
    /// Padded length of the widest batch
    pub max_batch_len: usize,
    pub with_images:   bool,
}

pub struct IterateUseCase {
    config:  DatasetConfig,
    dataset: Arc<VqaDataSet>,
}

impl IterateUseCase {
    pub fn new(config: DatasetConfig) -> Result<Self> {
        let source  = VqaJsonLoader::new(&config.questions_path, &config.annotations_path);
        let dataset = Arc::new(VqaDataSet::build(&config, &source)?);
        Ok(Self { config, dataset })
    }

    pub fn from_dataset(config: DatasetConfig, dataset: VqaDataSet) -> Self {
        Self { config, dataset: Arc::new(dataset) }
    }

    pub fn execute(&self, split: Split) -> Result<IterationReport> {
        let cfg = &self.config;
        cfg.validate()?;

        let image_size = cfg.load_images.then_some(cfg.image_size);
        let loader = build_data_loader::<CpuBackend>(
            self.dataset.clone(),
            split,
            cfg.batch_size,
            cfg.seed,
            image_size,
        );

        let mut report = IterationReport::default();
        for batch in loader.iter() {
            // sequence models read questions as [max_len, N]
            let [len, n] = batch.questions_time_major().dims();

            tracing::debug!(
                "Batch {}: questions [{}, {}] time-major, images {:?}",
                report.batches,
                len,
                n,
                batch.images.as_ref().map(|t| t.dims())
            );

            report.batches += 1;
            report.items += n;
            report.max_batch_len = report.max_batch_len.max(len);
            report.with_images |= batch.images.is_some();
        }

        tracing::info!(
            "{} split: {} batches, {} items, widest batch {}",
            split,
            report.batches,
            report.items,
            report.max_batch_len
        );
        Ok(report)
    }
}
