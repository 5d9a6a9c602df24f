// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Orchestrates a full dataset build and writes it to disk:
//
//   Step 1: Load questions + annotations   (Layer 4 - data)
//   Step 2: Build the VQA dataset          (Layer 4 - data)
//   Step 3: Save vocabularies + tokenizer  (Layer 6 - infra)
//   Step 4: Save splits + config           (Layer 6 - infra)
//   Step 5: Write answer distribution      (Layer 6 - infra)
//
// load_prepared() goes the other way: it rebuilds the dataset
// from a prepared directory and pins it to the saved split.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::application::config::DatasetConfig;
use crate::data::{dataset::VqaDataSet, loader::VqaJsonLoader, splitter::Split};
use crate::infra::{split_store::SplitStore, stats::SplitStats, vocab_store::VocabStore};

/// What a prepare run produced, for the CLI to print
#[derive(Debug, Clone)]
pub struct PrepareSummary {
    pub questions:       usize,
    pub answers:         usize,
    pub train:           usize,
    pub test:            usize,
    pub question_vocab:  usize,
    pub answer_vocab:    usize,
    pub max_question_len: Option<usize>,
    pub output_dir:      PathBuf,
}

pub struct PrepareUseCase {
    config: DatasetConfig,
}

impl PrepareUseCase {
    pub fn new(config: DatasetConfig) -> Self {
        Self { config }
    }

    /// Build the dataset and persist every artefact
    pub fn execute(&self) -> Result<PrepareSummary> {
        let cfg = &self.config;

        // ── Steps 1-2: load and build ─────────────────────────────────────────
        let source  = VqaJsonLoader::new(&cfg.questions_path, &cfg.annotations_path);
        let dataset = VqaDataSet::build(cfg, &source)?;

        self.persist(&dataset, Path::new(&cfg.output_dir))
    }

    /// Write vocabularies, tokenizer, splits, config and statistics
    /// for an already built dataset.
    pub fn persist(&self, dataset: &VqaDataSet, out: &Path) -> Result<PrepareSummary> {
        // ── Step 3: vocabularies ──────────────────────────────────────────────
        let vocab_store = VocabStore::new(out);
        vocab_store.save(dataset.question_vocab(), dataset.answer_vocab())?;
        vocab_store.save_tokenizer(dataset.question_vocab())?;

        let tokenizer = vocab_store.load_tokenizer()?;
        if tokenizer.get_vocab_size(true) != dataset.question_vocab().len() {
            bail!(
                "Saved tokenizer has {} tokens, question vocabulary has {}",
                tokenizer.get_vocab_size(true),
                dataset.question_vocab().len()
            );
        }

        // ── Step 4: splits and config ─────────────────────────────────────────
        let split_store = SplitStore::new(out)?;
        split_store.save_splits(dataset.splits())?;
        split_store.save_config(&self.config)?;

        // ── Step 5: answer distribution ───────────────────────────────────────
        let csv = SplitStats::from_dataset(dataset).write_csv(out)?;
        tracing::info!("Answer distribution written to '{}'", csv.display());

        let (questions, answers) = dataset.size();
        Ok(PrepareSummary {
            questions,
            answers,
            train:            dataset.split_len(Split::Train),
            test:             dataset.split_len(Split::Test),
            question_vocab:   dataset.question_vocab().len(),
            answer_vocab:     dataset.answer_vocab().len(),
            max_question_len: dataset.max_sequence_len(),
            output_dir:       out.to_path_buf(),
        })
    }
}

/// Rebuild the dataset a `prepare` run wrote to `dir`.
///
/// The annotation files named in the saved config are loaded again,
/// the result must match the saved vocabularies, and the saved split
/// replaces the freshly computed one.
pub fn load_prepared(dir: &Path) -> Result<(DatasetConfig, VqaDataSet)> {
    if !dir.is_dir() {
        bail!("'{}' does not exist. Have you run 'prepare' first?", dir.display());
    }

    let split_store = SplitStore::new(dir)?;
    let cfg = split_store.load_config()?;

    let source      = VqaJsonLoader::new(&cfg.questions_path, &cfg.annotations_path);
    let mut dataset = VqaDataSet::build(&cfg, &source)?;

    let (questions, answers) = VocabStore::new(dir).load()?;
    if &questions != dataset.question_vocab() || &answers != dataset.answer_vocab() {
        bail!(
            "Vocabularies in '{}' no longer match the annotation files. Run 'prepare' again.",
            dir.display()
        );
    }

    dataset.apply_splits(split_store.load_splits()?)?;
    tracing::info!("Loaded prepared dataset from '{}'", dir.display());
    Ok((cfg, dataset))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::splitter::Splits;
    use std::fs;

    const QUESTIONS: &str = r#"{"questions": [
        {"question_id": 1, "image_id": 11, "question": "What color is the cat?"},
        {"question_id": 2, "image_id": 12, "question": "Is this a dog?"},
        {"question_id": 3, "image_id": 13, "question": "Is this a cat?"},
        {"question_id": 4, "image_id": 14, "question": "Is it night?"},
        {"question_id": 5, "image_id": 15, "question": "Is it day?"},
        {"question_id": 6, "image_id": 16, "question": "Is it snowing?"}
    ]}"#;

    const ANNOTATIONS: &str = r#"{"annotations": [
        {"question_id": 1, "answers": [{"answer": "black and white"}, {"answer": "black"}]},
        {"question_id": 2, "answers": [{"answer": "yes"}]},
        {"question_id": 3, "answers": [{"answer": "yes"}]},
        {"question_id": 4, "answers": [{"answer": "yes"}]},
        {"question_id": 5, "answers": [{"answer": "yes"}]},
        {"question_id": 6, "answers": [{"answer": "yes"}]}
    ]}"#;

    /// Writes both JSON files into `dir` and returns a config
    /// pointing at them with output going to `dir/out`.
    fn write_inputs(dir: &Path) -> DatasetConfig {
        let q = dir.join("q.json");
        let a = dir.join("a.json");
        fs::write(&q, QUESTIONS).unwrap();
        fs::write(&a, ANNOTATIONS).unwrap();

        DatasetConfig {
            questions_path:   q.display().to_string(),
            annotations_path: a.display().to_string(),
            output_dir:       dir.join("out").display().to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_writes_all_artefacts() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = write_inputs(dir.path());
        let out = dir.path().join("out");

        let summary = PrepareUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(summary.answers, 6);
        assert_eq!(summary.answer_vocab, 2);
        assert_eq!(summary.train, 5);
        assert_eq!(summary.test, 1);

        for file in [
            "question_vocab.json",
            "answer_vocab.json",
            "question_tokenizer.json",
            "splits.json",
            "dataset_config.json",
            "answer_distribution.csv",
        ] {
            assert!(out.join(file).exists(), "missing {file}");
        }

        let saved = SplitStore::new(&out).unwrap().load_config().unwrap();
        assert_eq!(saved, cfg);
    }

    #[test]
    fn test_load_prepared_uses_saved_split() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = write_inputs(dir.path());
        let out = dir.path().join("out");
        PrepareUseCase::new(cfg.clone()).execute().unwrap();

        // a hand-edited split must win over the recomputed one
        let store = SplitStore::new(&out).unwrap();
        let edited = Splits { train: vec![0, 1, 2], test: vec![3, 4, 5] };
        store.save_splits(&edited).unwrap();

        let (saved_cfg, ds) = load_prepared(&out).unwrap();
        assert_eq!(saved_cfg, cfg);
        assert_eq!(ds.splits(), &edited);
    }

    #[test]
    fn test_load_prepared_rejects_changed_annotations() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = write_inputs(dir.path());
        PrepareUseCase::new(cfg.clone()).execute().unwrap();

        fs::write(&cfg.annotations_path, ANNOTATIONS.replace("\"black\"", "\"brown\"")).unwrap();

        let err = load_prepared(&dir.path().join("out")).unwrap_err();
        assert!(format!("{err:#}").contains("no longer match"));
    }

    #[test]
    fn test_load_prepared_without_prepare_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_prepared(&dir.path().join("missing")).unwrap_err();
        assert!(format!("{err:#}").contains("prepare"));
    }
}
