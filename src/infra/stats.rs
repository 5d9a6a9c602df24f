// ============================================================
// Layer 6 — Split Statistics
// ============================================================
// Counts how many examples of each answer class landed in
// train and in test, and writes the table to CSV:
//
//   answer,train,test
//   yes,4,1
//   red,1,0
//
// Rows are ordered by total count, most frequent first, so
// the head of the file shows the classes that dominate.

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::data::dataset::VqaDataSet;
use crate::data::splitter::Split;

const CSV_FILE: &str = "answer_distribution.csv";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerCount {
    pub answer: String,
    pub train:  usize,
    pub test:   usize,
}

impl AnswerCount {
    pub fn total(&self) -> usize {
        self.train + self.test
    }
}

#[derive(Debug, Clone, Default)]
pub struct SplitStats {
    pub rows: Vec<AnswerCount>,
}

impl SplitStats {
    pub fn from_dataset(dataset: &VqaDataSet) -> Self {
        let mut counts: HashMap<&str, AnswerCount> = HashMap::new();
        let answers = dataset.answers();

        for split in [Split::Train, Split::Test] {
            for &key in dataset.splits().keys(split) {
                let answer = answers[key].answer.as_str();
                let row = counts.entry(answer).or_insert_with(|| AnswerCount {
                    answer: answer.to_string(),
                    train:  0,
                    test:   0,
                });
                match split {
                    Split::Train => row.train += 1,
                    Split::Test  => row.test += 1,
                }
            }
        }

        let mut rows: Vec<AnswerCount> = counts.into_values().collect();
        rows.sort_by(|a, b| b.total().cmp(&a.total()).then_with(|| a.answer.cmp(&b.answer)));
        Self { rows }
    }

    /// Write the table to `<dir>/answer_distribution.csv`
    pub fn write_csv(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(CSV_FILE);

        // header written by hand so an empty table still has one
        let mut w = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;

        w.write_record(["answer", "train", "test"])?;
        for row in &self.rows {
            w.serialize(row)?;
        }
        w.flush()?;

        tracing::debug!("Wrote {} answer rows to '{}'", self.rows.len(), path.display());
        Ok(path)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::DatasetConfig;
    use crate::data::dataset::fixtures;

    #[test]
    fn test_counts_per_split() {
        let ds    = VqaDataSet::build(&DatasetConfig::default(), &fixtures::source()).unwrap();
        let stats = SplitStats::from_dataset(&ds);

        assert_eq!(stats.rows.len(), 3);
        assert_eq!(
            stats.rows[0],
            AnswerCount { answer: "yes".into(), train: 4, test: 1 }
        );
        assert_eq!(stats.rows[1].answer, "2");
    }

    #[test]
    fn test_writes_csv() {
        let dir   = tempfile::tempdir().unwrap();
        let stats = SplitStats {
            rows: vec![AnswerCount { answer: "a,b".into(), train: 2, test: 1 }],
        };

        let path = stats.write_csv(dir.path()).unwrap();
        let csv  = fs::read_to_string(path).unwrap();
        assert_eq!(csv, "answer,train,test\n\"a,b\",2,1\n");
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let dir  = tempfile::tempdir().unwrap();
        let path = SplitStats::default().write_csv(dir.path()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "answer,train,test\n");
    }
}
