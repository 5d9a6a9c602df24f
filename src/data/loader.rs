// ============================================================
// Layer 4 — VQA JSON Loader
// ============================================================
// Loads the two VQA annotation files:
//
//   questions JSON   → Vec<QuestionRecord>
//   annotations JSON → Vec<AnnotationRecord>
//
// Both files are read with a buffered reader and parsed in
// one pass by serde_json.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::{fs::File, io::BufReader, path::{Path, PathBuf}};

use crate::domain::annotation::{AnnotationRecord, AnnotationsFile, QuestionRecord, QuestionsFile};
use crate::domain::traits::AnnotationSource;

/// Reads questions and annotations from VQA-format JSON files.
pub struct VqaJsonLoader {
    questions_path:   PathBuf,
    annotations_path: PathBuf,
}

impl VqaJsonLoader {
    pub fn new(questions_path: impl Into<PathBuf>, annotations_path: impl Into<PathBuf>) -> Self {
        Self {
            questions_path:   questions_path.into(),
            annotations_path: annotations_path.into(),
        }
    }
}

impl AnnotationSource for VqaJsonLoader {
    fn load(&self) -> Result<(Vec<QuestionRecord>, Vec<AnnotationRecord>)> {
        let questions: QuestionsFile = read_json(&self.questions_path)?;
        tracing::info!(
            "Loaded {} questions from '{}'",
            questions.questions.len(),
            self.questions_path.display()
        );

        let annotations: AnnotationsFile = read_json(&self.annotations_path)?;
        tracing::info!(
            "Loaded {} annotations from '{}'",
            annotations.annotations.len(),
            self.annotations_path.display()
        );

        Ok((questions.questions, annotations.annotations))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open '{}'", path.display()))?;

    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Cannot parse '{}'", path.display()))
}
