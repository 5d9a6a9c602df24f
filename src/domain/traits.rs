// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The dataset never opens files itself. It asks an
// AnnotationSource for records, so tests can feed records
// from memory and the CLI can feed them from JSON on disk.

use anyhow::Result;
use std::path::Path;

use crate::domain::annotation::{AnnotationRecord, QuestionRecord};

// ─── AnnotationSource ─────────────────────────────────────────────────────────
/// Any component that can supply VQA questions and their annotations.
///
/// Implementations:
///   - VqaJsonLoader   → reads the two VQA JSON files
///   - InMemorySource  → records already held in memory
pub trait AnnotationSource {
    /// Load every question record and every annotation record.
    fn load(&self) -> Result<(Vec<QuestionRecord>, Vec<AnnotationRecord>)>;
}

/// Records already in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub questions:   Vec<QuestionRecord>,
    pub annotations: Vec<AnnotationRecord>,
}

impl InMemorySource {
    pub fn new(questions: Vec<QuestionRecord>, annotations: Vec<AnnotationRecord>) -> Self {
        Self { questions, annotations }
    }
}

impl AnnotationSource for InMemorySource {
    fn load(&self) -> Result<(Vec<QuestionRecord>, Vec<AnnotationRecord>)> {
        Ok((self.questions.clone(), self.annotations.clone()))
    }
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved into and restored from a directory.
///
/// Implementations:
///   - Vocabulary → token list as JSON
pub trait Persistable: Sized {
    fn save(&self, path: &Path) -> Result<()>;

    fn load(path: &Path) -> Result<Self>;
}
