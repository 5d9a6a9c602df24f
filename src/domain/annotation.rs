// ============================================================
// Layer 3 — Raw Annotation Records
// ============================================================
// Mirrors the two VQA JSON files exactly as they sit on disk:
//
//   questions file:   { "questions":   [ {question_id, image_id, question}, ... ] }
//   annotations file: { "annotations": [ {question_id, answers: [...]}, ... ] }
//
// Extra fields in the files (license, info, answer_type, ...)
// are ignored by serde, so the structs only list what we use.
//
// Reference: Rust Book §5 (Structs)
//            serde documentation (derive)

use serde::{Deserialize, Serialize};

/// Top-level layout of a VQA questions file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsFile {
    pub questions: Vec<QuestionRecord>,
}

/// One natural language question about one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question_id: u64,
    pub image_id:    u64,
    pub question:    String,
}

/// Top-level layout of a VQA annotations file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationsFile {
    pub annotations: Vec<AnnotationRecord>,
}

/// The human answers collected for a single question.
/// Annotators disagree, so there are usually several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub question_id: u64,

    #[serde(default)]
    pub image_id: Option<u64>,

    pub answers: Vec<AnswerRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub answer: String,

    #[serde(default)]
    pub answer_id: Option<u32>,

    #[serde(default)]
    pub answer_confidence: Option<String>,
}

impl AnswerRecord {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer:            answer.into(),
            answer_id:         None,
            answer_confidence: None,
        }
    }
}
