// ============================================================
// Layer 3 — Processed VQA Examples
// ============================================================
// After the pipeline has picked an answer, tokenised the text
// and encoded it against the vocabularies, each question and
// answer is held in one of these two structs.
//
// A VqaAnswer points back to its question via question_id,
// the same way the annotation file does. Several answers may
// share one question.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A question ready for the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VqaQuestion {
    pub question_id: u64,
    pub image_id:    u64,

    /// The question exactly as it appeared in the file
    pub question: String,

    /// <start> + cleaned tokens + <end>
    pub tokens: Vec<String>,

    /// Question vocabulary indices, one per token
    pub encoding: Vec<u32>,

    pub image_path: PathBuf,
}

impl VqaQuestion {
    pub fn new(question_id: u64, image_id: u64, question: impl Into<String>) -> Self {
        Self {
            question_id,
            image_id,
            question:   question.into(),
            tokens:     Vec::new(),
            encoding:   Vec::new(),
            image_path: PathBuf::new(),
        }
    }

    /// Length of the encoded sequence, including <start> and <end>
    pub fn len(&self) -> usize {
        self.encoding.len()
    }
}

/// The single answer selected for a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VqaAnswer {
    pub question_id: u64,

    /// The normalised single-token answer
    pub answer: String,

    pub tokens:   Vec<String>,
    pub encoding: Vec<u32>,
}

impl VqaAnswer {
    pub fn new(question_id: u64, answer: impl Into<String>) -> Self {
        let answer = answer.into();
        Self {
            question_id,
            tokens: vec![answer.clone()],
            answer,
            encoding: Vec::new(),
        }
    }

    /// The answer class index. Answers always encode to exactly one index.
    pub fn class_index(&self) -> Option<u32> {
        self.encoding.first().copied()
    }
}
