// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Builds the dataset and decodes a few examples of one split
// back into text, so a human can check that tokenisation,
// answer selection and image paths look right.

use anyhow::Result;
use std::path::PathBuf;

use crate::application::config::DatasetConfig;
use crate::data::{dataset::VqaDataSet, loader::VqaJsonLoader, splitter::Split};

/// One decoded example
#[derive(Debug, Clone, PartialEq)]
pub struct InspectedExample {
    pub index:       usize,
    pub question_id: u64,
    pub question:    String,
    pub decoded:     String,
    pub answer:      String,
    pub image_path:  PathBuf,
}

/// Free text run through the dataset's question encoding
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedQuestion {
    pub ids:     Vec<u32>,
    pub decoded: String,
}

pub struct InspectUseCase {
    dataset: VqaDataSet,
}

impl InspectUseCase {
    pub fn new(config: &DatasetConfig) -> Result<Self> {
        let source  = VqaJsonLoader::new(&config.questions_path, &config.annotations_path);
        let dataset = VqaDataSet::build(config, &source)?;
        Ok(Self { dataset })
    }

    pub fn from_dataset(dataset: VqaDataSet) -> Self {
        Self { dataset }
    }

    /// Decode the first `count` examples of `split`
    pub fn examples(&self, split: Split, count: usize) -> Result<Vec<InspectedExample>> {
        let n = count.min(self.dataset.split_len(split));
        let mut out = Vec::with_capacity(n);

        for index in 0..n {
            let (question, answer) = self.dataset.get(index, split)?;
            let decoded = self.dataset.decode_question(&question.encoding)?;
            let class   = answer.class_index().unwrap_or_default();

            out.push(InspectedExample {
                index,
                question_id: question.question_id,
                question:    question.question.clone(),
                decoded,
                answer:      self.dataset.decode_answer(class).unwrap_or_default().to_string(),
                image_path:  question.image_path.clone(),
            });
        }

        Ok(out)
    }

    /// Encode `text` as a new question. Unseen words show up as <unk>
    /// in the decoded form.
    pub fn encode(&self, text: &str) -> Result<EncodedQuestion> {
        let ids     = self.dataset.encode_question(text)?;
        let decoded = self.dataset.decode_question(&ids)?;
        Ok(EncodedQuestion { ids, decoded })
    }
}
