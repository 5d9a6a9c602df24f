// ============================================================
// Layer 6 — Vocabulary Store
// ============================================================
// Persists the two vocabularies so a model trained on one
// build can decode with exactly the same indices later.
//
// Files written into the output directory:
//   question_vocab.json      ordered token list
//   answer_vocab.json        ordered token list
//   question_tokenizer.json  HuggingFace WordLevel tokenizer
//
// The tokenizer JSON is written by hand in the format that
// Tokenizer::from_file() expects, so other tools can encode
// questions with the same ids without this crate.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use tokenizers::Tokenizer;

use crate::data::tokenizer::WORD_PATTERN;
use crate::data::vocab::{Vocabulary, SPECIAL_TOKENS, UNK};
use crate::domain::traits::Persistable;

const QUESTION_VOCAB: &str     = "question_vocab.json";
const ANSWER_VOCAB: &str       = "answer_vocab.json";
const QUESTION_TOKENIZER: &str = "question_tokenizer.json";

pub struct VocabStore {
    dir: PathBuf,
}

impl VocabStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write both vocabularies as JSON token lists
    pub fn save(&self, questions: &Vocabulary, answers: &Vocabulary) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        questions.save(&self.dir.join(QUESTION_VOCAB))?;
        answers.save(&self.dir.join(ANSWER_VOCAB))?;

        tracing::info!(
            "Saved vocabularies ({} question tokens, {} answers) to '{}'",
            questions.len(),
            answers.len(),
            self.dir.display()
        );
        Ok(())
    }

    /// Load (question vocabulary, answer vocabulary)
    pub fn load(&self) -> Result<(Vocabulary, Vocabulary)> {
        let questions = Vocabulary::load(&self.dir.join(QUESTION_VOCAB))?;
        let answers   = Vocabulary::load(&self.dir.join(ANSWER_VOCAB))?;
        Ok((questions, answers))
    }

    /// Write the question vocabulary as a HuggingFace WordLevel
    /// tokenizer: lowercase normaliser, the same word pattern split
    /// as WordTokenizer, <unk> for anything unseen.
    pub fn save_tokenizer(&self, questions: &Vocabulary) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let mut vocab = serde_json::Map::new();
        for (id, token) in questions.tokens().iter().enumerate() {
            vocab.insert(token.clone(), serde_json::json!(id));
        }

        let added_tokens: Vec<serde_json::Value> = SPECIAL_TOKENS
            .iter()
            .filter_map(|t| questions.index_of(t).map(|id| (id, t)))
            .map(|(id, t)| {
                serde_json::json!({
                    "id": id, "content": t, "single_word": false, "lstrip": false,
                    "rstrip": false, "normalized": false, "special": true
                })
            })
            .collect();

        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": added_tokens,
            "normalizer": { "type": "Lowercase" },
            "pre_tokenizer": {
                "type": "Split",
                "pattern": { "Regex": WORD_PATTERN },
                "behavior": "Removed",
                "invert": true
            },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": UNK
            }
        });

        let path = self.dir.join(QUESTION_TOKENIZER);
        fs::write(&path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| format!("Cannot write tokenizer JSON to '{}'", path.display()))?;

        tracing::info!("Question tokenizer saved to '{}'", path.display());
        Ok(path)
    }

    pub fn load_tokenizer(&self) -> Result<Tokenizer> {
        let path = self.dir.join(QUESTION_TOKENIZER);
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e))
    }
}
