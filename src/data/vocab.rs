// ============================================================
// Layer 4 — Vocabulary
// ============================================================
// A bijective mapping between tokens and integer indices.
//
// Two vocabularies are built per dataset:
//   questions: <pad>=0 <start>=1 <end>=2 <unk>=3, then words
//   answers:   answer classes only, no special tokens
//
// Words are stored in lexicographic order after the special
// tokens, so the same annotation files always produce the
// same indices.

use anyhow::{bail, Context, Result};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use crate::domain::traits::Persistable;

pub const PAD: &str   = "<pad>";
pub const START: &str = "<start>";
pub const END: &str   = "<end>";
pub const UNK: &str   = "<unk>";

/// Special tokens at the front of every question vocabulary
pub const SPECIAL_TOKENS: [&str; 4] = [PAD, START, END, UNK];

#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    itos: Vec<String>,
    stoi: HashMap<String, u32>,
}

impl Vocabulary {
    /// Build a vocabulary from `specials` followed by every distinct
    /// token in `tokens` (sorted). Tokens equal to a special are not
    /// added a second time.
    pub fn build<I, S>(specials: &[&str], tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: BTreeSet<String> = tokens
            .into_iter()
            .map(Into::into)
            .filter(|t| !specials.contains(&t.as_str()))
            .collect();

        let itos: Vec<String> = specials
            .iter()
            .map(|s| s.to_string())
            .chain(words)
            .collect();

        // specials are distinct constants, words are a set
        Self::index(itos)
    }

    /// Rebuild a vocabulary from an ordered token list.
    /// Fails on duplicates, which would break the bijection.
    pub fn from_tokens(itos: Vec<String>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for token in &itos {
            if !seen.insert(token.as_str()) {
                bail!("Duplicate token '{token}' in vocabulary");
            }
        }
        Ok(Self::index(itos))
    }

    fn index(itos: Vec<String>) -> Self {
        let stoi = itos
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32))
            .collect();
        Self { itos, stoi }
    }

    pub fn len(&self) -> usize {
        self.itos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itos.is_empty()
    }

    pub fn index_of(&self, token: &str) -> Option<u32> {
        self.stoi.get(token).copied()
    }

    pub fn token_of(&self, index: u32) -> Option<&str> {
        self.itos.get(index as usize).map(String::as_str)
    }

    pub fn tokens(&self) -> &[String] {
        &self.itos
    }

    pub fn pad_index(&self) -> Option<u32> {
        self.index_of(PAD)
    }

    pub fn unk_index(&self) -> Option<u32> {
        self.index_of(UNK)
    }

    /// Encode tokens to indices. Unknown tokens map to <unk> when this
    /// vocabulary has one; otherwise they are an error.
    pub fn encode<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<u32>> {
        let unk = self.unk_index();
        tokens
            .iter()
            .map(|t| {
                let t = t.as_ref();
                match (self.index_of(t), unk) {
                    (Some(i), _)    => Ok(i),
                    (None, Some(u)) => Ok(u),
                    (None, None)    => bail!("Token '{t}' is not in the vocabulary"),
                }
            })
            .collect()
    }

    /// Decode indices back to tokens. Out-of-range indices are an error.
    pub fn decode(&self, indices: &[u32]) -> Result<Vec<&str>> {
        indices
            .iter()
            .map(|&i| {
                self.token_of(i)
                    .with_context(|| format!("Index {i} is outside a vocabulary of {}", self.len()))
            })
            .collect()
    }
}

/// Stored as a JSON array in index order
impl Persistable for Vocabulary {
    fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.itos)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write vocabulary to '{}'", path.display()))
    }

    fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read vocabulary from '{}'", path.display()))?;
        let itos: Vec<String> = serde_json::from_str(&json)
            .with_context(|| format!("'{}' is not a JSON token list", path.display()))?;
        Self::from_tokens(itos)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn question_vocab() -> Vocabulary {
        Vocabulary::build(&SPECIAL_TOKENS, ["what", "color", "is", "what", "<pad>"])
    }

    #[test]
    fn test_specials_come_first() {
        let v = question_vocab();
        assert_eq!(v.index_of(PAD), Some(0));
        assert_eq!(v.index_of(START), Some(1));
        assert_eq!(v.index_of(END), Some(2));
        assert_eq!(v.index_of(UNK), Some(3));
        // 4 specials + color, is, what
        assert_eq!(v.len(), 7);
        assert_eq!(v.token_of(4), Some("color"));
    }

    #[test]
    fn test_mapping_is_bijective() {
        let v = question_vocab();
        for token in v.tokens() {
            let i = v.index_of(token).unwrap();
            assert_eq!(v.token_of(i), Some(token.as_str()));
        }
    }

    #[test]
    fn test_unknown_maps_to_unk() {
        let v = question_vocab();
        assert_eq!(v.encode(&["what", "zebra"]).unwrap(), vec![6, 3]);
    }

    #[test]
    fn test_unknown_without_unk_is_error() {
        let answers = Vocabulary::build(&[], ["yes", "no"]);
        assert!(answers.encode(&["maybe"]).is_err());
        assert_eq!(answers.encode(&["yes"]).unwrap(), vec![1]);
        assert_eq!(answers.pad_index(), None);
    }

    #[test]
    fn test_decode_out_of_range() {
        let v = question_vocab();
        assert_eq!(v.decode(&[1, 6, 2]).unwrap(), vec!["<start>", "what", "<end>"]);
        assert!(v.decode(&[99]).is_err());
    }

    #[test]
    fn test_duplicate_tokens_rejected() {
        let r = Vocabulary::from_tokens(vec!["a".into(), "b".into(), "a".into()]);
        assert!(r.is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.json");
        let v    = question_vocab();
        v.save(&path).unwrap();
        assert_eq!(Vocabulary::load(&path).unwrap(), v);
    }
}
