// ============================================================
// Layer 4 — Word Tokenizer
// ============================================================
// Turns raw question and answer text into lowercase word tokens.
//
// The split itself is a HuggingFace `tokenizers` Split
// pre-tokenizer over WORD_PATTERN. It keeps hyphenated words
// and decimal numbers whole and splits English clitics off
// the word they attach to:
//
//   "What's the t-shirt's price? 2.5 dollars, don't you think"
//     → what 's the t-shirt 's price ? 2.5 dollars , do n't you think
//
// Answers are stricter: a usable answer must clean down to
// exactly ONE token. "red" and "t-shirt" pass, "fire truck"
// does not.

use anyhow::{anyhow, Result};
use tokenizers::pre_tokenizers::split::{Split, SplitPattern};
use tokenizers::{
    OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer, SplitDelimiterBehavior,
};

use crate::domain::annotation::AnswerRecord;

/// One alternative per token shape, tried left to right:
/// word before n't, n't, clitic, number with . or , inside,
/// hyphenated word, plain word, punctuation run.
pub const WORD_PATTERN: &str =
    r"\w+(?=n't\b)|n't\b|'(?:s|m|d|ll|re|ve)\b|\d+(?:[.,]\d+)+|\w+(?:-\w+)+|\w+|[^\w\s]+";

#[derive(Debug)]
pub struct WordTokenizer {
    pre_tokenizer: Split,
}

impl WordTokenizer {
    pub fn new() -> Result<Self> {
        // invert: the pattern matches the tokens, everything else is dropped
        let pre_tokenizer = Split::new(
            SplitPattern::Regex(WORD_PATTERN.to_string()),
            SplitDelimiterBehavior::Removed,
            true,
        )
        .map_err(|e| anyhow!("Invalid word pattern: {e}"))?;

        Ok(Self { pre_tokenizer })
    }

    /// Lowercase `text` and split it into word and punctuation tokens.
    pub fn clean(&self, text: &str) -> Result<Vec<String>> {
        let lowered = text.to_lowercase();
        let mut pretokenized = PreTokenizedString::from(lowered.as_str());

        self.pre_tokenizer
            .pre_tokenize(&mut pretokenized)
            .map_err(|e| anyhow!("Cannot tokenize '{text}': {e}"))?;

        Ok(pretokenized
            .get_splits(OffsetReferential::Original, OffsetType::Byte)
            .into_iter()
            .map(|(token, _, _)| token.to_string())
            .collect())
    }

    /// Strip every non-word character (spaces included), then clean.
    /// Returns the token only when exactly one remains.
    ///
    /// "t-shirt" → Some("tshirt"), "fire truck" → Some("firetruck"),
    /// "!!!" → None
    pub fn clean_answer(&self, answer: &str) -> Result<Option<String>> {
        let stripped: String = answer
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect();

        Ok(single_token(self.clean(&stripped)?))
    }

    /// Pick the answer for one annotation: the first answer, in file
    /// order, that cleans down to a single token.
    ///
    /// With `strip_punctuation` the answers go through clean_answer
    /// instead, which glues multi-word answers into one token.
    pub fn select_answer(
        &self,
        answers:           &[AnswerRecord],
        strip_punctuation: bool,
    ) -> Result<Option<String>> {
        for record in answers {
            let token = if strip_punctuation {
                self.clean_answer(&record.answer)?
            } else {
                single_token(self.clean(&record.answer)?)
            };

            if token.is_some() {
                return Ok(token);
            }
        }
        Ok(None)
    }
}

fn single_token(mut tokens: Vec<String>) -> Option<String> {
    if tokens.len() == 1 {
        tokens.pop()
    } else {
        None
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> WordTokenizer {
        WordTokenizer::new().unwrap()
    }

    #[test]
    fn test_lowercases_and_splits_punctuation() {
        assert_eq!(
            tokenizer().clean("What color is the BUS?").unwrap(),
            vec!["what", "color", "is", "the", "bus", "?"]
        );
    }

    #[test]
    fn test_keeps_hyphenated_words_and_decimals() {
        let t = tokenizer();
        assert_eq!(t.clean("t-shirt").unwrap(), vec!["t-shirt"]);
        assert_eq!(t.clean("2.5").unwrap(), vec!["2.5"]);
        assert_eq!(t.clean("1,000 people.").unwrap(), vec!["1,000", "people", "."]);
    }

    #[test]
    fn test_splits_clitics() {
        let t = tokenizer();
        assert_eq!(t.clean("What's that?").unwrap(), vec!["what", "'s", "that", "?"]);
        assert_eq!(t.clean("don't").unwrap(), vec!["do", "n't"]);
        assert_eq!(t.clean("they're here").unwrap(), vec!["they", "'re", "here"]);
    }

    #[test]
    fn test_empty_text_gives_no_tokens() {
        assert!(tokenizer().clean("   ").unwrap().is_empty());
    }

    #[test]
    fn test_clean_answer_strips_punctuation() {
        let t = tokenizer();
        assert_eq!(t.clean_answer("t-shirt").unwrap(), Some("tshirt".to_string()));
        assert_eq!(t.clean_answer("Yes!").unwrap(), Some("yes".to_string()));
        assert_eq!(t.clean_answer("!!!").unwrap(), None);
    }

    #[test]
    fn test_clean_answer_glues_words() {
        assert_eq!(
            tokenizer().clean_answer("fire truck").unwrap(),
            Some("firetruck".to_string())
        );
    }

    #[test]
    fn test_select_answer_takes_first_single_token() {
        let answers = vec![
            AnswerRecord::new("fire truck"),
            AnswerRecord::new("Truck"),
            AnswerRecord::new("car"),
        ];
        assert_eq!(tokenizer().select_answer(&answers, false).unwrap(), Some("truck".to_string()));
    }

    #[test]
    fn test_select_answer_keeps_hyphenated_answer() {
        let answers = vec![AnswerRecord::new("two dogs"), AnswerRecord::new("t-shirt")];
        let t = tokenizer();
        assert_eq!(t.select_answer(&answers, false).unwrap(), Some("t-shirt".to_string()));
        assert_eq!(t.select_answer(&answers, true).unwrap(), Some("twodogs".to_string()));
    }

    #[test]
    fn test_select_answer_none_when_nothing_fits() {
        let answers = vec![AnswerRecord::new("two dogs"), AnswerRecord::new("a red car")];
        assert_eq!(tokenizer().select_answer(&answers, false).unwrap(), None);
    }
}
