// ============================================================
// Layer 4 — VQA Dataset
// ============================================================
// Builds the whole dataset in memory, in this order:
//
//   1. load records          (AnnotationSource)
//   2. pick answers          one single-token answer per annotation
//   3. build vocabularies    questions get <start> ... <end>
//   4. encode + image paths  tokens → indices, image_id → file
//   5. stratified split      train / test per answer class
//
// VqaDataSet is the random-access view over everything.
// VqaSplitDataset is the Burn Dataset over one split, which
// is what the DataLoader actually iterates.

use anyhow::{bail, Context, Result};
use burn::data::dataset::Dataset;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::application::config::DatasetConfig;
use crate::data::image::{image_len, load_image};
use crate::data::splitter::{stratified_split, Split, Splits};
use crate::data::tokenizer::WordTokenizer;
use crate::data::vocab::{Vocabulary, END, SPECIAL_TOKENS, START};
use crate::domain::annotation::{AnnotationRecord, QuestionRecord};
use crate::domain::example::{VqaAnswer, VqaQuestion};
use crate::domain::traits::AnnotationSource;

#[derive(Debug)]
pub struct VqaDataSet {
    answers:        Vec<VqaAnswer>,
    questions:      HashMap<u64, VqaQuestion>,
    question_vocab: Vocabulary,
    answer_vocab:   Vocabulary,
    splits:         Splits,
    max_length:     Option<usize>,
    tokenizer:      WordTokenizer,
}

impl VqaDataSet {
    /// Load, tokenise, encode and split everything `source` provides.
    pub fn build(cfg: &DatasetConfig, source: &dyn AnnotationSource) -> Result<Self> {
        cfg.validate()?;
        let started = Instant::now();

        let (question_records, annotations) = source.load()?;
        let tokenizer = WordTokenizer::new()?;

        let (mut answers, mut questions) = init_qa_maps(
            &tokenizer,
            &question_records,
            &annotations,
            cfg.strip_answer_punctuation,
        )?;
        tracing::info!(
            "Kept {} of {} annotations ({} distinct questions)",
            answers.len(),
            annotations.len(),
            questions.len()
        );
        if answers.is_empty() {
            tracing::warn!("No annotation has a usable answer, the dataset is empty");
        }

        let (question_vocab, answer_vocab, max_length) =
            build_vocab(&tokenizer, &mut answers, &mut questions)?;
        tracing::info!(
            "Vocabulary sizes: {} question tokens, {} answer classes",
            question_vocab.len(),
            answer_vocab.len()
        );

        encode_and_set_image_paths(
            &mut answers,
            &mut questions,
            &question_vocab,
            &answer_vocab,
            &cfg.image_dir,
            &cfg.image_prefix,
        )?;

        let labels: Vec<&str> = answers.iter().map(|a| a.answer.as_str()).collect();
        let splits = stratified_split(&labels, cfg.test_fraction, cfg.seed)?;
        tracing::info!("Split: {} train, {} test", splits.train.len(), splits.test.len());

        tracing::info!("VQA dataset init time: {:.2?}", started.elapsed());

        Ok(Self {
            answers,
            questions,
            question_vocab,
            answer_vocab,
            splits,
            max_length,
            tokenizer,
        })
    }

    /// Number of examples (one per kept answer)
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// (distinct questions, answers)
    pub fn size(&self) -> (usize, usize) {
        (self.questions.len(), self.answers.len())
    }

    /// The example at position `idx` of `split`.
    pub fn get(&self, idx: usize, split: Split) -> Result<(&VqaQuestion, &VqaAnswer)> {
        let keys = self.splits.keys(split);
        let key  = *keys.get(idx).with_context(|| {
            format!("Index {idx} is out of range for the {split} split ({} examples)", keys.len())
        })?;

        let answer   = &self.answers[key];
        let question = self
            .questions
            .get(&answer.question_id)
            .with_context(|| format!("No question {} for answer {key}", answer.question_id))?;

        Ok((question, answer))
    }

    pub fn split_len(&self, split: Split) -> usize {
        self.splits.keys(split).len()
    }

    pub fn splits(&self) -> &Splits {
        &self.splits
    }

    /// Replace the computed split with a saved one. Every index must
    /// point at an example and no example may sit in both lists.
    pub fn apply_splits(&mut self, splits: Splits) -> Result<()> {
        let mut seen = vec![false; self.answers.len()];

        for &key in splits.train.iter().chain(&splits.test) {
            match seen.get_mut(key) {
                None       => bail!("Split index {key} is out of range ({} examples)", self.answers.len()),
                Some(true) => bail!("Example {key} appears twice in the saved splits"),
                Some(slot) => *slot = true,
            }
        }

        tracing::info!(
            "Using saved split: {} train, {} test",
            splits.train.len(),
            splits.test.len()
        );
        self.splits = splits;
        Ok(())
    }

    pub fn answers(&self) -> &[VqaAnswer] {
        &self.answers
    }

    pub fn question_vocab(&self) -> &Vocabulary {
        &self.question_vocab
    }

    pub fn answer_vocab(&self) -> &Vocabulary {
        &self.answer_vocab
    }

    /// Longest encoded question, <start> and <end> included.
    /// None when no question survived.
    pub fn max_sequence_len(&self) -> Option<usize> {
        self.max_length
    }

    /// Question indices back to a space separated sentence
    pub fn decode_question(&self, encoding: &[u32]) -> Result<String> {
        Ok(self.question_vocab.decode(encoding)?.join(" "))
    }

    pub fn decode_answer(&self, index: u32) -> Option<&str> {
        self.answer_vocab.token_of(index)
    }

    /// Encode new question text the same way dataset questions are
    /// encoded. Words outside the vocabulary become <unk>.
    pub fn encode_question(&self, text: &str) -> Result<Vec<u32>> {
        let tokens = wrap_question(self.tokenizer.clean(text)?);
        self.question_vocab.encode(tokens.as_slice())
    }
}

type QaMaps = (Vec<VqaAnswer>, HashMap<u64, VqaQuestion>);

fn init_qa_maps(
    tokenizer:         &WordTokenizer,
    question_records:  &[QuestionRecord],
    annotations:       &[AnnotationRecord],
    strip_punctuation: bool,
) -> Result<QaMaps> {
    // first record wins for a repeated question_id
    let mut by_id: HashMap<u64, &QuestionRecord> = HashMap::new();
    for q in question_records {
        by_id.entry(q.question_id).or_insert(q);
    }

    let mut answers   = Vec::new();
    let mut questions = HashMap::new();

    for ann in annotations {
        let Some(answer) = tokenizer.select_answer(&ann.answers, strip_punctuation)? else {
            continue;
        };

        let Some(record) = by_id.get(&ann.question_id) else {
            tracing::warn!("Skipping annotation for unknown question {}", ann.question_id);
            continue;
        };

        answers.push(VqaAnswer::new(ann.question_id, answer));
        questions
            .entry(ann.question_id)
            .or_insert_with(|| VqaQuestion::new(record.question_id, record.image_id, &record.question));
    }

    Ok((answers, questions))
}

fn wrap_question(tokens: Vec<String>) -> Vec<String> {
    let mut wrapped = Vec::with_capacity(tokens.len() + 2);
    wrapped.push(START.to_string());
    wrapped.extend(tokens);
    wrapped.push(END.to_string());
    wrapped
}

fn build_vocab(
    tokenizer: &WordTokenizer,
    answers:   &mut [VqaAnswer],
    questions: &mut HashMap<u64, VqaQuestion>,
) -> Result<(Vocabulary, Vocabulary, Option<usize>)> {
    let answer_vocab = Vocabulary::build(&[], answers.iter().map(|a| a.answer.clone()));

    let mut words      = Vec::new();
    let mut max_length = None;

    for question in questions.values_mut() {
        let tokens = tokenizer.clean(&question.question)?;
        words.extend(tokens.iter().cloned());

        question.tokens = wrap_question(tokens);
        max_length = max_length.max(Some(question.tokens.len()));
    }

    let question_vocab = Vocabulary::build(&SPECIAL_TOKENS, words);
    Ok((question_vocab, answer_vocab, max_length))
}

fn encode_and_set_image_paths(
    answers:        &mut [VqaAnswer],
    questions:      &mut HashMap<u64, VqaQuestion>,
    question_vocab: &Vocabulary,
    answer_vocab:   &Vocabulary,
    image_dir:      &str,
    image_prefix:   &str,
) -> Result<()> {
    for answer in answers.iter_mut() {
        answer.encoding = answer_vocab.encode(answer.tokens.as_slice())?;
    }

    for question in questions.values_mut() {
        question.encoding   = question_vocab.encode(question.tokens.as_slice())?;
        question.image_path = image_path_for(image_dir, image_prefix, question.image_id);
    }

    Ok(())
}

/// `<dir>/<prefix><image_id padded to 12 digits>.jpg`
pub fn image_path_for(image_dir: &str, prefix: &str, image_id: u64) -> PathBuf {
    let file = format!("{prefix}{image_id:012}.jpg");
    let dir  = image_dir.trim();

    if dir.is_empty() {
        PathBuf::from(file.trim())
    } else {
        Path::new(dir).join(file.trim())
    }
}

// ─── Split view for Burn ──────────────────────────────────────────────────────

/// One example as the DataLoader sees it
#[derive(Debug, Clone)]
pub struct VqaItem {
    /// Position within the split
    pub index: usize,

    pub image_path: PathBuf,

    /// CHW pixels, present only when image loading is on
    pub image: Option<Vec<f32>>,

    pub question:     Vec<u32>,
    pub answer:       u32,
    pub question_len: usize,
}

/// Burn Dataset over one split of a shared VqaDataSet
#[derive(Clone)]
pub struct VqaSplitDataset {
    dataset:    Arc<VqaDataSet>,
    split:      Split,
    image_size: Option<u32>,
}

impl VqaSplitDataset {
    pub fn new(dataset: Arc<VqaDataSet>, split: Split) -> Self {
        Self { dataset, split, image_size: None }
    }

    /// Decode every item's image at `size` x `size`
    pub fn with_images(mut self, size: u32) -> Self {
        self.image_size = Some(size);
        self
    }

    fn read_image(&self, path: &Path, size: u32) -> Vec<f32> {
        match load_image(path, size) {
            Ok(pixels) => pixels,
            Err(e) => {
                tracing::warn!("Using a blank image for '{}': {e:#}", path.display());
                vec![0.0; image_len(size)]
            }
        }
    }
}

impl Dataset<VqaItem> for VqaSplitDataset {
    fn get(&self, index: usize) -> Option<VqaItem> {
        let (question, answer) = self.dataset.get(index, self.split).ok()?;

        let image = self
            .image_size
            .map(|size| self.read_image(&question.image_path, size));

        Some(VqaItem {
            index,
            image_path:   question.image_path.clone(),
            image,
            question:     question.encoding.clone(),
            answer:       answer.class_index()?,
            question_len: question.len(),
        })
    }

    fn len(&self) -> usize {
        self.dataset.split_len(self.split)
    }
}
