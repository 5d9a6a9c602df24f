// ============================================================
// Layer 4 — VQA Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<VqaItem> into
// one padded, length-sorted batch.
//
// Questions have different lengths, so collation works like
// this:
//
//   1. sort items by question length, longest first
//   2. max_len = length of the first (longest) question
//   3. right-pad every question with <pad> up to max_len
//   4. stack into tensors
//
// Sorting longest-first is what packed sequence models expect.
//
//   Input:  [ [1 5 2], [1 7 8 9 2], [1 2] ]        (lengths 3 5 2)
//   Output: [ [1 7 8 9 2], [1 5 2 0 0], [1 2 0 0 0] ]
//           lengths = [5 3 2]

use burn::{
    data::dataloader::{batcher::Batcher, DataLoader, DataLoaderBuilder},
    prelude::*,
};
use std::sync::Arc;

use crate::data::dataset::{VqaDataSet, VqaItem, VqaSplitDataset};
use crate::data::image::CHANNELS;
use crate::data::splitter::Split;

// ─── Plain collation ──────────────────────────────────────────────────────────

/// A sorted and padded batch before it becomes tensors
#[derive(Debug, Clone, PartialEq)]
pub struct CollatedBatch {
    pub indices:   Vec<usize>,
    /// Every question padded to max_len
    pub questions: Vec<Vec<u32>>,
    pub answers:   Vec<u32>,
    /// Lengths before padding, descending
    pub lengths:   Vec<usize>,
    pub max_len:   usize,
    /// Concatenated CHW images, only if every item had one
    pub images:    Option<Vec<f32>>,
}

/// Sort `items` by question length (longest first, ties keep their
/// order) and pad the questions with `pad`.
pub fn collate_sorted(mut items: Vec<VqaItem>, pad: u32) -> CollatedBatch {
    items.sort_by(|a, b| b.question_len.cmp(&a.question_len));

    let max_len = items.iter().map(|i| i.question_len).max().unwrap_or(0);

    let images = if !items.is_empty() && items.iter().all(|i| i.image.is_some()) {
        Some(
            items
                .iter()
                .flat_map(|i| i.image.iter().flatten().copied())
                .collect(),
        )
    } else {
        None
    };

    let mut batch = CollatedBatch {
        indices:   Vec::with_capacity(items.len()),
        questions: Vec::with_capacity(items.len()),
        answers:   Vec::with_capacity(items.len()),
        lengths:   Vec::with_capacity(items.len()),
        max_len,
        images,
    };

    for item in items {
        let mut question = item.question;
        question.resize(max_len, pad);

        batch.indices.push(item.index);
        batch.questions.push(question);
        batch.answers.push(item.answer);
        batch.lengths.push(item.question_len);
    }

    batch
}

// ─── VqaBatch ─────────────────────────────────────────────────────────────────
/// A batch of VQA examples ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct VqaBatch<B: Backend> {
    /// Positions within the split — shape: [batch_size]
    pub indices: Tensor<B, 1, Int>,

    /// Normalised images — shape: [batch_size, 3, size, size]
    pub images: Option<Tensor<B, 4>>,

    /// Padded question indices — shape: [batch_size, max_len]
    pub questions: Tensor<B, 2, Int>,

    /// Answer class per example — shape: [batch_size]
    pub answers: Tensor<B, 1, Int>,

    /// Question lengths, descending — shape: [batch_size]
    pub lengths: Tensor<B, 1, Int>,
}

impl<B: Backend> VqaBatch<B> {
    /// Questions as [max_len, batch_size], one time step per row
    pub fn questions_time_major(&self) -> Tensor<B, 2, Int> {
        self.questions.clone().transpose()
    }
}

// ─── VqaBatcher ───────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct VqaBatcher {
    pad_index:  u32,
    image_size: usize,
}

impl VqaBatcher {
    pub fn new(pad_index: u32, image_size: u32) -> Self {
        Self { pad_index, image_size: image_size as usize }
    }
}

impl<B: Backend> Batcher<B, VqaItem, VqaBatch<B>> for VqaBatcher {
    fn batch(&self, items: Vec<VqaItem>, device: &B::Device) -> VqaBatch<B> {
        let batch_size = items.len();
        let collated   = collate_sorted(items, self.pad_index);

        let to_ints = |values: &[usize]| -> Vec<i32> { values.iter().map(|&v| v as i32).collect() };

        let question_flat: Vec<i32> = collated
            .questions
            .iter()
            .flat_map(|q| q.iter().map(|&t| t as i32))
            .collect();
        let answers: Vec<i32> = collated.answers.iter().map(|&a| a as i32).collect();

        let questions = Tensor::<B, 1, Int>::from_ints(question_flat.as_slice(), device)
            .reshape([batch_size, collated.max_len]);

        let images = collated.images.map(|pixels| {
            Tensor::<B, 1>::from_floats(pixels.as_slice(), device).reshape([
                batch_size,
                CHANNELS,
                self.image_size,
                self.image_size,
            ])
        });

        VqaBatch {
            indices: Tensor::<B, 1, Int>::from_ints(to_ints(&collated.indices).as_slice(), device),
            images,
            questions,
            answers: Tensor::<B, 1, Int>::from_ints(answers.as_slice(), device),
            lengths: Tensor::<B, 1, Int>::from_ints(to_ints(&collated.lengths).as_slice(), device),
        }
    }
}

// ─── DataLoader ───────────────────────────────────────────────────────────────

/// Build a DataLoader over one split. The train split is shuffled
/// with `seed`; the test split keeps its order. Batches are created
/// on the backend's default device.
pub fn build_data_loader<B: Backend>(
    dataset:    Arc<VqaDataSet>,
    split:      Split,
    batch_size: usize,
    seed:       u64,
    image_size: Option<u32>,
) -> Arc<dyn DataLoader<B, VqaBatch<B>>> {
    let pad_index = dataset.question_vocab().pad_index().unwrap_or(0);
    let shuffle   = split == Split::Train;
    tracing::info!("batch_size: {} shuffle: {}", batch_size, shuffle);

    let mut split_dataset = VqaSplitDataset::new(dataset, split);
    if let Some(size) = image_size {
        split_dataset = split_dataset.with_images(size);
    }

    let batcher = VqaBatcher::new(pad_index, image_size.unwrap_or(0));
    let mut builder = DataLoaderBuilder::<B, _, _>::new(batcher)
        .batch_size(batch_size)
        .num_workers(1);

    if shuffle {
        builder = builder.shuffle(seed);
    }

    builder.build(split_dataset)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::DatasetConfig;
    use crate::data::dataset::fixtures;
    use std::path::PathBuf;

    type TestBackend = burn::backend::NdArray;

    fn item(index: usize, question: &[u32], answer: u32) -> VqaItem {
        VqaItem {
            index,
            image_path:   PathBuf::from(format!("{index}.jpg")),
            image:        None,
            question:     question.to_vec(),
            answer,
            question_len: question.len(),
        }
    }

    #[test]
    fn test_sorts_longest_first_and_pads() {
        let items = vec![
            item(0, &[1, 5, 2], 7),
            item(1, &[1, 7, 8, 9, 2], 8),
            item(2, &[1, 2], 9),
        ];
        let batch = collate_sorted(items, 0);

        assert_eq!(batch.indices, vec![1, 0, 2]);
        assert_eq!(batch.lengths, vec![5, 3, 2]);
        assert_eq!(batch.answers, vec![8, 7, 9]);
        assert_eq!(batch.max_len, 5);
        assert_eq!(
            batch.questions,
            vec![vec![1, 7, 8, 9, 2], vec![1, 5, 2, 0, 0], vec![1, 2, 0, 0, 0]]
        );
    }

    #[test]
    fn test_equal_lengths_keep_order() {
        let items = vec![item(4, &[1, 3, 2], 0), item(5, &[1, 4, 2], 1)];
        assert_eq!(collate_sorted(items, 0).indices, vec![4, 5]);
    }

    #[test]
    fn test_images_need_every_item() {
        let mut a = item(0, &[1, 2], 0);
        let mut b = item(1, &[1, 2], 0);
        a.image = Some(vec![1.0; 3]);
        assert!(collate_sorted(vec![a.clone(), b.clone()], 0).images.is_none());

        b.image = Some(vec![2.0; 3]);
        assert_eq!(
            collate_sorted(vec![a, b], 0).images,
            Some(vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0])
        );
    }

    #[test]
    fn test_empty_batch() {
        let batch = collate_sorted(Vec::new(), 0);
        assert_eq!(batch.max_len, 0);
        assert!(batch.questions.is_empty());
        assert!(batch.images.is_none());
    }

    #[test]
    fn test_batch_tensor_shapes() {
        let device: <TestBackend as Backend>::Device = Default::default();
        let batcher = VqaBatcher::new(0, 2);

        let mut items = vec![item(0, &[1, 5, 2], 3), item(1, &[1, 6, 7, 2], 4)];
        for i in items.iter_mut() {
            i.image = Some(vec![0.5; 3 * 2 * 2]);
        }

        let batch: VqaBatch<TestBackend> = batcher.batch(items, &device);
        assert_eq!(batch.questions.dims(), [2, 4]);
        assert_eq!(batch.questions_time_major().dims(), [4, 2]);
        assert_eq!(batch.answers.dims(), [2]);
        assert_eq!(batch.images.unwrap().dims(), [2, 3, 2, 2]);

        let lengths = batch.lengths.into_data().convert::<i64>().to_vec::<i64>().unwrap();
        assert_eq!(lengths, vec![4, 3]);

        let padded = batch.questions.into_data().convert::<i64>().to_vec::<i64>().unwrap();
        assert_eq!(padded, vec![1, 6, 7, 2, 1, 5, 2, 0]);
    }

    #[test]
    fn test_data_loader_covers_the_split() {
        let cfg = DatasetConfig::default();
        let ds  = Arc::new(VqaDataSet::build(&cfg, &fixtures::source()).unwrap());

        let loader = build_data_loader::<TestBackend>(
            ds.clone(),
            Split::Train,
            4,
            cfg.seed,
            None,
        );

        let sizes: Vec<usize> = loader.iter().map(|b| b.answers.dims()[0]).collect();
        assert_eq!(sizes.iter().sum::<usize>(), ds.split_len(Split::Train));
        assert!(sizes.iter().all(|&n| n <= 4));
    }

    fn epoch_indices(loader: &Arc<dyn DataLoader<TestBackend, VqaBatch<TestBackend>>>) -> Vec<i64> {
        loader
            .iter()
            .flat_map(|b| b.indices.into_data().convert::<i64>().to_vec::<i64>().unwrap())
            .collect()
    }

    #[test]
    fn test_test_loader_keeps_split_order() {
        let cfg = DatasetConfig::default();
        let ds  = Arc::new(VqaDataSet::build(&cfg, &fixtures::uniform_source(30)).unwrap());
        assert_eq!(ds.split_len(Split::Test), 6);

        let loader = build_data_loader::<TestBackend>(ds, Split::Test, 2, cfg.seed, None);
        assert_eq!(epoch_indices(&loader), (0..6).collect::<Vec<i64>>());
    }

    #[test]
    fn test_train_loader_order_follows_seed() {
        let cfg = DatasetConfig::default();
        let ds  = Arc::new(VqaDataSet::build(&cfg, &fixtures::uniform_source(30)).unwrap());

        let first  = build_data_loader::<TestBackend>(ds.clone(), Split::Train, 4, cfg.seed, None);
        let second = build_data_loader::<TestBackend>(ds, Split::Train, 4, cfg.seed, None);

        let order = epoch_indices(&first);
        assert_eq!(order, epoch_indices(&second));

        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..24).collect::<Vec<i64>>());
    }
}
