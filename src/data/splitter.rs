// ============================================================
// Layer 4 — Stratified Train/Test Splitter
// ============================================================
// Splits example indices into train and test so that every
// answer class keeps the same train/test proportion.
//
// For each class (in order of first appearance):
//   1. Collect the indices of its examples
//   2. Shuffle them with an RNG freshly seeded with `seed`
//   3. The first floor(n * test_fraction) go to test,
//      the rest go to train
//
// Reseeding per class keeps one class's shuffle independent
// of how many classes came before it.
//
// A class with fewer than 1 / test_fraction examples
// contributes nothing to test.

use anyhow::{bail, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

pub const DEFAULT_SEED: u64          = 9001;
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Which partition of the dataset to read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Test,
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Split::Train => write!(f, "train"),
            Split::Test  => write!(f, "test"),
        }
    }
}

/// Example indices per split, each list sorted ascending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Splits {
    pub train: Vec<usize>,
    pub test:  Vec<usize>,
}

impl Splits {
    pub fn keys(&self, split: Split) -> &[usize] {
        match split {
            Split::Train => &self.train,
            Split::Test  => &self.test,
        }
    }
}

/// Split `0..labels.len()` stratified by label.
///
/// `labels[i]` is the class of example i.
pub fn stratified_split<K>(labels: &[K], test_fraction: f64, seed: u64) -> Result<Splits>
where
    K: Eq + Hash,
{
    if !(0.0..=1.0).contains(&test_fraction) {
        bail!("test_fraction must be within [0, 1], got {test_fraction}");
    }

    // Group indices by class, remembering first-appearance order
    let mut slot_of: HashMap<&K, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>>     = Vec::new();

    for (i, label) in labels.iter().enumerate() {
        let slot = *slot_of.entry(label).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(i);
    }

    let mut splits = Splits::default();

    for mut idxes in groups {
        let mut rng = StdRng::seed_from_u64(seed);
        idxes.shuffle(&mut rng);

        let cut = ((idxes.len() as f64) * test_fraction).floor() as usize;
        splits.test.extend_from_slice(&idxes[..cut]);
        splits.train.extend_from_slice(&idxes[cut..]);
    }

    splits.train.sort_unstable();
    splits.test.sort_unstable();

    tracing::debug!(
        "Stratified split: {} classes, {} train, {} test",
        slot_of.len(),
        splits.train.len(),
        splits.test.len(),
    );

    Ok(splits)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_are_disjoint_and_complete() {
        let labels: Vec<&str> = (0..53)
            .map(|i| if i % 3 == 0 { "yes" } else if i % 3 == 1 { "no" } else { "two" })
            .collect();
        let s = stratified_split(&labels, 0.2, DEFAULT_SEED).unwrap();

        let mut all: Vec<usize> = s.train.iter().chain(&s.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..53).collect::<Vec<_>>());
    }

    #[test]
    fn test_each_class_keeps_its_proportion() {
        // 10 of class a, 20 of class b
        let labels: Vec<char> = (0..30).map(|i| if i < 10 { 'a' } else { 'b' }).collect();
        let s = stratified_split(&labels, 0.2, DEFAULT_SEED).unwrap();

        let test_a = s.test.iter().filter(|&&i| labels[i] == 'a').count();
        let test_b = s.test.iter().filter(|&&i| labels[i] == 'b').count();
        assert_eq!(test_a, 2);
        assert_eq!(test_b, 4);
        assert_eq!(s.train.len(), 24);
    }

    #[test]
    fn test_small_class_stays_in_train() {
        let labels = vec!["rare", "common", "common", "common", "common", "common", "rare"];
        let s = stratified_split(&labels, 0.2, DEFAULT_SEED).unwrap();
        assert!(s.test.iter().all(|&i| labels[i] == "common"));
        assert_eq!(s.test.len(), 1);
    }

    #[test]
    fn test_same_seed_same_split() {
        let labels: Vec<u32> = (0..100).map(|i| i % 4).collect();
        let a = stratified_split(&labels, 0.25, 7).unwrap();
        let b = stratified_split(&labels, 0.25, 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_lists_are_sorted() {
        let labels: Vec<u32> = (0..40).map(|i| i % 2).collect();
        let s = stratified_split(&labels, 0.5, DEFAULT_SEED).unwrap();
        assert!(s.train.windows(2).all(|w| w[0] < w[1]));
        assert!(s.test.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_labels() {
        let labels: Vec<u32> = Vec::new();
        let s = stratified_split(&labels, 0.2, DEFAULT_SEED).unwrap();
        assert!(s.train.is_empty());
        assert!(s.test.is_empty());
    }

    #[test]
    fn test_rejects_bad_fraction() {
        assert!(stratified_split(&[1, 2], 1.5, DEFAULT_SEED).is_err());
        assert!(stratified_split(&[1, 2], -0.1, DEFAULT_SEED).is_err());
    }
}
