// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the two VQA JSON files to padded tensor
// batches.
//
// The pipeline flows in this order:
//
//   questions.json + annotations.json
//       │
//       ▼
//   VqaJsonLoader     → raw question / annotation records
//       │
//       ▼
//   WordTokenizer     → lowercase word tokens, answer selection
//       │
//       ▼
//   Vocabulary        → token ↔ index, one per side
//       │
//       ▼
//   VqaDataSet        → encoded examples + image paths
//       │
//       ▼
//   stratified_split  → train / test per answer class
//       │
//       ▼
//   VqaSplitDataset   → implements Burn's Dataset trait
//       │
//       ▼
//   VqaBatcher        → sorts, pads, stacks into tensors
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the VQA questions and annotations JSON files
pub mod loader;

/// Word tokenisation and answer selection
pub mod tokenizer;

/// Bijective token ↔ index mapping
pub mod vocab;

/// Image decoding and normalisation
pub mod image;

/// The in-memory dataset and its per-split Burn view
pub mod dataset;

/// Length-sorted padding collation and DataLoader construction
pub mod batcher;

/// Stratified train/test split
pub mod splitter;
