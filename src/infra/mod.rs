// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that writes a dataset build to disk:
//
//   vocab_store.rs  — question/answer vocabularies as JSON,
//                     plus a HuggingFace tokenizer file for
//                     the question side
//
//   split_store.rs  — train/test index lists and the config
//                     that produced them
//
//   stats.rs        — per-answer train/test counts as CSV
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// Vocabulary and tokenizer persistence
pub mod vocab_store;

/// Split and config persistence
pub mod split_store;

/// Answer distribution CSV
pub mod stats;
