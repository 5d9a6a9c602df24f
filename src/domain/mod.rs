// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing what a VQA
// example IS: the raw records from the annotation files,
// the processed question/answer pair, and the seams other
// layers implement.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits

/// Raw question and annotation records as stored in JSON
pub mod annotation;

/// Tokenised and encoded questions and answers
pub mod example;

/// Core abstractions (traits) that other layers implement
pub mod traits;
