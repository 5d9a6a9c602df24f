// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each.
//
// Rules for this layer:
//   - No printing here (that's Layer 1)
//   - No direct file access (that's Layer 4 and 6)
//   - Only workflow coordination

/// Settings shared by every use case
pub mod config;

/// Build the dataset and write vocabularies, splits and stats
pub mod prepare_use_case;

/// Decode a few examples for a human to read
pub mod inspect_use_case;

/// Drive a Burn DataLoader over one split
pub mod iterate_use_case;
