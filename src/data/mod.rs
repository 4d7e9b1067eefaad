// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between files on disk and device-ready batches.
//
//   pairs_*.txt / vocab_*.json
//       │
//       ▼
//   loader          → parses token-id pairs and vocabularies
//       │
//       ▼
//   splitter        → carves an eval set when none is given
//       │
//       ▼
//   PairDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   TranslationBatcher → EOS + right padding → Int tensors
//       │
//       ▼
//   DataLoader      → feeds batches to the training loop
//
// The normalizer sits on the inference side: it prepares raw
// sentences before tokenisation.

/// Token-id pair files and JSON vocabularies
pub mod loader;

/// Lowercasing and apostrophe/hyphen stripping for raw sentences
pub mod normalizer;

/// Burn Dataset over sentence pairs
pub mod dataset;

/// Burn Batcher: appends EOS and pads each side of a batch
pub mod batcher;

/// Seeded shuffle + train/eval split
pub mod splitter;
