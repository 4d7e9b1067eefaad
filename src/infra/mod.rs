// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by several layers:
//
//   checkpoint.rs — hyperparameters + weights on disk, and the
//                   run's TrainConfig
//   metrics.rs    — per-epoch CSV log
//   tokenizer.rs  — WordTokenizer backed by the `tokenizers`
//                   BERT pre-tokenizer

/// Checkpoint saving and two-phase loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// Word splitting for inference input
pub mod tokenizer;
