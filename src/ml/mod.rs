// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn-specific model code lives here.
//
//   model.rs           — GRU encoder, additive attention, GRU
//                        decoder and the Seq2SeqModel that runs
//                        the greedy decode loop
//   loss.rs            — cross-entropy that ignores padding
//   hyperparameters.rs — the validated record a model is rebuilt
//                        from (vocabularies, dims, reserved ids)
//   trainer.rs         — epoch loop: train pass, eval pass,
//                        early stopping, final checkpoint
//   inferencer.rs      — Translator: raw sentence in, words out
//   backend.rs         — compile-time backend selection
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            Bahdanau et al. (2015) additive attention

/// Encoder / attention / decoder modules and the decode loop
pub mod model;

/// Padding-aware token-level cross-entropy
pub mod loss;

/// Architecture + vocabulary record stored with every checkpoint
pub mod hyperparameters;

/// Training loop with evaluation pass and early stopping
pub mod trainer;

/// Sentence-level translation and attention alignments
pub mod inferencer;

/// Backend type aliases (NdArray, or Wgpu with the `wgpu` feature)
pub mod backend;
