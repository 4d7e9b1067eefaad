// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for one user-facing goal.
//
//   - No tensor code here (Layer 5)
//   - No printing here (Layer 1)
//   - No file formats here (Layers 4 and 6)

/// Vocabularies + pairs → trained checkpoint
pub mod train_use_case;

/// Checkpoint + raw sentences → translations
pub mod translate_use_case;
