// ============================================================
// Layer 3 — SentencePair Domain Type
// ============================================================
// One parallel training example in token-id form.
// Source and target lengths are independent and unpadded;
// EOS and padding are added only when a batch is built.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentencePair {
    /// Source-language token ids
    pub source: Vec<usize>,

    /// Target-language token ids (no SOS, no EOS)
    pub target: Vec<usize>,
}

impl SentencePair {
    pub fn new(source: Vec<usize>, target: Vec<usize>) -> Self {
        Self { source, target }
    }

    /// Largest id on the source side, if any
    pub fn max_source_id(&self) -> Option<usize> {
        self.source.iter().copied().max()
    }

    /// Largest id on the target side, if any
    pub fn max_target_id(&self) -> Option<usize> {
        self.target.iter().copied().max()
    }
}
