// ============================================================
// Layer 4 — Translation Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<SentencePair>
// into two Int tensors.
//
// Each side is handled independently:
//   1. append EOS to every sequence
//   2. right-pad with the pad id to the longest sequence
//      of that side within this batch
//
//   source:  [4 5 6]      → [4 5 6 EOS]
//            [7]          → [7 EOS PAD PAD]
//
// Tensors are batch-major: [batch_size, seq_len].

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::domain::sentence_pair::SentencePair;
use crate::domain::special_tokens::SpecialTokens;

#[derive(Debug, Clone)]
pub struct TranslationBatch<B: Backend> {
    /// Source ids — shape: [batch_size, max_source_len + 1]
    pub source: Tensor<B, 2, Int>,

    /// Target ids — shape: [batch_size, max_target_len + 1]
    /// Every row contains exactly one EOS before any padding.
    pub target: Tensor<B, 2, Int>,
}

#[derive(Clone, Debug)]
pub struct TranslationBatcher<B: Backend> {
    device: B::Device,
    special: SpecialTokens,
}

impl<B: Backend> TranslationBatcher<B> {
    pub fn new(device: B::Device, special: SpecialTokens) -> Self {
        Self { device, special }
    }

    fn side_tensor<'a>(&self, seqs: impl Iterator<Item = &'a [usize]>) -> Tensor<B, 2, Int> {
        let seqs: Vec<&[usize]> = seqs.collect();
        let (flat, max_len) = pad_with_eos(&seqs, self.special.eos, self.special.pad);
        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([seqs.len(), max_len])
    }
}

impl<B: Backend> Batcher<SentencePair, TranslationBatch<B>> for TranslationBatcher<B> {
    fn batch(&self, items: Vec<SentencePair>) -> TranslationBatch<B> {
        let source = self.side_tensor(items.iter().map(|p| p.source.as_slice()));
        let target = self.side_tensor(items.iter().map(|p| p.target.as_slice()));
        TranslationBatch { source, target }
    }
}

/// Append `eos` to each sequence, right-pad with `pad` to a common
/// length, and flatten row-major. Returns `(ids, row_len)`.
pub fn pad_with_eos(seqs: &[&[usize]], eos: usize, pad: usize) -> (Vec<i32>, usize) {
    let max_len = seqs.iter().map(|s| s.len()).max().unwrap_or(0) + 1;

    let mut flat = Vec::with_capacity(seqs.len() * max_len);
    for seq in seqs {
        flat.extend(seq.iter().map(|&id| id as i32));
        flat.push(eos as i32);
        flat.extend(std::iter::repeat(pad as i32).take(max_len - seq.len() - 1));
    }

    (flat, max_len)
}
