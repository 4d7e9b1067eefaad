use burn::data::dataset::Dataset;

use crate::domain::sentence_pair::SentencePair;

/// In-memory parallel corpus, read-only once built.
pub struct PairDataset {
    pairs: Vec<SentencePair>,
}

impl PairDataset {
    pub fn new(pairs: Vec<SentencePair>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[SentencePair] {
        &self.pairs
    }
}

impl Dataset<SentencePair> for PairDataset {
    fn get(&self, index: usize) -> Option<SentencePair> {
        self.pairs.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.pairs.len()
    }
}
