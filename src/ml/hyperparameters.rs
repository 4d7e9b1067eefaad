// ============================================================
// Layer 5 — Model Hyperparameters
// ============================================================
// Everything needed to rebuild a model before its weights are
// loaded: both vocabularies, the source language, layer sizes,
// the reserved ids and the inference step limit.
//
// Stored as hyperparameters.json next to the weights; the
// target vocabulary's id → word view is rebuilt on load.

use anyhow::{bail, Result};
use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::special_tokens::SpecialTokens;
use crate::domain::vocabulary::Vocabulary;
use crate::ml::model::{Seq2SeqConfig, Seq2SeqModel};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDims {
    pub embedding_dim_source: usize,
    pub embedding_dim_target: usize,
    pub hidden_dim_source:    usize,
    pub hidden_dim_target:    usize,
    pub hidden_dim_attention: usize,
}

impl Default for ModelDims {
    fn default() -> Self {
        Self {
            embedding_dim_source: 40,
            embedding_dim_target: 40,
            hidden_dim_source:    30,
            hidden_dim_target:    30,
            hidden_dim_attention: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hyperparameters {
    pub source_vocab:    Vocabulary,
    /// Tokenizer language for incoming sentences, e.g. "english"
    pub source_language: String,
    pub target_vocab:    Vocabulary,
    pub dims:            ModelDims,
    pub use_attention:   bool,
    pub special_tokens:  SpecialTokens,
    /// Inference stops after this many decoder steps
    pub max_size:        usize,
}

impl Hyperparameters {
    pub fn validate(&self) -> Result<()> {
        self.special_tokens.validate()?;

        let d = &self.dims;
        let dims = [
            ("embedding_dim_source", d.embedding_dim_source),
            ("embedding_dim_target", d.embedding_dim_target),
            ("hidden_dim_source",    d.hidden_dim_source),
            ("hidden_dim_target",    d.hidden_dim_target),
            ("hidden_dim_attention", d.hidden_dim_attention),
        ];
        if let Some((name, _)) = dims.iter().find(|(_, v)| *v == 0) {
            bail!("{name} must be positive");
        }

        if self.max_size == 0 {
            bail!("max_size must be positive");
        }
        if self.source_vocab.is_empty() {
            bail!("source vocabulary is empty");
        }
        if self.target_vocab.is_empty() {
            bail!("target vocabulary is empty");
        }
        Ok(())
    }

    /// Embedding rows on the source side: large enough for every
    /// vocabulary id and every reserved id.
    pub fn source_vocab_size(&self) -> usize {
        self.source_vocab.size().max(self.special_tokens.max_id() + 1)
    }

    pub fn target_vocab_size(&self) -> usize {
        self.target_vocab.size().max(self.special_tokens.max_id() + 1)
    }

    pub fn model_config(&self) -> Seq2SeqConfig {
        Seq2SeqConfig::new(self.source_vocab_size(), self.target_vocab_size())
            .with_embedding_dim_source(self.dims.embedding_dim_source)
            .with_embedding_dim_target(self.dims.embedding_dim_target)
            .with_hidden_dim_source(self.dims.hidden_dim_source)
            .with_hidden_dim_target(self.dims.hidden_dim_target)
            .with_hidden_dim_attention(self.dims.hidden_dim_attention)
            .with_use_attention(self.use_attention)
            .with_special_tokens(self.special_tokens)
    }

    /// Freshly initialised model with this architecture.
    pub fn build<B: Backend>(&self, device: &B::Device) -> Seq2SeqModel<B> {
        self.model_config().init(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Hyperparameters {
        Hyperparameters {
            source_vocab:    [("i", 4), ("am", 5)].into_iter().collect(),
            source_language: "english".into(),
            target_vocab:    [("je", 4), ("suis", 9)].into_iter().collect(),
            dims:            ModelDims::default(),
            use_attention:   true,
            special_tokens:  SpecialTokens::default(),
            max_size:        30,
        }
    }

    #[test]
    fn test_vocab_sizes_from_max_index() {
        let h = sample();
        assert_eq!(h.source_vocab_size(), 6);
        assert_eq!(h.target_vocab_size(), 10);
    }

    #[test]
    fn test_reserved_ids_widen_vocab() {
        let mut h = sample();
        h.special_tokens = SpecialTokens::new(0, 1, 2, 20);
        assert_eq!(h.source_vocab_size(), 21);
    }

    #[test]
    fn test_validation() {
        assert!(sample().validate().is_ok());

        let mut h = sample();
        h.max_size = 0;
        assert!(h.validate().is_err());

        let mut h = sample();
        h.dims.hidden_dim_target = 0;
        assert!(h.validate().is_err());

        let mut h = sample();
        h.special_tokens = SpecialTokens::new(3, 1, 2, 3);
        assert!(h.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_rebuilds_inverse_view() {
        let json = serde_json::to_string(&sample()).unwrap();
        let back: Hyperparameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back.target_vocab.word(9), Some("suis"));
        assert_eq!(back.max_size, 30);
    }
}
