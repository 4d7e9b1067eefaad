// ============================================================
// Layer 5 — Translator (inference)
// ============================================================
// Raw sentence → translated sentence, greedy and one sentence
// at a time:
//
//   "I am a student."
//     normalise  → "i am a student."
//     tokenize   → ["i", "am", "a", "student", "."]
//     filter     → ["i", "am", "a", "student"]   (punctuation-only dropped)
//     ids        → [4, 5, 6, 7]
//     decode     → arg-max target ids, ≤ max_size steps
//     words      → joined with single spaces
//
// A sentence with no word tokens left is an error. Reserved ids
// come out as <PAD>/<OOV>/<SOS>/<EOS>; the EOS that ended
// decoding is part of the output.

use anyhow::{bail, Result};
use burn::prelude::*;

use crate::data::normalizer::Normalizer;
use crate::domain::special_tokens::OOV_PLACEHOLDER;
use crate::domain::traits::{Translate, WordTokenizer};
use crate::infra::{checkpoint::CheckpointManager, tokenizer::BertWordTokenizer};
use crate::ml::hyperparameters::Hyperparameters;
use crate::ml::model::{DecodeMode, DecodeOutput, Seq2SeqModel};

pub struct Translator<B: Backend> {
    model:      Seq2SeqModel<B>,
    hyper:      Hyperparameters,
    tokenizer:  Box<dyn WordTokenizer>,
    normalizer: Normalizer,
    device:     B::Device,
}

impl<B: Backend> Translator<B> {
    pub fn new(
        model:     Seq2SeqModel<B>,
        hyper:     Hyperparameters,
        tokenizer: Box<dyn WordTokenizer>,
        device:    B::Device,
    ) -> Self {
        Self { model, hyper, tokenizer, normalizer: Normalizer::new(), device }
    }

    /// Rebuild the model from a checkpoint directory.
    pub fn from_checkpoint(ckpt: &CheckpointManager, device: B::Device) -> Result<Self> {
        let (model, hyper) = ckpt.load::<B>(&device)?;
        tracing::info!(
            "Model loaded from '{}' (source language: {})",
            ckpt.dir().display(),
            hyper.source_language
        );
        Ok(Self::new(model, hyper, Box::new(BertWordTokenizer::new()), device))
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyper
    }

    /// Normalised word tokens of `sentence`, punctuation-only tokens removed.
    pub fn tokenize_source(&self, sentence: &str) -> Result<Vec<String>> {
        let normalized = self.normalizer.normalize(sentence);
        let tokens     = self.tokenizer.tokenize(&normalized, &self.hyper.source_language)?;

        Ok(tokens
            .into_iter()
            .filter(|t| t.chars().any(char::is_alphanumeric))
            .collect())
    }

    /// Source ids for `tokens`, unknown words mapped to OOV.
    pub fn source_to_ids(&self, tokens: &[String]) -> Vec<usize> {
        let oov = self.hyper.special_tokens.oov;
        tokens
            .iter()
            .map(|t| self.hyper.source_vocab.id_or(t, oov))
            .collect()
    }

    /// Target words for `ids`, reserved ids as placeholders.
    pub fn ids_to_words(&self, ids: &[usize]) -> Vec<String> {
        ids.iter()
            .map(|&id| {
                self.hyper
                    .special_tokens
                    .placeholder(id)
                    .or_else(|| self.hyper.target_vocab.word(id))
                    .unwrap_or(OOV_PLACEHOLDER)
                    .to_string()
            })
            .collect()
    }

    /// Greedy target ids for `sentence`; at most `max_size` of them.
    pub fn predict_ids(&self, sentence: &str) -> Result<Vec<usize>> {
        let (_, output) = self.run(sentence)?;
        Ok(predicted_ids(&output))
    }

    /// Translation together with the attention matrix behind it.
    pub fn alignment(&self, sentence: &str) -> Result<Alignment> {
        if self.model.attention.is_none() {
            bail!("This model was trained without attention; no alignment to show");
        }

        let (source_tokens, output) = self.run(sentence)?;

        let target_tokens = self.ids_to_words(&predicted_ids(&output));
        let weights = output
            .alignments
            .into_iter()
            .map(|step| step.into_data().iter::<f32>().collect())
            .collect();

        Ok(Alignment { source_tokens, target_tokens, weights })
    }

    fn run(&self, sentence: &str) -> Result<(Vec<String>, DecodeOutput<B>)> {
        let tokens = self.tokenize_source(sentence)?;
        if tokens.is_empty() {
            bail!("No translatable words in {sentence:?}");
        }

        let ids = self.source_to_ids(&tokens);
        tracing::debug!("Source ids: {:?}", ids);

        let flat: Vec<i32> = ids.iter().map(|&id| id as i32).collect();
        let source = Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([1, ids.len()]);

        let output = self
            .model
            .decode(source, DecodeMode::Inference { max_steps: self.hyper.max_size });
        Ok((tokens, output))
    }
}

impl<B: Backend> Translate for Translator<B> {
    fn translate(&self, sentence: &str) -> Result<String> {
        let ids = self.predict_ids(sentence)?;
        Ok(self.ids_to_words(&ids).join(" "))
    }
}

fn predicted_ids<B: Backend>(output: &DecodeOutput<B>) -> Vec<usize> {
    output
        .predictions()
        .into_data()
        .iter::<i64>()
        .map(|id| id as usize)
        .collect()
}

// ─── Alignment ────────────────────────────────────────────────────────────────
/// Attention weights of one translation: one row per generated
/// target token, one column per source token.
#[derive(Debug, Clone)]
pub struct Alignment {
    pub source_tokens: Vec<String>,
    pub target_tokens: Vec<String>,
    /// [target step][source position], each row sums to 1
    pub weights:       Vec<Vec<f32>>,
}

impl Alignment {
    /// First row: empty corner cell then source tokens.
    /// Each following row: target token then its weights.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();

        let header: Vec<String> = std::iter::once(String::new())
            .chain(self.source_tokens.iter().map(|t| csv_field(t)))
            .collect();
        out.push_str(&header.join(","));
        out.push('\n');

        for (token, row) in self.target_tokens.iter().zip(&self.weights) {
            let cells: Vec<String> = std::iter::once(csv_field(token))
                .chain(row.iter().map(|w| format!("{w:.4}")))
                .collect();
            out.push_str(&cells.join(","));
            out.push('\n');
        }
        out
    }
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_csv() {
        let a = Alignment {
            source_tokens: vec!["i".into(), "am".into()],
            target_tokens: vec!["je".into(), ",".into()],
            weights:       vec![vec![0.75, 0.25], vec![0.5, 0.5]],
        };
        assert_eq!(a.to_csv(), ",i,am\nje,0.7500,0.2500\n\",\",0.5000,0.5000\n");
    }
}
