// ============================================================
// Layer 6 — Word Tokenizer
// ============================================================
// Splits a normalised sentence into words with the HuggingFace
// `tokenizers` BERT pre-tokenizer: whitespace boundaries, and
// every punctuation character becomes its own token.
//
//   "i am a student."  →  ["i", "am", "a", "student", "."]
//
// The BERT rules are language-independent; the language name
// is accepted so other tokenizers can be plugged in per language.

use anyhow::{anyhow, Result};
use tokenizers::{
    pre_tokenizers::bert::BertPreTokenizer, OffsetReferential, OffsetType, PreTokenizedString,
    PreTokenizer,
};

use crate::domain::traits::WordTokenizer;

pub struct BertWordTokenizer {
    inner: BertPreTokenizer,
}

impl BertWordTokenizer {
    pub fn new() -> Self {
        Self { inner: BertPreTokenizer }
    }
}

impl Default for BertWordTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl WordTokenizer for BertWordTokenizer {
    fn tokenize(&self, text: &str, language: &str) -> Result<Vec<String>> {
        let mut pre = PreTokenizedString::from(text);
        self.inner
            .pre_tokenize(&mut pre)
            .map_err(|e| anyhow!("Tokenisation error ({language}): {e}"))?;

        Ok(pre
            .get_splits(OffsetReferential::Original, OffsetType::Byte)
            .into_iter()
            .map(|(word, _, _)| word.to_string())
            .collect())
    }
}
