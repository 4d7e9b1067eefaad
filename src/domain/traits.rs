// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer only talks to these traits, so the
// concrete file formats, tokenizer and model can be swapped
// without touching the workflows.

use anyhow::Result;

use crate::domain::sentence_pair::SentencePair;

// ─── PairSource ───────────────────────────────────────────────────────────────
/// Any component that can supply parallel sentence pairs.
///
/// Implementations:
///   - PairFileLoader → tab-separated token-id files
pub trait PairSource {
    /// Load every pair from this source.
    fn load_all(&self) -> Result<Vec<SentencePair>>;
}

// ─── WordTokenizer ────────────────────────────────────────────────────────────
/// Splits a (normalised) sentence into word tokens.
///
/// Implementations:
///   - BertWordTokenizer → whitespace + punctuation splitting
pub trait WordTokenizer: Send + Sync {
    /// `language` is the source language name stored with the model
    /// (e.g. "english").
    fn tokenize(&self, text: &str, language: &str) -> Result<Vec<String>>;
}

// ─── Translate ────────────────────────────────────────────────────────────────
/// Any component that turns a raw sentence into a translated one.
///
/// Implementations:
///   - Translator → greedy decoding with the trained model
pub trait Translate {
    fn translate(&self, sentence: &str) -> Result<String>;
}
