// ============================================================
// Layer 2 — TranslateUseCase
// ============================================================
// Loads a checkpoint once, then translates any number of
// sentences with it.

use anyhow::Result;

use crate::domain::traits::Translate;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::backend::{default_device, InferBackend};
use crate::ml::inferencer::{Alignment, Translator};

pub struct TranslateUseCase {
    translator: Translator<InferBackend>,
}

impl TranslateUseCase {
    pub fn new(checkpoint_dir: &str) -> Result<Self> {
        let ckpt       = CheckpointManager::new(checkpoint_dir);
        let translator = Translator::from_checkpoint(&ckpt, default_device())?;
        Ok(Self { translator })
    }

    pub fn translate(&self, sentence: &str) -> Result<String> {
        self.translator.translate(sentence)
    }

    /// Blank lines are skipped.
    pub fn translate_all<'a>(&self, sentences: impl IntoIterator<Item = &'a str>) -> Result<Vec<String>> {
        sentences
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| self.translate(s))
            .collect()
    }

    pub fn alignment(&self, sentence: &str) -> Result<Alignment> {
        self.translator.alignment(sentence)
    }
}
