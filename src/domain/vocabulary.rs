// ============================================================
// Layer 3 — Vocabulary
// ============================================================
// Bidirectional word <-> index mapping for one language.
// Vocabularies are built outside this program and loaded
// from JSON ({"word": id}); they never change at runtime.
//
// The embedding table is sized by the LARGEST index, not by
// the number of words: ids do not have to be contiguous.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "HashMap<String, usize>", into = "HashMap<String, usize>")]
pub struct Vocabulary {
    word_to_id: HashMap<String, usize>,
    id_to_word: HashMap<usize, String>,
}

impl From<HashMap<String, usize>> for Vocabulary {
    fn from(word_to_id: HashMap<String, usize>) -> Self {
        let id_to_word = word_to_id
            .iter()
            .map(|(word, &id)| (id, word.clone()))
            .collect();
        Self { word_to_id, id_to_word }
    }
}

impl From<Vocabulary> for HashMap<String, usize> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.word_to_id
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(w, id)| (w.into(), id))
            .collect::<HashMap<String, usize>>()
            .into()
    }
}

impl Vocabulary {
    /// Index of `word`, if known
    pub fn id(&self, word: &str) -> Option<usize> {
        self.word_to_id.get(word).copied()
    }

    /// Index of `word`, falling back to `oov` for unknown words
    pub fn id_or(&self, word: &str, oov: usize) -> usize {
        self.id(word).unwrap_or(oov)
    }

    /// Surface word for `id` (the inverse view)
    pub fn word(&self, id: usize) -> Option<&str> {
        self.id_to_word.get(&id).map(String::as_str)
    }

    pub fn max_id(&self) -> Option<usize> {
        self.word_to_id.values().copied().max()
    }

    /// Number of embedding rows needed: max index + 1
    pub fn size(&self) -> usize {
        self.max_id().map_or(0, |m| m + 1)
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.word_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_to_id.is_empty()
    }
}
