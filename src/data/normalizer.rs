// ============================================================
// Layer 4 — Sentence Normalizer
// ============================================================
// Prepares a raw sentence for word tokenisation:
//   1. lowercase
//   2. apostrophes and hyphens become spaces
//      ("don't" → "don t", "well-known" → "well known")
//
// No other punctuation is touched here; the tokenizer splits
// it off and the translator drops punctuation-only tokens.

pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, text: &str) -> String {
        text.to_lowercase()
            .chars()
            .map(|c| match c {
                '\'' | '\u{2019}' | '-' => ' ',
                c => c,
            })
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases() {
        assert_eq!(Normalizer::new().normalize("I Am A Student."), "i am a student.");
    }

    #[test]
    fn test_strips_apostrophes_and_hyphens() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("I can't"), "i can t");
        assert_eq!(n.normalize("hide-and-seek"), "hide and seek");
        assert_eq!(n.normalize("it\u{2019}s"), "it s");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(Normalizer::new().normalize(""), "");
    }
}
