// ============================================================
// Layer 3 — Reserved Token Ids
// ============================================================
// Every vocabulary reserves four ids. Their values are part of
// the model's hyperparameters and travel with the checkpoint,
// so nothing downstream hard-codes them.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

pub const PAD_PLACEHOLDER: &str = "<PAD>";
pub const OOV_PLACEHOLDER: &str = "<OOV>";
pub const SOS_PLACEHOLDER: &str = "<SOS>";
pub const EOS_PLACEHOLDER: &str = "<EOS>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTokens {
    /// Right-padding inside a batch; ignored by the loss
    pub pad: usize,
    /// Any word missing from the vocabulary
    pub oov: usize,
    /// First decoder input
    pub sos: usize,
    /// Appended to every sequence; ends inference early
    pub eos: usize,
}

impl Default for SpecialTokens {
    fn default() -> Self {
        Self { pad: 0, oov: 1, sos: 2, eos: 3 }
    }
}

impl SpecialTokens {
    pub fn new(pad: usize, oov: usize, sos: usize, eos: usize) -> Self {
        Self { pad, oov, sos, eos }
    }

    /// All four ids must be distinct.
    pub fn validate(&self) -> Result<()> {
        let ids = [self.pad, self.oov, self.sos, self.eos];
        for (i, a) in ids.iter().enumerate() {
            if ids[i + 1..].contains(a) {
                bail!(
                    "reserved token ids must be distinct (pad={}, oov={}, sos={}, eos={})",
                    self.pad, self.oov, self.sos, self.eos
                );
            }
        }
        Ok(())
    }

    /// Largest reserved id; a vocabulary must be at least this big + 1.
    pub fn max_id(&self) -> usize {
        self.pad.max(self.oov).max(self.sos).max(self.eos)
    }

    /// Literal placeholder printed in place of a reserved id.
    pub fn placeholder(&self, id: usize) -> Option<&'static str> {
        match id {
            id if id == self.pad => Some(PAD_PLACEHOLDER),
            id if id == self.oov => Some(OOV_PLACEHOLDER),
            id if id == self.eos => Some(EOS_PLACEHOLDER),
            id if id == self.sos => Some(SOS_PLACEHOLDER),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ids() {
        let t = SpecialTokens::default();
        assert_eq!((t.pad, t.oov, t.sos, t.eos), (0, 1, 2, 3));
        assert!(t.validate().is_ok());
        assert_eq!(t.max_id(), 3);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let t = SpecialTokens::new(0, 1, 1, 3);
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_placeholders() {
        let t = SpecialTokens::default();
        assert_eq!(t.placeholder(0), Some("<PAD>"));
        assert_eq!(t.placeholder(1), Some("<OOV>"));
        assert_eq!(t.placeholder(2), Some("<SOS>"));
        assert_eq!(t.placeholder(3), Some("<EOS>"));
        assert_eq!(t.placeholder(4), None);
    }
}
