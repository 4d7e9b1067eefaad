// ============================================================
// Layer 4 — Pair and Vocabulary Loaders
// ============================================================
// Training data format, one pair per line:
//
//   4 5 6 7<TAB>9 10 11 12 13
//
// i.e. whitespace-separated source ids, a tab, whitespace-
// separated target ids. Blank lines are skipped; anything else
// that does not parse is a fatal data-format error that names
// the offending line.
//
// Vocabularies are JSON objects mapping word → id.

use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::sentence_pair::SentencePair;
use crate::domain::traits::PairSource;
use crate::domain::vocabulary::Vocabulary;

/// Reads a tab-separated token-id file.
/// Implements the PairSource trait from Layer 3.
pub struct PairFileLoader {
    path: PathBuf,
}

impl PairFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PairSource for PairFileLoader {
    fn load_all(&self) -> Result<Vec<SentencePair>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read pairs from '{}'", self.path.display()))?;

        let pairs = parse_pairs(&content)
            .with_context(|| format!("Malformed pairs file '{}'", self.path.display()))?;

        tracing::info!("Loaded {} pairs from '{}'", pairs.len(), self.path.display());
        Ok(pairs)
    }
}

/// Parse the whole contents of a pairs file.
pub fn parse_pairs(content: &str) -> Result<Vec<SentencePair>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse_line(line).with_context(|| format!("line {}: {:?}", idx + 1, line))
        })
        .collect()
}

fn parse_line(line: &str) -> Result<SentencePair> {
    let line = line.trim_end_matches('\r');
    let mut sides = line.split('\t');

    let (Some(source), Some(target), None) = (sides.next(), sides.next(), sides.next()) else {
        bail!("expected exactly one tab separating source and target ids");
    };

    Ok(SentencePair::new(parse_ids(source)?, parse_ids(target)?))
}

fn parse_ids(side: &str) -> Result<Vec<usize>> {
    side.split_whitespace()
        .map(|tok| {
            tok.parse::<usize>()
                .with_context(|| format!("'{tok}' is not a token id"))
        })
        .collect()
}

/// Load a `{"word": id}` JSON vocabulary.
pub fn load_vocabulary(path: impl AsRef<Path>) -> Result<Vocabulary> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read vocabulary '{}'", path.display()))?;

    let vocab: Vocabulary = serde_json::from_str(&json)
        .with_context(|| format!("Vocabulary '{}' is not a word → id map", path.display()))?;

    tracing::info!(
        "Vocabulary '{}': {} words, max index {:?}",
        path.display(),
        vocab.len(),
        vocab.max_id()
    );
    Ok(vocab)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_pairs() {
        let pairs = parse_pairs("4 5 6\t7 8\n9\t10 11 12\n").unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], SentencePair::new(vec![4, 5, 6], vec![7, 8]));
        assert_eq!(pairs[1].target, vec![10, 11, 12]);
    }

    #[test]
    fn test_skips_blank_lines_and_crlf() {
        let pairs = parse_pairs("4 5\t6\r\n\n  \n7\t8 9\r\n").unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].target, vec![8, 9]);
    }

    #[test]
    fn test_missing_tab_is_fatal() {
        let err = parse_pairs("4 5\t6\n7 8 9\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn test_extra_tab_is_fatal() {
        assert!(parse_pairs("4\t5\t6\n").is_err());
    }

    #[test]
    fn test_non_numeric_id_is_fatal() {
        let err = parse_pairs("4 five\t6\n").unwrap_err();
        assert!(format!("{err:#}").contains("five"));
    }

    #[test]
    fn test_empty_side_is_allowed() {
        let pairs = parse_pairs("4 5\t\n").unwrap();
        assert!(pairs[0].target.is_empty());
    }
}
