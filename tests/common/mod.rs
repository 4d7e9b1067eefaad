#![allow(dead_code)]

use std::{fs, path::PathBuf};

use burn::backend::NdArray;
use seq2seq_nmt::domain::special_tokens::SpecialTokens;
use seq2seq_nmt::ml::hyperparameters::{Hyperparameters, ModelDims};

pub type B = NdArray;

/// Fresh, empty directory under the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("seq2seq-nmt-{name}-{}", std::process::id()));
    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn cleanup(dir: &PathBuf) {
    fs::remove_dir_all(dir).ok();
}

/// English → French toy setup with small layers.
pub fn tiny_hyperparameters(use_attention: bool, max_size: usize) -> Hyperparameters {
    Hyperparameters {
        source_vocab: [("i", 4), ("am", 5), ("a", 6), ("student", 7)].into_iter().collect(),
        source_language: "english".into(),
        target_vocab: [("je", 4), ("suis", 5), ("un", 6), ("étudiant", 7)].into_iter().collect(),
        dims: ModelDims {
            embedding_dim_source: 8,
            embedding_dim_target: 6,
            hidden_dim_source: 10,
            hidden_dim_target: 9,
            hidden_dim_attention: 5,
        },
        use_attention,
        special_tokens: SpecialTokens::default(),
        max_size,
    }
}
