// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load both vocabularies          (Layer 4 - data)
//   Step 2: Build + validate hyperparameters (Layer 5 - ml)
//   Step 3: Load training pairs             (Layer 4 - data)
//   Step 4: Load or split evaluation pairs  (Layer 4 - data)
//   Step 5: Reject out-of-range token ids   (Layer 2)
//   Step 6: Save the run config             (Layer 6 - infra)
//   Step 7: Run training loop + checkpoint  (Layer 5 - ml)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::PairDataset,
    loader::{load_vocabulary, PairFileLoader},
    splitter::split_train_val,
};
use crate::domain::{
    sentence_pair::SentencePair, special_tokens::SpecialTokens, traits::PairSource,
};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::hyperparameters::{Hyperparameters, ModelDims};
use crate::ml::trainer::{run_training, TrainingReport};

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything a training run needs. Saved as train_config.json
// next to the checkpoint it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub train_file:        String,
    /// Held-out pairs; when absent a fraction of train_file is used
    pub eval_file:         Option<String>,
    pub source_vocab_file: String,
    pub target_vocab_file: String,
    pub checkpoint_dir:    String,
    pub source_language:   String,

    #[serde(flatten)]
    pub dims:              ModelDims,
    pub use_attention:     bool,
    pub max_size:          usize,
    pub special_tokens:    SpecialTokens,

    pub lr:                f64,
    pub batch_size:        usize,
    pub eval_batch_size:   usize,
    pub epochs:            usize,
    pub patience:          usize,
    /// Feed ground-truth tokens to the decoder instead of its own predictions
    pub teacher_forcing:   bool,
    pub eval_fraction:     f64,
    pub seed:              u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            train_file:        "data/pairs_train_ints.txt".to_string(),
            eval_file:         None,
            source_vocab_file: "data/vocab_source.json".to_string(),
            target_vocab_file: "data/vocab_target.json".to_string(),
            checkpoint_dir:    "checkpoints".to_string(),
            source_language:   "english".to_string(),
            dims:              ModelDims::default(),
            use_attention:     true,
            max_size:          30,
            special_tokens:    SpecialTokens::default(),
            lr:                1e-3,
            batch_size:        64,
            eval_batch_size:   512,
            epochs:            4,
            patience:          2,
            teacher_forcing:   false,
            eval_fraction:     0.1,
            seed:              42,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 || self.eval_batch_size == 0 {
            bail!("batch sizes must be positive");
        }
        if self.epochs == 0 {
            bail!("epochs must be at least 1");
        }
        if self.lr.is_nan() || self.lr <= 0.0 {
            bail!("learning rate must be positive, got {}", self.lr);
        }
        if !(0.0..1.0).contains(&self.eval_fraction) {
            bail!("eval_fraction must be in [0, 1), got {}", self.eval_fraction);
        }
        Ok(())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainingReport> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Vocabularies ──────────────────────────────────────────────
        let source_vocab = load_vocabulary(&cfg.source_vocab_file)?;
        let target_vocab = load_vocabulary(&cfg.target_vocab_file)?;

        // ── Step 2: Hyperparameters ───────────────────────────────────────────
        let hyper = Hyperparameters {
            source_vocab,
            source_language: cfg.source_language.clone(),
            target_vocab,
            dims:            cfg.dims.clone(),
            use_attention:   cfg.use_attention,
            special_tokens:  cfg.special_tokens,
            max_size:        cfg.max_size,
        };
        hyper.validate()?;

        // ── Step 3: Training pairs ────────────────────────────────────────────
        let pairs = PairFileLoader::new(&cfg.train_file).load_all()?;
        if pairs.is_empty() {
            bail!("No training pairs in '{}'", cfg.train_file);
        }

        // ── Step 4: Evaluation pairs ──────────────────────────────────────────
        let (train_pairs, eval_pairs) = match &cfg.eval_file {
            Some(path) => (pairs, PairFileLoader::new(path).load_all()?),
            None => split_train_val(pairs, 1.0 - cfg.eval_fraction, cfg.seed),
        };
        tracing::info!(
            "Split: {} train, {} evaluation",
            train_pairs.len(),
            eval_pairs.len()
        );
        if eval_pairs.is_empty() {
            tracing::warn!("Evaluation set is empty; early stopping sees a zero loss every epoch");
        }

        // ── Step 5: Id range check ────────────────────────────────────────────
        check_id_range(&train_pairs, &hyper)?;
        check_id_range(&eval_pairs, &hyper)?;

        // ── Step 6: Save config ───────────────────────────────────────────────
        let ckpt = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt.save_config(cfg)?;

        // ── Step 7: Train ─────────────────────────────────────────────────────
        run_training(
            cfg,
            &hyper,
            PairDataset::new(train_pairs),
            PairDataset::new(eval_pairs),
            &ckpt,
        )
    }
}

/// Every id must index a row of its side's embedding table.
pub fn check_id_range(pairs: &[SentencePair], hyper: &Hyperparameters) -> Result<()> {
    let source_size = hyper.source_vocab_size();
    let target_size = hyper.target_vocab_size();

    for (i, pair) in pairs.iter().enumerate() {
        if let Some(id) = pair.max_source_id().filter(|&id| id >= source_size) {
            bail!("pair {}: source id {id} out of range (source vocabulary size {source_size})", i + 1);
        }
        if let Some(id) = pair.max_target_id().filter(|&id| id >= target_size) {
            bail!("pair {}: target id {id} out of range (target vocabulary size {target_size})", i + 1);
        }
    }
    Ok(())
}
