// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// A checkpoint is a directory:
//
//   checkpoints/
//     hyperparameters.json  ← vocabularies, layer sizes, reserved ids
//     model.mpk             ← weights (NamedMpkFileRecorder, full precision)
//     train_config.json     ← the run's TrainConfig
//     metrics.csv           ← written by MetricsLogger
//
// Loading is two-phase: the header is read and validated, the
// architecture is rebuilt from it, and only then are the
// weights loaded into it. Every checked parameter shape must
// match the rebuilt architecture.

use anyhow::{anyhow, bail, Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::hyperparameters::Hyperparameters;
use crate::ml::model::{Seq2SeqModel, Seq2SeqModelRecord};

const HYPERPARAMETERS_FILE: &str = "hyperparameters.json";
const TRAIN_CONFIG_FILE:    &str = "train_config.json";
/// The recorder appends the `.mpk` extension itself.
const WEIGHTS_STEM:         &str = "model";

type WeightsRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Does not touch the filesystem; directories are created on save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the header and the weights.
    pub fn save<B: Backend>(&self, model: &Seq2SeqModel<B>, hyper: &Hyperparameters) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", self.dir.display()))?;

        let header = self.dir.join(HYPERPARAMETERS_FILE);
        fs::write(&header, serde_json::to_string_pretty(hyper)?)
            .with_context(|| format!("Cannot write '{}'", header.display()))?;

        let weights = self.dir.join(WEIGHTS_STEM);
        model
            .clone()
            .save_file(weights.clone(), &WeightsRecorder::new())
            .map_err(|e| anyhow!("Failed to save weights to '{}': {e:?}", weights.display()))?;

        tracing::info!("Checkpoint saved to '{}'", self.dir.display());
        Ok(())
    }

    /// Phase one: read and validate the header.
    pub fn load_hyperparameters(&self) -> Result<Hyperparameters> {
        let path = self.dir.join(HYPERPARAMETERS_FILE);
        let json = fs::read_to_string(&path).with_context(|| {
            format!("Cannot read '{}'. Have you run 'train' first?", path.display())
        })?;

        let hyper: Hyperparameters = serde_json::from_str(&json)
            .with_context(|| format!("Malformed '{}'", path.display()))?;
        hyper
            .validate()
            .with_context(|| format!("Invalid hyperparameters in '{}'", path.display()))?;
        Ok(hyper)
    }

    /// Phase two: rebuild the architecture and load the weights into it.
    pub fn load<B: Backend>(&self, device: &B::Device) -> Result<(Seq2SeqModel<B>, Hyperparameters)> {
        let hyper = self.load_hyperparameters()?;
        let model = self.load_weights(hyper.build::<B>(device), device)?;

        if model.attention.is_some() != hyper.use_attention {
            bail!(
                "Checkpoint '{}' declares use_attention={} but the loaded model disagrees",
                self.dir.display(),
                hyper.use_attention
            );
        }
        Ok((model, hyper))
    }

    /// Load `model.mpk` into an already-built model. Fails if the stored
    /// weights have a different set of modules or any weight shape
    /// differs from the architecture.
    pub fn load_weights<B: Backend>(
        &self,
        model:  Seq2SeqModel<B>,
        device: &B::Device,
    ) -> Result<Seq2SeqModel<B>> {
        let path     = self.dir.join(WEIGHTS_STEM);
        let expected = model.parameter_shapes();

        let record: Seq2SeqModelRecord<B> = WeightsRecorder::new()
            .load(path.clone(), device)
            .map_err(|e| anyhow!("Cannot load weights '{}.mpk': {e:?}", path.display()))?;

        // an absent optional module would otherwise load as None silently
        if record.attention.is_some() != model.attention.is_some() {
            bail!(
                "Checkpoint '{}' does not match its hyperparameters: weights {} attention, architecture {}",
                self.dir.display(),
                if record.attention.is_some() { "have" } else { "lack" },
                if model.attention.is_some() { "expects it" } else { "has none" },
            );
        }
        let model = model.load_record(record);

        let found = model.parameter_shapes();
        if found.len() != expected.len() {
            bail!(
                "Checkpoint '{}' does not match its hyperparameters: {} weight matrices loaded, expected {}",
                self.dir.display(),
                found.len(),
                expected.len()
            );
        }
        for ((name, want), (_, got)) in expected.iter().zip(found) {
            if *want != got {
                bail!(
                    "Checkpoint '{}' does not match its hyperparameters: {name} is {got:?}, expected {want:?}",
                    self.dir.display()
                );
            }
        }

        tracing::debug!("Loaded weights from '{}.mpk'", path.display());
        Ok(model)
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(TRAIN_CONFIG_FILE);

        fs::write(&path, serde_json::to_string_pretty(cfg)?)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(TRAIN_CONFIG_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }
}
