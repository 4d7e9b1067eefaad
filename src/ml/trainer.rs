// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Train + evaluation loop using Burn's DataLoader and Adam.
//
//   - Training runs on TrainBackend (Autodiff<InferBackend>)
//   - model.valid() drops autodiff for the evaluation pass,
//     so the eval batcher is built on B::InnerBackend
//   - Evaluation decodes exactly one step per target position
//     (DecodeMode::Training), never stopping at EOS
//
// Early stopping compares the SUMMED evaluation loss of each
// epoch with the best seen so far; `patience` consecutive
// non-improving epochs end training. The final model (not the
// best one) is what gets checkpointed.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::TranslationBatcher, dataset::PairDataset};
use crate::domain::special_tokens::SpecialTokens;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::backend::{default_device, TrainBackend};
use crate::ml::hyperparameters::Hyperparameters;
use crate::ml::model::Seq2SeqModel;

// ─── Early stopping ───────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience:   usize,
    best:       f64,
    bad_epochs: usize,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self { patience, best: f64::INFINITY, bad_epochs: 0 }
    }

    /// Record one epoch's evaluation loss. Returns true when training
    /// should stop.
    pub fn update(&mut self, loss: f64) -> bool {
        // NaN never counts as an improvement
        if loss <= self.best {
            self.best       = loss;
            self.bad_epochs = 0;
        } else {
            self.bad_epochs += 1;
        }
        self.bad_epochs >= self.patience
    }

    pub fn best(&self) -> f64 {
        self.best
    }

    pub fn bad_epochs(&self) -> usize {
        self.bad_epochs
    }
}

// ─── Report ───────────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub epochs_run:      usize,
    pub stopped_early:   bool,
    pub best_eval_loss:  f64,
    pub last_train_loss: f64,
}

/// Train a fresh model described by `hyper` and checkpoint the result.
pub fn run_training(
    cfg:      &TrainConfig,
    hyper:    &Hyperparameters,
    train_ds: PairDataset,
    eval_ds:  PairDataset,
    ckpt:     &CheckpointManager,
) -> Result<TrainingReport> {
    let device = default_device();
    tracing::info!("Using device: {:?}", device);

    let model: Seq2SeqModel<TrainBackend> = hyper.build(&device);
    tracing::info!(
        "Model ready: vocab {}→{}, hidden {}/{}, attention={}",
        hyper.source_vocab_size(),
        hyper.target_vocab_size(),
        hyper.dims.hidden_dim_source,
        hyper.dims.hidden_dim_target,
        hyper.use_attention,
    );

    let logger = MetricsLogger::new(ckpt.dir())?;
    let (model, report) = train_loop(
        model,
        cfg,
        hyper.special_tokens,
        train_ds,
        eval_ds,
        &device,
        Some(&logger),
    )?;

    ckpt.save(&model.valid(), hyper)?;
    Ok(report)
}

/// Backend-generic epoch loop; returns the model after the last epoch.
pub fn train_loop<B: AutodiffBackend>(
    mut model: Seq2SeqModel<B>,
    cfg:       &TrainConfig,
    special:   SpecialTokens,
    train_ds:  PairDataset,
    eval_ds:   PairDataset,
    device:    &B::Device,
    logger:    Option<&MetricsLogger>,
) -> Result<(Seq2SeqModel<B>, TrainingReport)> {
    // ── Adam optimiser ────────────────────────────────────────────────────────
    let mut optim = AdamConfig::new().init();

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_loader = DataLoaderBuilder::new(TranslationBatcher::<B>::new(device.clone(), special))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_ds);

    let eval_loader = DataLoaderBuilder::new(TranslationBatcher::<B::InnerBackend>::new(device.clone(), special))
        .batch_size(cfg.eval_batch_size)
        .num_workers(1)
        .build(eval_ds);

    let mut stopper = EarlyStopping::new(cfg.patience);
    let mut report  = TrainingReport {
        epochs_run:      0,
        stopped_early:   false,
        best_eval_loss:  f64::INFINITY,
        last_train_loss: f64::NAN,
    };

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training pass ─────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let loss = model.forward_loss(batch, cfg.teacher_forcing);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            train_batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);

            tracing::debug!("epoch {} batch {}: loss={:.4}", epoch, train_batches, loss_val);
        }

        // ── Evaluation pass (no autodiff) ─────────────────────────────────────
        let model_valid = model.valid();

        let mut eval_loss_sum = 0.0f64;
        let mut eval_batches  = 0usize;

        for batch in eval_loader.iter() {
            eval_loss_sum += model_valid
                .forward_loss(batch, false)
                .into_scalar()
                .elem::<f64>();
            eval_batches += 1;
        }

        let avg_train_loss = average(train_loss_sum, train_batches);
        let avg_eval_loss  = average(eval_loss_sum, eval_batches);

        let stop = stopper.update(eval_loss_sum);

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | eval_loss={:.4} | patience={}/{}",
            epoch, cfg.epochs, avg_train_loss, avg_eval_loss,
            stopper.bad_epochs(), cfg.patience,
        );

        if let Some(logger) = logger {
            logger.log(&EpochMetrics {
                epoch,
                train_loss:       avg_train_loss,
                eval_loss:        avg_eval_loss,
                eval_loss_total:  eval_loss_sum,
                patience_counter: stopper.bad_epochs(),
            })?;
        }

        report.epochs_run      = epoch;
        report.last_train_loss = avg_train_loss;
        report.best_eval_loss  = stopper.best();

        if stop {
            report.stopped_early = epoch < cfg.epochs;
            tracing::info!("Early stopping after epoch {} (best eval loss {:.4})", epoch, stopper.best());
            break;
        }
    }

    tracing::info!("Training complete after {} epochs", report.epochs_run);
    Ok((model, report))
}

fn average(sum: f64, count: usize) -> f64 {
    if count > 0 { sum / count as f64 } else { f64::NAN }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_epoch_always_improves() {
        let mut es = EarlyStopping::new(2);
        assert!(!es.update(10.0));
        assert_eq!(es.best(), 10.0);
        assert_eq!(es.bad_epochs(), 0);
    }

    #[test]
    fn test_stops_after_patience_worse_epochs() {
        let mut es = EarlyStopping::new(2);
        assert!(!es.update(5.0));
        assert!(!es.update(6.0));
        assert!(es.update(7.0));
    }

    #[test]
    fn test_improvement_resets_counter() {
        let mut es = EarlyStopping::new(2);
        es.update(5.0);
        es.update(6.0);
        assert!(!es.update(4.0));
        assert_eq!(es.bad_epochs(), 0);
        assert_eq!(es.best(), 4.0);
        // equal loss is not "worse"
        assert!(!es.update(4.0));
        assert_eq!(es.bad_epochs(), 0);
    }

    #[test]
    fn test_zero_patience_stops_immediately() {
        let mut es = EarlyStopping::new(0);
        assert!(es.update(1.0));
    }

    #[test]
    fn test_nan_counts_as_worse() {
        let mut es = EarlyStopping::new(1);
        es.update(3.0);
        assert!(es.update(f64::NAN));
        assert_eq!(es.best(), 3.0);
    }
}
