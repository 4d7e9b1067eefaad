mod common;

use std::fs;

use common::{cleanup, temp_dir};
use seq2seq_nmt::application::train_use_case::{TrainConfig, TrainUseCase};
use seq2seq_nmt::domain::traits::Translate;
use seq2seq_nmt::infra::checkpoint::CheckpointManager;
use seq2seq_nmt::ml::backend::{default_device, InferBackend};
use seq2seq_nmt::ml::hyperparameters::ModelDims;
use seq2seq_nmt::ml::inferencer::Translator;

/// Toy corpus + vocabularies on disk, and a small-model config pointing at them.
fn toy_run(name: &str) -> (TrainConfig, std::path::PathBuf) {
    let dir = temp_dir(name);

    fs::write(dir.join("src.json"), r#"{"i": 4, "am": 5, "a": 6, "student": 7}"#).unwrap();
    fs::write(dir.join("tgt.json"), r#"{"je": 4, "suis": 5, "un": 6, "étudiant": 7}"#).unwrap();
    fs::write(dir.join("train.txt"), "4 5 6 7\t4 5 6 7\n4 5\t4 5\n\n6 7\t6 7\n4\t4\n").unwrap();
    fs::write(dir.join("eval.txt"), "4 5 7\t4 5 7\n").unwrap();

    let path = |f: &str| dir.join(f).to_string_lossy().into_owned();
    let cfg = TrainConfig {
        train_file:        path("train.txt"),
        eval_file:         Some(path("eval.txt")),
        source_vocab_file: path("src.json"),
        target_vocab_file: path("tgt.json"),
        checkpoint_dir:    path("ckpt"),
        dims: ModelDims {
            embedding_dim_source: 6,
            embedding_dim_target: 6,
            hidden_dim_source:    8,
            hidden_dim_target:    8,
            hidden_dim_attention: 4,
        },
        max_size:   6,
        batch_size: 2,
        ..TrainConfig::default()
    };
    (cfg, dir)
}

#[test]
fn test_zero_patience_runs_one_epoch_and_checkpoints() {
    let (cfg, dir) = toy_run("train-patience0");
    let cfg = TrainConfig { epochs: 5, patience: 0, ..cfg };

    let report = TrainUseCase::new(cfg.clone()).execute().unwrap();
    assert_eq!(report.epochs_run, 1);
    assert!(report.stopped_early);
    assert!(report.best_eval_loss.is_finite());

    let ckpt_dir = dir.join("ckpt");
    for file in ["hyperparameters.json", "model.mpk", "train_config.json", "metrics.csv"] {
        assert!(ckpt_dir.join(file).exists(), "missing {file}");
    }
    let metrics = fs::read_to_string(ckpt_dir.join("metrics.csv")).unwrap();
    assert_eq!(metrics.lines().count(), 2);

    let translator =
        Translator::<InferBackend>::from_checkpoint(&CheckpointManager::new(&ckpt_dir), default_device()).unwrap();
    let out = translator.translate("I am a student.").unwrap();
    assert!(out.split(' ').count() <= 6);

    cleanup(&dir);
}

#[test]
fn test_runs_all_epochs_with_split_eval_set() {
    let (cfg, dir) = toy_run("train-split");
    let cfg = TrainConfig { eval_file: None, eval_fraction: 0.25, epochs: 2, patience: 10, ..cfg };

    let report = TrainUseCase::new(cfg).execute().unwrap();
    assert_eq!(report.epochs_run, 2);
    assert!(!report.stopped_early);
    assert!(report.last_train_loss.is_finite());

    cleanup(&dir);
}

#[test]
fn test_out_of_range_ids_rejected_before_training() {
    let (cfg, dir) = toy_run("train-range");
    fs::write(&cfg.train_file, "4 5\t4 99\n").unwrap();

    let err = TrainUseCase::new(cfg).execute().unwrap_err();
    assert!(err.to_string().contains("target id 99"));
    assert!(!dir.join("ckpt").join("model.mpk").exists());

    cleanup(&dir);
}

#[test]
fn test_malformed_pairs_file_names_the_line() {
    let (cfg, dir) = toy_run("train-malformed");
    fs::write(&cfg.train_file, "4 5\t4 5\n4 5 4 5\n").unwrap();

    let err = TrainUseCase::new(cfg).execute().unwrap_err();
    assert!(format!("{err:#}").contains("line 2"));

    cleanup(&dir);
}
