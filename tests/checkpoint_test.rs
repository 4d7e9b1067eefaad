mod common;

use std::fs;

use burn::prelude::*;

use common::{cleanup, temp_dir, tiny_hyperparameters, B};
use seq2seq_nmt::domain::traits::Translate;
use seq2seq_nmt::infra::{checkpoint::CheckpointManager, tokenizer::BertWordTokenizer};
use seq2seq_nmt::ml::inferencer::Translator;
use seq2seq_nmt::ml::model::DecodeMode;

#[test]
fn test_round_trip_gives_identical_predictions() {
    let device = Default::default();
    let dir = temp_dir("roundtrip");
    let ckpt = CheckpointManager::new(&dir);

    let hyper = tiny_hyperparameters(true, 8);
    let model = hyper.build::<B>(&device);
    ckpt.save(&model, &hyper).unwrap();

    let (loaded, loaded_hyper) = ckpt.load::<B>(&device).unwrap();
    assert_eq!(loaded_hyper.max_size, 8);
    assert_eq!(loaded_hyper.target_vocab.word(7), Some("étudiant"));

    let source = Tensor::<B, 1, Int>::from_ints([4, 5, 6, 7, 3], &device).reshape([1, 5]);
    let before = model.decode(source.clone(), DecodeMode::Inference { max_steps: 8 });
    let after  = loaded.decode(source, DecodeMode::Inference { max_steps: 8 });

    let before: Vec<f32> = before.logits.into_data().iter::<f32>().collect();
    let after:  Vec<f32> = after.logits.into_data().iter::<f32>().collect();
    assert_eq!(before, after);

    let original = Translator::new(model, hyper, Box::new(BertWordTokenizer::new()), device.clone());
    let restored = Translator::<B>::from_checkpoint(&ckpt, device).unwrap();
    assert_eq!(
        original.translate("I am a student.").unwrap(),
        restored.translate("I am a student.").unwrap(),
    );

    cleanup(&dir);
}

#[test]
fn test_missing_weights_fail_loudly() {
    let device = Default::default();
    let dir = temp_dir("noweights");
    let ckpt = CheckpointManager::new(&dir);

    let hyper = tiny_hyperparameters(false, 5);
    ckpt.save(&hyper.build::<B>(&device), &hyper).unwrap();
    fs::remove_file(dir.join("model.mpk")).unwrap();

    assert!(ckpt.load::<B>(&device).is_err());
    cleanup(&dir);
}

#[test]
fn test_invalid_header_rejected_before_weights() {
    let device = Default::default();
    let dir = temp_dir("badheader");
    let ckpt = CheckpointManager::new(&dir);

    let mut hyper = tiny_hyperparameters(true, 5);
    ckpt.save(&hyper.build::<B>(&device), &hyper).unwrap();

    hyper.max_size = 0;
    fs::write(dir.join("hyperparameters.json"), serde_json::to_string(&hyper).unwrap()).unwrap();

    let err = ckpt.load::<B>(&device).unwrap_err();
    assert!(format!("{err:#}").contains("max_size"));
    cleanup(&dir);
}

#[test]
fn test_attention_flag_flipped_in_header_is_rejected() {
    let device = Default::default();
    let dir = temp_dir("flipattn");
    let ckpt = CheckpointManager::new(&dir);

    let mut hyper = tiny_hyperparameters(false, 5);
    ckpt.save(&hyper.build::<B>(&device), &hyper).unwrap();

    hyper.use_attention = true;
    fs::write(dir.join("hyperparameters.json"), serde_json::to_string(&hyper).unwrap()).unwrap();

    let err = ckpt.load::<B>(&device).unwrap_err();
    assert!(format!("{err:#}").contains("attention"));
    cleanup(&dir);
}

#[test]
fn test_attention_weights_without_flag_are_rejected() {
    let device = Default::default();
    let dir = temp_dir("dropattn");
    let ckpt = CheckpointManager::new(&dir);

    let mut hyper = tiny_hyperparameters(true, 5);
    ckpt.save(&hyper.build::<B>(&device), &hyper).unwrap();

    hyper.use_attention = false;
    fs::write(dir.join("hyperparameters.json"), serde_json::to_string(&hyper).unwrap()).unwrap();

    assert!(ckpt.load::<B>(&device).is_err());
    cleanup(&dir);
}

#[test]
fn test_resized_recurrent_layer_is_rejected() {
    let device = Default::default();
    let dir = temp_dir("gruresize");
    let ckpt = CheckpointManager::new(&dir);

    let mut hyper = tiny_hyperparameters(false, 5);
    ckpt.save(&hyper.build::<B>(&device), &hyper).unwrap();

    hyper.dims.hidden_dim_source = 12;
    fs::write(dir.join("hyperparameters.json"), serde_json::to_string(&hyper).unwrap()).unwrap();

    assert!(ckpt.load::<B>(&device).is_err());
    cleanup(&dir);
}
