mod common;

use common::{tiny_hyperparameters, B};
use seq2seq_nmt::domain::traits::Translate;
use seq2seq_nmt::infra::tokenizer::BertWordTokenizer;
use seq2seq_nmt::ml::inferencer::Translator;

fn translator(use_attention: bool, max_size: usize) -> Translator<B> {
    let device = Default::default();
    let hyper = tiny_hyperparameters(use_attention, max_size);
    let model = hyper.build::<B>(&device);
    Translator::new(model, hyper, Box::new(BertWordTokenizer::new()), device)
}

#[test]
fn test_student_sentence_maps_to_ids() {
    let t = translator(true, 30);
    let tokens = t.tokenize_source("I am a student.").unwrap();
    assert_eq!(tokens, vec!["i", "am", "a", "student"]);
    assert_eq!(t.source_to_ids(&tokens), vec![4, 5, 6, 7]);
}

#[test]
fn test_untrained_output_is_bounded() {
    let t = translator(true, 30);
    let out = t.translate("I am a student.").unwrap();
    assert!(!out.is_empty());
    assert!(out.split(' ').count() <= 30);
}

#[test]
fn test_unknown_words_and_apostrophes() {
    let t = translator(false, 5);
    let tokens = t.tokenize_source("I'm a well-known Teacher!").unwrap();
    assert_eq!(tokens, vec!["i", "m", "a", "well", "known", "teacher"]);
    assert_eq!(t.source_to_ids(&tokens), vec![4, 1, 6, 1, 1, 1]);
}

#[test]
fn test_punctuation_only_sentence_is_rejected() {
    let t = translator(true, 4);
    let err = t.predict_ids("...").unwrap_err();
    assert!(err.to_string().contains("No translatable words"));
    assert!(t.translate("  ").is_err());
}

#[test]
fn test_reserved_and_unknown_ids_become_placeholders() {
    let t = translator(true, 5);
    assert_eq!(
        t.ids_to_words(&[4, 0, 1, 2, 3, 7, 42]),
        vec!["je", "<PAD>", "<OOV>", "<SOS>", "<EOS>", "étudiant", "<OOV>"],
    );
}

#[test]
fn test_alignment_shape() {
    let t = translator(true, 6);
    let a = t.alignment("I am a student.").unwrap();

    assert_eq!(a.source_tokens, vec!["i", "am", "a", "student"]);
    assert_eq!(a.weights.len(), a.target_tokens.len());
    assert!(a.weights.iter().all(|row| row.len() == 4));
    assert_eq!(a.to_csv().lines().count(), a.target_tokens.len() + 1);
}

#[test]
fn test_alignment_requires_attention() {
    assert!(translator(false, 6).alignment("I am a student.").is_err());
}
