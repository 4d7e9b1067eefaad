mod common;

use burn::prelude::*;

use common::{tiny_hyperparameters, B};
use seq2seq_nmt::data::batcher::TranslationBatch;
use seq2seq_nmt::ml::loss::masked_cross_entropy;

fn ints(rows: &[&[i32]], device: &<B as Backend>::Device) -> Tensor<B, 2, Int> {
    let width = rows[0].len();
    let flat: Vec<i32> = rows.iter().flat_map(|r| r.iter().copied()).collect();
    Tensor::<B, 1, Int>::from_ints(flat.as_slice(), device).reshape([rows.len(), width])
}

fn scalar(t: Tensor<B, 1>) -> f32 {
    t.into_scalar().elem::<f32>()
}

#[test]
fn test_extra_pad_rows_do_not_change_loss() {
    let device = Default::default();
    let logits = Tensor::<B, 1>::from_floats([0.2, 1.5, -0.3, 0.9, 0.0, 2.0, 0.4, -1.0], &device)
        .reshape([2, 4]);
    let targets = Tensor::<B, 1, Int>::from_ints([1, 3], &device);
    let base = scalar(masked_cross_entropy(logits.clone(), targets, 0));

    let noise = Tensor::<B, 1>::from_floats([5.0, -2.0, 0.3, 1.0, 9.0, 9.0, 9.0, 9.0], &device)
        .reshape([2, 4]);
    let padded_logits  = Tensor::cat(vec![logits, noise], 0);
    let padded_targets = Tensor::<B, 1, Int>::from_ints([1, 3, 0, 0], &device);
    let padded = scalar(masked_cross_entropy(padded_logits, padded_targets, 0));

    assert!((base - padded).abs() < 1e-6, "{base} vs {padded}");
}

#[test]
fn test_model_loss_ignores_extra_target_padding() {
    let device = Default::default();
    let model = tiny_hyperparameters(true, 5).build::<B>(&device);
    let source = ints(&[&[4, 5, 3], &[6, 3, 0]], &device);

    let short = TranslationBatch {
        source: source.clone(),
        target: ints(&[&[4, 5, 3], &[7, 3, 0]], &device),
    };
    let long = TranslationBatch {
        source,
        target: ints(&[&[4, 5, 3, 0, 0], &[7, 3, 0, 0, 0]], &device),
    };

    let a = scalar(model.forward_loss(short, false));
    let b = scalar(model.forward_loss(long, false));
    assert!((a - b).abs() < 1e-5, "{a} vs {b}");
}
