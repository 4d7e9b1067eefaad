// ============================================================
// Layer 5 — Masked Cross-Entropy
// ============================================================
// Token-level cross-entropy where target positions holding the
// pad id contribute nothing: they are zeroed in the numerator
// and excluded from the count in the denominator.
//
//   loss = − Σ_i mask_i · log softmax(logits_i)[target_i]
//          ─────────────────────────────────────────────
//                        max(1, Σ_i mask_i)
//
// Adding any amount of padding to a batch therefore leaves the
// loss unchanged.

use burn::{prelude::*, tensor::activation::log_softmax};

/// `logits`: [n, vocab], `targets`: [n] → scalar loss of shape [1]
pub fn masked_cross_entropy<B: Backend>(
    logits:  Tensor<B, 2>,
    targets: Tensor<B, 1, Int>,
    pad_id:  usize,
) -> Tensor<B, 1> {
    let [n, _] = logits.dims();

    let log_probs = log_softmax(logits, 1);
    let picked    = log_probs
        .gather(1, targets.clone().reshape([n, 1]))
        .reshape([n]);

    let keep  = targets.equal_elem(pad_id as i64).bool_not().float();
    let count = keep.clone().sum().clamp_min(1.0);

    (picked * keep).sum().neg() / count
}
