// ============================================================
// Layer 5 — Seq2Seq Model (Burn)
// ============================================================
// GRU encoder → (optional) additive attention → GRU decoder,
// driven one token at a time by a greedy decode loop.
//
//   source ids [batch, L]
//       │ PaddedEmbedding + GRU
//       ▼
//   encoder states [batch, L, hidden_s]
//       │ attention(decoder hidden) or last state
//       ▼
//   context [batch, hidden_s] ──► Decoder step ──► logits [batch, V]
//                                     ▲               │ arg-max
//                                     └── next input ◄┘
//
// Reference: Bahdanau et al. (2015), Cho et al. (2014)

use burn::{
    module::Param,
    nn::{
        gru::{Gru, GruConfig},
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::softmax,
};

use crate::data::batcher::TranslationBatch;
use crate::domain::special_tokens::SpecialTokens;
use crate::ml::loss::masked_cross_entropy;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct Seq2SeqConfig {
    /// Source embedding rows (max source index + 1)
    pub source_vocab_size: usize,
    /// Target embedding rows and output logits (max target index + 1)
    pub target_vocab_size: usize,
    #[config(default = 40)]
    pub embedding_dim_source: usize,
    #[config(default = 40)]
    pub embedding_dim_target: usize,
    #[config(default = 30)]
    pub hidden_dim_source: usize,
    #[config(default = 30)]
    pub hidden_dim_target: usize,
    #[config(default = 20)]
    pub hidden_dim_attention: usize,
    #[config(default = true)]
    pub use_attention: bool,
    #[config(default = "SpecialTokens::default()")]
    pub special_tokens: SpecialTokens,
}

impl Seq2SeqConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Seq2SeqModel<B> {
        let pad = self.special_tokens.pad;

        let encoder = Encoder::new(
            self.source_vocab_size,
            self.embedding_dim_source,
            self.hidden_dim_source,
            pad,
            device,
        );
        let decoder = Decoder::new(
            self.target_vocab_size,
            self.embedding_dim_target,
            self.hidden_dim_source,
            self.hidden_dim_target,
            pad,
            device,
        );
        let attention = self.use_attention.then(|| {
            AdditiveAttention::new(
                self.hidden_dim_attention,
                self.hidden_dim_source,
                self.hidden_dim_target,
                device,
            )
        });

        Seq2SeqModel {
            encoder,
            decoder,
            attention,
            hidden_dim_target: self.hidden_dim_target,
            pad_id: pad,
            sos_id: self.special_tokens.sos,
            eos_id: self.special_tokens.eos,
        }
    }
}

// ===== Padded embedding =====

/// Embedding lookup whose padding id always yields a zero vector,
/// so the padding row never receives gradient.
#[derive(Module, Debug)]
pub struct PaddedEmbedding<B: Backend> {
    pub embedding: Embedding<B>,
    pub pad_id:    usize,
}

impl<B: Backend> PaddedEmbedding<B> {
    pub fn new(vocab_size: usize, dim: usize, pad_id: usize, device: &B::Device) -> Self {
        Self {
            embedding: EmbeddingConfig::new(vocab_size, dim).init(device),
            pad_id,
        }
    }

    /// ids: [batch, seq] → [batch, seq, dim]
    pub fn forward(&self, ids: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let keep = ids
            .clone()
            .equal_elem(self.pad_id as i64)
            .bool_not()
            .float()
            .unsqueeze_dim::<3>(2);
        self.embedding.forward(ids) * keep
    }
}

// ===== Encoder =====

#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    pub embedding: PaddedEmbedding<B>,
    pub rnn:       Gru<B>,
}

impl<B: Backend> Encoder<B> {
    pub fn new(
        vocab_size:    usize,
        embedding_dim: usize,
        hidden_dim:    usize,
        pad_id:        usize,
        device:        &B::Device,
    ) -> Self {
        Self {
            embedding: PaddedEmbedding::new(vocab_size, embedding_dim, pad_id, device),
            rnn:       GruConfig::new(embedding_dim, hidden_dim, true).init(device),
        }
    }

    /// source: [batch, src_len] → one state per position: [batch, src_len, hidden_s]
    ///
    /// The GRU is stepped one position at a time so each state carries
    /// everything to its left; burn's multi-step `Gru::forward` reads
    /// every step's previous state from the initial state tensor.
    pub fn forward(&self, source: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let embedded = self.embedding.forward(source);
        let [batch_size, source_len, _] = embedded.dims();

        let mut hidden = Tensor::<B, 3>::zeros([batch_size, 1, self.rnn.d_hidden], &embedded.device());
        let mut states = Vec::with_capacity(source_len);

        for t in 0..source_len {
            let step = embedded.clone().slice([0..batch_size, t..t + 1]);
            hidden = self.rnn.forward(step, Some(hidden));
            states.push(hidden.clone());
        }

        Tensor::cat(states, 1)
    }
}

// ===== Additive attention =====

#[derive(Module, Debug)]
pub struct AdditiveAttention<B: Backend> {
    /// [decoder state; encoder state] → attention space
    pub ff_concat: Linear<B>,
    /// attention space → scalar score
    pub ff_score:  Linear<B>,
}

impl<B: Backend> AdditiveAttention<B> {
    pub fn new(
        hidden_dim:        usize,
        hidden_dim_source: usize,
        hidden_dim_target: usize,
        device:            &B::Device,
    ) -> Self {
        Self {
            ff_concat: LinearConfig::new(hidden_dim_source + hidden_dim_target, hidden_dim)
                .init(device),
            ff_score:  LinearConfig::new(hidden_dim, 1)
                .with_bias(false)
                .init(device),
        }
    }

    /// decoder_state: [batch, hidden_t], encoder_states: [batch, src_len, hidden_s]
    /// → (context [batch, hidden_s], weights [batch, src_len])
    ///
    /// Weights are a softmax over source positions: each row sums to 1.
    pub fn forward(
        &self,
        decoder_state:  Tensor<B, 2>,
        encoder_states: Tensor<B, 3>,
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let [batch_size, source_len, hidden_s] = encoder_states.dims();
        let [_, hidden_t] = decoder_state.dims();

        let repeated = decoder_state
            .unsqueeze_dim::<3>(1)
            .expand([batch_size, source_len, hidden_t]);

        let energy = self
            .ff_concat
            .forward(Tensor::cat(vec![repeated, encoder_states.clone()], 2))
            .tanh();
        let scores = self
            .ff_score
            .forward(energy)
            .reshape([batch_size, source_len]);

        // burn's softmax subtracts the row max before exponentiating
        let weights = softmax(scores, 1);

        let context = (weights.clone().unsqueeze_dim::<3>(2) * encoder_states)
            .sum_dim(1)
            .reshape([batch_size, hidden_s]);

        (context, weights)
    }
}

// ===== Decoder =====

#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    pub embedding:  PaddedEmbedding<B>,
    pub rnn:        Gru<B>,
    /// [context; hidden] → hidden_t
    pub ff_concat:  Linear<B>,
    /// hidden_t → target vocabulary logits
    pub predict:    Linear<B>,
    pub hidden_dim: usize,
}

impl<B: Backend> Decoder<B> {
    pub fn new(
        vocab_size:        usize,
        embedding_dim:     usize,
        hidden_dim_source: usize,
        hidden_dim:        usize,
        pad_id:            usize,
        device:            &B::Device,
    ) -> Self {
        Self {
            embedding:  PaddedEmbedding::new(vocab_size, embedding_dim, pad_id, device),
            rnn:        GruConfig::new(embedding_dim, hidden_dim, true).init(device),
            ff_concat:  LinearConfig::new(hidden_dim_source + hidden_dim, hidden_dim).init(device),
            predict:    LinearConfig::new(hidden_dim, vocab_size).init(device),
            hidden_dim,
        }
    }

    /// One decoding step.
    /// input: [batch], context: [batch, hidden_s], hidden: [batch, hidden_t]
    /// → (unnormalised logits [batch, vocab], new hidden [batch, hidden_t])
    pub fn forward(
        &self,
        input:   Tensor<B, 1, Int>,
        context: Tensor<B, 2>,
        hidden:  Tensor<B, 2>,
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let [batch_size] = input.dims();

        let embedded = self.embedding.forward(input.reshape([batch_size, 1]));
        let hidden   = self
            .rnn
            .forward(embedded, Some(hidden.unsqueeze_dim::<3>(1)))
            .reshape([batch_size, self.hidden_dim]);

        let combined = self
            .ff_concat
            .forward(Tensor::cat(vec![context, hidden.clone()], 1))
            .tanh();

        (self.predict.forward(combined), hidden)
    }
}

// ===== Decode loop =====

/// How long the decode loop runs and what it feeds back.
pub enum DecodeMode<B: Backend> {
    /// Training and held-out evaluation: exactly `steps` steps (one
    /// logit row per target position), never stopping early.
    /// With `teacher` set, step t > 0 is fed `teacher[:, t-1]`
    /// instead of the previous arg-max.
    Training {
        steps:   usize,
        teacher: Option<Tensor<B, 2, Int>>,
    },
    /// Greedy generation: stops after `max_steps` or as soon as every
    /// sequence in the batch has produced EOS.
    Inference { max_steps: usize },
}

pub struct DecodeOutput<B: Backend> {
    /// [steps, batch, target_vocab]
    pub logits:     Tensor<B, 3>,
    /// Attention weights per step, each [batch, src_len].
    /// Only collected in inference mode with attention enabled.
    pub alignments: Vec<Tensor<B, 2>>,
}

impl<B: Backend> DecodeOutput<B> {
    pub fn steps(&self) -> usize {
        self.logits.dims()[0]
    }

    /// Arg-max token per step: [steps, batch]
    pub fn predictions(&self) -> Tensor<B, 2, Int> {
        let [steps, batch_size, _] = self.logits.dims();
        self.logits.clone().argmax(2).reshape([steps, batch_size])
    }
}

/// Per-sequence "has emitted EOS" flags for early stopping.
pub struct EosTracker<B: Backend> {
    done:   Tensor<B, 1, Int>,
    eos_id: usize,
}

impl<B: Backend> EosTracker<B> {
    pub fn new(batch_size: usize, eos_id: usize, device: &B::Device) -> Self {
        Self {
            done: Tensor::zeros([batch_size], device),
            eos_id,
        }
    }

    /// Record this step's predictions; true once every sequence
    /// has produced EOS at least once.
    pub fn observe(&mut self, predicted: Tensor<B, 1, Int>) -> bool {
        let [batch_size] = self.done.dims();
        let hit = predicted.equal_elem(self.eos_id as i64).int();
        self.done = (self.done.clone() + hit).clamp_max(1);

        let finished = self.done.clone().sum().into_scalar().elem::<i64>();
        finished == batch_size as i64
    }
}

// ===== Seq2SeqModel =====

#[derive(Module, Debug)]
pub struct Seq2SeqModel<B: Backend> {
    pub encoder:           Encoder<B>,
    pub decoder:           Decoder<B>,
    pub attention:         Option<AdditiveAttention<B>>,
    pub hidden_dim_target: usize,
    pub pad_id:            usize,
    pub sos_id:            usize,
    pub eos_id:            usize,
}

impl<B: Backend> Seq2SeqModel<B> {
    /// source: [batch, src_len], right-padded.
    ///
    /// # Panics
    /// If `src_len` is 0: there is no encoder state to attend to.
    pub fn decode(&self, source: Tensor<B, 2, Int>, mode: DecodeMode<B>) -> DecodeOutput<B> {
        let [batch_size, source_len] = source.dims();
        assert!(source_len > 0, "decode needs at least one source position");
        let device = source.device();

        let encoder_states = self.encoder.forward(source);
        let hidden_s = encoder_states.dims()[2];

        // ── INIT ──────────────────────────────────────────────────────────────
        let mut hidden = Tensor::<B, 2>::zeros([batch_size, self.hidden_dim_target], &device);
        let mut input  = Tensor::<B, 1, Int>::full([batch_size], self.sos_id as i64, &device);

        let (limit, teacher, inference) = match mode {
            DecodeMode::Training { steps, teacher } => (steps.max(1), teacher, false),
            DecodeMode::Inference { max_steps }     => (max_steps.max(1), None, true),
        };

        let mut eos      = EosTracker::<B>::new(batch_size, self.eos_id, &device);
        let mut logits   = Vec::with_capacity(limit);
        let mut alignments = Vec::new();
        let mut step     = 0;

        // ── STEP ──────────────────────────────────────────────────────────────
        loop {
            let context = match &self.attention {
                Some(attention) => {
                    let (context, weights) = attention.forward(hidden.clone(), encoder_states.clone());
                    if inference {
                        alignments.push(weights);
                    }
                    context
                }
                None => encoder_states
                    .clone()
                    .slice([0..batch_size, source_len - 1..source_len])
                    .reshape([batch_size, hidden_s]),
            };

            let (step_logits, next_hidden) = self.decoder.forward(input, context, hidden);
            hidden = next_hidden;

            let predicted = step_logits.clone().argmax(1).reshape([batch_size]);
            logits.push(step_logits.unsqueeze_dim::<3>(0));
            step += 1;

            let all_eos = inference && eos.observe(predicted.clone());
            if step >= limit || all_eos {
                break;
            }

            input = match &teacher {
                Some(targets) => targets
                    .clone()
                    .slice([0..batch_size, step - 1..step])
                    .reshape([batch_size]),
                None => predicted,
            };
        }

        // ── STOP ──────────────────────────────────────────────────────────────
        tracing::trace!("decode finished after {} steps (batch {})", step, batch_size);
        DecodeOutput {
            logits: Tensor::cat(logits, 0),
            alignments,
        }
    }

    /// Pad-ignoring cross-entropy of a batch, decoding exactly one step
    /// per target position. Logits at step t are scored against target[t].
    pub fn forward_loss(&self, batch: TranslationBatch<B>, teacher_forcing: bool) -> Tensor<B, 1> {
        let [batch_size, steps] = batch.target.dims();
        let teacher = teacher_forcing.then(|| batch.target.clone());

        let output = self.decode(batch.source, DecodeMode::Training { steps, teacher });
        let vocab  = output.logits.dims()[2];

        // logits are step-major; transpose targets to match
        let logits  = output.logits.reshape([steps * batch_size, vocab]);
        let targets = batch.target.swap_dims(0, 1).reshape([steps * batch_size]);

        masked_cross_entropy(logits, targets, self.pad_id)
    }

    /// Named shapes of every weight matrix, used to verify a loaded
    /// checkpoint against the architecture it was loaded into.
    pub fn parameter_shapes(&self) -> Vec<(String, Vec<usize>)> {
        let mut shapes = vec![
            linear_shape("encoder.embedding", &self.encoder.embedding.embedding.weight),
            linear_shape("decoder.embedding", &self.decoder.embedding.embedding.weight),
            linear_shape("decoder.ff_concat", &self.decoder.ff_concat.weight),
            linear_shape("decoder.predict",   &self.decoder.predict.weight),
        ];
        shapes.extend(gru_shapes("encoder.rnn", &self.encoder.rnn));
        shapes.extend(gru_shapes("decoder.rnn", &self.decoder.rnn));

        if let Some(attention) = &self.attention {
            shapes.push(linear_shape("attention.ff_concat", &attention.ff_concat.weight));
            shapes.push(linear_shape("attention.ff_score",  &attention.ff_score.weight));
        }
        shapes
    }
}

fn linear_shape<B: Backend>(name: &str, weight: &Param<Tensor<B, 2>>) -> (String, Vec<usize>) {
    (name.to_string(), weight.val().dims().to_vec())
}

fn gru_shapes<B: Backend>(prefix: &str, gru: &Gru<B>) -> Vec<(String, Vec<usize>)> {
    [
        ("update_gate", &gru.update_gate),
        ("reset_gate",  &gru.reset_gate),
        ("new_gate",    &gru.new_gate),
    ]
    .into_iter()
    .flat_map(|(gate, ctrl)| {
        [
            linear_shape(&format!("{prefix}.{gate}.input"),  &ctrl.input_transform.weight),
            linear_shape(&format!("{prefix}.{gate}.hidden"), &ctrl.hidden_transform.weight),
        ]
    })
    .collect()
}
