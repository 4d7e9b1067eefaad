// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// `train` and `translate` with all their flags. Defaults are the
// reference training setup (emb 40/40, hidden 30/30, att 20,
// lr 1e-3, batch 64, 4 epochs, patience 2).

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;
use crate::domain::special_tokens::SpecialTokens;
use crate::ml::hyperparameters::ModelDims;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a translation model on token-id sentence pairs
    Train(TrainArgs),

    /// Translate sentences with a trained checkpoint
    Translate(TranslateArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Training pairs: `src ids<TAB>tgt ids` per line
    #[arg(long)]
    pub train_file: String,

    /// Evaluation pairs; defaults to a held-out slice of the training pairs
    #[arg(long)]
    pub eval_file: Option<String>,

    /// Source vocabulary JSON ({"word": id})
    #[arg(long)]
    pub source_vocab: String,

    /// Target vocabulary JSON ({"word": id})
    #[arg(long)]
    pub target_vocab: String,

    /// Where hyperparameters, weights and metrics are written
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Language of source sentences, passed to the tokenizer
    #[arg(long, default_value = "english")]
    pub source_language: String,

    #[arg(long, default_value_t = 40)]
    pub embedding_dim_source: usize,

    #[arg(long, default_value_t = 40)]
    pub embedding_dim_target: usize,

    #[arg(long, default_value_t = 30)]
    pub hidden_dim_source: usize,

    #[arg(long, default_value_t = 30)]
    pub hidden_dim_target: usize,

    #[arg(long, default_value_t = 20)]
    pub hidden_dim_attention: usize,

    /// Decode from the last encoder state instead of attention
    #[arg(long)]
    pub no_attention: bool,

    /// Longest translation produced at inference time
    #[arg(long, default_value_t = 30)]
    pub max_size: usize,

    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 512)]
    pub eval_batch_size: usize,

    #[arg(long, default_value_t = 4)]
    pub epochs: usize,

    /// Consecutive non-improving epochs before stopping
    #[arg(long, default_value_t = 2)]
    pub patience: usize,

    /// Feed ground-truth target tokens to the decoder while training
    #[arg(long)]
    pub teacher_forcing: bool,

    /// Share of training pairs held out when no --eval-file is given
    #[arg(long, default_value_t = 0.1)]
    pub eval_fraction: f64,

    /// Shuffle seed for batching and the train/eval split
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, default_value_t = 0)]
    pub pad_id: usize,

    #[arg(long, default_value_t = 1)]
    pub oov_id: usize,

    #[arg(long, default_value_t = 2)]
    pub sos_id: usize,

    #[arg(long, default_value_t = 3)]
    pub eos_id: usize,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            train_file:        a.train_file,
            eval_file:         a.eval_file,
            source_vocab_file: a.source_vocab,
            target_vocab_file: a.target_vocab,
            checkpoint_dir:    a.checkpoint_dir,
            source_language:   a.source_language,
            dims: ModelDims {
                embedding_dim_source: a.embedding_dim_source,
                embedding_dim_target: a.embedding_dim_target,
                hidden_dim_source:    a.hidden_dim_source,
                hidden_dim_target:    a.hidden_dim_target,
                hidden_dim_attention: a.hidden_dim_attention,
            },
            use_attention:     !a.no_attention,
            max_size:          a.max_size,
            special_tokens:    SpecialTokens::new(a.pad_id, a.oov_id, a.sos_id, a.eos_id),
            lr:                a.lr,
            batch_size:        a.batch_size,
            eval_batch_size:   a.eval_batch_size,
            epochs:            a.epochs,
            patience:          a.patience,
            teacher_forcing:   a.teacher_forcing,
            eval_fraction:     a.eval_fraction,
            seed:              a.seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Sentences to translate; read one per line from stdin when omitted
    pub sentences: Vec<String>,

    /// Directory written by `train`
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Also print the attention matrix as CSV
    #[arg(long)]
    pub alignment: bool,
}
