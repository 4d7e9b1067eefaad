// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2.
//
//   1. `train`     — token-id pairs + vocabularies → checkpoint
//   2. `translate` — checkpoint + sentences → translations

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead};

use commands::{Commands, TrainArgs, TranslateArgs};

#[derive(Parser, Debug)]
#[command(
    name = "seq2seq-nmt",
    version,
    about = "Train a GRU encoder-decoder translator with attention, then translate sentences."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)     => run_train(args),
            Commands::Translate(args) => run_translate(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on '{}'", args.train_file);

    let checkpoint_dir = args.checkpoint_dir.clone();
    let report = TrainUseCase::new(args.into()).execute()?;

    println!(
        "Training complete after {} epoch(s){}. Best eval loss {:.4}. Checkpoint saved to '{}'.",
        report.epochs_run,
        if report.stopped_early { " (early stop)" } else { "" },
        report.best_eval_loss,
        checkpoint_dir,
    );
    Ok(())
}

fn run_translate(args: TranslateArgs) -> Result<()> {
    use crate::application::translate_use_case::TranslateUseCase;

    let use_case = TranslateUseCase::new(&args.checkpoint_dir)?;

    let sentences = if args.sentences.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<String>>>()
            .context("Cannot read sentences from stdin")?
    } else {
        args.sentences
    };

    if !args.alignment {
        for translation in use_case.translate_all(sentences.iter().map(String::as_str))? {
            println!("{translation}");
        }
        return Ok(());
    }

    for sentence in sentences.iter().filter(|s| !s.trim().is_empty()) {
        let alignment = use_case.alignment(sentence)?;
        println!("{}", alignment.target_tokens.join(" "));
        print!("{}", alignment.to_csv());
    }
    Ok(())
}
