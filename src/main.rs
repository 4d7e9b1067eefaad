use anyhow::Result;
use clap::Parser;
use seq2seq_nmt::cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("seq2seq_nmt=info".parse()?),
        )
        .init();

    Cli::parse().run()
}
