use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod library;
mod matching;
mod parsing;
mod round;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Round progress is logged at info; --verbose adds per-file parser detail
    let filter = if cli.verbose {
        EnvFilter::new("rep_classifier=debug,info")
    } else {
        EnvFilter::new("rep_classifier=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Round(args) => {
            cli::round::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Classify(args) => {
            cli::classify::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Chain(args) => {
            cli::chain::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
