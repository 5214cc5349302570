use std::path::PathBuf;

use clap::Args;

use crate::cli::{report, AlignerArgs, LayoutArgs, OutputFormat};
use crate::round::aligner::RepeatMasker;
use crate::round::chain::{run_chain, ChainConfig};

#[derive(Args)]
pub struct ChainArgs {
    /// FASTA of unknown repeat elements
    #[arg(short, long, required = true)]
    pub unknown: PathBuf,

    /// Known library FASTA; grows with each round
    #[arg(short, long, required = true)]
    pub library: PathBuf,

    /// Parent directory for the round<N> directories
    #[arg(short, long, required = true)]
    pub outdir: PathBuf,

    /// Stop after this many rounds
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_rounds: u32,

    #[command(flatten)]
    pub aligner: AlignerArgs,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

/// Execute chain subcommand
///
/// # Errors
///
/// Returns an error if the aligner cannot be found or any round fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ChainArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let aligner = RepeatMasker::locate(args.aligner.aligner.as_deref())?;

    let config = ChainConfig {
        outdir: args.outdir.clone(),
        unknown_input: args.unknown.clone(),
        known_library: args.library.clone(),
        clade: args.aligner.clade.clone(),
        threads: args.aligner.threads as usize,
        layout: args.layout.layout(),
        tolerate_aligner_failure: args.aligner.tolerate_aligner_failure,
        max_rounds: args.max_rounds as usize,
    };

    if verbose {
        eprintln!(
            "Chaining up to {} rounds into {}",
            config.max_rounds,
            config.outdir.display()
        );
    }

    let summary = run_chain(&config, &aligner)?;
    report::print_chain(&summary, format)
}
