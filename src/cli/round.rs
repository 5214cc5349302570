use std::path::PathBuf;

use clap::Args;

use crate::cli::{report, AlignerArgs, LayoutArgs, OutputFormat, RoundTarget};
use crate::round::aligner::RepeatMasker;
use crate::round::orchestrator::{Round, RoundConfig};

#[derive(Args)]
pub struct RoundArgs {
    /// FASTA of unknown repeat elements
    #[arg(short, long, required = true)]
    pub unknown: PathBuf,

    /// Known library FASTA searched by the aligner
    #[arg(short, long, required = true)]
    pub library: PathBuf,

    /// Library FASTA the classified elements are appended to (defaults to --library)
    #[arg(short, long)]
    pub append: Option<PathBuf>,

    #[command(flatten)]
    pub target: RoundTarget,

    #[command(flatten)]
    pub aligner: AlignerArgs,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

/// Execute round subcommand
///
/// # Errors
///
/// Returns an error if the aligner cannot be found or the round fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: RoundArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let aligner = RepeatMasker::locate(args.aligner.aligner.as_deref())?;

    let config = RoundConfig {
        outputs: args.target.outputs()?,
        unknown_input: args.unknown.clone(),
        known_library: Some(args.library.clone()),
        append_target: args.append.clone().unwrap_or_else(|| args.library.clone()),
        clade: args.aligner.clade.clone(),
        threads: args.aligner.threads as usize,
        layout: args.layout.layout(),
        tolerate_aligner_failure: args.aligner.tolerate_aligner_failure,
    };

    let round = Round::new(config, &aligner);
    if verbose {
        let config = round.config();
        eprintln!(
            "Round {} ({}) with {} thread(s) using {}",
            config.outputs.name,
            config.mode(),
            config.threads,
            aligner.program().display()
        );
    }

    let summary = round.run()?;
    report::print_round(&summary, format)
}
