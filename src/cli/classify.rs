use std::path::PathBuf;

use clap::Args;

use crate::cli::{report, LayoutArgs, OutputFormat, RoundTarget};
use crate::round::orchestrator::{classify_reports, RoundConfig};

#[derive(Args)]
pub struct ClassifyArgs {
    /// FASTA of unknown repeat elements
    #[arg(short, long, required = true)]
    pub unknown: PathBuf,

    /// Library FASTA the classified elements are appended to
    #[arg(short, long, required = true)]
    pub append: PathBuf,

    /// RepeatMasker report(s), combined in the order given (clade report first)
    #[arg(long = "report", required = true)]
    pub reports: Vec<PathBuf>,

    #[command(flatten)]
    pub target: RoundTarget,

    #[command(flatten)]
    pub layout: LayoutArgs,
}

/// Execute classify subcommand
///
/// # Errors
///
/// Returns an error if any input cannot be read or outputs cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ClassifyArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = RoundConfig {
        outputs: args.target.outputs()?,
        unknown_input: args.unknown.clone(),
        known_library: None,
        append_target: args.append.clone(),
        clade: None,
        threads: 1,
        layout: args.layout.layout(),
        tolerate_aligner_failure: false,
    };

    if verbose {
        eprintln!(
            "Classifying {} from {} report(s)",
            config.unknown_input.display(),
            args.reports.len()
        );
    }

    let summary = classify_reports(&config, &args.reports)?;
    report::print_round(&summary, format)
}
