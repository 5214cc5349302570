//! Command-line interface for rep-classifier.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **round**: Run one classification round with RepeatMasker
//! - **classify**: Classify from existing RepeatMasker reports
//! - **chain**: Run rounds until the unknown set stops shrinking
//!
//! ## Usage
//!
//! ```text
//! # One round against a curated library
//! rep-classifier round -u unknown.fa -l known.fa --round 1
//!
//! # Search a clade first, append to a different library
//! rep-classifier round -u unknown.fa -l known.fa -a curated.fa --clade Mammalia -o out/r1
//!
//! # Re-classify from reports already on disk
//! rep-classifier classify -u unknown.fa -a known.fa -o out/r1 --report clade.out --report lib.out
//!
//! # Iterate to a fixed point, JSON summary for scripting
//! rep-classifier --format json chain -u unknown.fa -l known.fa -o out --threads 16
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::parsing::report::ReportLayout;

pub mod chain;
pub mod classify;
pub mod report;
pub mod round;

#[derive(Parser)]
#[command(name = "rep-classifier")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Classify unknown repeat elements from RepeatMasker hits")]
#[command(
    long_about = "rep-classifier assigns family/subfamily labels to unknown repeat consensus sequences.\n\nEach round searches the unknowns against a clade database and/or a known library, then:\n- Labels elements whose hits agree on one subfamily\n- Labels elements whose hits agree on one family\n- Leaves chimeric and unmatched elements for the next round"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Summary output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one classification round
    Round(round::RoundArgs),

    /// Classify from existing match reports without running the aligner
    Classify(classify::ClassifyArgs),

    /// Run rounds until no further elements are classified
    Chain(chain::ChainArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Where a single round writes its outputs
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct RoundTarget {
    /// Round number; outputs go to `round<N>/round<N>.{known,unknown}`
    #[arg(short, long)]
    pub round: Option<usize>,

    /// Output directory; its name is used as the round name
    #[arg(short, long)]
    pub outdir: Option<PathBuf>,
}

impl RoundTarget {
    /// # Errors
    ///
    /// Returns an error if the output directory has no usable name.
    pub fn outputs(&self) -> anyhow::Result<crate::round::orchestrator::RoundOutputs> {
        use crate::round::orchestrator::RoundOutputs;

        match (&self.round, &self.outdir) {
            (_, Some(dir)) => Ok(RoundOutputs::in_dir(dir)?),
            (Some(n), None) => Ok(RoundOutputs::numbered(std::path::Path::new("."), *n)),
            (None, None) => anyhow::bail!("either --round or --outdir is required"),
        }
    }
}

/// Report column positions (1-based)
#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Column holding the alignment score
    #[arg(long, default_value_t = ReportLayout::default().score_column)]
    pub score_column: usize,

    /// Column holding the query (unknown element) id
    #[arg(long, default_value_t = ReportLayout::default().query_column)]
    pub query_column: usize,

    /// Column holding the matched repeat name
    #[arg(long, default_value_t = ReportLayout::default().repeat_column)]
    pub repeat_column: usize,

    /// Column holding the matched class/family label
    #[arg(long, default_value_t = ReportLayout::default().class_column)]
    pub class_column: usize,

    /// Lines with fewer fields are skipped
    #[arg(long, default_value_t = ReportLayout::default().min_fields)]
    pub min_fields: usize,
}

impl LayoutArgs {
    #[must_use]
    pub fn layout(&self) -> ReportLayout {
        ReportLayout {
            score_column: self.score_column,
            query_column: self.query_column,
            repeat_column: self.repeat_column,
            class_column: self.class_column,
            min_fields: self.min_fields,
        }
    }
}

/// Options shared by commands that run the aligner
#[derive(Args, Debug)]
pub struct AlignerArgs {
    /// Clade searched before the known library (RepeatMasker -species)
    #[arg(short, long)]
    pub clade: Option<String>,

    /// Threads forwarded to the aligner
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: u32,

    /// RepeatMasker executable (name on PATH or path)
    #[arg(long)]
    pub aligner: Option<PathBuf>,

    /// Treat aligner failures as "no hits" instead of aborting
    #[arg(long)]
    pub tolerate_aligner_failure: bool,
}
