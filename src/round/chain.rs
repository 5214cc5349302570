//! Chaining rounds: each round's `.unknown` output becomes the next round's
//! input and its `.known` output becomes the next round's library.

use std::path::PathBuf;

use tracing::info;

use crate::parsing::report::ReportLayout;
use crate::round::aligner::Aligner;
use crate::round::orchestrator::{Round, RoundConfig, RoundError, RoundOutputs, RoundSummary};

/// Why a chain stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Nothing left to classify
    Exhausted,
    /// A round classified nothing new
    NoProgress,
    /// `max_rounds` reached
    RoundLimit,
}

#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Parent directory of the `round<n>` directories
    pub outdir: PathBuf,
    pub unknown_input: PathBuf,
    /// Library searched and appended to in the first round
    pub known_library: PathBuf,
    pub clade: Option<String>,
    pub threads: usize,
    pub layout: ReportLayout,
    pub tolerate_aligner_failure: bool,
    pub max_rounds: usize,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ChainSummary {
    pub rounds: Vec<RoundSummary>,
    pub stop_reason: StopReason,
}

impl ChainSummary {
    /// Outputs of the last completed round, if any
    #[must_use]
    pub fn last(&self) -> Option<&RoundSummary> {
        self.rounds.last()
    }
}

/// Run rounds until the unknown pool stops shrinking.
///
/// Later rounds search the growing known library, so elements classified in
/// one round can anchor their relatives in the next.
///
/// # Errors
///
/// Returns the first `RoundError` any round raises.
pub fn run_chain<A: Aligner>(
    config: &ChainConfig,
    aligner: &A,
) -> Result<ChainSummary, RoundError> {
    let mut unknown = config.unknown_input.clone();
    let mut library = config.known_library.clone();
    let mut rounds = Vec::new();

    for n in 1..=config.max_rounds {
        let round = Round::new(
            RoundConfig {
                outputs: RoundOutputs::numbered(&config.outdir, n),
                unknown_input: unknown.clone(),
                known_library: Some(library.clone()),
                append_target: library.clone(),
                clade: config.clade.clone(),
                threads: config.threads,
                layout: config.layout,
                tolerate_aligner_failure: config.tolerate_aligner_failure,
            },
            aligner,
        );
        let summary = round.run()?;

        let classified = summary.library.classified;
        let remaining = summary.library.still_unknown;
        unknown = summary.library.unknown_output.clone();
        library = summary.library.known_output.clone();
        rounds.push(summary);

        info!("Round {n}: {classified} classified, {remaining} still unknown");

        if remaining == 0 {
            return Ok(ChainSummary {
                rounds,
                stop_reason: StopReason::Exhausted,
            });
        }
        if classified == 0 {
            return Ok(ChainSummary {
                rounds,
                stop_reason: StopReason::NoProgress,
            });
        }
    }

    Ok(ChainSummary {
        rounds,
        stop_reason: StopReason::RoundLimit,
    })
}
