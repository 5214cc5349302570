//! Summary printers shared by the subcommands.

use crate::cli::OutputFormat;
use crate::round::chain::ChainSummary;
use crate::round::orchestrator::RoundSummary;

const TSV_HEADER: &str =
    "round\tmode\thits\texcluded\tmalformed\tsubfamily\tfamily\tchimeric\tinput\tclassified\tstill_unknown\tknown_output\tunknown_output";

/// Print a single round's summary
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_round(summary: &RoundSummary, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print_text_round(summary),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Tsv => {
            println!("{TSV_HEADER}");
            println!("{}", tsv_row(summary));
        }
    }
    Ok(())
}

/// Print a chain's summary, one block or row per round
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_chain(summary: &ChainSummary, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for round in &summary.rounds {
                print_text_round(round);
                println!();
            }
            println!("Stopped after {} round(s): {}", summary.rounds.len(), stop_text(summary));
            if let Some(last) = summary.last() {
                println!("  Final library: {}", last.library.known_output.display());
                println!("  Final unknowns: {}", last.library.unknown_output.display());
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Tsv => {
            println!("{TSV_HEADER}");
            for round in &summary.rounds {
                println!("{}", tsv_row(round));
            }
        }
    }
    Ok(())
}

fn print_text_round(summary: &RoundSummary) {
    println!("Round {} ({})", summary.name, summary.mode);
    println!("{}", "=".repeat(60));
    println!("  Created: {}", summary.created_at);

    println!("\nReports:");
    if summary.reports.is_empty() {
        println!("  (none)");
    }
    for report in &summary.reports {
        println!("  {}", report.display());
    }
    println!(
        "  Hits kept: {} ({} excluded, {} malformed, {} lines read)",
        summary.parse.kept, summary.parse.excluded, summary.parse.malformed, summary.parse.lines
    );

    println!("\nOutcomes:");
    println!("  Subfamily: {}", summary.outcomes.subfamily);
    println!("  Family: {}", summary.outcomes.family);
    println!("  Chimeric: {}", summary.outcomes.chimeric);

    println!("\nLibrary:");
    println!("  Input elements: {}", summary.library.input);
    println!("  Classified: {}", summary.library.classified);
    println!("  Still unknown: {}", summary.library.still_unknown);
    println!("  Known output: {}", summary.library.known_output.display());
    println!("  Unknown output: {}", summary.library.unknown_output.display());
}

fn tsv_row(summary: &RoundSummary) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        summary.name,
        summary.mode,
        summary.parse.kept,
        summary.parse.excluded,
        summary.parse.malformed,
        summary.outcomes.subfamily,
        summary.outcomes.family,
        summary.outcomes.chimeric,
        summary.library.input,
        summary.library.classified,
        summary.library.still_unknown,
        summary.library.known_output.display(),
        summary.library.unknown_output.display(),
    )
}

fn stop_text(summary: &ChainSummary) -> &'static str {
    use crate::round::chain::StopReason;

    match summary.stop_reason {
        StopReason::Exhausted => "no unknown elements left",
        StopReason::NoProgress => "last round classified nothing",
        StopReason::RoundLimit => "round limit reached",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outcome::OutcomeCounts;
    use crate::core::types::RoundMode;
    use crate::library::artifacts::ArtifactPaths;
    use crate::library::updater::UpdateSummary;
    use crate::parsing::report::ParseSummary;
    use std::path::{Path, PathBuf};

    fn summary() -> RoundSummary {
        RoundSummary {
            name: "round1".to_string(),
            mode: RoundMode::LibraryOnly,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            reports: vec![PathBuf::from("round1/library/unknown.fa.out")],
            parse: ParseSummary {
                lines: 10,
                kept: 6,
                excluded: 1,
                malformed: 0,
            },
            outcomes: OutcomeCounts {
                subfamily: 1,
                family: 1,
                chimeric: 1,
            },
            library: UpdateSummary {
                input: 4,
                classified: 2,
                still_unknown: 2,
                known_output: PathBuf::from("round1/round1.known"),
                unknown_output: PathBuf::from("round1/round1.unknown"),
            },
            artifacts: ArtifactPaths::in_dir(Path::new("round1")),
        }
    }

    #[test]
    fn test_tsv_row_matches_header() {
        let row = tsv_row(&summary());
        assert_eq!(row.split('\t').count(), TSV_HEADER.split('\t').count());
        assert!(row.starts_with("round1\tlibrary\t6\t1\t0\t1\t1\t1\t4\t2\t2\t"));
    }
}
