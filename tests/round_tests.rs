//! End-to-end rounds driven by a canned aligner.

use std::fs;
use std::path::{Path, PathBuf};

use rep_classifier::parsing::fasta::read_sequences;
use rep_classifier::parsing::report::ReportLayout;
use rep_classifier::round::aligner::{CannedAligner, SearchTarget};
use rep_classifier::round::chain::{run_chain, ChainConfig, StopReason};
use rep_classifier::round::orchestrator::{
    classify_reports, Round, RoundConfig, RoundError, RoundOutputs,
};
use rep_classifier::RoundMode;
use tempfile::TempDir;

const UNKNOWN_FASTA: &str = "\
>elemA#Unknown
ACGTACGTACGTACGT
>elemB#Unknown
TTGGCCAATTGGCCAA
>elemC#Unknown
GGGGCCCCAAAATTTT
>elemD#Unknown
ATATATATATATATAT
>elemE#Unknown
CCCCGGGGCCCCGGGG
";

const KNOWN_FASTA: &str = "\
>L1MA1#LINE/L1
ACGTTGCAACGTTGCA
";

/// Library report: elemA agrees on one label, elemB shares a family, elemC is
/// chimeric, elemD only hits an excluded class.
const LIBRARY_REPORT: &str = "\
   SW   perc perc perc  query      position in query           matching       repeat              position in  repeat
score   div. del. ins.  sequence    begin     end    (left)    repeat         class/family         begin  end (left)   ID

 1000 10.2 0.0 1.1 elemA 1 16 (0) + L1MA1 LINE/L1 1 16 (0) 1
  900 10.2 0.0 1.1 elemA 1 16 (0) + L1MA2 LINE/L1 1 16 (0) 2
  800 10.2 0.0 1.1 elemB 1 16 (0) + AluY SINE/Alu 1 16 (0) 3
  700 10.2 0.0 1.1 elemB 1 16 (0) + MIR SINE/MIR 1 16 (0) 4
  600 10.2 0.0 1.1 elemC 1 16 (0) + L1MA1 LINE/L1 1 16 (0) 5
  500 10.2 0.0 1.1 elemC 1 16 (0) + MER1 DNA/hAT 1 16 (0) 6
  400 10.2 0.0 1.1 elemD 1 16 (0) + (AT)n Simple_repeat 1 16 (0) 7
";

const CLADE_REPORT: &str = "\
 1200 5.0 0.0 0.0 elemE 1 16 (0) + Charlie1 DNA/hAT-Charlie 1 16 (0) 1
";

struct Fixture {
    dir: TempDir,
    unknown: PathBuf,
    known: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let unknown = dir.path().join("unknown.fa");
        let known = dir.path().join("known.fa");
        fs::write(&unknown, UNKNOWN_FASTA).unwrap();
        fs::write(&known, KNOWN_FASTA).unwrap();
        Self {
            dir,
            unknown,
            known,
        }
    }

    fn config(&self, clade: Option<&str>) -> RoundConfig {
        RoundConfig {
            outputs: RoundOutputs::numbered(self.dir.path(), 1),
            unknown_input: self.unknown.clone(),
            known_library: Some(self.known.clone()),
            append_target: self.known.clone(),
            clade: clade.map(str::to_string),
            threads: 2,
            layout: ReportLayout::default(),
            tolerate_aligner_failure: false,
        }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}

fn names(path: &Path) -> Vec<String> {
    read_sequences(path)
        .unwrap()
        .iter()
        .map(rep_classifier::SequenceRecord::name)
        .collect()
}

#[test]
fn test_library_only_round() {
    let fixture = Fixture::new();
    let aligner = CannedAligner::new()
        .with_report(SearchTarget::Library(fixture.known.clone()), LIBRARY_REPORT);

    let summary = Round::new(fixture.config(None), &aligner).run().unwrap();

    assert_eq!(summary.mode, RoundMode::LibraryOnly);
    assert_eq!(summary.outcomes.subfamily, 1);
    assert_eq!(summary.outcomes.family, 1);
    assert_eq!(summary.outcomes.chimeric, 1);
    assert_eq!(summary.parse.excluded, 1);
    assert_eq!(summary.library.input, 5);
    assert_eq!(summary.library.classified, 2);
    assert_eq!(summary.library.still_unknown, 3);

    // Known output: original library, then relabeled classified elements
    assert_eq!(
        names(&summary.library.known_output),
        vec!["L1MA1#LINE/L1", "elemA#LINE/L1", "elemB#SINE"]
    );
    // Unknown output: chimeric, excluded-only and unmatched elements, input order
    assert_eq!(
        names(&summary.library.unknown_output),
        vec!["elemC#Unknown", "elemD#Unknown", "elemE#Unknown"]
    );

    let chimeric = fs::read_to_string(&summary.artifacts.chimeric).unwrap();
    assert_eq!(chimeric, "elemC\tLINE/L1,DNA/hAT\n");
    let combined = fs::read_to_string(&summary.artifacts.combined).unwrap();
    assert_eq!(combined, "elemA\tLINE/L1\nelemB\tSINE\n");

    // Only one search, against the library, with the unknown FASTA as query
    let calls = aligner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, SearchTarget::Library(fixture.known.clone()));
    assert_eq!(calls[0].1, fixture.unknown);
}

#[test]
fn test_clade_then_library_round_uses_masked_query() {
    let fixture = Fixture::new();
    let aligner = CannedAligner::new()
        .with_report(SearchTarget::Clade("Mammalia".to_string()), CLADE_REPORT)
        .with_report(SearchTarget::Library(fixture.known.clone()), LIBRARY_REPORT)
        .masking();

    let summary = Round::new(fixture.config(Some("Mammalia")), &aligner)
        .run()
        .unwrap();

    assert_eq!(summary.mode, RoundMode::CladeThenLibrary);
    assert_eq!(summary.reports.len(), 2);
    assert_eq!(summary.outcomes.subfamily, 2);
    assert_eq!(summary.library.classified, 3);

    let calls = aligner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, SearchTarget::Clade("Mammalia".to_string()));
    assert_eq!(calls[0].1, fixture.unknown);
    assert_eq!(calls[1].0, SearchTarget::Library(fixture.known.clone()));
    assert!(calls[1].1.to_string_lossy().ends_with("unknown.fa.masked"));

    assert!(names(&summary.library.known_output).contains(&"elemE#DNA/hAT-Charlie".to_string()));
}

#[test]
fn test_outputs_partition_input() {
    let fixture = Fixture::new();
    let aligner = CannedAligner::new()
        .with_report(SearchTarget::Library(fixture.known.clone()), LIBRARY_REPORT);

    let summary = Round::new(fixture.config(None), &aligner).run().unwrap();

    let known = read_sequences(&summary.library.known_output).unwrap();
    let unknown = read_sequences(&summary.library.unknown_output).unwrap();
    let mut ids: Vec<String> = known
        .iter()
        .skip(1)
        .chain(unknown.iter())
        .map(|s| s.id.clone())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["elemA", "elemB", "elemC", "elemD", "elemE"]);

    // Sequences are carried over unchanged
    let elem_a = known.iter().find(|s| s.id == "elemA").unwrap();
    assert_eq!(elem_a.sequence, b"ACGTACGTACGTACGT");
}

#[test]
fn test_no_hits_leaves_everything_unknown() {
    let fixture = Fixture::new();
    let aligner = CannedAligner::new();

    let summary = Round::new(fixture.config(None), &aligner).run().unwrap();

    assert!(summary.reports.is_empty());
    assert_eq!(summary.library.classified, 0);
    assert_eq!(summary.library.still_unknown, 5);
    assert_eq!(
        fs::read_to_string(&summary.library.known_output).unwrap(),
        KNOWN_FASTA
    );
    assert_eq!(fs::read_to_string(&summary.artifacts.combined).unwrap(), "");
}

#[test]
fn test_rerun_ignores_previous_reports() {
    let fixture = Fixture::new();
    let aligner = CannedAligner::new()
        .with_report(SearchTarget::Library(fixture.known.clone()), LIBRARY_REPORT);
    let first = Round::new(fixture.config(None), &aligner).run().unwrap();
    assert_eq!(first.library.classified, 2);

    // Same directory, but this time the search finds nothing
    let summary = Round::new(fixture.config(None), &CannedAligner::new())
        .run()
        .unwrap();

    assert!(summary.reports.is_empty());
    assert_eq!(summary.library.classified, 0);
    assert_eq!(summary.library.still_unknown, 5);
    assert_eq!(
        fs::read_to_string(&summary.library.known_output).unwrap(),
        KNOWN_FASTA
    );
}

#[test]
fn test_aligner_failure_aborts_round() {
    let fixture = Fixture::new();
    let aligner = CannedAligner::new().failing();

    let result = Round::new(fixture.config(None), &aligner).run();

    assert!(matches!(result, Err(RoundError::Aligner(_))));
    assert!(!fixture.config(None).outputs.known_path().exists());
}

#[test]
fn test_tolerated_aligner_failure_classifies_nothing() {
    let fixture = Fixture::new();
    let aligner = CannedAligner::new().failing();
    let mut config = fixture.config(Some("Mammalia"));
    config.tolerate_aligner_failure = true;

    let summary = Round::new(config, &aligner).run().unwrap();

    assert_eq!(aligner.calls().len(), 2);
    assert_eq!(summary.library.classified, 0);
    assert_eq!(summary.library.still_unknown, 5);
}

#[test]
fn test_missing_unknown_input_is_rejected() {
    let fixture = Fixture::new();
    let aligner = CannedAligner::new();
    let mut config = fixture.config(None);
    config.unknown_input = fixture.dir.path().join("missing.fa");

    let result = Round::new(config, &aligner).run();

    assert!(matches!(result, Err(RoundError::Validation(_))));
    assert!(aligner.calls().is_empty());
}

#[test]
fn test_append_target_differs_from_search_library() {
    let fixture = Fixture::new();
    let curated = fixture.write("curated.fa", ">Curated1#LTR/ERVL\nAAAACCCC\n");
    let aligner = CannedAligner::new()
        .with_report(SearchTarget::Library(fixture.known.clone()), LIBRARY_REPORT);
    let mut config = fixture.config(None);
    config.append_target = curated;

    let summary = Round::new(config, &aligner).run().unwrap();

    assert_eq!(
        names(&summary.library.known_output),
        vec!["Curated1#LTR/ERVL", "elemA#LINE/L1", "elemB#SINE"]
    );
}

#[test]
fn test_classify_existing_reports() {
    let fixture = Fixture::new();
    let clade = fixture.write("clade.out", CLADE_REPORT);
    let library = fixture.write("library.out", LIBRARY_REPORT);
    let mut config = fixture.config(None);
    config.known_library = None;
    config.outputs = RoundOutputs::in_dir(&fixture.dir.path().join("offline")).unwrap();

    let summary = classify_reports(&config, &[clade, library]).unwrap();

    assert_eq!(summary.mode, RoundMode::Reports);
    assert_eq!(summary.name, "offline");
    assert_eq!(summary.library.classified, 3);
    assert!(fixture.dir.path().join("offline/offline.known").is_file());
    assert!(fixture.dir.path().join("offline/offline.unknown").is_file());
}

#[test]
fn test_classify_missing_report_is_an_error() {
    let fixture = Fixture::new();
    let config = fixture.config(None);

    let result = classify_reports(&config, &[fixture.dir.path().join("absent.out")]);

    assert!(matches!(result, Err(RoundError::Validation(_))));
}

#[test]
fn test_chain_stops_without_progress() {
    let fixture = Fixture::new();
    // Only the first round's library has a report; later rounds find nothing
    let aligner = CannedAligner::new()
        .with_report(SearchTarget::Library(fixture.known.clone()), LIBRARY_REPORT);
    let config = ChainConfig {
        outdir: fixture.dir.path().join("chain"),
        unknown_input: fixture.unknown.clone(),
        known_library: fixture.known.clone(),
        clade: None,
        threads: 1,
        layout: ReportLayout::default(),
        tolerate_aligner_failure: false,
        max_rounds: 5,
    };

    let summary = run_chain(&config, &aligner).unwrap();

    assert_eq!(summary.stop_reason, StopReason::NoProgress);
    assert_eq!(summary.rounds.len(), 2);
    assert_eq!(summary.rounds[1].name, "round2");

    // Round 2 searched round 1's known output with round 1's unknowns
    let calls = aligner.calls();
    let round1 = &summary.rounds[0].library;
    assert_eq!(calls[1].0, SearchTarget::Library(round1.known_output.clone()));
    assert_eq!(calls[1].1, round1.unknown_output);

    let last = summary.last().unwrap();
    assert_eq!(last.library.still_unknown, 3);
}

#[test]
fn test_chain_round_limit() {
    let fixture = Fixture::new();
    let aligner = CannedAligner::new()
        .with_report(SearchTarget::Library(fixture.known.clone()), LIBRARY_REPORT);
    let config = ChainConfig {
        outdir: fixture.dir.path().join("chain"),
        unknown_input: fixture.unknown.clone(),
        known_library: fixture.known.clone(),
        clade: None,
        threads: 1,
        layout: ReportLayout::default(),
        tolerate_aligner_failure: false,
        max_rounds: 1,
    };

    let summary = run_chain(&config, &aligner).unwrap();

    assert_eq!(summary.stop_reason, StopReason::RoundLimit);
    assert_eq!(summary.rounds.len(), 1);
}

#[test]
fn test_chain_exhausts_unknowns() {
    let fixture = Fixture::new();
    let unknown = fixture.write("single.fa", ">elemA#Unknown\nACGTACGTACGTACGT\n");
    let aligner = CannedAligner::new()
        .with_report(SearchTarget::Library(fixture.known.clone()), LIBRARY_REPORT);
    let config = ChainConfig {
        outdir: fixture.dir.path().join("chain"),
        unknown_input: unknown,
        known_library: fixture.known.clone(),
        clade: None,
        threads: 1,
        layout: ReportLayout::default(),
        tolerate_aligner_failure: false,
        max_rounds: 5,
    };

    let summary = run_chain(&config, &aligner).unwrap();

    assert_eq!(summary.stop_reason, StopReason::Exhausted);
    assert_eq!(summary.rounds.len(), 1);
    assert_eq!(summary.rounds[0].library.classified, 1);
}
