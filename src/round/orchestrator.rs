use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::outcome::OutcomeCounts;
use crate::core::types::RoundMode;
use crate::library::artifacts::{write_artifacts, ArtifactPaths};
use crate::library::updater::{update_library, LibraryError, LibraryPaths, UpdateSummary};
use crate::matching::classifier::Classification;
use crate::parsing::report::{MatchParser, ParseError, ParseSummary, ReportLayout};
use crate::round::aligner::{Aligner, AlignerError, SearchOutput, SearchRequest, SearchTarget};
use crate::utils::validation::{
    require_file, validate_round_name, validate_threads, ValidationError,
};

#[derive(Error, Debug)]
pub enum RoundError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Aligner(#[from] AlignerError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A known library is required to run the aligner")]
    MissingLibrary,
}

/// Name and working directory of a round. All of a round's files live in
/// its working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutputs {
    pub name: String,
    pub workdir: PathBuf,
}

impl RoundOutputs {
    /// Round `n` under `parent`: directory and file stem `round<n>`
    #[must_use]
    pub fn numbered(parent: &Path, n: usize) -> Self {
        let name = format!("round{n}");
        Self {
            workdir: parent.join(&name),
            name,
        }
    }

    /// Round named after its output directory
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidRoundName` if the directory has no
    /// usable final component.
    pub fn in_dir(workdir: &Path) -> Result<Self, ValidationError> {
        let name = workdir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        validate_round_name(&name)?;
        Ok(Self {
            name,
            workdir: workdir.to_path_buf(),
        })
    }

    #[must_use]
    pub fn known_path(&self) -> PathBuf {
        self.workdir.join(format!("{}.known", self.name))
    }

    #[must_use]
    pub fn unknown_path(&self) -> PathBuf {
        self.workdir.join(format!("{}.unknown", self.name))
    }
}

/// Everything one round needs
#[derive(Debug, Clone)]
pub struct RoundConfig {
    pub outputs: RoundOutputs,
    /// FASTA of unknown elements
    pub unknown_input: PathBuf,
    /// Library searched by the aligner
    pub known_library: Option<PathBuf>,
    /// Library the classified elements are appended to
    pub append_target: PathBuf,
    /// Clade searched before the known library
    pub clade: Option<String>,
    /// Forwarded to the aligner
    pub threads: usize,
    pub layout: ReportLayout,
    /// Treat aligner failures as empty reports instead of aborting
    pub tolerate_aligner_failure: bool,
}

impl RoundConfig {
    #[must_use]
    pub fn mode(&self) -> RoundMode {
        if self.clade.is_some() {
            RoundMode::CladeThenLibrary
        } else {
            RoundMode::LibraryOnly
        }
    }

    fn validate(&self) -> Result<(), RoundError> {
        validate_round_name(&self.outputs.name)?;
        validate_threads(self.threads)?;
        require_file(&self.unknown_input)?;
        require_file(&self.append_target)?;
        if let Some(library) = &self.known_library {
            require_file(library)?;
        }
        Ok(())
    }

    fn library_paths(&self) -> LibraryPaths {
        LibraryPaths {
            unknown_input: self.unknown_input.clone(),
            append_target: self.append_target.clone(),
            known_output: self.outputs.known_path(),
            unknown_output: self.outputs.unknown_path(),
        }
    }
}

/// What a finished round produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSummary {
    pub name: String,
    pub mode: RoundMode,
    pub created_at: String,
    /// Reports fed to the parser, in order
    pub reports: Vec<PathBuf>,
    pub parse: ParseSummary,
    pub outcomes: OutcomeCounts,
    pub library: UpdateSummary,
    pub artifacts: ArtifactPaths,
}

/// One classification round: search, parse, classify, update the library
pub struct Round<'a, A: Aligner> {
    config: RoundConfig,
    aligner: &'a A,
}

impl<'a, A: Aligner> Round<'a, A> {
    pub fn new(config: RoundConfig, aligner: &'a A) -> Self {
        Self { config, aligner }
    }

    #[must_use]
    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Run the round to completion
    ///
    /// # Errors
    ///
    /// Returns `RoundError` if inputs are missing, the aligner fails (unless
    /// failures are tolerated), or any output cannot be written.
    pub fn run(&self) -> Result<RoundSummary, RoundError> {
        let config = &self.config;
        config.validate()?;
        let library = config
            .known_library
            .clone()
            .ok_or(RoundError::MissingLibrary)?;

        std::fs::create_dir_all(&config.outputs.workdir)?;
        info!(
            "Round {} ({}) on {} using {}",
            config.outputs.name,
            config.mode(),
            config.unknown_input.display(),
            self.aligner.name()
        );

        let mut reports = Vec::new();
        let mut library_query = config.unknown_input.clone();

        if let Some(clade) = &config.clade {
            let output = self.search(
                &config.unknown_input,
                &SearchTarget::Clade(clade.clone()),
                "clade",
            )?;
            reports.extend(output.report);
            // Regions hit by the clade search are masked out of the second pass
            if let Some(masked) = output.masked {
                library_query = masked;
            }
        }

        let output = self.search(&library_query, &SearchTarget::Library(library), "library")?;
        reports.extend(output.report);

        finish_round(config, config.mode(), &reports)
    }

    fn search(
        &self,
        query: &Path,
        target: &SearchTarget,
        subdir: &str,
    ) -> Result<SearchOutput, RoundError> {
        let outdir = self.config.outputs.workdir.join(subdir);
        let request = SearchRequest {
            query,
            target,
            threads: self.config.threads,
            outdir: &outdir,
        };

        match self.aligner.search(&request) {
            Ok(output) => Ok(output),
            Err(e) if self.config.tolerate_aligner_failure => {
                warn!("Search against {target} failed, treating as no hits: {e}");
                Ok(SearchOutput::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Classify from existing reports without running the aligner
///
/// # Errors
///
/// Returns `RoundError` if inputs are missing or any file cannot be read or
/// written. A missing report is an error here, unlike a report the aligner
/// declined to write.
pub fn classify_reports(
    config: &RoundConfig,
    reports: &[PathBuf],
) -> Result<RoundSummary, RoundError> {
    config.validate()?;
    for report in reports {
        require_file(report)?;
    }
    std::fs::create_dir_all(&config.outputs.workdir)?;
    finish_round(config, RoundMode::Reports, reports)
}

/// Parser → classifier → library updater over the round's reports
fn finish_round(
    config: &RoundConfig,
    mode: RoundMode,
    reports: &[PathBuf],
) -> Result<RoundSummary, RoundError> {
    let mut parser = MatchParser::new(config.layout);
    for report in reports {
        parser.add_file(report)?;
    }
    let (records, parse) = parser.finish();
    info!(
        "Parsed {} hits from {} report(s) ({} excluded, {} malformed lines)",
        parse.kept,
        reports.len(),
        parse.excluded,
        parse.malformed
    );

    let classification = Classification::from_records(&records);
    let outcomes = classification.counts();
    info!(
        "Outcomes: {} subfamily, {} family, {} chimeric",
        outcomes.subfamily, outcomes.family, outcomes.chimeric
    );

    let artifacts = write_artifacts(&config.outputs.workdir, &classification)?;
    let library = update_library(&classification.outcomes, &config.library_paths())?;

    Ok(RoundSummary {
        name: config.outputs.name.clone(),
        mode,
        created_at: chrono::Utc::now().to_rfc3339(),
        reports: reports.to_vec(),
        parse,
        outcomes,
        library,
        artifacts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_outputs() {
        let outputs = RoundOutputs::numbered(Path::new("/work"), 3);
        assert_eq!(outputs.name, "round3");
        assert_eq!(outputs.workdir, PathBuf::from("/work/round3"));
        assert_eq!(outputs.known_path(), PathBuf::from("/work/round3/round3.known"));
        assert_eq!(
            outputs.unknown_path(),
            PathBuf::from("/work/round3/round3.unknown")
        );
    }

    #[test]
    fn test_outputs_in_dir() {
        let outputs = RoundOutputs::in_dir(Path::new("runs/first")).unwrap();
        assert_eq!(outputs.name, "first");
        assert_eq!(outputs.known_path(), PathBuf::from("runs/first/first.known"));

        assert!(RoundOutputs::in_dir(Path::new("/")).is_err());
    }

    #[test]
    fn test_mode_selection() {
        let mut config = RoundConfig {
            outputs: RoundOutputs::numbered(Path::new("."), 1),
            unknown_input: PathBuf::from("u.fa"),
            known_library: Some(PathBuf::from("k.fa")),
            append_target: PathBuf::from("k.fa"),
            clade: None,
            threads: 1,
            layout: ReportLayout::default(),
            tolerate_aligner_failure: false,
        };
        assert_eq!(config.mode(), RoundMode::LibraryOnly);
        config.clade = Some("Mammalia".to_string());
        assert_eq!(config.mode(), RoundMode::CladeThenLibrary);
    }
}
