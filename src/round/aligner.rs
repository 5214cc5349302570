//! The external aligner/masker, modelled as a capability.
//!
//! Contract: given a query FASTA, a reference (library file or clade name)
//! and a thread count, write a match report and optionally a masked copy of
//! the query into an output directory. [`RepeatMasker`] runs the real tool;
//! [`CannedAligner`] replays fixed reports for tests and dry runs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum AlignerError {
    #[error("Aligner '{0}' not found (is it installed and on PATH?)")]
    NotFound(String),

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a search runs against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchTarget {
    /// A FASTA library of classified consensus sequences
    Library(PathBuf),
    /// A taxon name resolved by the aligner's own repeat database
    Clade(String),
}

impl std::fmt::Display for SearchTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Library(path) => write!(f, "library:{}", path.display()),
            Self::Clade(name) => write!(f, "clade:{name}"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    pub query: &'a Path,
    pub target: &'a SearchTarget,
    pub threads: usize,
    /// Directory the aligner writes into; created if missing
    pub outdir: &'a Path,
}

impl SearchRequest<'_> {
    /// Report path the aligner writes for this query (`<query file>.out`)
    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        self.output_with_suffix("out")
    }

    /// Masked query path (`<query file>.masked`)
    #[must_use]
    pub fn masked_path(&self) -> PathBuf {
        self.output_with_suffix("masked")
    }

    /// Remove a report or masked file left by an earlier run in the same
    /// directory, so that only this run's output is collected
    ///
    /// # Errors
    ///
    /// Returns an I/O error if an existing file cannot be removed.
    pub fn clear_outputs(&self) -> std::io::Result<()> {
        for path in [self.report_path(), self.masked_path()] {
            if path.is_file() {
                debug!("Removing stale {}", path.display());
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn output_with_suffix(&self, suffix: &str) -> PathBuf {
        let name = self
            .query
            .file_name()
            .map_or_else(|| "query".into(), |n| n.to_string_lossy().into_owned());
        self.outdir.join(format!("{name}.{suffix}"))
    }
}

/// Files produced by one search. Either may be absent: RepeatMasker writes no
/// report or masked file when the query has no repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutput {
    pub report: Option<PathBuf>,
    pub masked: Option<PathBuf>,
}

impl SearchOutput {
    fn collect(request: &SearchRequest<'_>) -> Self {
        let existing = |path: PathBuf| path.is_file().then_some(path);
        Self {
            report: existing(request.report_path()),
            masked: existing(request.masked_path()),
        }
    }
}

pub trait Aligner {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Run one search and report which output files it produced
    ///
    /// # Errors
    ///
    /// Returns an `AlignerError` if the tool cannot be started or exits
    /// unsuccessfully.
    fn search(&self, request: &SearchRequest<'_>) -> Result<SearchOutput, AlignerError>;
}

/// Runs RepeatMasker as a subprocess
#[derive(Debug, Clone)]
pub struct RepeatMasker {
    program: PathBuf,
}

impl RepeatMasker {
    pub const DEFAULT_PROGRAM: &'static str = "RepeatMasker";

    /// Resolve the executable, either the given path/name or `RepeatMasker`
    /// on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `AlignerError::NotFound` if no executable can be resolved.
    pub fn locate(program: Option<&Path>) -> Result<Self, AlignerError> {
        let requested =
            program.map_or_else(|| PathBuf::from(Self::DEFAULT_PROGRAM), Path::to_path_buf);
        let program = which::which(&requested)
            .map_err(|_| AlignerError::NotFound(requested.display().to_string()))?;
        debug!("Using aligner {}", program.display());
        Ok(Self { program })
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Command-line arguments for one search
    #[must_use]
    pub fn args(request: &SearchRequest<'_>) -> Vec<String> {
        let mut args = vec![
            "-pa".to_string(),
            request.threads.to_string(),
            "-dir".to_string(),
            request.outdir.to_string_lossy().to_string(),
        ];

        match request.target {
            SearchTarget::Library(path) => {
                args.push("-lib".to_string());
                args.push(path.to_string_lossy().to_string());
            }
            SearchTarget::Clade(name) => {
                args.push("-species".to_string());
                args.push(name.clone());
            }
        }

        args.push(request.query.to_string_lossy().to_string());
        args
    }
}

impl Aligner for RepeatMasker {
    fn name(&self) -> &str {
        Self::DEFAULT_PROGRAM
    }

    fn search(&self, request: &SearchRequest<'_>) -> Result<SearchOutput, AlignerError> {
        std::fs::create_dir_all(request.outdir)?;
        request.clear_outputs()?;

        let args = Self::args(request);
        let program = self.program.display().to_string();
        info!("Searching {} against {}", request.query.display(), request.target);
        debug!("Running '{} {}'", program, args.join(" "));

        let res = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| AlignerError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !res.status.success() {
            debug!("{}", String::from_utf8_lossy(&res.stdout));
            return Err(AlignerError::Failed {
                program,
                status: res.status.to_string(),
                stderr: String::from_utf8_lossy(&res.stderr).trim().to_string(),
            });
        }

        let output = SearchOutput::collect(request);
        if output.report.is_none() {
            debug!(
                "{} wrote no report for {}",
                program,
                request.query.display()
            );
        }
        Ok(output)
    }
}

/// Replays fixed report text instead of running a tool
#[derive(Debug, Default)]
pub struct CannedAligner {
    reports: HashMap<SearchTarget, String>,
    mask: bool,
    fail: bool,
    calls: RefCell<Vec<(SearchTarget, PathBuf)>>,
}

impl CannedAligner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report text returned for searches against `target`
    #[must_use]
    pub fn with_report(mut self, target: SearchTarget, report: impl Into<String>) -> Self {
        self.reports.insert(target, report.into());
        self
    }

    /// Also write a masked copy of the query
    #[must_use]
    pub fn masking(mut self) -> Self {
        self.mask = true;
        self
    }

    /// Fail every search as if the tool exited non-zero
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Targets and query paths searched so far, in call order
    #[must_use]
    pub fn calls(&self) -> Vec<(SearchTarget, PathBuf)> {
        self.calls.borrow().clone()
    }
}

impl Aligner for CannedAligner {
    fn name(&self) -> &str {
        "canned"
    }

    fn search(&self, request: &SearchRequest<'_>) -> Result<SearchOutput, AlignerError> {
        self.calls
            .borrow_mut()
            .push((request.target.clone(), request.query.to_path_buf()));

        if self.fail {
            return Err(AlignerError::Failed {
                program: self.name().to_string(),
                status: "exit status: 1".to_string(),
                stderr: "simulated failure".to_string(),
            });
        }

        std::fs::create_dir_all(request.outdir)?;
        request.clear_outputs()?;
        if let Some(report) = self.reports.get(request.target) {
            std::fs::write(request.report_path(), report)?;
        }
        if self.mask {
            std::fs::copy(request.query, request.masked_path())?;
        }

        Ok(SearchOutput::collect(request))
    }
}
