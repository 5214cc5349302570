//! Parser for RepeatMasker-style match reports.
//!
//! Each data line is a whitespace-delimited row of at least 15 columns. The
//! columns read are the alignment score, the query id, the matched repeat name
//! and its class/family label. A trailing `*` column marks a hit that overlaps
//! a higher-scoring one.
//!
//! ```text
//!    SW   perc perc perc  query      position in query   matching  repeat ...
//! score   div. del. ins.  sequence   begin end  (left)   repeat    class/family ...
//!
//!   463   12.4  0.0  2.1  elemA       1   97  (203) +  L1M5      LINE/L1   ...
//! ```
//!
//! Parsing is best-effort: lines that are too short or carry a non-numeric
//! score are counted as malformed and skipped.

use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::record::MatchRecord;
use crate::core::sequence::base_id;
use crate::utils::validation::is_excluded_class;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Duplicate sequence id '{0}'")]
    DuplicateId(String),
}

/// First-column tokens that mark a report header line
pub const HEADER_TOKENS: [&str; 2] = ["SW", "score"];

/// Column positions (1-based) of the fields read from a report line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLayout {
    pub score_column: usize,
    pub query_column: usize,
    pub repeat_column: usize,
    pub class_column: usize,
    /// Lines with fewer fields are malformed
    pub min_fields: usize,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            score_column: 1,
            query_column: 5,
            repeat_column: 10,
            class_column: 11,
            min_fields: 15,
        }
    }
}

impl ReportLayout {
    fn field<'a>(fields: &[&'a str], column: usize) -> Option<&'a str> {
        fields.get(column.checked_sub(1)?).copied()
    }
}

/// What a single report line turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum ReportLine {
    /// Blank or header line
    Skipped,
    Malformed,
    Record(MatchRecord),
}

/// Parse one line of a match report
#[must_use]
pub fn parse_line(line: &str, layout: &ReportLayout) -> ReportLine {
    let fields: Vec<&str> = line.split_whitespace().collect();

    match fields.first() {
        None => return ReportLine::Skipped,
        Some(first) if HEADER_TOKENS.contains(first) => return ReportLine::Skipped,
        Some(_) => {}
    }

    if fields.len() < layout.min_fields {
        return ReportLine::Malformed;
    }

    let (Some(score), Some(query), Some(repeat), Some(class)) = (
        ReportLayout::field(&fields, layout.score_column),
        ReportLayout::field(&fields, layout.query_column),
        ReportLayout::field(&fields, layout.repeat_column),
        ReportLayout::field(&fields, layout.class_column),
    ) else {
        return ReportLine::Malformed;
    };

    let Ok(score) = score.parse::<f64>() else {
        return ReportLine::Malformed;
    };

    let query_id = base_id(query);
    if query_id.is_empty() || !score.is_finite() {
        return ReportLine::Malformed;
    }

    let overlapping = fields.len() > layout.min_fields && fields.last() == Some(&"*");

    let mut record = MatchRecord::new(query_id, class, score).with_repeat_name(repeat);
    record.overlapping = overlapping;
    ReportLine::Record(record)
}

/// Line counts gathered while parsing a round's reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseSummary {
    pub lines: usize,
    pub kept: usize,
    pub excluded: usize,
    pub malformed: usize,
}

/// Collects match records from one or more reports, in the order they are
/// added, and hands them to the classifier in rank order.
#[derive(Debug, Default)]
pub struct MatchParser {
    layout: ReportLayout,
    records: Vec<MatchRecord>,
    summary: ParseSummary,
}

impl MatchParser {
    #[must_use]
    pub fn new(layout: ReportLayout) -> Self {
        Self {
            layout,
            records: Vec::new(),
            summary: ParseSummary::default(),
        }
    }

    /// Parse a report from any buffered reader
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if reading fails. Malformed lines, including
    /// lines that are not valid UTF-8, are not errors.
    pub fn add_reader<R: BufRead>(&mut self, mut reader: R) -> Result<(), ParseError> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            match std::str::from_utf8(&buf) {
                Ok(line) => self.add_line(line.trim_end_matches(['\n', '\r'])),
                Err(_) => {
                    self.summary.lines += 1;
                    self.summary.malformed += 1;
                }
            }
        }
        Ok(())
    }

    /// Parse a report file
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the file cannot be opened or read.
    pub fn add_file(&mut self, path: &Path) -> Result<(), ParseError> {
        let before = self.summary;
        let file = std::fs::File::open(path)?;
        self.add_reader(BufReader::new(file))?;

        debug!(
            "Parsed {}: {} lines, {} hits kept, {} excluded, {} malformed",
            path.display(),
            self.summary.lines - before.lines,
            self.summary.kept - before.kept,
            self.summary.excluded - before.excluded,
            self.summary.malformed - before.malformed,
        );
        Ok(())
    }

    pub fn add_text(&mut self, text: &str) {
        for line in text.lines() {
            self.add_line(line);
        }
    }

    fn add_line(&mut self, line: &str) {
        self.summary.lines += 1;
        match parse_line(line, &self.layout) {
            ReportLine::Skipped => {}
            ReportLine::Malformed => self.summary.malformed += 1,
            ReportLine::Record(record) if is_excluded_class(record.label.class_root()) => {
                self.summary.excluded += 1;
            }
            ReportLine::Record(record) => {
                self.summary.kept += 1;
                self.records.push(record);
            }
        }
    }

    /// Records ordered by query id ascending, then score descending. Ties keep
    /// the order in which they were added.
    #[must_use]
    pub fn finish(mut self) -> (Vec<MatchRecord>, ParseSummary) {
        self.records.sort_by(MatchRecord::rank_cmp);
        (self.records, self.summary)
    }
}
