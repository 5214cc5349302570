//! # rep-classifier
//!
//! A library for assigning family and subfamily labels to unknown repeat
//! elements using RepeatMasker hits.
//!
//! De novo repeat discovery produces consensus sequences with no
//! classification. Searching them against a clade database or a curated
//! library yields hits whose labels rarely agree perfectly: some elements hit
//! several subfamilies of one family, some hit unrelated families entirely.
//!
//! `rep-classifier` turns those hits into a conservative call per element and
//! moves the classified elements from the unknown pool into the known library,
//! one round at a time.
//!
//! ## Features
//!
//! - **Report parsing**: Reads RepeatMasker `.out` reports, skipping headers
//!   and low-information classes
//! - **Agreement-based classification**: Subfamily when all hits agree, family
//!   when they share a family, chimeric otherwise
//! - **Library update**: Appends relabeled elements to the known library and
//!   writes the remaining unknowns for the next round
//! - **Round chaining**: Repeats rounds until nothing new is classified
//!
//! ## Example
//!
//! ```rust
//! use rep_classifier::matching::classifier::Classification;
//! use rep_classifier::parsing::report::{MatchParser, ReportLayout};
//! use rep_classifier::OutcomeKind;
//!
//! let report = "\
//! 1000 10.2 0.0 1.1 elemA 1 300 (0) + L1MA1 LINE/L1 1 300 (10) 1
//! 900 10.2 0.0 1.1 elemA 1 300 (0) + L1MA2 LINE/L1 1 300 (10) 2
//! ";
//!
//! let mut parser = MatchParser::new(ReportLayout::default());
//! parser.add_text(report);
//! let (records, _) = parser.finish();
//!
//! let classification = Classification::from_records(&records);
//! let outcome = classification.outcome_for("elemA");
//! assert_eq!(outcome.kind, OutcomeKind::SubfamilyMatch);
//! assert_eq!(outcome.label, "LINE/L1");
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Labels, match records, outcomes and sequence records
//! - [`parsing`]: RepeatMasker report and FASTA readers
//! - [`matching`]: Per-element classification
//! - [`library`]: Classification tables and library updates
//! - [`round`]: Aligner invocation, single rounds and round chains
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod library;
pub mod matching;
pub mod parsing;
pub mod round;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::outcome::{ElementOutcome, OutcomeCounts};
pub use core::record::MatchRecord;
pub use core::sequence::SequenceRecord;
pub use core::types::*;
pub use matching::classifier::Classification;
pub use round::aligner::{Aligner, RepeatMasker};
pub use round::orchestrator::{Round, RoundConfig, RoundSummary};
