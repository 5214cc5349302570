//! Parsers for the files a classification round consumes.
//!
//! - **Match reports**: RepeatMasker-style `.out` tables, reduced to
//!   [`MatchRecord`](crate::core::record::MatchRecord)s with non-informative
//!   classes removed
//! - **FASTA**: unknown-element and library sequences (plain or gzip)
//!
//! ## Example
//!
//! ```rust
//! use rep_classifier::parsing::report::{MatchParser, ReportLayout};
//!
//! let mut parser = MatchParser::new(ReportLayout::default());
//! parser.add_text("463 12.4 0.0 2.1 elemA 1 97 (203) + L1M5 LINE/L1 1 97 (0) 1\n");
//! let (records, summary) = parser.finish();
//! assert_eq!(records.len(), 1);
//! assert_eq!(summary.kept, 1);
//! ```
//!
//! ## Excluded classes
//!
//! Hits whose class root is one of `Simple_repeat`, `Satellite`, `snRNA`,
//! `Unknown` or `rRNA` are dropped.

pub mod fasta;
pub mod report;
