//! Core data types for repeat classification.
//!
//! - [`MatchRecord`](record::MatchRecord): one aligner hit of an unknown element
//! - [`MatchLabel`](types::MatchLabel): a `Family/Subfamily` classification string
//! - [`ElementOutcome`](outcome::ElementOutcome): the classification result for one element
//! - [`SequenceRecord`](sequence::SequenceRecord): a FASTA entry with its `#annotation` split off
//!
//! ## Labels
//!
//! RepeatMasker libraries annotate each consensus with a class and an optional
//! family after a `#` in the FASTA name:
//!
//! | Header                      | Family | Subfamily      |
//! |-----------------------------|--------|----------------|
//! | `>L1HS#LINE/L1`             | LINE   | L1             |
//! | `>Tigger1#DNA/TcMar-Tigger` | DNA    | TcMar-Tigger   |
//! | `>MER4#LTR`                 | LTR    | LTR            |
//!
//! A label without a `/` is its own subfamily.

pub mod outcome;
pub mod record;
pub mod sequence;
pub mod types;
