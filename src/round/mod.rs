//! Driving classification rounds.
//!
//! A round runs in one of two modes, chosen by whether a clade is given:
//!
//! - **Clade + library**: search the clade database over the full input, then
//!   the known library over the clade search's masked output, and classify
//!   from both reports (clade report first)
//! - **Library only**: search the known library over the full input
//!
//! Either way the combined hits go through the parser, the classifier and the
//! library updater, leaving `<round>.known` and `<round>.unknown` in the
//! round's working directory for the next round.
//!
//! ```text
//! round1/
//! ├── clade/                 aligner output (clade + library mode only)
//! ├── library/               aligner output
//! ├── subfamily_unambiguous_classified_elements.txt
//! ├── family_unambiguous_classified_elements.txt
//! ├── combined_classified_elements.txt
//! ├── chimeric_elements.txt
//! ├── round1.known
//! └── round1.unknown
//! ```

pub mod aligner;
pub mod chain;
pub mod orchestrator;
