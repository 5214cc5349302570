//! Three-tier classification of unknown elements from their aligner hits.
//!
//! Hits are grouped by element once, up front. For each element:
//!
//! 1. **Subfamily match**: all surviving hits share one label (`LINE/L1`)
//! 2. **Family match**: labels differ, but all share a family (`LINE/L1`,
//!    `LINE/L2` → `LINE`)
//! 3. **Chimeric**: labels span several families; the element stays unknown
//!
//! Elements with no surviving hit get no outcome at all and stay unknown.
//!
//! ## Example
//!
//! ```rust
//! use rep_classifier::core::record::MatchRecord;
//! use rep_classifier::core::types::OutcomeKind;
//! use rep_classifier::matching::classifier::Classification;
//!
//! let records = vec![
//!     MatchRecord::new("elemB", "LINE/L1", 500.0),
//!     MatchRecord::new("elemB", "LINE/L2", 480.0),
//! ];
//! let classification = Classification::from_records(&records);
//! assert_eq!(classification.outcomes[0].kind, OutcomeKind::FamilyMatch);
//! assert_eq!(classification.outcomes[0].label, "LINE");
//! ```

pub mod classifier;
