//! Turning a round's outcomes into files for the next round.
//!
//! - [`updater`]: partitions the unknown input into newly classified records
//!   (appended with an `id#Label` header to a copy of the known library) and
//!   records that stay unknown
//! - [`artifacts`]: the tab-separated subfamily, family, combined and chimeric
//!   tables

pub mod artifacts;
pub mod updater;
