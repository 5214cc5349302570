use serde::{Deserialize, Serialize};

use crate::core::types::MatchLabel;

/// A single aligner hit of an unknown element against a reference entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Unknown element identifier, without any `#annotation` suffix
    pub query_id: String,

    /// Classification of the matched reference entry
    pub label: MatchLabel,

    /// Name of the matched reference entry
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repeat_name: String,

    /// Alignment score; higher is stronger. Only used for ranking.
    pub score: f64,

    /// Hit overlaps a higher-scoring hit (trailing `*` in the report)
    #[serde(default)]
    pub overlapping: bool,
}

impl MatchRecord {
    pub fn new(query_id: impl Into<String>, label: impl Into<String>, score: f64) -> Self {
        Self {
            query_id: query_id.into(),
            label: MatchLabel::new(label),
            repeat_name: String::new(),
            score,
            overlapping: false,
        }
    }

    #[must_use]
    pub fn with_repeat_name(mut self, name: impl Into<String>) -> Self {
        self.repeat_name = name.into();
        self
    }

    /// Ordering used by the classifier: query ascending, then score descending.
    /// Equal keys compare equal so a stable sort keeps input order for ties.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.query_id
            .cmp(&other.query_id)
            .then_with(|| other.score.total_cmp(&self.score))
    }
}
