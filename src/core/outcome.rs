use serde::{Deserialize, Serialize};

use crate::core::types::{MatchLabel, OutcomeKind};

/// Classification result for one unknown element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementOutcome {
    pub query_id: String,

    pub kind: OutcomeKind,

    /// `Family/Subfamily` or `Family` for classified outcomes, empty otherwise
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,

    /// Comma-joined distinct labels, best hit first (chimeric outcomes only)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub evidence: String,
}

impl ElementOutcome {
    pub fn subfamily(query_id: impl Into<String>, label: &MatchLabel) -> Self {
        Self {
            query_id: query_id.into(),
            kind: OutcomeKind::SubfamilyMatch,
            label: label.to_string(),
            evidence: String::new(),
        }
    }

    pub fn family(query_id: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            query_id: query_id.into(),
            kind: OutcomeKind::FamilyMatch,
            label: family.into(),
            evidence: String::new(),
        }
    }

    pub fn chimeric(query_id: impl Into<String>, labels: &[&MatchLabel]) -> Self {
        let evidence = labels
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(",");

        Self {
            query_id: query_id.into(),
            kind: OutcomeKind::Chimeric,
            label: String::new(),
            evidence,
        }
    }

    pub fn unclassified(query_id: impl Into<String>) -> Self {
        Self {
            query_id: query_id.into(),
            kind: OutcomeKind::Unclassified,
            label: String::new(),
            evidence: String::new(),
        }
    }

    #[must_use]
    pub fn is_classified(&self) -> bool {
        self.kind.is_classified()
    }
}

/// Per-kind totals for a set of outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub subfamily: usize,
    pub family: usize,
    pub chimeric: usize,
}

impl OutcomeCounts {
    #[must_use]
    pub fn tally(outcomes: &[ElementOutcome]) -> Self {
        let mut counts = Self::default();
        for outcome in outcomes {
            match outcome.kind {
                OutcomeKind::SubfamilyMatch => counts.subfamily += 1,
                OutcomeKind::FamilyMatch => counts.family += 1,
                OutcomeKind::Chimeric => counts.chimeric += 1,
                OutcomeKind::Unclassified => {}
            }
        }
        counts
    }

    #[must_use]
    pub fn classified(&self) -> usize {
        self.subfamily + self.family
    }
}
