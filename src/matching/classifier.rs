use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::core::outcome::{ElementOutcome, OutcomeCounts};
use crate::core::record::MatchRecord;
use crate::core::types::{MatchLabel, OutcomeKind};

/// Outcomes for every element with at least one surviving hit, ordered by
/// query id
#[derive(Debug, Clone, Default, Serialize)]
pub struct Classification {
    pub outcomes: Vec<ElementOutcome>,
}

impl Classification {
    /// Group hits by element once and decide each group independently.
    ///
    /// Records need not be pre-sorted: each group is ranked by score
    /// (descending, ties in input order) before its labels are collected.
    #[must_use]
    pub fn from_records(records: &[MatchRecord]) -> Self {
        let mut groups: BTreeMap<&str, Vec<&MatchRecord>> = BTreeMap::new();
        for record in records {
            groups.entry(record.query_id.as_str()).or_default().push(record);
        }

        let outcomes: Vec<ElementOutcome> = groups
            .into_iter()
            .map(|(query_id, mut hits)| {
                hits.sort_by(|a, b| b.score.total_cmp(&a.score));
                let labels: Vec<&MatchLabel> = hits.iter().map(|r| &r.label).collect();
                classify_element(query_id, &labels)
            })
            .collect();

        let classification = Self { outcomes };
        let counts = classification.counts();
        debug!(
            "Classified {} elements: {} subfamily, {} family, {} chimeric",
            classification.outcomes.len(),
            counts.subfamily,
            counts.family,
            counts.chimeric
        );
        classification
    }

    #[must_use]
    pub fn counts(&self) -> OutcomeCounts {
        OutcomeCounts::tally(&self.outcomes)
    }

    pub fn of_kind(&self, kind: OutcomeKind) -> impl Iterator<Item = &ElementOutcome> {
        self.outcomes.iter().filter(move |o| o.kind == kind)
    }

    /// Outcomes that move an element into the known library
    pub fn classified(&self) -> impl Iterator<Item = &ElementOutcome> {
        self.outcomes.iter().filter(|o| o.is_classified())
    }

    /// Look up an element's outcome. Elements without surviving hits are
    /// reported as unclassified.
    #[must_use]
    pub fn outcome_for(&self, query_id: &str) -> ElementOutcome {
        self.outcomes
            .binary_search_by(|o| o.query_id.as_str().cmp(query_id))
            .map_or_else(
                |_| ElementOutcome::unclassified(query_id),
                |i| self.outcomes[i].clone(),
            )
    }
}

/// Decide one element from its hit labels, best hit first.
///
/// 1. One distinct label: subfamily match on that label.
/// 2. Several labels, one family: family match on the family.
/// 3. Otherwise chimeric, with every distinct label as evidence.
///
/// Only the set of labels affects the decision; the order only shapes the
/// chimeric evidence string.
#[must_use]
pub fn classify_element(query_id: &str, labels: &[&MatchLabel]) -> ElementOutcome {
    let mut distinct: Vec<&MatchLabel> = Vec::with_capacity(labels.len());
    for &label in labels {
        if !distinct.contains(&label) {
            distinct.push(label);
        }
    }

    match distinct.as_slice() {
        [] => ElementOutcome::unclassified(query_id),
        [only] => ElementOutcome::subfamily(query_id, only),
        [first, rest @ ..] => {
            let family = first.family();
            if rest.iter().all(|label| label.family() == family) {
                ElementOutcome::family(query_id, family)
            } else {
                ElementOutcome::chimeric(query_id, &distinct)
            }
        }
    }
}
