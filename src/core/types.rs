use serde::{Deserialize, Serialize};

/// Raw repeat classification carried by a reference library entry,
/// e.g. `LINE/L1`, `DNA/TcMar-Tigger` or a bare `LTR`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchLabel(pub String);

impl MatchLabel {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Family component: everything before the first `/`, or the whole label
    /// when no subfamily is given.
    #[must_use]
    pub fn family(&self) -> &str {
        self.0.split_once('/').map_or(self.0.as_str(), |(family, _)| family)
    }

    /// Subfamily component. A label without a subfamily reports its family here.
    #[must_use]
    pub fn subfamily(&self) -> &str {
        self.0
            .split_once('/')
            .map_or(self.0.as_str(), |(_, subfamily)| subfamily)
    }

    /// Whether the label names a subfamily at all
    #[must_use]
    pub fn has_subfamily(&self) -> bool {
        self.0.contains('/')
    }

    /// Leading class token used by the exclusion denylist: text before the
    /// first `/` or `-`.
    #[must_use]
    pub fn class_root(&self) -> &str {
        self.0
            .split(|c| c == '/' || c == '-')
            .next()
            .unwrap_or(self.0.as_str())
    }
}

impl std::fmt::Display for MatchLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result tier assigned to one unknown element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Every surviving hit carries the same label
    SubfamilyMatch,
    /// Hits disagree on subfamily but agree on family
    FamilyMatch,
    /// Hits span more than one family
    Chimeric,
    /// No surviving hits
    Unclassified,
}

impl OutcomeKind {
    /// Whether elements with this outcome leave the unknown pool
    #[must_use]
    pub fn is_classified(self) -> bool {
        matches!(self, Self::SubfamilyMatch | Self::FamilyMatch)
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SubfamilyMatch => write!(f, "subfamily"),
            Self::FamilyMatch => write!(f, "family"),
            Self::Chimeric => write!(f, "chimeric"),
            Self::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// How a round searches its unknown elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundMode {
    /// Clade database search, then known-library search over the masked output
    CladeThenLibrary,
    /// Known-library search over the full input
    LibraryOnly,
    /// Pre-computed reports supplied by the caller; no aligner is run
    Reports,
}

impl std::fmt::Display for RoundMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CladeThenLibrary => write!(f, "clade+library"),
            Self::LibraryOnly => write!(f, "library"),
            Self::Reports => write!(f, "reports"),
        }
    }
}
