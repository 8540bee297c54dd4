//! Core types shared across the pipeline.

use serde::{Deserialize, Serialize};

/// Unique, stable identifier of a program in the catalog.
///
/// Ids are numeric; free-text dependency references are only accepted when
/// they parse as one of these.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProgramId(u64);

impl ProgramId {
    /// Create an id from its numeric value.
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// The underlying numeric value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Parse a reference token into an id.
    ///
    /// Returns `None` unless the token consists entirely of ASCII digits and
    /// fits in a `u64`. Surrounding whitespace is not tolerated here; callers
    /// trim first.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        token.parse().ok().map(Self)
    }
}

impl std::fmt::Display for ProgramId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProgramId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A validated program record in the catalog.
///
/// Produced by [`crate::Catalog::from_rows`]; optional fields are genuinely
/// absent rather than defaulted, so a missing funding figure is never
/// mistaken for zero funding.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Unique numeric id.
    pub id: ProgramId,
    /// Display name, used as the node key in flow output.
    pub name: String,
    /// Category tag, if any.
    pub theme: Option<String>,
    /// Total funding in millions, if it parsed to a number.
    pub total_funding: Option<f64>,
    /// First calendar year of the program, if known.
    pub start_year: Option<i32>,
    /// Last calendar year of the program, if known.
    pub end_year: Option<i32>,
    /// Raw comma-separated dependency reference text, as ingested.
    pub dependency_refs: Option<String>,
    /// Raw comma-separated company list, as ingested.
    pub companies: Option<String>,
}

/// A resolved, directed dependency relationship.
///
/// `(from, to)` means *`to` depends on `from`*: the upstream side provides
/// capability consumed by the downstream side. Both endpoints are guaranteed
/// to exist in the catalog that produced the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DependencyEdge {
    /// Upstream program (the dependency).
    pub from: ProgramId,
    /// Downstream program (the one declaring the dependency).
    pub to: ProgramId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_plain_digits() {
        assert_eq!(ProgramId::parse("42"), Some(ProgramId::new(42)));
        assert_eq!(ProgramId::parse("0"), Some(ProgramId::new(0)));
    }

    #[test]
    fn parse_rejects_non_numeric_tokens() {
        assert_eq!(ProgramId::parse(""), None);
        assert_eq!(ProgramId::parse("P-12"), None);
        assert_eq!(ProgramId::parse("12a"), None);
        assert_eq!(ProgramId::parse("-4"), None);
        assert_eq!(ProgramId::parse(" 4"), None);
    }

    #[test]
    fn parse_rejects_overflowing_values() {
        assert_eq!(ProgramId::parse("99999999999999999999999999"), None);
    }

    #[test]
    fn display_matches_numeric_value() {
        assert_eq!(ProgramId::new(7).to_string(), "7");
    }
}
