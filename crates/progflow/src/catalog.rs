//! Program catalog ingestion and lookup.
//!
//! The catalog is the only input surface of the core: an external loader
//! (spreadsheet, database, JSON file) produces [`RawProgramRow`]s, and
//! [`Catalog::from_rows`] validates them once into strongly-typed
//! [`Program`]s. Id problems are fatal here because every downstream
//! relationship keys off the id; everything else degrades to an absent field.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Program, ProgramId};

/// One unvalidated tabular row, as produced by an external loader.
///
/// Field names accept both snake_case and the original spreadsheet headers
/// (`"Program Name"`, `"Total Funding (m)"`, ...), so a sheet exported to
/// JSON can be ingested without a renaming pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProgramRow {
    /// Program id text; must parse as a non-negative integer.
    #[serde(default, alias = "ID")]
    pub id: Option<String>,
    /// Program display name.
    #[serde(alias = "Program Name")]
    pub name: String,
    /// Category tag.
    #[serde(default, alias = "Theme")]
    pub theme: Option<String>,
    /// Funding text, possibly formatted with currency symbols and commas.
    #[serde(default, alias = "Total Funding (m)")]
    pub total_funding: Option<String>,
    /// First calendar year, as text.
    #[serde(default, alias = "Start Year")]
    pub start_year: Option<String>,
    /// Last calendar year, as text.
    #[serde(default, alias = "End Year")]
    pub end_year: Option<String>,
    /// Comma-separated dependency references (program ids).
    #[serde(default, alias = "Dependency")]
    pub dependency: Option<String>,
    /// Comma-separated company names.
    #[serde(default, alias = "Companies")]
    pub companies: Option<String>,
}

impl RawProgramRow {
    /// Create a row with just an id and a name; remaining fields absent.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Validated in-memory table of programs, keyed by [`ProgramId`].
///
/// Iteration order is ingestion order, which downstream traversal relies on
/// for reproducible output.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    programs: Vec<Program>,
    by_id: HashMap<ProgramId, usize>,
}

impl Catalog {
    /// Validate a batch of raw rows into a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingId`], [`Error::InvalidId`], or
    /// [`Error::DuplicateId`] identifying the offending row. Ingestion is
    /// all-or-nothing: no catalog is produced on failure.
    pub fn from_rows(rows: Vec<RawProgramRow>) -> Result<Self> {
        let mut catalog = Self {
            programs: Vec::with_capacity(rows.len()),
            by_id: HashMap::with_capacity(rows.len()),
        };

        for (row_index, row) in rows.into_iter().enumerate() {
            let id_text = row
                .id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or(Error::MissingId { row: row_index })?;

            let id = ProgramId::parse(id_text).ok_or_else(|| Error::InvalidId {
                row: row_index,
                value: id_text.to_string(),
            })?;

            if catalog.by_id.contains_key(&id) {
                return Err(Error::DuplicateId { id });
            }

            let program = Program {
                id,
                name: row.name.trim().to_string(),
                theme: normalize_text(row.theme),
                total_funding: row.total_funding.as_deref().and_then(parse_funding),
                start_year: row.start_year.as_deref().and_then(parse_year),
                end_year: row.end_year.as_deref().and_then(parse_year),
                dependency_refs: normalize_text(row.dependency),
                companies: normalize_text(row.companies),
            };

            catalog.by_id.insert(id, catalog.programs.len());
            catalog.programs.push(program);
        }

        debug!(programs = catalog.programs.len(), "catalog ingested");
        Ok(catalog)
    }

    /// Look up a program by id.
    #[must_use]
    pub fn get(&self, id: ProgramId) -> Option<&Program> {
        self.by_id.get(&id).map(|&i| &self.programs[i])
    }

    /// Whether the catalog contains the given id.
    #[must_use]
    pub fn contains(&self, id: ProgramId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Iterate over programs in ingestion order.
    pub fn iter(&self) -> impl Iterator<Item = &Program> {
        self.programs.iter()
    }

    /// Number of programs in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Program;
    type IntoIter = std::slice::Iter<'a, Program>;

    fn into_iter(self) -> Self::IntoIter {
        self.programs.iter()
    }
}

/// Trim optional text, collapsing whitespace-only values to `None`.
fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Normalize a funding figure formatted with currency symbols or thousands
/// separators (`"$1,200.5m"` → `1200.5`).
///
/// Every character other than an ASCII digit or `.` is stripped before
/// parsing; anything left unparseable is `None`, never zero.
fn parse_funding(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Parse a calendar year, tolerating surrounding whitespace.
fn parse_year(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}
