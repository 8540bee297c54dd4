//! Flow records: the flattened, Sankey-ready output of the pipeline.
//!
//! Each record is one traversed edge or one terminal event. Records are
//! created once and never mutated; the final output set dedupes on full
//! record equality while preserving first-seen order.

use std::collections::HashSet;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Diagnostic;
use crate::types::Program;

/// One row of the emitted Sankey-ready output.
///
/// `source == target` marks a terminal event: a path ending at a program
/// with no further dependencies, at a revisited program, or at the depth
/// cap. Breadcrumb slots never reached on this path are genuinely absent, so
/// a consumer can distinguish "not visited" from "empty hop".
///
/// Serializes to a flat JSON object with `source`, `target`, `level`,
/// `value`, `theme`, `total_funding`, `start_year`, `end_year`, and one
/// `level_<i>` key per occupied breadcrumb slot.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowRecord {
    /// Upstream program name (equal to `target` for terminal events).
    pub source: String,
    /// Downstream program name.
    pub target: String,
    /// 1-based position of this hop along the traversal path.
    pub level: u32,
    /// Funding attributed to this edge; absent funding stays absent, it is
    /// never coerced to zero.
    pub value: Option<f64>,
    /// Theme of the target program.
    pub theme: Option<String>,
    /// Total funding of the target program.
    pub total_funding: Option<f64>,
    /// First calendar year of the target program.
    pub start_year: Option<i32>,
    /// Last calendar year of the target program.
    pub end_year: Option<i32>,
    /// Positional path breadcrumbs; index `i` holds the program occupying
    /// breadcrumb slot `i + 1`, or `None` if that slot was never reached.
    pub breadcrumbs: Vec<Option<String>>,
}

impl FlowRecord {
    /// Build the record for a traversed edge `source -> target`.
    ///
    /// Funding and metadata come from the downstream (target) program, which
    /// is the row that declared the dependency.
    #[must_use]
    pub fn edge(
        source: &Program,
        target: &Program,
        level: u32,
        breadcrumbs: Vec<Option<String>>,
    ) -> Self {
        Self {
            source: source.name.clone(),
            target: target.name.clone(),
            level,
            value: target.total_funding,
            theme: target.theme.clone(),
            total_funding: target.total_funding,
            start_year: target.start_year,
            end_year: target.end_year,
            breadcrumbs,
        }
    }

    /// Build the self-referencing record for a path ending at `program`.
    #[must_use]
    pub fn terminal(program: &Program, level: u32, breadcrumbs: Vec<Option<String>>) -> Self {
        Self {
            source: program.name.clone(),
            target: program.name.clone(),
            level,
            value: program.total_funding,
            theme: program.theme.clone(),
            total_funding: program.total_funding,
            start_year: program.start_year,
            end_year: program.end_year,
            breadcrumbs,
        }
    }

    /// Whether this record self-references, which marks a terminal event.
    ///
    /// A traversed self-loop edge also self-references; the output schema
    /// cannot distinguish the two, and neither can consumers.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.source == self.target
    }

    fn dedup_key(&self) -> DedupKey {
        DedupKey {
            source: self.source.clone(),
            target: self.target.clone(),
            level: self.level,
            value: self.value.map(f64::to_bits),
            theme: self.theme.clone(),
            total_funding: self.total_funding.map(f64::to_bits),
            start_year: self.start_year,
            end_year: self.end_year,
            breadcrumbs: self.breadcrumbs.clone(),
        }
    }
}

/// Hashable mirror of [`FlowRecord`] with floats compared bit-exactly.
#[derive(PartialEq, Eq, Hash)]
struct DedupKey {
    source: String,
    target: String,
    level: u32,
    value: Option<u64>,
    theme: Option<String>,
    total_funding: Option<u64>,
    start_year: Option<i32>,
    end_year: Option<i32>,
    breadcrumbs: Vec<Option<String>>,
}

impl Serialize for FlowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let occupied = self.breadcrumbs.iter().filter(|b| b.is_some()).count();
        let mut map = serializer.serialize_map(Some(8 + occupied))?;
        map.serialize_entry("source", &self.source)?;
        map.serialize_entry("target", &self.target)?;
        map.serialize_entry("level", &self.level)?;
        map.serialize_entry("value", &self.value)?;
        map.serialize_entry("theme", &self.theme)?;
        map.serialize_entry("total_funding", &self.total_funding)?;
        map.serialize_entry("start_year", &self.start_year)?;
        map.serialize_entry("end_year", &self.end_year)?;
        for (i, slot) in self.breadcrumbs.iter().enumerate() {
            if let Some(name) = slot {
                map.serialize_entry(&format!("level_{}", i + 1), name)?;
            }
        }
        map.end()
    }
}

/// Drop exact duplicate records, keeping the first occurrence of each.
#[must_use]
pub fn dedupe(records: Vec<FlowRecord>) -> Vec<FlowRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.dedup_key()))
        .collect()
}

/// The complete derived output: deduplicated flow records plus the
/// diagnostics collected while resolving dependency references.
#[derive(Debug)]
pub struct FlowDerivation {
    /// Deduplicated records, in traversal order.
    pub records: Vec<FlowRecord>,
    /// Resolution warnings; empty when every reference resolved.
    pub diagnostics: Vec<Diagnostic>,
}
