//! # Progflow: program dependency flow derivation
//!
//! Progflow ingests a table of funded programs with free-text inter-program
//! dependency references and derives two downstream views:
//!
//! - a flattened, Sankey-ready **flow** representation, in which each program
//!   is assigned a bounded level along every dependency path and emitted as
//!   deduplicated source→target records, and
//! - a **normalized relational** view (companies, program↔company
//!   associations, dependency rows) for external persistence.
//!
//! ## Design Philosophy
//!
//! - **Core consumes data, not configuration** - spreadsheet parsing,
//!   database persistence, and rendering are external collaborators; the
//!   core takes a [`Catalog`] in and hands a [`FlowDerivation`] back
//! - **Id problems are fatal, reference problems are not** - a duplicate or
//!   non-numeric program id aborts the batch; an unresolvable dependency
//!   reference is dropped with a collected [`Diagnostic`]
//! - **Cycles are expected input** - the traversal treats revisits and the
//!   depth cap as ordinary terminal conditions, never as errors
//! - **Deterministic output** - roots in catalog order, branches in
//!   resolution order; repeated runs are byte-identical
//!
//! ## Quick Start
//!
//! ```
//! use progflow::{Catalog, LevelerConfig, RawProgramRow};
//!
//! let mut beta = RawProgramRow::new("2", "Beta");
//! beta.dependency = Some("1".to_string());
//! beta.total_funding = Some("$20m".to_string());
//!
//! let catalog = Catalog::from_rows(vec![RawProgramRow::new("1", "Alpha"), beta])?;
//! let derivation = progflow::derive_flows(&catalog, LevelerConfig::default())?;
//!
//! assert!(derivation.diagnostics.is_empty());
//! assert!(derivation.records.iter().any(|r| r.source == "Alpha" && r.target == "Beta"));
//! # Ok::<(), progflow::Error>(())
//! ```

mod catalog;
mod error;
mod flow;
mod ingest;
mod leveler;
mod resolver;
mod schema;
mod types;

pub use catalog::{Catalog, RawProgramRow};
pub use error::{Diagnostic, DiagnosticKind, Error, Result};
pub use flow::{FlowDerivation, FlowRecord, dedupe};
pub use ingest::{flows_to_string, read_rows, write_flows};
pub use leveler::{
    BreadcrumbAlignment, DEFAULT_MAX_LEVEL, Leveler, LevelerConfig, OutlineEntry,
    dependency_outline,
};
pub use resolver::{Resolution, resolve};
pub use schema::{Company, DependencyRow, NormalizedSchema, ProgramCompany};
pub use types::{DependencyEdge, Program, ProgramId};

/// Run the full pipeline: resolve references, level the graph, and emit the
/// deduplicated flow records plus collected diagnostics.
///
/// # Errors
///
/// Returns [`Error::Config`] if the leveler configuration is invalid.
/// Resolution problems never fail the run; they come back as diagnostics.
pub fn derive_flows(catalog: &Catalog, config: LevelerConfig) -> Result<FlowDerivation> {
    let resolution = resolver::resolve(catalog);
    let leveler = Leveler::new(config)?;
    let records = flow::dedupe(leveler.run(catalog, &resolution));
    Ok(FlowDerivation {
        records,
        diagnostics: resolution.into_diagnostics(),
    })
}
