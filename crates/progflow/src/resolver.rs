//! Dependency reference resolution.
//!
//! Turns each program's free-text dependency references into validated edges
//! between catalog entries. Unresolvable references are dropped with a
//! collected [`Diagnostic`], never thrown, so one bad cell can't abort the
//! batch. The resolved graph is also materialized as a petgraph digraph for
//! structural queries (entry points, terminals, isolated programs).

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::error::Diagnostic;
use crate::types::{DependencyEdge, Program, ProgramId};

/// Separator between reference tokens in a dependency cell.
const REFERENCE_SEPARATOR: char = ',';

/// The resolved dependency graph plus collected diagnostics.
///
/// Edge endpoints are guaranteed to exist in the catalog that produced this
/// resolution; edges dedupe on `(from, to)`. Adjacency preserves the order in
/// which references were resolved, which the leveler relies on for
/// deterministic traversal.
#[derive(Debug)]
pub struct Resolution {
    edges: Vec<DependencyEdge>,
    outbound: HashMap<ProgramId, Vec<ProgramId>>,
    graph: DiGraph<ProgramId, ()>,
    node_ix: HashMap<ProgramId, NodeIndex>,
    diagnostics: Vec<Diagnostic>,
}

/// Resolve every program's dependency references against the catalog.
///
/// For each reference token: empty tokens are ignored, non-numeric tokens and
/// tokens naming an id absent from the catalog are dropped with a diagnostic,
/// and everything else becomes a deduplicated [`DependencyEdge`].
#[must_use]
pub fn resolve(catalog: &Catalog) -> Resolution {
    let mut graph = DiGraph::new();
    let mut node_ix = HashMap::with_capacity(catalog.len());
    for program in catalog {
        node_ix.insert(program.id, graph.add_node(program.id));
    }

    let mut edges = Vec::new();
    let mut seen = HashSet::new();
    let mut outbound: HashMap<ProgramId, Vec<ProgramId>> = HashMap::new();
    let mut diagnostics = Vec::new();

    for program in catalog {
        let Some(refs) = program.dependency_refs.as_deref() else {
            continue;
        };

        for token in refs.split(REFERENCE_SEPARATOR) {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }

            let Some(dep_id) = ProgramId::parse(token) else {
                warn!(program = %program.name, token, "dependency reference is not a valid id");
                diagnostics.push(Diagnostic::malformed_reference(&program.name, token));
                continue;
            };

            if !catalog.contains(dep_id) {
                warn!(program = %program.name, %dep_id, "dependency id not found in catalog");
                diagnostics.push(Diagnostic::unknown_reference(&program.name, token));
                continue;
            }

            let edge = DependencyEdge {
                from: dep_id,
                to: program.id,
            };
            if !seen.insert(edge) {
                continue;
            }

            edges.push(edge);
            outbound.entry(program.id).or_default().push(dep_id);
            graph.add_edge(node_ix[&dep_id], node_ix[&program.id], ());
        }
    }

    debug!(
        edges = edges.len(),
        diagnostics = diagnostics.len(),
        "dependency resolution complete"
    );

    Resolution {
        edges,
        outbound,
        graph,
        node_ix,
        diagnostics,
    }
}

impl Resolution {
    /// The resolved edges, deduplicated, in resolution order.
    #[must_use]
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Ids of the programs `id` depends on, in resolution order.
    ///
    /// Empty for terminal programs and for ids absent from the catalog.
    #[must_use]
    pub fn dependencies_of(&self, id: ProgramId) -> &[ProgramId] {
        self.outbound.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Ids of the programs that depend on `id`, in resolution order.
    #[must_use]
    pub fn consumers_of(&self, id: ProgramId) -> Vec<ProgramId> {
        let Some(&ix) = self.node_ix.get(&id) else {
            return Vec::new();
        };
        // petgraph iterates neighbors in reverse insertion order.
        let mut consumers: Vec<ProgramId> = self
            .graph
            .neighbors_directed(ix, Direction::Outgoing)
            .map(|n| self.graph[n])
            .collect();
        consumers.reverse();
        consumers
    }

    /// Programs with zero resolved dependencies.
    ///
    /// These are both the path terminals of the flow traversal (which walks
    /// from a program upstream into its dependencies) and the entry points of
    /// the dependency outline (which walks downstream into consumers).
    #[must_use]
    pub fn terminals<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Program> {
        catalog
            .iter()
            .filter(|p| self.dependencies_of(p.id).is_empty())
            .collect()
    }

    /// Programs with no resolved edges in either direction.
    ///
    /// These appear in the flow output only as self-referencing terminals.
    #[must_use]
    pub fn isolated<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Program> {
        catalog
            .iter()
            .filter(|p| {
                self.degree(p.id, Direction::Incoming) == 0
                    && self.degree(p.id, Direction::Outgoing) == 0
            })
            .collect()
    }

    /// Diagnostics collected during resolution, in catalog order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the resolution, returning its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn degree(&self, id: ProgramId, direction: Direction) -> usize {
        self.node_ix.get(&id).map_or(0, |&ix| {
            self.graph.neighbors_directed(ix, direction).count()
        })
    }
}
