//! Graph leveling: the depth-first, path-sensitive traversal that assigns
//! each program a bounded ordinal level along every dependency path and
//! produces the raw flow records.
//!
//! Every catalog program is tried as a root, in catalog order. A path ends
//! at a program with no resolved dependencies, at a program already visited
//! on the same path, or at the configured depth cap; the cap is the sole
//! termination guarantee on cyclic input. Cycle-detection state is copied
//! per branch: fan-out from one node must allow each branch to revisit
//! programs a sibling branch has already seen. Sharing that state across
//! branches suppresses legitimate paths and is a correctness bug, not an
//! optimization.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::flow::FlowRecord;
use crate::resolver::Resolution;
use crate::types::{Program, ProgramId};

/// Default bound on traversal depth (and breadcrumb slot count).
pub const DEFAULT_MAX_LEVEL: u32 = 6;

/// Which breadcrumb slot a program at a given level occupies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BreadcrumbAlignment {
    /// The root sits in `level_1`, its dependency in `level_2`, and so on.
    #[default]
    RootFirst,
    /// Reversed layout: a program at level `l` sits in slot `cap - l + 1`,
    /// so the root of a full-depth path ends up in the last slot.
    LeafAligned,
}

impl BreadcrumbAlignment {
    /// Zero-based breadcrumb index for a program at `level` under `cap`.
    fn slot_index(self, level: u32, cap: u32) -> usize {
        let slot = match self {
            Self::RootFirst => level,
            Self::LeafAligned => cap - level + 1,
        };
        slot as usize - 1
    }
}

/// Traversal configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelerConfig {
    /// Maximum level a path may reach; also the breadcrumb slot count.
    pub max_level: u32,
    /// Breadcrumb slot layout.
    pub alignment: BreadcrumbAlignment,
}

impl Default for LevelerConfig {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            alignment: BreadcrumbAlignment::default(),
        }
    }
}

/// The graph leveler; see the module docs for the traversal contract.
#[derive(Debug, Clone)]
pub struct Leveler {
    config: LevelerConfig,
}

impl Leveler {
    /// Create a leveler with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `max_level` is zero; the traversal needs
    /// at least one level to record anything.
    pub fn new(config: LevelerConfig) -> Result<Self> {
        if config.max_level == 0 {
            return Err(Error::Config("max_level must be at least 1".to_string()));
        }
        Ok(Self { config })
    }

    /// Traverse every catalog program as a root and collect the raw
    /// (pre-deduplication) flow records.
    ///
    /// Output order is deterministic: roots in catalog order, branches in
    /// resolution order.
    #[must_use]
    pub fn run(&self, catalog: &Catalog, resolution: &Resolution) -> Vec<FlowRecord> {
        let mut records = Vec::new();
        for root in catalog {
            trace!(root = %root.name, "starting root traversal");
            let chain = vec![None; self.config.max_level as usize];
            self.visit(
                catalog,
                resolution,
                root,
                1,
                HashSet::new(),
                chain,
                &mut records,
            );
        }
        debug!(records = records.len(), "leveling complete");
        records
    }

    #[allow(clippy::too_many_arguments)]
    fn visit(
        &self,
        catalog: &Catalog,
        resolution: &Resolution,
        program: &Program,
        level: u32,
        visited: HashSet<ProgramId>,
        mut chain: Vec<Option<String>>,
        records: &mut Vec<FlowRecord>,
    ) {
        let cap = self.config.max_level;
        chain[self.config.alignment.slot_index(level, cap)] = Some(program.name.clone());

        let dependencies = resolution.dependencies_of(program.id);
        if visited.contains(&program.id) || dependencies.is_empty() || level >= cap {
            trace!(program = %program.name, level, "path terminates");
            records.push(FlowRecord::terminal(program, level, chain));
            return;
        }

        let mut visited = visited;
        visited.insert(program.id);

        for &dep_id in dependencies {
            let dependency = catalog
                .get(dep_id)
                .expect("resolver guarantees edge endpoints exist in the catalog");

            let mut extended = chain.clone();
            extended[self.config.alignment.slot_index(level + 1, cap)] =
                Some(dependency.name.clone());
            records.push(FlowRecord::edge(dependency, program, level, extended.clone()));

            // Each branch gets its own copy of the visited set.
            self.visit(
                catalog,
                resolution,
                dependency,
                level + 1,
                visited.clone(),
                extended,
                records,
            );
        }
    }
}

/// One line of the dependency outline: a program visited at a level.
///
/// The outline is a print sequence, not a map; a program revisited at a
/// deeper level appears again with that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineEntry {
    /// The visited program.
    pub id: ProgramId,
    /// 1-based depth from the nearest dependency-free entry point.
    pub level: u32,
}

/// Walk the dependency graph downstream and assign each program its maximum
/// depth from any dependency-free entry point.
///
/// Entry points sit at level 1; a program reachable over several paths keeps
/// the deepest level. Programs only reachable through a cycle with no entry
/// point do not appear. Revisits along the same path are pruned, so cyclic
/// input terminates.
#[must_use]
pub fn dependency_outline(catalog: &Catalog, resolution: &Resolution) -> Vec<OutlineEntry> {
    let mut best: HashMap<ProgramId, u32> = HashMap::new();
    let mut entries = Vec::new();
    for entry_point in resolution.terminals(catalog) {
        outline_walk(
            resolution,
            entry_point.id,
            1,
            &HashSet::new(),
            &mut best,
            &mut entries,
        );
    }
    entries
}

fn outline_walk(
    resolution: &Resolution,
    id: ProgramId,
    level: u32,
    on_path: &HashSet<ProgramId>,
    best: &mut HashMap<ProgramId, u32>,
    entries: &mut Vec<OutlineEntry>,
) {
    if on_path.contains(&id) {
        return;
    }
    if best.get(&id).is_some_and(|&recorded| recorded >= level) {
        return;
    }
    best.insert(id, level);
    entries.push(OutlineEntry { id, level });

    let mut on_path = on_path.clone();
    on_path.insert(id);
    for consumer in resolution.consumers_of(id) {
        outline_walk(resolution, consumer, level + 1, &on_path, best, entries);
    }
}
