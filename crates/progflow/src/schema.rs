//! Normalized relational views derived from the catalog.
//!
//! External persistence adapters take these as-is: a `company` table with
//! assigned ids, a `program_company` association table, and a
//! `program_dependencies` table mirroring the resolved edges. All collections
//! are deduplicated and deterministically ordered.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::catalog::Catalog;
use crate::resolver::Resolution;
use crate::types::ProgramId;

/// Separator between company names in a program's company cell.
const COMPANY_SEPARATOR: char = ',';

/// A company mentioned by at least one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Company {
    /// Assigned id, 1-based, in name order.
    pub id: u32,
    /// Company name, as written (trimmed).
    pub name: String,
}

/// One program↔company association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ProgramCompany {
    /// The program mentioning the company.
    pub program_id: ProgramId,
    /// The mentioned company.
    pub company_id: u32,
}

/// One resolved dependency row: `program_id` depends on `dependency_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DependencyRow {
    /// Downstream program.
    pub program_id: ProgramId,
    /// Upstream dependency.
    pub dependency_id: ProgramId,
}

/// The full normalized view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSchema {
    /// Unique companies, ordered by name.
    pub companies: Vec<Company>,
    /// Deduplicated associations, in catalog order.
    pub program_companies: Vec<ProgramCompany>,
    /// Dependency rows, in resolution order.
    pub dependencies: Vec<DependencyRow>,
}

impl NormalizedSchema {
    /// Derive the normalized view from a catalog and its resolution.
    ///
    /// Company names are split on `,` and trimmed; ids are assigned 1.. in
    /// sorted name order so repeated runs produce identical tables.
    #[must_use]
    pub fn derive(catalog: &Catalog, resolution: &Resolution) -> Self {
        let mut names: BTreeSet<&str> = BTreeSet::new();
        for program in catalog {
            for name in company_names(program.companies.as_deref()) {
                names.insert(name);
            }
        }

        let mut id_by_name = HashMap::with_capacity(names.len());
        let companies: Vec<Company> = names
            .iter()
            .enumerate()
            .map(|(i, &name)| {
                let id = u32::try_from(i + 1).unwrap_or(u32::MAX);
                id_by_name.insert(name, id);
                Company {
                    id,
                    name: name.to_string(),
                }
            })
            .collect();

        let mut seen = HashSet::new();
        let mut program_companies = Vec::new();
        for program in catalog {
            for name in company_names(program.companies.as_deref()) {
                let association = ProgramCompany {
                    program_id: program.id,
                    company_id: id_by_name[name],
                };
                if seen.insert(association) {
                    program_companies.push(association);
                }
            }
        }

        let dependencies = resolution
            .edges()
            .iter()
            .map(|edge| DependencyRow {
                program_id: edge.to,
                dependency_id: edge.from,
            })
            .collect();

        Self {
            companies,
            program_companies,
            dependencies,
        }
    }
}

/// Split a company cell into trimmed, non-empty names.
fn company_names(cell: Option<&str>) -> impl Iterator<Item = &str> {
    cell.into_iter()
        .flat_map(|text| text.split(COMPANY_SEPARATOR))
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RawProgramRow;
    use crate::resolver::resolve;

    fn catalog() -> Catalog {
        let mut alpha = RawProgramRow::new("1", "Alpha");
        alpha.companies = Some("Initech, Acme".to_string());
        let mut beta = RawProgramRow::new("2", "Beta");
        beta.companies = Some("Acme, Acme, ".to_string());
        beta.dependency = Some("1".to_string());
        Catalog::from_rows(vec![alpha, beta]).expect("valid rows")
    }

    #[test]
    fn companies_dedupe_and_sort_by_name() {
        let catalog = catalog();
        let schema = NormalizedSchema::derive(&catalog, &resolve(&catalog));

        let names: Vec<_> = schema.companies.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Acme", "Initech"]);
        assert_eq!(schema.companies[0].id, 1);
        assert_eq!(schema.companies[1].id, 2);
    }

    #[test]
    fn associations_dedupe_per_program() {
        let catalog = catalog();
        let schema = NormalizedSchema::derive(&catalog, &resolve(&catalog));

        assert_eq!(
            schema.program_companies,
            vec![
                ProgramCompany {
                    program_id: ProgramId::new(1),
                    company_id: 2,
                },
                ProgramCompany {
                    program_id: ProgramId::new(1),
                    company_id: 1,
                },
                ProgramCompany {
                    program_id: ProgramId::new(2),
                    company_id: 1,
                },
            ]
        );
    }

    #[test]
    fn dependency_rows_mirror_resolved_edges() {
        let catalog = catalog();
        let schema = NormalizedSchema::derive(&catalog, &resolve(&catalog));

        assert_eq!(
            schema.dependencies,
            vec![DependencyRow {
                program_id: ProgramId::new(2),
                dependency_id: ProgramId::new(1),
            }]
        );
    }

    #[test]
    fn programs_without_companies_contribute_nothing() {
        let catalog =
            Catalog::from_rows(vec![RawProgramRow::new("1", "Solo")]).expect("valid row");
        let schema = NormalizedSchema::derive(&catalog, &resolve(&catalog));

        assert!(schema.companies.is_empty());
        assert!(schema.program_companies.is_empty());
    }
}
