//! `progflow levels` command implementation.

use std::path::Path;

use colored::Colorize;
use progflow::Catalog;

use super::display::print_diagnostics;

/// Run the levels command.
pub fn run(input: &Path) -> Result<(), progflow::Error> {
    let rows = progflow::read_rows(input)?;
    let catalog = Catalog::from_rows(rows)?;
    let resolution = progflow::resolve(&catalog);

    print_diagnostics(resolution.diagnostics());

    let outline = progflow::dependency_outline(&catalog, &resolution);
    if outline.is_empty() {
        println!(
            "{}",
            "No dependency-free entry points; nothing to outline.".dimmed()
        );
        return Ok(());
    }

    for entry in &outline {
        let name = catalog
            .get(entry.id)
            .map_or("<unknown>", |p| p.name.as_str());
        let indent = "  ".repeat(entry.level as usize - 1);
        println!(
            "{indent}{} {name}",
            format!("Level {}:", entry.level).bold()
        );
    }

    Ok(())
}
