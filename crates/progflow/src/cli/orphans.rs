//! `progflow orphans` command implementation.

use std::path::Path;

use colored::Colorize;
use progflow::Catalog;

use super::display::{print_diagnostics, print_programs};

/// Run the orphans command.
pub fn run(input: &Path) -> Result<(), progflow::Error> {
    let rows = progflow::read_rows(input)?;
    let catalog = Catalog::from_rows(rows)?;
    let resolution = progflow::resolve(&catalog);

    print_diagnostics(resolution.diagnostics());

    let orphans = resolution.isolated(&catalog);
    if orphans.is_empty() {
        println!("{}", "No orphaned programs.".green());
        return Ok(());
    }

    println!(
        "Found {} orphaned programs (no dependencies in either direction):",
        orphans.len().to_string().yellow().bold()
    );
    print_programs(&orphans, "none");

    Ok(())
}
