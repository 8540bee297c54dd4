//! `progflow flows` command implementation.

use std::path::Path;

use colored::Colorize;
use progflow::{BreadcrumbAlignment, Catalog, LevelerConfig};

use super::display::print_diagnostics;

/// Run the flows command.
pub fn run(
    input: &Path,
    output: Option<&Path>,
    max_level: u32,
    leaf_aligned: bool,
) -> Result<(), progflow::Error> {
    let rows = progflow::read_rows(input)?;
    let catalog = Catalog::from_rows(rows)?;

    let config = LevelerConfig {
        max_level,
        alignment: if leaf_aligned {
            BreadcrumbAlignment::LeafAligned
        } else {
            BreadcrumbAlignment::RootFirst
        },
    };
    let derivation = progflow::derive_flows(&catalog, config)?;

    print_diagnostics(&derivation.diagnostics);

    match output {
        Some(path) => {
            progflow::write_flows(path, &derivation.records)?;
            println!(
                "Wrote {} flow records to {}",
                derivation.records.len().to_string().green().bold(),
                path.display()
            );
        }
        None => println!("{}", progflow::flows_to_string(&derivation.records)?),
    }

    Ok(())
}
