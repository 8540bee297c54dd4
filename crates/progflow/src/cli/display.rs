//! Common display utilities for CLI commands.

use colored::Colorize;
use progflow::{Diagnostic, Program};

const MAX_DISPLAY_ITEMS: usize = 10;

/// Display a list of programs with optional truncation.
///
/// Shows up to `MAX_DISPLAY_ITEMS` programs with bullet points. If there are
/// more, shows "... and N more". If empty, shows the provided
/// `empty_message`.
pub fn print_programs(programs: &[&Program], empty_message: &str) {
    if programs.is_empty() {
        println!("    {}", empty_message.dimmed());
        return;
    }

    for program in programs.iter().take(MAX_DISPLAY_ITEMS) {
        println!("    {} {} (id {})", "•".dimmed(), program.name, program.id);
    }

    if programs.len() > MAX_DISPLAY_ITEMS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            programs.len() - MAX_DISPLAY_ITEMS
        );
    }
}

/// Print collected resolution diagnostics as warnings, if any.
pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{}: {diagnostic}", "warning".yellow().bold());
    }
}
