//! CLI command implementations.

mod display;

pub mod flows;
pub mod levels;
pub mod orphans;
