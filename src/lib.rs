// Module declarations
pub(crate) mod cli;
pub mod commands;
pub mod config;
pub mod imports;
pub mod index;
pub mod mirror;
pub mod report;

use anyhow::Result;

/// Main entry point for CLI usage
pub fn run_cli() -> Result<()> {
    cli::run_cli()
}
