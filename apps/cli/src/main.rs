//! docsteps CLI: inspect and validate multi-step tutorials.
//!
//! Lists the tutorials of a content directory, checks them before publishing,
//! and shows the pagination a reader would get at any site location.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
