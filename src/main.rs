//! # Drone Helm CLI
//!
//! This is the binary entry point for the `drone-helm` plugin.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments and `PLUGIN_*` settings using `clap`.
//! - Setting up logging.
//! - Running the deployment and turning failures into a non-zero exit code.
//!
//! The deployment logic lives in the `drone_helm` library crate.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
