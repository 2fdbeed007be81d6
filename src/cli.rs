//! CLI argument parsing and logging setup

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::LevelFilter;

use crate::commands;

/// Drone Helm - Deploy Helm charts from a Drone pipeline
#[derive(Parser, Debug)]
#[command(name = "drone-helm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    deploy: commands::deploy::DeployArgs,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", env = "DRONE_HELM_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Execute the deployment
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level, self.deploy.debug);
        commands::deploy::execute(self.deploy)
    }
}

/// Effective log filter: the requested level, raised to `debug` for debug runs.
fn log_filter(log_level: &str, debug: bool) -> String {
    let requested = log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
    let effective = if debug {
        requested.max(LevelFilter::Debug)
    } else {
        requested
    };
    effective.to_string().to_lowercase()
}

fn init_logging(log_level: &str, debug: bool) {
    // RUST_LOG still wins when set
    env_logger::Builder::from_env(Env::default().default_filter_or(log_filter(log_level, debug)))
        .format_timestamp(None)
        .init();
}
