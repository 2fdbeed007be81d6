//! Running helm
//!
//! The `Executor` trait is the seam between command compilation and the
//! outside world. `HelmExecutor` spawns the real binary with inherited
//! stdout/stderr; tests swap in a recorder.

use crate::command::Command;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{self, Stdio};

/// Where the helm binary lives inside the plugin image.
pub const DEFAULT_HELM_BIN: &str = "/bin/helm";

/// Trait for running helm commands - allows mocking in tests
pub trait Executor {
    /// Run `command` to completion. Succeeds only on a zero exit status.
    fn run(&self, command: &Command) -> Result<()>;
}

/// Runs commands against a helm binary, blocking until it exits.
#[derive(Debug, Clone)]
pub struct HelmExecutor {
    binary: PathBuf,
}

impl HelmExecutor {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Default for HelmExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_HELM_BIN)
    }
}

impl Executor for HelmExecutor {
    fn run(&self, command: &Command) -> Result<()> {
        let status = process::Command::new(&self.binary)
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Error::Execution {
                command: command.to_string(),
                message: format!("failed to start {}: {}", self.binary.display(), e),
            })?;

        if !status.success() {
            return Err(Error::Execution {
                command: command.to_string(),
                message: status.to_string(),
            });
        }

        Ok(())
    }
}
