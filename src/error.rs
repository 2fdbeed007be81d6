//! # Error Handling
//!
//! This module defines the centralized error type for `drone-helm`. It uses
//! the `thiserror` library to describe every way a deployment run can fail,
//! each variant carrying enough context to explain the failure to whoever is
//! reading the CI log.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes:
//!   - missing cluster credentials (`Configuration`),
//!   - malformed repository declarations (`Parse`),
//!   - credential template problems (`Template`),
//!   - helm invocations that fail to start or exit non-zero (`Execution`),
//!   - filesystem errors while writing the credential file (`Io`).
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! None of these errors is recoverable. The orchestrator returns the first
//! one it meets and the run ends there.

use thiserror::Error;

/// Main error type for drone-helm operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required cluster-access field was empty after secret resolution.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A repository declaration did not match `name=http(s)://...`.
    #[error("Invalid repo definition: {input}")]
    Parse { input: String },

    /// The credential template could not be parsed or rendered.
    ///
    /// Includes the template name when it is known.
    #[error("Template processing error: {message}{}", template.as_ref().map(|t| format!(" (template: {})", t)).unwrap_or_default())]
    Template {
        message: String,
        /// Name of the template that failed, if applicable
        template: Option<String>,
    },

    /// The helm binary could not be started or exited with a failure status.
    #[error("Helm command failed: {command} - {message}")]
    Execution { command: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the joined command text for execution failures.
    pub fn command(&self) -> Option<&str> {
        match self {
            Error::Execution { command, .. } => Some(command),
            _ => None,
        }
    }
}

impl From<minijinja::Error> for Error {
    fn from(err: minijinja::Error) -> Self {
        Error::Template {
            message: err.to_string(),
            template: err.name().map(str::to_string),
        }
    }
}
