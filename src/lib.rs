//! # Drone Helm Library
//!
//! Core of the `drone-helm` plugin: given the plugin configuration and the
//! CI event that triggered a build, it provisions a kubeconfig and runs the
//! helm commands that deploy (or delete) a release.
//!
//! ## Quick Example
//!
//! ```
//! use drone_helm::command::{compile, EventKind};
//! use drone_helm::config::Config;
//!
//! let config = Config {
//!     release: "r1".to_string(),
//!     chart: "c1".to_string(),
//!     version: "1.2.3".to_string(),
//!     wait: true,
//!     ..Default::default()
//! };
//!
//! let cmd = compile(&EventKind::classify("push"), &config);
//! assert_eq!(cmd.to_string(), "upgrade --install r1 c1 --version 1.2.3 --wait");
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: the plugin settings, read-only once loaded.
//! - **Placeholder resolution (`env`)**: `${NAME}` / `$NAME` lookup with a
//!   `PREFIX_NAME` then `NAME` fallback.
//! - **Repositories (`repo`)**: parsing of `name=url` declarations.
//! - **Commands (`command`)**: event-driven helm argument lists.
//! - **Credentials (`kubeconfig`)**: one-time kubeconfig rendering.
//! - **Execution (`executor`)**: running helm with inherited stdio.
//!
//! ## Execution Flow
//!
//! `plugin::Plugin::exec` runs the steps in order and stops at the first
//! error:
//!
//! 1.  **Provision**: write the kubeconfig if it is missing.
//! 2.  **Init**: `helm init`.
//! 3.  **Repositories**: `helm repo add` for each declared repository.
//! 4.  **Main command**: upgrade, delete or help depending on the event.

pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod executor;
pub mod kubeconfig;
pub mod plugin;
pub mod repo;

#[cfg(test)]
mod command_proptest;
