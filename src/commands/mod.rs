//! # CLI Command Implementations
//!
//! The plugin has a single entry point: a deploy run driven by flags and the
//! `PLUGIN_*` environment Drone provides. Its arguments and `execute`
//! function live in `deploy`, which calls into the `drone_helm` library for
//! the actual work.

pub mod deploy;
