//! # Helm Command Compilation
//!
//! Turns a CI event plus the plugin [`Config`] into the exact argument list
//! passed to the helm binary. Everything here is pure: no environment reads,
//! no I/O.
//!
//! ## Event Dispatch
//!
//! | Event | Command |
//! |---|---|
//! | `push`, `tag`, `deployment` | `upgrade --install [release] chart [flags...]` |
//! | `delete` | `delete <release>` |
//! | anything else | `help` (prints usage, deploys nothing) |
//!
//! Flags are appended in a fixed order and only when their source field is
//! non-empty (strings) or `true` (booleans).

use crate::config::Config;
use crate::repo::{unquote, RepositoryDeclaration};
use std::fmt;

/// Classification of the CI event that triggered the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Push,
    Tag,
    Deployment,
    Delete,
    /// Any event without a dedicated command, including the empty string.
    Other(String),
}

impl EventKind {
    /// Classify a raw event name such as the value of `DRONE_BUILD_EVENT`.
    ///
    /// Matching is exact; `"Push"` is not a push.
    pub fn classify(event: &str) -> Self {
        match event {
            "push" => EventKind::Push,
            "tag" => EventKind::Tag,
            "deployment" => EventKind::Deployment,
            "delete" => EventKind::Delete,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl From<&str> for EventKind {
    fn from(event: &str) -> Self {
        EventKind::classify(event)
    }
}

/// One helm invocation: the ordered argument list after the binary name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    args: Vec<String>,
}

impl Command {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn into_args(self) -> Vec<String> {
        self.args
    }

    fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Append `flag value` when `value` is non-empty.
    fn opt(&mut self, flag: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.arg(flag).arg(value);
        }
        self
    }

    /// Append `flag` when `enabled`.
    fn switch(&mut self, flag: &str, enabled: bool) -> &mut Self {
        if enabled {
            self.arg(flag);
        }
        self
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

/// Compile the main helm command for `event`.
pub fn compile(event: &EventKind, config: &Config) -> Command {
    match event {
        EventKind::Push | EventKind::Tag | EventKind::Deployment => upgrade_command(config),
        EventKind::Delete => delete_command(config),
        EventKind::Other(_) => help_command(),
    }
}

/// `helm upgrade --install`, flags in the order helm 2 expects them.
pub fn upgrade_command(config: &Config) -> Command {
    let mut cmd = Command::new(["upgrade", "--install"]);

    if !config.release.is_empty() {
        cmd.arg(config.release.as_str());
    }
    cmd.arg(config.chart.as_str());
    cmd.opt("--version", &config.version);
    if !config.values.is_empty() {
        cmd.arg("--set").arg(unquote(&config.values));
    }
    for path in config.values_file_paths() {
        cmd.arg("--values").arg(path);
    }
    cmd.opt("--namespace", &config.namespace)
        .opt("--tiller-namespace", &config.tiller_ns)
        .switch("--dry-run", config.dry_run)
        .switch("--debug", config.debug)
        .switch("--wait", config.wait)
        .switch("--recreate-pods", config.recreate_pods)
        .switch("--reuse-values", config.reuse_values)
        .opt("--timeout", &config.timeout)
        .switch("--force", config.force);

    cmd
}

pub fn delete_command(config: &Config) -> Command {
    Command::new(["delete", config.release.as_str()])
}

/// Events without a deployment action just print helm's usage.
///
/// The subcommand carries no arguments of its own.
pub fn help_command() -> Command {
    Command::new(["help"])
}

/// `helm init`, run before every main command.
pub fn init_command(config: &Config) -> Command {
    let mut cmd = Command::new(["init"]);
    cmd.opt("--tiller-namespace", &config.tiller_ns)
        .switch("--client-only", config.client_only)
        .switch("--upgrade", config.upgrade)
        .switch("--canary-image", config.canary_image);
    cmd
}

pub fn repo_add_command(repo: &RepositoryDeclaration) -> Command {
    Command::new(["repo", "add", repo.name.as_str(), repo.url.as_str()])
}
