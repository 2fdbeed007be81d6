//! Shared test utilities for integration and E2E tests.
//!
//! The centrepiece is [`TestFixture`], a temporary directory holding a fake
//! `helm` shell script. The script appends its arguments, one invocation per
//! line, to `helm.log` so tests can assert on exactly what would have been
//! run.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_kubeconfig();
//!     // ... run drone-helm with fixture.helm_bin()
//!     assert_eq!(fixture.helm_calls(), vec!["init"]);
//! }
//! ```

use assert_fs::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::TestFixture;
}

/// Path of the kubeconfig template shipped with the plugin image.
#[allow(dead_code)]
pub fn shipped_template() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("assets")
        .join("kubeconfig")
}

/// A temporary directory with a fake helm binary.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a fixture whose helm always succeeds.
    pub fn new() -> Self {
        Self::with_helm_script("")
    }

    /// Create a fixture whose helm exits with status 3 when its first
    /// argument is `first_arg`.
    pub fn failing_on(first_arg: &str) -> Self {
        Self::with_helm_script(&format!(
            "if [ \"$1\" = \"{}\" ]; then exit 3; fi\n",
            first_arg
        ))
    }

    fn with_helm_script(extra: &str) -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        let log = temp_dir.path().join("helm.log");
        let script = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$*\" >> '{}'\n{}exit 0\n",
            log.display(),
            extra
        );

        let helm = temp_dir.child("helm");
        helm.write_str(&script).expect("Failed to write fake helm");
        make_executable(helm.path());

        Self { temp_dir }
    }

    /// Write an existing kubeconfig so provisioning is skipped.
    pub fn with_kubeconfig(self) -> Self {
        self.temp_dir
            .child("kube/config")
            .write_str("apiVersion: v1\nkind: Config\n")
            .expect("Failed to write kubeconfig");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn helm_bin(&self) -> PathBuf {
        self.temp_dir.path().join("helm")
    }

    pub fn kube_config(&self) -> PathBuf {
        self.temp_dir.path().join("kube").join("config")
    }

    /// Each helm invocation as its space-joined argument list.
    pub fn helm_calls(&self) -> Vec<String> {
        fs::read_to_string(self.temp_dir.path().join("helm.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make fake helm executable");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
