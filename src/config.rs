//! # Plugin Configuration
//!
//! `Config` is the record every other module reads from. It is populated
//! once at startup (by the CLI layer, from flags and `PLUGIN_*` environment
//! variables) and then only ever read, apart from the secret resolution step
//! that fills in the cluster-access fields before the credential file is
//! written.
//!
//! The struct serializes with snake_case field names. Those names are the
//! variables available to the credential template, e.g. `{{ api_server }}`
//! or `{{ service_account }}`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Location of the kubeconfig that helm and kubectl read.
pub const DEFAULT_KUBE_CONFIG: &str = "/root/.kube/config";

/// Everything needed to provision credentials and build helm commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Cluster access
    pub api_server: String,
    pub token: String,
    pub service_account: String,
    pub kube_config: PathBuf,
    #[serde(rename = "tls_skip_verify")]
    pub skip_tls_verify: bool,

    // Helm action
    pub namespace: String,
    pub release: String,
    pub chart: String,
    pub version: String,
    /// Inline `--set` overrides, may contain `${VAR}` placeholders
    pub values: String,
    /// Comma-separated `--values` file paths
    pub values_files: String,
    pub timeout: String,
    pub tiller_ns: String,
    pub debug: bool,
    pub dry_run: bool,
    pub wait: bool,
    pub recreate_pods: bool,
    pub reuse_values: bool,
    pub force: bool,

    // helm init
    pub client_only: bool,
    pub upgrade: bool,
    pub canary_image: bool,

    /// `name=url` declarations passed to `helm repo add`
    pub helm_repos: Vec<String>,
    /// Environment lookup prefix for placeholder resolution
    pub prefix: String,
    /// Secret names made available by the CI runner. Informational only.
    pub secrets: Vec<String>,
}

impl Config {
    /// Value-file paths in declaration order.
    ///
    /// Splits on commas without trimming, so `"a.yaml, b.yaml"` yields
    /// `"a.yaml"` and `" b.yaml"`.
    pub fn values_file_paths(&self) -> Vec<&str> {
        if self.values_files.is_empty() {
            return Vec::new();
        }
        self.values_files.split(',').collect()
    }
}
