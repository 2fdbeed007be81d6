//! Deploy command implementation
//!
//! Reads the plugin settings (flags, or the `PLUGIN_*` variables Drone
//! exports for each `settings:` entry), then runs the full sequence:
//! kubeconfig provisioning, `helm init`, `helm repo add` and the main
//! command for the build event.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use drone_helm::command::EventKind;
use drone_helm::config::{Config, DEFAULT_KUBE_CONFIG};
use drone_helm::executor::{HelmExecutor, DEFAULT_HELM_BIN};
use drone_helm::kubeconfig::{FileProvisioner, DEFAULT_KUBE_TEMPLATE};
use drone_helm::plugin::Plugin;

/// Arguments for the deploy command
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Build event that triggered the pipeline (push, tag, deployment, delete)
    #[arg(long, value_name = "EVENT", env = "DRONE_BUILD_EVENT", default_value = "")]
    pub event: String,

    /// Path to the helm binary
    #[arg(long, value_name = "PATH", env = "HELM_BIN", default_value = DEFAULT_HELM_BIN)]
    pub helm_bin: PathBuf,

    /// Template used to write the kubeconfig when it is missing
    #[arg(long, value_name = "PATH", env = "KUBE_TEMPLATE", default_value = DEFAULT_KUBE_TEMPLATE)]
    pub kube_template: PathBuf,

    /// Kubeconfig location; written from the template if absent
    #[arg(long, value_name = "PATH", env = "PLUGIN_KUBE_CONFIG", default_value = DEFAULT_KUBE_CONFIG)]
    pub kube_config: PathBuf,

    /// Kubernetes API server URL
    #[arg(long, env = "PLUGIN_API_SERVER", default_value = "")]
    pub api_server: String,

    /// Kubernetes bearer token
    #[arg(long, env = "PLUGIN_TOKEN", default_value = "", hide_env_values = true)]
    pub token: String,

    /// Service account used in the kubeconfig
    #[arg(long, env = "PLUGIN_SERVICE_ACCOUNT", default_value = "")]
    pub service_account: String,

    /// Skip TLS verification of the API server
    #[arg(long, env = "PLUGIN_SKIP_TLS_VERIFY")]
    pub skip_tls_verify: bool,

    /// Kubernetes namespace to deploy into
    #[arg(long, env = "PLUGIN_NAMESPACE", default_value = "")]
    pub namespace: String,

    /// Helm release name
    #[arg(long, env = "PLUGIN_RELEASE", default_value = "")]
    pub release: String,

    /// Chart reference, e.g. stable/nginx
    #[arg(long, env = "PLUGIN_CHART", default_value = "")]
    pub chart: String,

    /// Chart version constraint
    #[arg(long = "chart-version", env = "PLUGIN_CHART_VERSION", default_value = "")]
    pub chart_version: String,

    /// Inline --set values; ${VAR} placeholders are resolved from the environment
    #[arg(long, env = "PLUGIN_VALUES", default_value = "")]
    pub values: String,

    /// Comma-separated list of values files
    #[arg(long, env = "PLUGIN_VALUES_FILES", default_value = "")]
    pub values_files: String,

    /// Timeout forwarded to helm
    #[arg(long, env = "PLUGIN_TIMEOUT", default_value = "")]
    pub timeout: String,

    /// Namespace Tiller runs in
    #[arg(long, env = "PLUGIN_TILLER_NS", default_value = "")]
    pub tiller_ns: String,

    /// Prefix tried first when resolving ${VAR} placeholders
    #[arg(long, env = "PLUGIN_PREFIX", default_value = "")]
    pub prefix: String,

    /// Helm repositories to add, as name=url
    #[arg(long, env = "PLUGIN_HELM_REPOS", value_delimiter = ',')]
    pub helm_repos: Vec<String>,

    /// Secret names exposed to the step
    #[arg(long, env = "PLUGIN_SECRETS", value_delimiter = ',')]
    pub secrets: Vec<String>,

    /// Print debug diagnostics (exposes secrets in the build log)
    #[arg(long, env = "PLUGIN_DEBUG")]
    pub debug: bool,

    /// Simulate the install or upgrade
    #[arg(long, env = "PLUGIN_DRY_RUN")]
    pub dry_run: bool,

    /// Wait until all resources are ready
    #[arg(long, env = "PLUGIN_WAIT")]
    pub wait: bool,

    /// Restart pods of the release
    #[arg(long, env = "PLUGIN_RECREATE_PODS")]
    pub recreate_pods: bool,

    /// Reuse the values of the previous release
    #[arg(long, env = "PLUGIN_REUSE_VALUES")]
    pub reuse_values: bool,

    /// Force resource updates
    #[arg(long, env = "PLUGIN_FORCE")]
    pub force: bool,

    /// helm init --client-only
    #[arg(long, env = "PLUGIN_CLIENT_ONLY")]
    pub client_only: bool,

    /// helm init --upgrade
    #[arg(long, env = "PLUGIN_UPGRADE")]
    pub upgrade: bool,

    /// helm init --canary-image
    #[arg(long, env = "PLUGIN_CANARY_IMAGE")]
    pub canary_image: bool,
}

impl DeployArgs {
    /// Build the plugin configuration. Empty list entries are dropped.
    pub fn to_config(&self) -> Config {
        Config {
            api_server: self.api_server.clone(),
            token: self.token.clone(),
            service_account: self.service_account.clone(),
            kube_config: self.kube_config.clone(),
            skip_tls_verify: self.skip_tls_verify,
            namespace: self.namespace.clone(),
            release: self.release.clone(),
            chart: self.chart.clone(),
            version: self.chart_version.clone(),
            values: self.values.clone(),
            values_files: self.values_files.clone(),
            timeout: self.timeout.clone(),
            tiller_ns: self.tiller_ns.clone(),
            debug: self.debug,
            dry_run: self.dry_run,
            wait: self.wait,
            recreate_pods: self.recreate_pods,
            reuse_values: self.reuse_values,
            force: self.force,
            client_only: self.client_only,
            upgrade: self.upgrade,
            canary_image: self.canary_image,
            helm_repos: non_empty(&self.helm_repos),
            prefix: self.prefix.clone(),
            secrets: non_empty(&self.secrets),
        }
    }
}

fn non_empty(items: &[String]) -> Vec<String> {
    items.iter().filter(|s| !s.is_empty()).cloned().collect()
}

/// Execute the deploy command
pub fn execute(args: DeployArgs) -> Result<()> {
    let config = args.to_config();
    let provisioner = FileProvisioner::from_paths(&args.kube_template, &config.kube_config);
    let executor = HelmExecutor::new(&args.helm_bin);
    let event = EventKind::classify(&args.event);

    log::info!("drone-helm: event '{}'", args.event);

    let mut plugin = Plugin::new(config, executor, provisioner);
    plugin.exec(&event)?;
    Ok(())
}
