//! # Credential Provisioning
//!
//! Helm needs a kubeconfig to reach the cluster. When the configured
//! kubeconfig path does not exist yet, the plugin writes one by rendering a
//! template with the plugin [`Config`] as context. An existing file is
//! trusted as-is and never rewritten.
//!
//! ## Design
//!
//! Two small traits keep rendering and storage apart so either side can be
//! replaced in tests:
//!
//! - **`TemplateRenderer`**: turns a `Config` into kubeconfig text.
//!   `MiniJinjaRenderer` reads a template file from disk and renders it with
//!   `minijinja`.
//! - **`CredentialStore`**: knows whether the kubeconfig exists and how to
//!   write it. `FileCredentialStore` is the on-disk implementation.
//!
//! `Provisioner` ties them together with secret resolution and validation.

use crate::config::Config;
use crate::env;
use crate::error::{Error, Result};
use log::debug;
use minijinja::{Environment, UndefinedBehavior, Value};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

/// Where the kubeconfig template is expected inside the plugin image.
pub const DEFAULT_KUBE_TEMPLATE: &str = "/root/.kube/kubeconfig";

/// Used when no service account resolves from the environment.
pub const DEFAULT_SERVICE_ACCOUNT: &str = "helm";

const TEMPLATE_NAME: &str = "kubeconfig";

/// Renders kubeconfig contents from the plugin configuration.
pub trait TemplateRenderer {
    fn render(&self, config: &Config) -> Result<String>;
}

/// Reads and writes the kubeconfig file.
pub trait CredentialStore {
    /// Check if the kubeconfig already exists
    ///
    /// Only a definite "not found" counts as missing; a kubeconfig that is
    /// present but cannot be inspected is trusted rather than replaced.
    fn exists(&self) -> bool;

    /// Create the kubeconfig with `contents`.
    ///
    /// The destination must be fully written and closed when this returns,
    /// whether it succeeds or not.
    fn write(&self, contents: &str) -> Result<()>;

    /// Current kubeconfig contents, if readable.
    fn read(&self) -> Option<String>;
}

/// Renders a template file with `minijinja`.
///
/// Undefined variables render as empty strings.
pub struct MiniJinjaRenderer {
    template_path: PathBuf,
}

impl MiniJinjaRenderer {
    pub fn new(template_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
        }
    }

    /// Render `source` directly, bypassing the template file.
    pub fn render_source(source: &str, config: &Config) -> Result<String> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Lenient);
        env.set_keep_trailing_newline(true);
        env.add_template(TEMPLATE_NAME, source)?;

        let template = env.get_template(TEMPLATE_NAME)?;
        Ok(template.render(Value::from_serialize(config))?)
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, config: &Config) -> Result<String> {
        let source = fs::read_to_string(&self.template_path).map_err(|e| Error::Template {
            message: format!("cannot read {}: {}", self.template_path.display(), e),
            template: Some(TEMPLATE_NAME.to_string()),
        })?;
        Self::render_source(&source, config)
    }
}

/// The kubeconfig file on the host filesystem.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn exists(&self) -> bool {
        match fs::metadata(&self.path) {
            Ok(_) => true,
            Err(e) => e.kind() != ErrorKind::NotFound,
        }
    }

    fn write(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // dropped (and closed) on every return path
        let mut file = File::create(&self.path)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    fn read(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }
}

/// Fill the cluster-access fields from the process environment.
///
/// The inline `values` are resolved in place, while `api_server`, `token`
/// and `service_account` are overwritten from the `${API_SERVER}`,
/// `${KUBERNETES_TOKEN}` and `${SERVICE_ACCOUNT}` placeholders regardless of
/// their current value.
pub fn resolve_secrets(config: &mut Config) {
    resolve_secrets_with(config, |key| std::env::var(key).ok())
}

/// [`resolve_secrets`] against an explicit environment lookup.
pub fn resolve_secrets_with<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = config.prefix.clone();
    let debug = config.debug;

    config.values = env::resolve_with(&config.values, &prefix, debug, &lookup);
    config.api_server = env::resolve_with("${API_SERVER}", &prefix, debug, &lookup);
    config.token = env::resolve_with("${KUBERNETES_TOKEN}", &prefix, debug, &lookup);
    config.service_account = env::resolve_with("${SERVICE_ACCOUNT}", &prefix, debug, &lookup);

    if config.service_account.is_empty() {
        config.service_account = DEFAULT_SERVICE_ACCOUNT.to_string();
    }
}

/// Check that the fields the kubeconfig cannot do without are set.
pub fn validate(config: &Config) -> Result<()> {
    if config.api_server.is_empty() {
        return Err(Error::Configuration {
            message: "API Server is needed to deploy.".to_string(),
        });
    }
    if config.token.is_empty() {
        return Err(Error::Configuration {
            message: "Token is needed to deploy.".to_string(),
        });
    }
    Ok(())
}

/// Writes the kubeconfig once, when it is missing.
pub struct Provisioner<R, S> {
    renderer: R,
    store: S,
}

impl<R: TemplateRenderer, S: CredentialStore> Provisioner<R, S> {
    pub fn new(renderer: R, store: S) -> Self {
        Self { renderer, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve secrets, validate and render the kubeconfig.
    ///
    /// Returns `Ok(false)` without touching `config` or the store when the
    /// kubeconfig already exists. Validation happens before anything is
    /// rendered or written.
    pub fn provision(&self, config: &mut Config) -> Result<bool> {
        if self.store.exists() {
            debug!("kubeconfig already present, skipping provisioning");
            return Ok(false);
        }

        resolve_secrets(config);
        validate(config)?;

        let contents = self.renderer.render(config)?;
        self.store.write(&contents)?;
        Ok(true)
    }
}

/// Provisioner backed by a template file and the real kubeconfig path.
pub type FileProvisioner = Provisioner<MiniJinjaRenderer, FileCredentialStore>;

impl FileProvisioner {
    pub fn from_paths(template: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Provisioner::new(
            MiniJinjaRenderer::new(template),
            FileCredentialStore::new(destination),
        )
    }
}
