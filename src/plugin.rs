//! Orchestrator for a complete plugin run
//!
//! A run is a fixed sequence, each step short-circuiting on failure:
//! 1. Provision the kubeconfig if it does not exist yet
//! 2. `helm init`
//! 3. `helm repo add` for every declared repository
//! 4. The main command for the triggering event
//!
//! Nothing is retried and nothing is rolled back.

use crate::command::{self, EventKind};
use crate::config::Config;
use crate::error::Result;
use crate::executor::Executor;
use crate::kubeconfig::{CredentialStore, Provisioner, TemplateRenderer};
use crate::repo;
use log::{debug, info, warn};

pub struct Plugin<E, R, S> {
    config: Config,
    executor: E,
    provisioner: Provisioner<R, S>,
}

impl<E, R, S> Plugin<E, R, S>
where
    E: Executor,
    R: TemplateRenderer,
    S: CredentialStore,
{
    pub fn new(config: Config, executor: E, provisioner: Provisioner<R, S>) -> Self {
        Self {
            config,
            executor,
            provisioner,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Execute the full deployment sequence for `event`.
    pub fn exec(&mut self, event: &EventKind) -> Result<()> {
        if self.config.debug {
            warn!("debug output includes environment variables and cluster credentials");
            debug_env();
        }

        if self.provisioner.provision(&mut self.config)? {
            info!("kubeconfig written");
        }

        if self.config.debug {
            self.debug_report();
        }

        let init = command::init_command(&self.config);
        self.executor.run(&init)?;

        for declaration in &self.config.helm_repos {
            let repository = repo::parse(declaration)?;
            let repo_add = command::repo_add_command(&repository);
            if self.config.debug {
                debug!("adding helm repo: {}", repo_add);
            }
            self.executor.run(&repo_add)?;
        }

        let main = command::compile(event, &self.config);
        if self.config.debug {
            debug!("helm command: {}", main);
        }
        self.executor.run(&main)
    }

    fn debug_report(&self) {
        debug!("Api server: {}", self.config.api_server);
        debug!("Values: {}", self.config.values);
        debug!("Secrets: {:?}", self.config.secrets);
        debug!("Helm Repos: {:?}", self.config.helm_repos);
        debug!("ValuesFiles: {}", self.config.values_files);
        if let Some(kubeconfig) = self.provisioner.store().read() {
            debug!("kubeconfig:\n{}", kubeconfig);
        }
    }
}

fn debug_env() {
    for (key, value) in std::env::vars() {
        debug!("-Var:-- {}={}", key, value);
    }
}
