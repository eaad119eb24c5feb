//! Service container for dependency injection

use super::traits::{Confirmer, EnvStore, FileSource, ProcessRunner};
use crate::config::{Config, EnvStoreKind};
use crate::core::RigupResult;
use crate::provision::env_store::{FileEnvStore, RegistryEnvStore};
use crate::provision::interactive::StdinConfirmer;
use crate::provision::process::SystemProcessRunner;
use crate::remote::client::HttpFileSource;
use std::sync::Arc;

/// Service container for dependency injection
///
/// Holds every capability the provisioning pipeline touches as a trait
/// object, so tests can swap in the fakes from [`super::mocks`].
///
/// # Example (Testing)
///
/// ```
/// use rigup::di::{ServiceContainer, mocks::*};
/// use std::sync::Arc;
///
/// let container = ServiceContainer::with_providers(
///     Arc::new(MemoryFileSource::new(vec!["a.txt".to_string()])),
///     Arc::new(ScriptedConfirmer::always_yes()),
///     Arc::new(RecordingProcessRunner::new()),
///     Arc::new(MemoryEnvStore::new()),
/// );
/// assert!(container.confirmer().confirm("go?").unwrap());
/// ```
#[derive(Clone)]
pub struct ServiceContainer {
    pub source: Arc<dyn FileSource>,
    pub confirmer: Arc<dyn Confirmer>,
    pub runner: Arc<dyn ProcessRunner>,
    pub env_store: Arc<dyn EnvStore>,
}

impl ServiceContainer {
    /// Create a service container with production implementations
    ///
    /// - HTTP file source against `config.base_url`
    /// - stdin confirmations
    /// - real subprocesses
    /// - registry or file environment store, per `config.env_store`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the
    /// environment file location cannot be determined.
    pub fn new(config: &Config) -> RigupResult<Self> {
        let runner: Arc<dyn ProcessRunner> = Arc::new(SystemProcessRunner::new());

        let env_store: Arc<dyn EnvStore> = match config.env_store {
            EnvStoreKind::Registry => Arc::new(RegistryEnvStore::new(Arc::clone(&runner))),
            EnvStoreKind::File => Arc::new(FileEnvStore::new(config.env_file_path()?)),
        };

        Ok(Self {
            source: Arc::new(HttpFileSource::new(&config.base_url)?),
            confirmer: Arc::new(StdinConfirmer),
            runner,
            env_store,
        })
    }

    /// Create a service container with custom provider implementations
    pub fn with_providers(
        source: Arc<dyn FileSource>,
        confirmer: Arc<dyn Confirmer>,
        runner: Arc<dyn ProcessRunner>,
        env_store: Arc<dyn EnvStore>,
    ) -> Self {
        Self {
            source,
            confirmer,
            runner,
            env_store,
        }
    }

    /// Get the file source
    pub fn source(&self) -> &dyn FileSource {
        self.source.as_ref()
    }

    /// Get the confirmer
    pub fn confirmer(&self) -> &dyn Confirmer {
        self.confirmer.as_ref()
    }

    /// Get the process runner
    pub fn runner(&self) -> &dyn ProcessRunner {
        self.runner.as_ref()
    }

    /// Get the environment store
    pub fn env_store(&self) -> &dyn EnvStore {
        self.env_store.as_ref()
    }
}
