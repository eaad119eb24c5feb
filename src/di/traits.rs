//! Trait definitions for dependency injection

use crate::core::RigupResult;
use async_trait::async_trait;
use rigup_core::path_list::DEFAULT_SEPARATOR;
use std::path::Path;

/// Trait for asking the operator a yes/no question
///
/// Implementations decide how the answer is obtained; the pipeline only
/// sees whether it may proceed.
pub trait Confirmer: Send + Sync {
    /// Ask `prompt`; `Ok(true)` means proceed
    fn confirm(&self, prompt: &str) -> RigupResult<bool>;
}

/// Outcome of a finished subprocess
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// A successful run with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code
    pub fn failed(code: i32) -> Self {
        Self {
            success: false,
            code: Some(code),
            ..Default::default()
        }
    }
}

/// Trait for running external programs (installers, editor CLI, registry tools)
#[cfg_attr(test, mockall::automock)]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args` to completion.
    ///
    /// `Err` means the program could not be started at all; a non-zero exit
    /// is reported through `ProcessOutput::success`.
    fn run(&self, program: &Path, args: &[String]) -> RigupResult<ProcessOutput>;
}

/// Trait for the persistent per-user environment store
pub trait EnvStore: Send + Sync {
    /// Current value of `name`, `None` if unset
    fn read(&self, name: &str) -> RigupResult<Option<String>>;

    /// Persist `value` for `name`
    fn write(&self, name: &str, value: &str) -> RigupResult<()>;

    /// Export the whole store to `dest`
    fn snapshot(&self, dest: &Path) -> RigupResult<()>;

    /// List separator of PATH-like values in this store
    fn separator(&self) -> char {
        DEFAULT_SEPARATOR
    }
}

/// Trait for the remote file server
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Fetch the full list of hosted relative paths
    async fn fetch_listing(&self) -> RigupResult<Vec<String>>;

    /// Download `entry` into `dest`, returning the number of bytes written
    async fn fetch_file(&self, entry: &str, dest: &Path) -> RigupResult<u64>;
}
