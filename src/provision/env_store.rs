//! Persistent per-user environment stores.

use crate::core::path::ensure_dir;
use crate::core::{RigupError, RigupResult};
use crate::di::{EnvStore, ProcessRunner};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Registry key holding the current user's environment
pub const USER_ENV_KEY: &str = "HKCU\\Environment";

/// The Windows per-user environment, driven through `reg` and `setx`
pub struct RegistryEnvStore {
    runner: Arc<dyn ProcessRunner>,
}

impl RegistryEnvStore {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    fn run(&self, program: &str, args: Vec<String>) -> RigupResult<crate::di::ProcessOutput> {
        self.runner
            .run(Path::new(program), &args)
            .map_err(|e| RigupError::Environment(format!("cannot run {}: {}", program, e)))
    }
}

/// Extract the data of value `name` from `reg query` output.
///
/// Lines look like `    Path    REG_EXPAND_SZ    C:\a;C:\b`.
pub fn parse_reg_query(output: &str, name: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let line = line.trim();
        let (first, rest) = line.split_once(char::is_whitespace)?;
        if !first.eq_ignore_ascii_case(name) {
            return None;
        }
        let rest = rest.trim_start();
        if !rest.starts_with("REG_") {
            return None;
        }
        Some(match rest.split_once(char::is_whitespace) {
            Some((_, value)) => value.trim().to_string(),
            None => String::new(),
        })
    })
}

/// Whether `reg query` stderr reports that the value does not exist.
pub fn is_value_missing(stderr: &str) -> bool {
    stderr.to_lowercase().contains("unable to find")
}

impl EnvStore for RegistryEnvStore {
    fn read(&self, name: &str) -> RigupResult<Option<String>> {
        let output = self.run(
            "reg",
            vec![
                "query".to_string(),
                USER_ENV_KEY.to_string(),
                "/v".to_string(),
                name.to_string(),
            ],
        )?;
        if !output.success {
            // only an absent value reads as unset
            if is_value_missing(&output.stderr) {
                return Ok(None);
            }
            return Err(RigupError::Environment(format!(
                "reg query {} failed ({:?}): {}",
                name,
                output.code,
                output.stderr.trim()
            )));
        }
        parse_reg_query(&output.stdout, name).map(Some).ok_or_else(|| {
            RigupError::Environment(format!(
                "cannot read {} from reg query output: {}",
                name,
                output.stdout.trim()
            ))
        })
    }

    fn write(&self, name: &str, value: &str) -> RigupResult<()> {
        let output = self.run("setx", vec![name.to_string(), value.to_string()])?;
        if !output.success {
            return Err(RigupError::Environment(format!(
                "setx {} failed ({:?}): {}",
                name,
                output.code,
                output.stderr.trim()
            )));
        }
        Ok(())
    }

    fn snapshot(&self, dest: &Path) -> RigupResult<()> {
        let output = self.run(
            "reg",
            vec![
                "export".to_string(),
                USER_ENV_KEY.to_string(),
                dest.to_string_lossy().into_owned(),
                "/y".to_string(),
            ],
        )?;
        if !output.success {
            return Err(RigupError::Environment(format!(
                "reg export to {} failed ({:?}): {}",
                dest.display(),
                output.code,
                output.stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Environment variables persisted in a YAML map file
///
/// A stand-in store for hosts without a per-user registry. Nothing else
/// reads this file, so values written here have no effect on any shell's
/// environment; the registrar's PATH changes are only recorded.
pub struct FileEnvStore {
    path: PathBuf,
}

impl FileEnvStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> RigupResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.env_error("read", e))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_yaml::from_str(&content).map_err(|e| self.env_error("parse", e))
    }

    fn env_error(&self, action: &str, e: impl std::fmt::Display) -> RigupError {
        RigupError::Environment(format!("cannot {} {}: {}", action, self.path.display(), e))
    }
}

impl EnvStore for FileEnvStore {
    fn read(&self, name: &str) -> RigupResult<Option<String>> {
        Ok(self.load()?.get(name).cloned())
    }

    fn write(&self, name: &str, value: &str) -> RigupResult<()> {
        let mut vars = self.load()?;
        vars.insert(name.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            ensure_dir(parent).map_err(|e| self.env_error("create parent of", e))?;
        }
        let content = serde_yaml::to_string(&vars).map_err(|e| self.env_error("serialize", e))?;
        fs::write(&self.path, content).map_err(|e| self.env_error("write", e))
    }

    fn snapshot(&self, dest: &Path) -> RigupResult<()> {
        let vars = self.load()?;
        let content = serde_yaml::to_string(&vars).map_err(|e| self.env_error("serialize", e))?;
        fs::write(dest, content).map_err(|e| {
            RigupError::Environment(format!("cannot write backup {}: {}", dest.display(), e))
        })
    }
}
