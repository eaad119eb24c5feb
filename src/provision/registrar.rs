//! Registers new tool `bin` directories on the persistent user PATH.

use crate::core::path::{bin_dirs, new_bin_dirs};
use crate::core::{RigupError, RigupResult};
use crate::di::{Confirmer, EnvStore};
use chrono::{Local, NaiveDate};
use rigup_core::path_list;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What registration did on this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// No `bin` directory appeared during the run
    NothingNew,
    Declined { candidates: Vec<PathBuf> },
    Registered { added: Vec<PathBuf>, backup: PathBuf },
}

/// Backup file for `date` inside `workdir`, e.g. `env_20260102.reg`
pub fn backup_path(workdir: &Path, date: NaiveDate) -> PathBuf {
    workdir.join(format!("env_{}.reg", date.format("%Y%m%d")))
}

/// Move an existing backup aside to `<name>.bak`, replacing an older `.bak`
fn rotate_backup(path: &Path) -> RigupResult<()> {
    if !path.exists() {
        return Ok(());
    }
    let mut rotated = path.as_os_str().to_owned();
    rotated.push(".bak");
    let rotated = PathBuf::from(rotated);

    if rotated.exists() {
        fs::remove_file(&rotated).map_err(|e| {
            RigupError::Environment(format!("cannot remove {}: {}", rotated.display(), e))
        })?;
    }
    fs::rename(path, &rotated).map_err(|e| {
        RigupError::Environment(format!(
            "cannot rotate {} to {}: {}",
            path.display(),
            rotated.display(),
            e
        ))
    })?;
    debug!(from = %path.display(), to = %rotated.display(), "Rotated environment backup");
    Ok(())
}

fn added_message(appended: usize, present: usize, variable: &str) -> String {
    let mut message = format!(
        "✓ Added {} director{} to {}",
        appended,
        if appended == 1 { "y" } else { "ies" },
        variable
    );
    if present > 0 {
        message.push_str(&format!(" ({} already present)", present));
    }
    message
}

pub struct EnvironmentRegistrar<'a> {
    store: &'a dyn EnvStore,
    workdir: &'a Path,
    path_variable: &'a str,
}

impl<'a> EnvironmentRegistrar<'a> {
    pub fn new(store: &'a dyn EnvStore, workdir: &'a Path, path_variable: &'a str) -> Self {
        Self {
            store,
            workdir,
            path_variable,
        }
    }

    /// Register every `bin` directory under the working directory that
    /// was not in `existing` when the run started.
    ///
    /// The store is snapshotted before PATH is touched. Any failure from
    /// here on is fatal, since it concerns the user's environment.
    pub fn register(
        &self,
        existing: &BTreeSet<PathBuf>,
        confirmer: &dyn Confirmer,
    ) -> RigupResult<Registration> {
        self.register_on(existing, confirmer, Local::now().date_naive())
    }

    pub fn register_on(
        &self,
        existing: &BTreeSet<PathBuf>,
        confirmer: &dyn Confirmer,
        today: NaiveDate,
    ) -> RigupResult<Registration> {
        let candidates = new_bin_dirs(existing, &bin_dirs(self.workdir));
        if candidates.is_empty() {
            debug!(workdir = %self.workdir.display(), "No new bin directories");
            return Ok(Registration::NothingNew);
        }

        println!("\nNew tool directories:");
        for dir in &candidates {
            println!("  - {}", dir.display());
        }
        if !confirmer.confirm(&format!("Add them to {}?", self.path_variable))? {
            println!("{} left unchanged.", self.path_variable);
            return Ok(Registration::Declined { candidates });
        }

        let backup = backup_path(self.workdir, today);
        rotate_backup(&backup)?;
        self.store.snapshot(&backup)?;
        println!("Environment backed up to {}", backup.display());

        let current = self.store.read(self.path_variable)?.unwrap_or_default();
        let additions: Vec<String> = candidates
            .iter()
            .map(|d| d.to_string_lossy().into_owned())
            .collect();
        let separator = self.store.separator();
        let appended = path_list::missing(&current, &additions, separator);
        let merged = path_list::merge(&current, &additions, separator);
        self.store.write(self.path_variable, &merged)?;

        info!(
            variable = self.path_variable,
            candidates = candidates.len(),
            appended = appended.len(),
            "Updated PATH"
        );
        println!(
            "{}",
            added_message(appended.len(), candidates.len() - appended.len(), self.path_variable)
        );
        Ok(Registration::Registered {
            added: candidates,
            backup,
        })
    }
}
