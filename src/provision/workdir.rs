use crate::config::Config;
use crate::core::path::{dir_exists, ensure_dir};
use crate::core::{RigupError, RigupResult};
use std::path::{Path, PathBuf};
use tracing::info;

/// The two well-known working roots and the volume backing the secondary one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDirCandidates {
    pub primary: PathBuf,
    pub secondary: PathBuf,
    pub secondary_volume: PathBuf,
}

impl WorkDirCandidates {
    pub fn from_config(config: &Config) -> Self {
        Self {
            primary: config.primary_root.clone(),
            secondary: config.secondary_root.clone(),
            secondary_volume: config.secondary_volume.clone(),
        }
    }
}

/// The chosen working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDir {
    pub path: PathBuf,
    /// Whether the directory existed before this run
    pub existed: bool,
}

impl WorkDir {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Choose (and if needed create) the working directory
///
/// | primary | secondary | result |
/// |---|---|---|
/// | yes | yes | secondary |
/// | yes | no | primary |
/// | no | yes | secondary |
/// | no | no | create secondary if its volume is reachable, else primary |
pub fn resolve(candidates: &WorkDirCandidates) -> RigupResult<WorkDir> {
    let primary_exists = dir_exists(&candidates.primary);
    let secondary_exists = dir_exists(&candidates.secondary);

    let existing = match (primary_exists, secondary_exists) {
        (true, true) => {
            println!(
                "Both {} and {} exist; using {}.",
                candidates.primary.display(),
                candidates.secondary.display(),
                candidates.secondary.display()
            );
            Some(&candidates.secondary)
        }
        (true, false) => Some(&candidates.primary),
        (false, true) => Some(&candidates.secondary),
        (false, false) => None,
    };

    if let Some(path) = existing {
        info!(workdir = %path.display(), "Using existing working directory");
        return Ok(WorkDir {
            path: path.clone(),
            existed: true,
        });
    }

    let target = if candidates.secondary_volume.exists() {
        &candidates.secondary
    } else {
        &candidates.primary
    };

    println!(
        "Neither {} nor {} exists; creating {}.",
        candidates.primary.display(),
        candidates.secondary.display(),
        target.display()
    );
    ensure_dir(target).map_err(|e| {
        RigupError::Environment(format!("Failed to create {}: {}", target.display(), e))
    })?;
    println!("✓ Created {}", target.display());

    Ok(WorkDir {
        path: target.clone(),
        existed: false,
    })
}
