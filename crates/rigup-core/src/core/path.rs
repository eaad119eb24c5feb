use crate::core::error::{RigupError, RigupResult};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the Rigup home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\rigup
/// - Linux: ~/.config/rigup
/// - macOS: ~/Library/Application Support/rigup
pub fn rigup_home() -> RigupResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| RigupError::Config("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("rigup"))
}

/// Get the config file path (`<rigup_home>/config.yaml`)
pub fn config_file() -> RigupResult<PathBuf> {
    Ok(rigup_home()?.join("config.yaml"))
}

/// Get the default file-backed environment store (`<rigup_home>/environment.yaml`)
pub fn env_file() -> RigupResult<PathBuf> {
    Ok(rigup_home()?.join("environment.yaml"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> RigupResult<()> {
    if !path.is_dir() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Whether `path` exists and is a directory.
pub fn dir_exists(path: &Path) -> bool {
    path.is_dir()
}

/// Whether a directory holds any entry at all.
pub fn has_entries(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Collect `<root>/<child>/bin` for every direct child directory of `root`
/// that contains a `bin` directory.
///
/// An unreadable or missing root yields an empty set.
pub fn bin_dirs(root: &Path) -> BTreeSet<PathBuf> {
    let Ok(entries) = fs::read_dir(root) else {
        return BTreeSet::new();
    };

    entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path().join("bin"))
        .filter(|bin| bin.is_dir())
        .collect()
}

/// Bin directories present in `after` but not in `before`.
pub fn new_bin_dirs(before: &BTreeSet<PathBuf>, after: &BTreeSet<PathBuf>) -> Vec<PathBuf> {
    after.difference(before).cloned().collect()
}
