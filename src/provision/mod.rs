//! The provisioning pipeline and its stages.
//!
//! Stages run strictly in order, each consuming the previous stage's
//! output: working directory, manifest, selection, download, extraction,
//! installation, PATH registration.

pub mod downloader;
pub mod env_store;
pub mod extractor;
pub mod installer;
pub mod interactive;
pub mod manifest;
pub mod pipeline;
pub mod process;
pub mod registrar;
pub mod report;
pub mod selection;
pub mod workdir;

pub use pipeline::{run, RunOutcome, RunSummary};

use crate::core::{RigupError, RigupResult};
use std::path::{Component, Path, PathBuf};

/// Local path mirroring manifest `entry` under `workdir`
///
/// Entries are `/`-separated relative paths. Absolute paths and `..`
/// segments are rejected so nothing lands outside the working directory.
pub fn local_path(workdir: &Path, entry: &str) -> RigupResult<PathBuf> {
    let mut path = workdir.to_path_buf();
    let mut pushed = false;
    for segment in entry.split(['/', '\\']) {
        if segment.is_empty() {
            if pushed || entry.starts_with(['/', '\\']) {
                return Err(RigupError::item(entry, "unsafe path in manifest entry"));
            }
            continue;
        }
        if segment.contains(':') {
            return Err(RigupError::item(entry, "unsafe path in manifest entry"));
        }
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => path.push(part),
            (Some(Component::CurDir), None) => continue,
            _ => return Err(RigupError::item(entry, "unsafe path in manifest entry")),
        }
        pushed = true;
    }
    if !pushed {
        return Err(RigupError::item(entry, "empty manifest entry"));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_path_mirrors_entry() {
        let root = Path::new("/w");
        assert_eq!(
            local_path(root, "extensions/python/ext.vsix").unwrap(),
            root.join("extensions").join("python").join("ext.vsix")
        );
        assert_eq!(local_path(root, "a.txt").unwrap(), root.join("a.txt"));
    }

    #[test]
    fn test_local_path_rejects_escapes() {
        let root = Path::new("/w");
        for entry in ["../x", "a/../../x", "/etc/passwd", "\\evil", "", "C:\\x"] {
            let err = local_path(root, entry).unwrap_err();
            assert!(!err.is_fatal(), "{} should be an item error", entry);
        }
    }
}
