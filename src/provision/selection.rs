use super::manifest::{Manifest, EXTENSIONS_PREFIX};
use crate::core::path::ensure_dir;
use crate::core::{RigupError, RigupResult};
use std::path::Path;

/// Extension category installed on every run
pub const COMMON_CATEGORY: &str = "common";

/// What a run will download and install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    /// Files to download, in install order, without duplicates
    pub target_files: Vec<String>,
    /// Extension categories, always ending with `common`
    pub target_categories: Vec<String>,
    /// The one large toolchain picked, if the manifest offers any
    pub toolchain: Option<String>,
}

/// Fixed, non-interactive selection rules
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    toolchain_marker: String,
}

impl SelectionPolicy {
    pub fn new(toolchain_marker: impl Into<String>) -> Self {
        Self {
            toolchain_marker: toolchain_marker.into(),
        }
    }

    /// Select install targets from `manifest`
    ///
    /// 1. every base file not starting with the toolchain marker
    /// 2. the first toolchain file in plain ascending order, if any
    /// 3. every extension category except `common`, then `common`
    /// 4. every entry under `extensions/<category>/` for those categories
    pub fn select(&self, manifest: &Manifest) -> SelectionResult {
        let mut target_files: Vec<String> = Vec::new();

        let (mut toolchains, regular): (Vec<&String>, Vec<&String>) = manifest
            .base_files
            .iter()
            .partition(|f| f.starts_with(&self.toolchain_marker));

        for file in regular {
            push_unique(&mut target_files, file);
        }

        toolchains.sort();
        let toolchain = toolchains.first().map(|f| f.to_string());
        if let Some(ref file) = toolchain {
            push_unique(&mut target_files, file);
        }

        let mut target_categories: Vec<String> = Vec::new();
        for category in manifest
            .extension_categories
            .iter()
            .filter(|c| c.as_str() != COMMON_CATEGORY)
        {
            push_unique(&mut target_categories, category);
        }
        push_unique(&mut target_categories, COMMON_CATEGORY);

        for category in &target_categories {
            let prefix = format!("{}{}/", EXTENSIONS_PREFIX, category);
            for entry in manifest.entries.iter().filter(|e| e.starts_with(&prefix)) {
                push_unique(&mut target_files, entry);
            }
        }

        SelectionResult {
            target_files,
            target_categories,
            toolchain,
        }
    }
}

fn push_unique(items: &mut Vec<String>, item: &str) {
    if !items.iter().any(|i| i == item) {
        items.push(item.to_string());
    }
}

/// Create `<workdir>/extensions/<category>` for every selected category
pub fn materialize(selection: &SelectionResult, workdir: &Path) -> RigupResult<()> {
    let extensions_dir = workdir.join(EXTENSIONS_PREFIX.trim_end_matches('/'));
    for category in &selection.target_categories {
        let dir = extensions_dir.join(category);
        ensure_dir(&dir).map_err(|e| {
            RigupError::Environment(format!("Failed to create {}: {}", dir.display(), e))
        })?;
    }
    Ok(())
}

/// Print what was selected
pub fn print_summary(selection: &SelectionResult) {
    let regular: Vec<&String> = selection
        .target_files
        .iter()
        .filter(|f| !f.starts_with(EXTENSIONS_PREFIX) && Some(*f) != selection.toolchain.as_ref())
        .collect();

    println!("\nThe following files will be downloaded and installed:");
    for file in regular {
        println!("  - {}", file);
    }
    if let Some(ref toolchain) = selection.toolchain {
        println!("\nToolchain: {}", toolchain);
    }
    println!("\nEditor extension categories:");
    for category in &selection.target_categories {
        println!("  - {}", category);
    }
}
