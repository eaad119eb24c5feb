use crate::core::{RigupError, RigupResult};
use crate::di::FileSource;
use std::collections::BTreeSet;
use tracing::info;

/// Prefix of entries that are editor extensions
pub const EXTENSIONS_PREFIX: &str = "extensions/";

/// The remote file list for one run, partitioned for selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Every entry in server order
    pub entries: Vec<String>,
    /// Entries outside `extensions/`, sorted case-insensitively
    pub base_files: Vec<String>,
    /// Entries under `extensions/`, in server order
    pub extension_entries: Vec<String>,
    /// Distinct second path segments of the extension entries, sorted
    pub extension_categories: Vec<String>,
}

impl Manifest {
    /// Partition a raw listing
    pub fn from_entries(entries: Vec<String>) -> Self {
        let (extension_entries, mut base_files): (Vec<String>, Vec<String>) = entries
            .iter()
            .cloned()
            .partition(|e| e.starts_with(EXTENSIONS_PREFIX));

        base_files.sort_by_key(|f| f.to_lowercase());

        let extension_categories: Vec<String> = extension_entries
            .iter()
            .filter_map(|e| category_of(e))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self {
            entries,
            base_files,
            extension_entries,
            extension_categories,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Category segment of an `extensions/<category>/...` entry
pub fn category_of(entry: &str) -> Option<&str> {
    let (category, _) = entry.strip_prefix(EXTENSIONS_PREFIX)?.split_once('/')?;
    Some(category).filter(|c| !c.is_empty())
}

/// Retrieve and partition the manifest. Any failure is fatal.
pub async fn fetch(source: &dyn FileSource) -> RigupResult<Manifest> {
    let entries = source.fetch_listing().await.map_err(|e| match e {
        RigupError::ManifestFetch(_) => e,
        other => RigupError::ManifestFetch(other.to_string()),
    })?;

    let manifest = Manifest::from_entries(entries);
    info!(
        entries = manifest.len(),
        categories = manifest.extension_categories.len(),
        "Fetched manifest"
    );
    Ok(manifest)
}
