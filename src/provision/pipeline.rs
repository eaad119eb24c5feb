use super::downloader::Downloader;
use super::extractor::ArchiveExtractor;
use super::installer::{resolve_editor, ExecutableInstaller, ExtensionInstaller};
use super::manifest;
use super::registrar::{EnvironmentRegistrar, Registration};
use super::report::ItemReport;
use super::selection::{self, SelectionPolicy, SelectionResult};
use super::workdir::{self, WorkDirCandidates};
use crate::config::Config;
use crate::core::path::{bin_dirs, has_entries};
use crate::core::RigupResult;
use crate::di::ServiceContainer;
use std::path::PathBuf;
use tracing::info;

/// Everything one completed run did, stage by stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub workdir: PathBuf,
    pub selection: SelectionResult,
    pub downloads: ItemReport,
    pub extraction: ItemReport,
    pub installs: ItemReport,
    pub extensions: ItemReport,
    pub registration: Registration,
}

impl RunSummary {
    /// Files some stage failed on
    pub fn skipped_files(&self) -> Vec<&str> {
        [
            &self.downloads,
            &self.extraction,
            &self.installs,
            &self.extensions,
        ]
        .into_iter()
        .flat_map(|r| r.skipped.iter().map(|s| s.file.as_str()))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(Box<RunSummary>),
    /// The operator declined one of the run-level confirmations
    Declined,
}

/// Run the whole provisioning pipeline once
///
/// Returns `Err` only for fatal errors; per-item failures are recorded in
/// the summary.
pub async fn run(services: &ServiceContainer, config: &Config) -> RigupResult<RunOutcome> {
    let confirmer = services.confirmer();

    let chosen = workdir::resolve(&WorkDirCandidates::from_config(config))?;
    let root = chosen.path();
    if !confirmer.confirm(&format!(
        "Working directory is {}. Continue?",
        root.display()
    ))? {
        println!("Cancelled.");
        return Ok(RunOutcome::Declined);
    }
    if chosen.existed
        && has_entries(root)
        && !confirmer.confirm(&format!(
            "{} already contains files. Continue anyway?",
            root.display()
        ))?
    {
        println!("Cancelled.");
        return Ok(RunOutcome::Declined);
    }

    let existing_bins = bin_dirs(root);
    info!(workdir = %root.display(), existing = existing_bins.len(), "Starting provisioning");

    let manifest = manifest::fetch(services.source()).await?;
    let selection = SelectionPolicy::new(config.toolchain_marker.clone()).select(&manifest);
    selection::print_summary(&selection);
    selection::materialize(&selection, root)?;

    let downloads = Downloader::new(services.source(), root)
        .download_all(&selection.target_files)
        .await;
    let downloaded = &downloads.completed;

    let extraction = ArchiveExtractor::new(root.to_path_buf()).extract_all(downloaded, confirmer)?;

    let installs = ExecutableInstaller::new(services.runner(), root).install_all(downloaded, confirmer)?;

    let editor = resolve_editor(&config.editor_command, root);
    let extensions =
        ExtensionInstaller::new(services.runner(), root, editor).install_all(downloaded, confirmer)?;

    let registration = EnvironmentRegistrar::new(services.env_store(), root, &config.path_variable)
        .register(&existing_bins, confirmer)?;

    println!("\nAll installation steps completed.");

    let summary = RunSummary {
        workdir: root.to_path_buf(),
        selection,
        downloads,
        extraction,
        installs,
        extensions,
        registration,
    };
    let skipped = summary.skipped_files();
    if !skipped.is_empty() {
        println!("Skipped: {}", skipped.join(", "));
    }
    Ok(RunOutcome::Completed(Box::new(summary)))
}
