use super::local_path;
use super::report::ItemReport;
use crate::core::path::ensure_dir;
use crate::core::{RigupError, RigupResult};
use crate::di::FileSource;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::info;

const STAGE: &str = "Download";

/// Mirrors selected files from the file server into the working directory
///
/// Files are fetched one at a time in selection order. A failure at any
/// step skips that file only.
pub struct Downloader<'a> {
    source: &'a dyn FileSource,
    workdir: &'a Path,
}

impl<'a> Downloader<'a> {
    pub fn new(source: &'a dyn FileSource, workdir: &'a Path) -> Self {
        Self { source, workdir }
    }

    /// Download every target; `completed` lists the files now on disk
    pub async fn download_all(&self, targets: &[String]) -> ItemReport {
        let mut report = ItemReport::default();
        if targets.is_empty() {
            return report;
        }

        println!("\nDownloading files...");
        let pb = ProgressBar::new(targets.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        for (i, entry) in targets.iter().enumerate() {
            pb.suspend(|| println!("[{}/{}] {}", i + 1, targets.len(), entry));
            match self.download_one(entry).await {
                Ok(bytes) => {
                    info!(file = %entry, bytes, "Downloaded");
                    pb.suspend(|| println!("  ✓ {}", entry));
                    report.complete(entry);
                }
                Err(e) => pb.suspend(|| report.skip(STAGE, entry, &e)),
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        println!(
            "Downloaded {} of {} files.",
            report.completed.len(),
            targets.len()
        );
        report
    }

    async fn download_one(&self, entry: &str) -> RigupResult<u64> {
        let dest = local_path(self.workdir, entry)?;
        if let Some(parent) = dest.parent() {
            ensure_dir(parent).map_err(|e| RigupError::item(entry, e))?;
        }
        self.source.fetch_file(entry, &dest).await
    }
}
