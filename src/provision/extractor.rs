use super::local_path;
use super::report::ItemReport;
use crate::core::{RigupError, RigupResult};
use crate::di::Confirmer;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use tar::Archive;
use tracing::debug;
use zip::ZipArchive;

const STAGE: &str = "Extraction";

/// Archive formats recognised by file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
}

/// Detect the archive format from a case-insensitive substring of the name
pub fn archive_kind(name: &str) -> Option<ArchiveKind> {
    let lower = name.to_lowercase();
    if lower.contains(".gz") || lower.contains(".tgz") {
        Some(ArchiveKind::TarGz)
    } else if lower.contains(".zip") {
        Some(ArchiveKind::Zip)
    } else {
        None
    }
}

/// Unpacks downloaded archives into the working directory
pub struct ArchiveExtractor {
    dest_dir: PathBuf,
}

impl ArchiveExtractor {
    /// Create a new ArchiveExtractor rooted at `dest_dir`
    pub fn new(dest_dir: PathBuf) -> Self {
        Self { dest_dir }
    }

    /// Extract every archive among `downloaded`, asking before each one
    ///
    /// Only a failing confirmation prompt is an error; extraction failures
    /// are reported as skipped items.
    pub fn extract_all(
        &self,
        downloaded: &[String],
        confirmer: &dyn Confirmer,
    ) -> RigupResult<ItemReport> {
        let mut report = ItemReport::default();
        let archives: Vec<(&String, ArchiveKind)> = downloaded
            .iter()
            .filter_map(|f| archive_kind(f).map(|k| (f, k)))
            .collect();

        if archives.is_empty() {
            return Ok(report);
        }

        println!("\nExtracting archives...");
        for (file, kind) in archives {
            if !confirmer.confirm(&format!("Extract {}?", file))? {
                report.decline(STAGE, file);
                continue;
            }

            let result = local_path(&self.dest_dir, file).and_then(|path| self.extract(&path, kind));
            match result {
                Ok(()) => {
                    println!("✓ Extracted {}", file);
                    report.complete(file);
                }
                Err(e) => report.skip(STAGE, file, &e),
            }
        }

        Ok(report)
    }

    /// Extract one archive of the given kind into the destination root
    pub fn extract(&self, archive_path: &Path, kind: ArchiveKind) -> RigupResult<()> {
        debug!(archive = %archive_path.display(), ?kind, "Extracting");
        match kind {
            ArchiveKind::TarGz => self.extract_targz(archive_path),
            ArchiveKind::Zip => self.extract_zip(archive_path),
        }
    }

    fn extract_targz(&self, archive_path: &Path) -> RigupResult<()> {
        let file = File::open(archive_path)?;
        let mut archive = Archive::new(GzDecoder::new(file));

        for entry in archive.entries()? {
            let mut entry = entry?;
            let kind = entry.header().entry_type();
            if !(kind.is_dir() || kind.is_file()) {
                debug!(path = ?entry.path().ok(), "Ignoring non-file tar entry");
                continue;
            }

            let name = entry.path()?.into_owned();
            let relative = enclosed(&name).ok_or_else(|| {
                RigupError::item(
                    archive_path.display().to_string(),
                    format!("unsafe entry name '{}'", name.display()),
                )
            })?;
            self.write_entry(&relative, kind.is_dir(), &mut entry)?;
        }
        Ok(())
    }

    /// Recreate one entry under the destination with default permissions
    fn write_entry(&self, relative: &Path, is_dir: bool, content: &mut impl io::Read) -> RigupResult<()> {
        let target = self.dest_dir.join(relative);
        if is_dir {
            fs::create_dir_all(&target)?;
            return Ok(());
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(content, &mut out)?;
        Ok(())
    }

    fn extract_zip(&self, archive_path: &Path) -> RigupResult<()> {
        let file = File::open(archive_path)?;
        let mut archive = ZipArchive::new(file)?;

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let relative = entry.enclosed_name().map(|p| p.to_path_buf()).ok_or_else(|| {
                RigupError::item(
                    archive_path.display().to_string(),
                    format!("unsafe entry name '{}'", entry.name()),
                )
            })?;
            let is_dir = entry.is_dir();
            self.write_entry(&relative, is_dir, &mut entry)?;
        }
        Ok(())
    }
}

/// `name` as a path that stays under the extraction root, if it does
fn enclosed(name: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in name.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (!out.as_os_str().is_empty()).then_some(out)
}
