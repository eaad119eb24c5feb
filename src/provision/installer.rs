//! Silent installation of downloaded executables and editor extensions.
//!
//! Installer flags are vendor specific and chosen by a substring of the
//! file name. A renamed installer falls through to "install manually".

use super::local_path;
use super::report::ItemReport;
use crate::core::{RigupError, RigupResult};
use crate::di::{Confirmer, ProcessRunner};
use std::path::{Path, PathBuf};
use tracing::info;

const EXE_STAGE: &str = "Installation";
const EXT_STAGE: &str = "Extension install";

/// Directory (under the working directory) the editor is installed into
pub const EDITOR_INSTALL_DIR: &str = "Microsoft VS Code";
/// Directory (under the working directory) version control is installed into
pub const VCS_INSTALL_DIR: &str = "git";

/// Silent-install flag sets for the supported installers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallProfile {
    /// Code editor installer (name contains `vscode`)
    Editor,
    /// Version-control installer (name contains `git`)
    VersionControl,
}

/// Pick the profile for an installer file name, case-insensitively
pub fn profile_for(name: &str) -> Option<InstallProfile> {
    let lower = name.to_lowercase();
    if lower.contains("vscode") {
        Some(InstallProfile::Editor)
    } else if lower.contains("git") {
        Some(InstallProfile::VersionControl)
    } else {
        None
    }
}

impl InstallProfile {
    pub fn install_dir(&self, workdir: &Path) -> PathBuf {
        match self {
            InstallProfile::Editor => workdir.join(EDITOR_INSTALL_DIR),
            InstallProfile::VersionControl => workdir.join(VCS_INSTALL_DIR),
        }
    }

    /// Installer arguments, ending with the target directory
    pub fn args(&self, workdir: &Path) -> Vec<String> {
        let flags: &[&str] = match self {
            InstallProfile::Editor => &["/VERYSILENT", "/MERGETASKS=!runcode"],
            InstallProfile::VersionControl => &[
                "/VERYSILENT",
                "/NORESTART",
                "/NOCANCEL",
                "/SP-",
                "/CLOSEAPPLICATIONS",
                "/RESTARTAPPLICATIONS",
                "/COMPONENTS=icons,ext\\reg\\shellhere,assoc,assoc_sh",
            ],
        };
        let mut args: Vec<String> = flags.iter().map(|f| f.to_string()).collect();
        args.push(format!("/Dir={}", self.install_dir(workdir).display()));
        args
    }
}

fn run_checked(runner: &dyn ProcessRunner, file: &str, program: &Path, args: &[String]) -> RigupResult<()> {
    let output = runner
        .run(program, args)
        .map_err(|e| RigupError::item(file, e))?;
    if output.success {
        Ok(())
    } else {
        Err(RigupError::item(
            file,
            match output.code {
                Some(code) => format!("exited with code {}", code),
                None => "terminated by signal".to_string(),
            },
        ))
    }
}

/// Runs downloaded `.exe` installers with their silent profile
pub struct ExecutableInstaller<'a> {
    runner: &'a dyn ProcessRunner,
    workdir: &'a Path,
}

impl<'a> ExecutableInstaller<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, workdir: &'a Path) -> Self {
        Self { runner, workdir }
    }

    pub fn install_all(
        &self,
        downloaded: &[String],
        confirmer: &dyn Confirmer,
    ) -> RigupResult<ItemReport> {
        let mut report = ItemReport::default();
        let installers: Vec<&String> = downloaded
            .iter()
            .filter(|f| f.to_lowercase().contains(".exe"))
            .collect();

        if installers.is_empty() {
            return Ok(report);
        }

        println!("\nInstalling executables...");
        for file in installers {
            if !confirmer.confirm(&format!("Install {} automatically?", file))? {
                report.decline(EXE_STAGE, file);
                continue;
            }

            let Some(profile) = profile_for(file) else {
                report.leave_manual(
                    file,
                    "automatic installation is not supported for this installer; please install it manually",
                );
                continue;
            };

            let install_dir = profile.install_dir(self.workdir);
            println!("Installing {} into {}", file, install_dir.display());
            info!(file = %file, ?profile, "Running installer");

            let result = local_path(self.workdir, file)
                .and_then(|exe| run_checked(self.runner, file, &exe, &profile.args(self.workdir)));
            match result {
                Ok(()) => {
                    println!("✓ Installed {}", file);
                    report.complete(file);
                }
                Err(e) => report.skip(EXE_STAGE, file, &e),
            }
        }

        Ok(report)
    }
}

/// Find the editor CLI: the configured command if it is on `PATH`,
/// otherwise the copy inside a fresh editor install under `workdir`.
pub fn resolve_editor(editor_command: &str, workdir: &Path) -> PathBuf {
    if which::which(editor_command).is_ok() {
        return PathBuf::from(editor_command);
    }

    let bin = workdir.join(EDITOR_INSTALL_DIR).join("bin");
    let candidates = if cfg!(target_os = "windows") {
        vec![bin.join(format!("{}.cmd", editor_command)), bin.join(editor_command)]
    } else {
        vec![bin.join(editor_command)]
    };
    candidates
        .into_iter()
        .find(|c| c.is_file())
        .unwrap_or_else(|| PathBuf::from(editor_command))
}

/// Installs downloaded `.vsix` files through the editor CLI
pub struct ExtensionInstaller<'a> {
    runner: &'a dyn ProcessRunner,
    workdir: &'a Path,
    editor: PathBuf,
}

impl<'a> ExtensionInstaller<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, workdir: &'a Path, editor: PathBuf) -> Self {
        Self {
            runner,
            workdir,
            editor,
        }
    }

    /// Install every extension after one confirmation for the whole batch
    pub fn install_all(
        &self,
        downloaded: &[String],
        confirmer: &dyn Confirmer,
    ) -> RigupResult<ItemReport> {
        let mut report = ItemReport::default();
        let extensions: Vec<&String> = downloaded
            .iter()
            .filter(|f| f.to_lowercase().contains(".vsix"))
            .collect();

        if extensions.is_empty() {
            return Ok(report);
        }

        println!("\nInstalling editor extensions...");
        if !confirmer.confirm("Install editor extensions automatically?")? {
            println!("Editor extension installation skipped.");
            report.declined = extensions.into_iter().cloned().collect();
            return Ok(report);
        }

        let total = extensions.len();
        for (i, file) in extensions.into_iter().enumerate() {
            println!("[{}/{}] {}", i + 1, total, file);
            let result = local_path(self.workdir, file).and_then(|vsix| {
                let args = vec![
                    "--install-extension".to_string(),
                    vsix.to_string_lossy().into_owned(),
                ];
                run_checked(self.runner, file, &self.editor, &args)
            });
            match result {
                Ok(()) => {
                    println!("✓ Installed {}", file);
                    report.complete(file);
                }
                Err(e) => report.skip(EXT_STAGE, file, &e),
            }
        }

        Ok(report)
    }
}
