use crate::core::{RigupError, RigupResult};
use crate::di::{ProcessOutput, ProcessRunner};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Runs real subprocesses
///
/// Bare program names are resolved through `PATH` (including `PATHEXT`
/// shims such as `code.cmd` on Windows) before spawning.
#[derive(Debug, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

/// Resolve a bare program name through `PATH`; paths are returned as given.
pub fn resolve_program(program: &Path) -> PathBuf {
    if program.components().count() > 1 {
        return program.to_path_buf();
    }
    which::which(program).unwrap_or_else(|_| program.to_path_buf())
}

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, program: &Path, args: &[String]) -> RigupResult<ProcessOutput> {
        let resolved = resolve_program(program);
        debug!(program = %resolved.display(), ?args, "Spawning process");

        let output = Command::new(&resolved).args(args).output().map_err(|e| {
            RigupError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to start {}: {}", resolved.display(), e),
            ))
        })?;

        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
