//! External command invocation.
//!
//! Collectors never spawn processes directly: they hold a
//! [`CommandRunner`] and treat it as an opaque synchronous call that
//! returns the tool's standard output or an error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::ExecError;

/// Verify that every path points at an executable regular file.
///
/// Called once when a collector is constructed; a failure here keeps the
/// exporter from starting.
pub fn check_executables<P: AsRef<Path>>(paths: &[P]) -> Result<(), ExecError> {
    for path in paths {
        let path = path.as_ref();
        let meta = std::fs::metadata(path).map_err(|_| ExecError::NotFound(path.to_path_buf()))?;
        if !meta.is_file() {
            return Err(ExecError::NotAFile(path.to_path_buf()));
        }
        if !is_executable(&meta) {
            return Err(ExecError::NotExecutable(path.to_path_buf()));
        }
    }
    Ok(())
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &std::fs::Metadata) -> bool {
    true
}

/// Runs an external program to completion and returns its stdout.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &Path, args: &[&str]) -> Result<Vec<u8>, ExecError>;
}

/// Spawns real processes with [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Result<Vec<u8>, ExecError> {
        debug!(program = %program.display(), ?args, "running command");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| ExecError::Spawn {
                path: program.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExecError::Status {
                path: program.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

/// Returns canned output per program path instead of spawning anything.
///
/// Programs without a scripted entry fail with [`ExecError::Unscripted`].
#[derive(Debug, Default, Clone)]
pub struct ScriptedCommandRunner {
    outputs: HashMap<PathBuf, Result<Vec<u8>, String>>,
}

impl ScriptedCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful run printing `stdout`.
    pub fn with_output(mut self, program: impl Into<PathBuf>, stdout: impl Into<Vec<u8>>) -> Self {
        self.outputs.insert(program.into(), Ok(stdout.into()));
        self
    }

    /// Script a run that exits non-zero with `stderr`.
    pub fn with_failure(mut self, program: impl Into<PathBuf>, stderr: impl Into<String>) -> Self {
        self.outputs.insert(program.into(), Err(stderr.into()));
        self
    }
}

impl CommandRunner for ScriptedCommandRunner {
    fn run(&self, program: &Path, _args: &[&str]) -> Result<Vec<u8>, ExecError> {
        match self.outputs.get(program) {
            Some(Ok(stdout)) => Ok(stdout.clone()),
            Some(Err(stderr)) => Err(ExecError::Status {
                path: program.to_path_buf(),
                status: "exit status: 1".to_string(),
                stderr: stderr.clone(),
            }),
            None => Err(ExecError::Unscripted(program.to_path_buf())),
        }
    }
}
