//! External process execution

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::{Error, Result};

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code; `-1` when the process was terminated by a signal
    pub exit_code: i32,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs an external program and captures its output.
///
/// A non-zero exit is not an error: callers inspect
/// [`ProcessOutput::exit_code`]. Only a failure to start the program is
/// reported as `Err`.
pub trait ProcessRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<ProcessOutput>;
}

/// Runs processes on the host, optionally in a fixed working directory.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    cwd: Option<PathBuf>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
        }
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<ProcessOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        let output = cmd.output().map_err(|source| Error::Spawn {
            program: program.to_string(),
            source,
        })?;

        let result = ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        };

        tracing::debug!(program, ?args, exit_code = result.exit_code, "process finished");
        Ok(result)
    }
}
