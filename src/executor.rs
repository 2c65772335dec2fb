//! Process Executor
//!
//! Runs one [`Invocation`] synchronously, with the caller's environment and
//! working directory, stdout redirected into the results file.
//!
//! Failure policy:
//! - results file cannot be opened: `Err(Error::FileSystem)`, fatal for the variant
//! - child missing or exiting non-zero: `Ok(RunStatus::...)`, the sweep goes on

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::command::{Invocation, Redirect};
use crate::experiment::RunStatus;
use crate::{Error, Result};

/// Something that can carry out a child invocation.
///
/// The orchestrator is generic over this so tests can substitute a recorder.
pub trait Executor {
    /// Execute `invocation` to completion.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileSystem` when the results file cannot be written.
    /// Child failures are reported through the returned status instead.
    fn execute(&mut self, invocation: &Invocation) -> Result<RunStatus>;
}

/// Open the results file the way `redirect` prescribes.
///
/// # Errors
///
/// Returns `Error::FileSystem` if the file cannot be created or opened.
pub fn open_output(path: &Path, redirect: Redirect) -> Result<File> {
    let mut options = OpenOptions::new();
    match redirect {
        Redirect::Truncate => options.write(true).create(true).truncate(true),
        Redirect::Append => options.append(true).create(true),
    };
    options.open(path).map_err(|source| Error::FileSystem {
        path: path.to_path_buf(),
        source,
    })
}

/// Launches real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor {
    _private: (),
}

impl ProcessExecutor {
    /// Create a process executor.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl Executor for ProcessExecutor {
    fn execute(&mut self, invocation: &Invocation) -> Result<RunStatus> {
        let output = open_output(invocation.output_path(), invocation.redirect())?;

        debug!(
            program = %invocation.program().display(),
            output = %invocation.output_path().display(),
            redirect = invocation.redirect().operator(),
            "launching benchmark"
        );

        let status = Command::new(invocation.program())
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::from(output))
            .status();

        match status {
            Ok(status) if status.success() => Ok(RunStatus::Succeeded),
            Ok(status) => {
                let failure = Error::ChildProcessFailure {
                    command: invocation.to_string(),
                    reason: status.to_string(),
                };
                warn!("{failure}");
                Ok(RunStatus::Failed {
                    code: status.code(),
                })
            }
            Err(err) => {
                let failure = Error::ChildProcessFailure {
                    command: invocation.to_string(),
                    reason: err.to_string(),
                };
                warn!("{failure}");
                Ok(RunStatus::LaunchFailed {
                    reason: err.to_string(),
                })
            }
        }
    }
}

/// Launches nothing and touches no file.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunExecutor {
    _private: (),
}

impl DryRunExecutor {
    /// Create a dry-run executor.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl Executor for DryRunExecutor {
    fn execute(&mut self, invocation: &Invocation) -> Result<RunStatus> {
        debug!(command = %invocation, "dry run, not launching");
        Ok(RunStatus::Skipped)
    }
}
