//! Run Record - one child invocation of a sweep

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sweep::ParameterPoint;

/// Status of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunStatus {
    /// Run is formatted but not yet launched.
    Pending,
    /// Child process is executing.
    Running,
    /// Child exited with status zero.
    Succeeded,
    /// Child exited non-zero, or was killed by a signal (`code` is `None`).
    Failed {
        /// Exit code, when the child exited normally.
        code: Option<i32>,
    },
    /// Child could not be launched (missing executable, permissions, ...).
    LaunchFailed {
        /// Launch error text.
        reason: String,
    },
    /// Results file could not be opened, so the child was never launched.
    ///
    /// The variant is aborted; see [`super::VariantOutcome::aborted`].
    OutputUnwritable {
        /// File system error text.
        reason: String,
    },
    /// Dry run: the command was echoed but not launched.
    Skipped,
}

impl RunStatus {
    /// Whether the benchmark itself lost its data point.
    ///
    /// `OutputUnwritable` is not counted: it aborts the whole variant and is
    /// reported there.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::LaunchFailed { .. })
    }

    /// Whether the run reached a final state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }
}

/// Run Record represents a single invocation of the benchmark.
///
/// Only bookkeeping lives here; the measurement itself goes straight from
/// the child's stdout to the results file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunRecord {
    variant: String,
    ordinal: u64,
    value: u64,
    command: String,
    status: RunStatus,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl RunRecord {
    /// Create a new run record in Pending status.
    ///
    /// # Arguments
    ///
    /// * `variant` - Name of the variant the run belongs to
    /// * `point` - Swept point
    /// * `command` - Echoed command line
    #[must_use]
    pub fn new(variant: impl Into<String>, point: ParameterPoint, command: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            ordinal: point.ordinal(),
            value: point.value(),
            command: command.into(),
            status: RunStatus::Pending,
            started_at: None,
            ended_at: None,
        }
    }

    /// Get the variant name.
    #[must_use]
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Get the position of the run within its sweep.
    #[must_use]
    pub const fn ordinal(&self) -> u64 {
        self.ordinal
    }

    /// Get the swept value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Get the echoed command line.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Get the current run status.
    #[must_use]
    pub const fn status(&self) -> &RunStatus {
        &self.status
    }

    /// Get the start timestamp, if the run has started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Get the end timestamp, if the run has completed.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Start the run, transitioning from Pending to Running.
    ///
    /// Sets the `started_at` timestamp to now.
    pub fn start(&mut self) {
        self.status = RunStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Complete the run with the given final status.
    ///
    /// Sets the `ended_at` timestamp to now.
    pub fn complete(&mut self, status: RunStatus) {
        self.status = status;
        self.ended_at = Some(Utc::now());
    }
}
