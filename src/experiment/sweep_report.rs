//! Sweep Report - per-variant outcomes of one orchestrator run

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RunRecord;
use crate::config::Family;

/// Outcome of one variant's sweep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VariantOutcome {
    name: String,
    family: Family,
    output_path: PathBuf,
    device_name: String,
    runs: Vec<RunRecord>,
    aborted: Option<String>,
}

impl VariantOutcome {
    /// Create an empty outcome.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        family: Family,
        output_path: impl Into<PathBuf>,
        device_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            family,
            output_path: output_path.into(),
            device_name: device_name.into(),
            runs: Vec::new(),
            aborted: None,
        }
    }

    /// Variant name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Benchmark family.
    #[must_use]
    pub const fn family(&self) -> Family {
        self.family
    }

    /// Results file of the variant.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Device tag the variant was configured with.
    #[must_use]
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Runs, in execution order.
    #[must_use]
    pub fn runs(&self) -> &[RunRecord] {
        &self.runs
    }

    /// Reason the variant stopped early, if it did.
    #[must_use]
    pub fn aborted(&self) -> Option<&str> {
        self.aborted.as_deref()
    }

    /// Append a run.
    pub fn push_run(&mut self, run: RunRecord) {
        self.runs.push(run);
    }

    /// Mark the variant as stopped early.
    pub fn abort(&mut self, reason: impl Into<String>) {
        self.aborted = Some(reason.into());
    }
}

/// Everything one orchestrator run did, variant by variant.
///
/// Serialized as JSON by `--report`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SweepReport {
    created_at: DateTime<Utc>,
    variants: Vec<VariantOutcome>,
}

impl Default for SweepReport {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepReport {
    /// Create an empty report stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            variants: Vec::new(),
        }
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Variant outcomes in execution order.
    #[must_use]
    pub fn variants(&self) -> &[VariantOutcome] {
        &self.variants
    }

    /// Append a variant outcome.
    pub fn push_variant(&mut self, outcome: VariantOutcome) {
        self.variants.push(outcome);
    }

    /// Check if the report holds no variant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Total number of runs across variants.
    #[must_use]
    pub fn total_runs(&self) -> usize {
        self.variants.iter().map(|v| v.runs.len()).sum()
    }

    /// Runs whose data point was lost.
    #[must_use]
    pub fn failed_runs(&self) -> Vec<&RunRecord> {
        self.variants
            .iter()
            .flat_map(|v| v.runs.iter())
            .filter(|run| run.status().is_failure())
            .collect()
    }

    /// Runs of one variant, in execution order.
    #[must_use]
    pub fn runs_for_variant(&self, name: &str) -> Vec<&RunRecord> {
        self.variants
            .iter()
            .filter(|v| v.name == name)
            .flat_map(|v| v.runs.iter())
            .collect()
    }

    /// Variants that stopped early.
    #[must_use]
    pub fn aborted_variants(&self) -> Vec<&VariantOutcome> {
        self.variants.iter().filter(|v| v.aborted.is_some()).collect()
    }

    /// Write the report to `path` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be created, `Error::Json` if
    /// encoding fails.
    pub fn save(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
