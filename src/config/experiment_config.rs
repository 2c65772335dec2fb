//! Experiment Config - the resolved, immutable configuration of one sweep

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::family::{Family, DEFAULT_DEVICE};
use crate::sweep::SweepRange;
use crate::{Error, Result};

/// Family-specific knobs passed to the child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum FamilyParams {
    /// `-quiet=1 -size=N -lsz=L`
    Bitonic,
    /// `-quiet -randboxes=N -randfilter=K -lsz=L`
    Filter {
        /// Convolution kernel size (`-randfilter`).
        filter_size: u64,
        /// Distance between consecutive swept values.
        step: u64,
        /// Steps after the first point; the sweep has `point_count + 1` points.
        point_count: u64,
    },
    /// `-quiet=1 -ay=A -by=B -ax=N -lsz=L -bsz=S`
    Gemm {
        /// `-ay` value.
        row_count: u64,
        /// `-by` value.
        col_count: u64,
        /// `-bsz` value.
        batch_size: u64,
    },
    /// `-quiet=1 -sz=N*M -lsz=L -bsz=S`
    Hist {
        /// `-bsz` value.
        batch_size: u64,
        /// Multiplier applied to the swept index to get `-sz`.
        size_multiplier: u64,
    },
}

impl FamilyParams {
    /// Family these parameters belong to.
    #[must_use]
    pub const fn family(&self) -> Family {
        match self {
            Self::Bitonic => Family::Bitonic,
            Self::Filter { .. } => Family::Filter,
            Self::Gemm { .. } => Family::Gemm,
            Self::Hist { .. } => Family::Hist,
        }
    }
}

/// Fully-resolved configuration of one sweep.
///
/// Created once from defaults + overrides and never mutated afterwards;
/// every pipeline stage receives it by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    executable_path: PathBuf,
    output_path: PathBuf,
    local_size: u64,
    range_start: u64,
    range_end: u64,
    device_name: String,
    verbose: bool,
    params: FamilyParams,
}

impl ExperimentConfig {
    /// Create a builder seeded with the family's built-in defaults.
    #[must_use]
    pub fn builder(family: Family) -> ExperimentConfigBuilder {
        ExperimentConfigBuilder::new(family)
    }

    /// The family's defaults, with no override applied.
    ///
    /// # Errors
    ///
    /// Never fails for built-in defaults; kept fallible to share `build()`.
    pub fn defaults(family: Family) -> Result<Self> {
        Self::builder(family).build()
    }

    /// Benchmark family.
    #[must_use]
    pub const fn family(&self) -> Family {
        self.params.family()
    }

    /// Benchmark executable.
    #[must_use]
    pub fn executable_path(&self) -> &Path {
        &self.executable_path
    }

    /// Results file.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Work-group size (`-lsz`).
    #[must_use]
    pub const fn local_size(&self) -> u64 {
        self.local_size
    }

    /// First swept value (inclusive).
    #[must_use]
    pub const fn range_start(&self) -> u64 {
        self.range_start
    }

    /// Last swept value (inclusive).
    #[must_use]
    pub const fn range_end(&self) -> u64 {
        self.range_end
    }

    /// Informational device tag (recorded, never passed to the child).
    #[must_use]
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Whether debug logging was requested for this sweep.
    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// Family-specific child parameters.
    #[must_use]
    pub const fn params(&self) -> &FamilyParams {
        &self.params
    }

    /// Sweep enumeration mode and bounds.
    #[must_use]
    pub const fn sweep_range(&self) -> SweepRange {
        match self.params {
            FamilyParams::Filter {
                step, point_count, ..
            } => SweepRange::Stepped {
                start: self.range_start,
                step,
                point_count,
            },
            _ => SweepRange::Direct {
                start: self.range_start,
                end: self.range_end,
            },
        }
    }
}

/// Builder for `ExperimentConfig`.
///
/// Holds every knob of every family; `build()` keeps only the ones that
/// apply to the selected family.
#[derive(Debug, Clone)]
pub struct ExperimentConfigBuilder {
    family: Family,
    executable_path: PathBuf,
    output_path: PathBuf,
    local_size: u64,
    first: u64,
    last: u64,
    device_name: String,
    verbose: bool,
    filter_size: u64,
    step: u64,
    point_count: u64,
    row_count: u64,
    col_count: u64,
    batch_size: u64,
    size_multiplier: u64,
}

impl ExperimentConfigBuilder {
    /// Create a builder seeded with `family`'s defaults.
    #[must_use]
    pub fn new(family: Family) -> Self {
        let d = family.defaults();
        Self {
            family,
            executable_path: PathBuf::from(d.executable_path),
            output_path: PathBuf::from(d.output_path),
            local_size: d.local_size,
            first: d.first,
            last: d.last,
            device_name: DEFAULT_DEVICE.to_string(),
            verbose: false,
            filter_size: d.filter_size,
            step: d.step,
            point_count: d.point_count,
            row_count: d.row_count,
            col_count: d.col_count,
            batch_size: d.batch_size,
            size_multiplier: d.size_multiplier,
        }
    }

    /// Family being configured.
    #[must_use]
    pub const fn family(&self) -> Family {
        self.family
    }

    /// Set the benchmark executable.
    #[must_use]
    pub fn executable_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable_path = path.into();
        self
    }

    /// Set the results file.
    #[must_use]
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Set the work-group size.
    #[must_use]
    pub const fn local_size(mut self, local_size: u64) -> Self {
        self.local_size = local_size;
        self
    }

    /// Set the first swept value.
    #[must_use]
    pub const fn first(mut self, first: u64) -> Self {
        self.first = first;
        self
    }

    /// Set the last swept value (direct sweeps).
    #[must_use]
    pub const fn last(mut self, last: u64) -> Self {
        self.last = last;
        self
    }

    /// Set the device tag.
    #[must_use]
    pub fn device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = name.into();
        self
    }

    /// Enable or disable debug logging.
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the convolution kernel size (filter).
    #[must_use]
    pub const fn filter_size(mut self, filter_size: u64) -> Self {
        self.filter_size = filter_size;
        self
    }

    /// Set the step between swept values (filter).
    #[must_use]
    pub const fn step(mut self, step: u64) -> Self {
        self.step = step;
        self
    }

    /// Set the number of steps after the first point (filter).
    #[must_use]
    pub const fn point_count(mut self, point_count: u64) -> Self {
        self.point_count = point_count;
        self
    }

    /// Set `-ay` (gemm).
    #[must_use]
    pub const fn row_count(mut self, row_count: u64) -> Self {
        self.row_count = row_count;
        self
    }

    /// Set `-by` (gemm).
    #[must_use]
    pub const fn col_count(mut self, col_count: u64) -> Self {
        self.col_count = col_count;
        self
    }

    /// Set `-bsz` (gemm, hist).
    #[must_use]
    pub const fn batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the size multiplier (hist).
    #[must_use]
    pub const fn size_multiplier(mut self, size_multiplier: u64) -> Self {
        self.size_multiplier = size_multiplier;
        self
    }

    /// Build the `ExperimentConfig`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOption` when a swept value would not fit in `u64`
    /// (stepped end point, or histogram size).
    pub fn build(self) -> Result<ExperimentConfig> {
        let (range_end, params) = match self.family {
            Family::Bitonic => (self.last, FamilyParams::Bitonic),
            Family::Filter => {
                let end = self
                    .step
                    .checked_mul(self.point_count)
                    .and_then(|span| span.checked_add(self.first))
                    .ok_or_else(|| {
                        Error::invalid_option(format!(
                            "filter sweep {} + {} * {} overflows",
                            self.first, self.step, self.point_count
                        ))
                    })?;
                (
                    end,
                    FamilyParams::Filter {
                        filter_size: self.filter_size,
                        step: self.step,
                        point_count: self.point_count,
                    },
                )
            }
            Family::Gemm => (
                self.last,
                FamilyParams::Gemm {
                    row_count: self.row_count,
                    col_count: self.col_count,
                    batch_size: self.batch_size,
                },
            ),
            Family::Hist => {
                if self.last >= self.first && self.last.checked_mul(self.size_multiplier).is_none()
                {
                    return Err(Error::invalid_option(format!(
                        "histogram size {} * {} overflows",
                        self.last, self.size_multiplier
                    )));
                }
                (
                    self.last,
                    FamilyParams::Hist {
                        batch_size: self.batch_size,
                        size_multiplier: self.size_multiplier,
                    },
                )
            }
        };

        Ok(ExperimentConfig {
            executable_path: self.executable_path,
            output_path: self.output_path,
            local_size: self.local_size,
            range_start: self.first,
            range_end,
            device_name: self.device_name,
            verbose: self.verbose,
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitonic_defaults() {
        let config = ExperimentConfig::defaults(Family::Bitonic).unwrap();
        assert_eq!(config.family(), Family::Bitonic);
        assert_eq!(config.local_size(), 256);
        assert_eq!(config.range_start(), 18);
        assert_eq!(config.range_end(), 26);
        assert_eq!(config.device_name(), "tgllp");
        assert_eq!(config.output_path(), Path::new("bitonicsort.dat"));
    }

    #[test]
    fn test_filter_range_end_is_derived() {
        let config = ExperimentConfig::defaults(Family::Filter).unwrap();
        assert_eq!(config.range_start(), 256);
        assert_eq!(config.range_end(), 256 + 256 * 10);
        assert_eq!(
            config.sweep_range(),
            SweepRange::Stepped {
                start: 256,
                step: 256,
                point_count: 10
            }
        );
    }

    #[test]
    fn test_filter_overflow_rejected() {
        let err = ExperimentConfig::builder(Family::Filter)
            .step(u64::MAX)
            .point_count(2)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOption(_)));
    }

    #[test]
    fn test_hist_overflow_rejected() {
        let err = ExperimentConfig::builder(Family::Hist)
            .last(u64::MAX / 2)
            .size_multiplier(4)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOption(_)));
    }

    #[test]
    fn test_builder_ignores_foreign_knobs() {
        let config = ExperimentConfig::builder(Family::Bitonic)
            .batch_size(99)
            .build()
            .unwrap();
        assert_eq!(config.params(), &FamilyParams::Bitonic);
    }

    #[test]
    fn test_gemm_params() {
        let config = ExperimentConfig::builder(Family::Gemm)
            .row_count(16)
            .build()
            .unwrap();
        assert_eq!(
            config.params(),
            &FamilyParams::Gemm {
                row_count: 16,
                col_count: 6,
                batch_size: 256
            }
        );
    }
}
