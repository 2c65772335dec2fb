//! Experiment families - the four benchmark kinds and their built-in defaults

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::OverrideKey;
use crate::Error;

/// A benchmark family.
///
/// Each family fixes the child's flag layout, the sweep mode and the
/// defaults used when no override is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Bitonic sort over log2 problem sizes.
    Bitonic,
    /// Convolution filter over random box counts (stepped sweep).
    Filter,
    /// Single-precision matrix multiply over the `ax` dimension.
    Gemm,
    /// Histogram over multiples of a size multiplier.
    Hist,
}

/// Built-in defaults of one family.
///
/// Fields that do not apply to a family are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyDefaults {
    /// Benchmark executable.
    pub executable_path: &'static str,
    /// Results file.
    pub output_path: &'static str,
    /// Work-group size.
    pub local_size: u64,
    /// First swept value.
    pub first: u64,
    /// Last swept value (direct sweeps only).
    pub last: u64,
    /// Filter kernel size (filter).
    pub filter_size: u64,
    /// Step between swept values (filter).
    pub step: u64,
    /// Number of steps after the first point (filter).
    pub point_count: u64,
    /// `-ay` row count (gemm).
    pub row_count: u64,
    /// `-by` column count (gemm).
    pub col_count: u64,
    /// `-bsz` batch size (gemm, hist).
    pub batch_size: u64,
    /// Multiplier applied to the swept index (hist).
    pub size_multiplier: u64,
}

/// Device tag recorded when `--devname` is not given.
pub const DEFAULT_DEVICE: &str = "tgllp";

const BITONIC: FamilyDefaults = FamilyDefaults {
    executable_path: "bitonic/bitonicsort.exe",
    output_path: "bitonicsort.dat",
    local_size: 256,
    first: 18,
    last: 26,
    filter_size: 0,
    step: 0,
    point_count: 0,
    row_count: 0,
    col_count: 0,
    batch_size: 0,
    size_multiplier: 0,
};

const FILTER: FamilyDefaults = FamilyDefaults {
    executable_path: "filtering/filtering_sampler.exe",
    output_path: "filtering_sampler.dat",
    local_size: 16,
    first: 256,
    last: 0,
    filter_size: 9,
    step: 256,
    point_count: 10,
    row_count: 0,
    col_count: 0,
    batch_size: 0,
    size_multiplier: 0,
};

const GEMM: FamilyDefaults = FamilyDefaults {
    executable_path: "sgemm/matmult.exe",
    output_path: "gemm_priv.dat",
    local_size: 8,
    first: 4,
    last: 20,
    filter_size: 0,
    step: 0,
    point_count: 0,
    row_count: 8,
    col_count: 6,
    batch_size: 256,
    size_multiplier: 0,
};

const HIST: FamilyDefaults = FamilyDefaults {
    executable_path: "histogram/hist_naive.exe",
    output_path: "hist.dat",
    local_size: 256,
    first: 10,
    last: 20,
    filter_size: 0,
    step: 0,
    point_count: 0,
    row_count: 0,
    col_count: 0,
    batch_size: 1024,
    size_multiplier: 10_000,
};

impl Family {
    /// All families, in CLI order.
    pub const ALL: [Self; 4] = [Self::Bitonic, Self::Filter, Self::Gemm, Self::Hist];

    /// Lowercase family name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bitonic => "bitonic",
            Self::Filter => "filter",
            Self::Gemm => "gemm",
            Self::Hist => "hist",
        }
    }

    /// Banner printed once before the family's variants run.
    #[must_use]
    pub const fn banner(self) -> &'static str {
        match self {
            Self::Bitonic => "Running bitonic sorts",
            Self::Filter => "Running convolutions",
            Self::Gemm => "Running SGEMMs",
            Self::Hist => "Running histograms",
        }
    }

    /// Built-in defaults.
    #[must_use]
    pub const fn defaults(self) -> FamilyDefaults {
        match self {
            Self::Bitonic => BITONIC,
            Self::Filter => FILTER,
            Self::Gemm => GEMM,
            Self::Hist => HIST,
        }
    }

    /// Whether the family sweeps `first + step * n` rather than `first..=last`.
    #[must_use]
    pub const fn is_stepped(self) -> bool {
        matches!(self, Self::Filter)
    }

    /// Override keys this family understands.
    #[must_use]
    pub const fn accepted_keys(self) -> &'static [OverrideKey] {
        use OverrideKey::{
            BatchSize, ColCount, DeviceName, FilterSize, First, Last, LocalSize, OutputPath,
            PointCount, ProgramName, RowCount, SizeMultiplier, Step, Verbose,
        };
        match self {
            Self::Bitonic => &[
                ProgramName, OutputPath, LocalSize, DeviceName, Verbose, First, Last,
            ],
            Self::Filter => &[
                ProgramName, OutputPath, LocalSize, DeviceName, Verbose, First, Step, PointCount,
                FilterSize,
            ],
            Self::Gemm => &[
                ProgramName, OutputPath, LocalSize, DeviceName, Verbose, First, Last, RowCount,
                ColCount, BatchSize,
            ],
            Self::Hist => &[
                ProgramName, OutputPath, LocalSize, DeviceName, Verbose, First, Last, BatchSize,
                SizeMultiplier,
            ],
        }
    }

    /// Whether `key` applies to this family.
    #[must_use]
    pub fn accepts(self, key: OverrideKey) -> bool {
        self.accepted_keys().contains(&key)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bitonic" | "sort" => Ok(Self::Bitonic),
            "filter" | "filtering" => Ok(Self::Filter),
            "gemm" | "sgemm" | "matmult" => Ok(Self::Gemm),
            "hist" | "histogram" => Ok(Self::Hist),
            other => Err(Error::invalid_option(format!(
                "unknown family '{other}' (expected bitonic, filter, gemm or hist)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_from_str_aliases() {
        assert_eq!("histogram".parse::<Family>().unwrap(), Family::Hist);
        assert_eq!("SGEMM".parse::<Family>().unwrap(), Family::Gemm);
        assert!("fft".parse::<Family>().is_err());
    }

    #[test]
    fn test_only_filter_is_stepped() {
        let stepped: Vec<_> = Family::ALL.into_iter().filter(|f| f.is_stepped()).collect();
        assert_eq!(stepped, vec![Family::Filter]);
    }

    #[test]
    fn test_filter_rejects_last() {
        assert!(!Family::Filter.accepts(OverrideKey::Last));
        assert!(Family::Filter.accepts(OverrideKey::Step));
        assert!(!Family::Bitonic.accepts(OverrideKey::BatchSize));
    }
}
