//! Command Formatter
//!
//! Maps one parameter point of one sweep to a structured child invocation:
//! program, argument list, results file and redirect mode. Arguments and the
//! redirect target stay separate so no shell is ever involved; the familiar
//! `prog -k=v ... > out` form exists only for echoing.
//!
//! ```rust
//! use bench_sweep::command::{format_invocation, Redirect};
//! use bench_sweep::config::{ExperimentConfig, Family};
//! use bench_sweep::sweep::ParameterPoint;
//!
//! let config = ExperimentConfig::builder(Family::Bitonic)
//!     .executable_path("./bitonicsort")
//!     .output_path("sort.dat")
//!     .build()?;
//! let first = format_invocation(&config, ParameterPoint::new(0, 18), true);
//!
//! assert_eq!(first.redirect(), Redirect::Truncate);
//! assert_eq!(first.to_string(), "./bitonicsort -quiet=1 -size=18 -lsz=256 > sort.dat");
//! # Ok::<(), bench_sweep::Error>(())
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ExperimentConfig, FamilyParams};
use crate::sweep::ParameterPoint;

/// How the child's stdout reaches the results file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Redirect {
    /// Start the file afresh (`>`).
    Truncate,
    /// Extend the file (`>>`).
    Append,
}

impl Redirect {
    /// Truncate on the sweep's first point, append on every later one.
    #[must_use]
    pub const fn for_point(is_first_point: bool) -> Self {
        if is_first_point {
            Self::Truncate
        } else {
            Self::Append
        }
    }

    /// Shell spelling of the operator.
    #[must_use]
    pub const fn operator(self) -> &'static str {
        match self {
            Self::Truncate => ">",
            Self::Append => ">>",
        }
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operator())
    }
}

/// One fully-formed child invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
    output_path: PathBuf,
    redirect: Redirect,
}

impl Invocation {
    /// Create an invocation from its parts.
    #[must_use]
    pub fn new(
        program: impl Into<PathBuf>,
        args: Vec<String>,
        output_path: impl Into<PathBuf>,
        redirect: Redirect,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            output_path: output_path.into(),
            redirect,
        }
    }

    /// Executable to launch.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments, in order.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// File receiving the child's stdout.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Truncate or append.
    #[must_use]
    pub const fn redirect(&self) -> Redirect {
        self.redirect
    }
}

/// Renders `prog args... OP outfile`, quoting tokens that contain whitespace.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_token(f, &self.program.to_string_lossy())?;
        for arg in &self.args {
            f.write_str(" ")?;
            write_token(f, arg)?;
        }
        write!(f, " {} ", self.redirect)?;
        write_token(f, &self.output_path.to_string_lossy())
    }
}

fn write_token(f: &mut fmt::Formatter<'_>, token: &str) -> fmt::Result {
    if !token.is_empty() && !token.chars().any(|c| c.is_whitespace() || c == '"') {
        return f.write_str(token);
    }
    f.write_str("\"")?;
    for c in token.chars() {
        if c == '"' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("\"")
}

/// Child arguments for `point`, quiet flag first.
#[must_use]
pub fn child_args(config: &ExperimentConfig, point: ParameterPoint) -> Vec<String> {
    let lsz = config.local_size();
    let v = point.value();
    match *config.params() {
        FamilyParams::Bitonic => vec![
            "-quiet=1".to_string(),
            format!("-size={v}"),
            format!("-lsz={lsz}"),
        ],
        FamilyParams::Filter { filter_size, .. } => vec![
            "-quiet".to_string(),
            format!("-randboxes={v}"),
            format!("-randfilter={filter_size}"),
            format!("-lsz={lsz}"),
        ],
        FamilyParams::Gemm {
            row_count,
            col_count,
            batch_size,
        } => vec![
            "-quiet=1".to_string(),
            format!("-ay={row_count}"),
            format!("-by={col_count}"),
            format!("-ax={v}"),
            format!("-lsz={lsz}"),
            format!("-bsz={batch_size}"),
        ],
        FamilyParams::Hist {
            batch_size,
            size_multiplier,
        } => vec![
            "-quiet=1".to_string(),
            format!("-sz={}", v.saturating_mul(size_multiplier)),
            format!("-lsz={lsz}"),
            format!("-bsz={batch_size}"),
        ],
    }
}

/// Build the invocation for `point`.
///
/// `is_first_point` comes from the orchestrator, never from comparing the
/// point against the sweep bounds.
#[must_use]
pub fn format_invocation(
    config: &ExperimentConfig,
    point: ParameterPoint,
    is_first_point: bool,
) -> Invocation {
    Invocation::new(
        config.executable_path(),
        child_args(config, point),
        config.output_path(),
        Redirect::for_point(is_first_point),
    )
}

/// Human-readable progress line for `point`.
#[must_use]
pub fn progress_line(config: &ExperimentConfig, point: ParameterPoint) -> String {
    let lsz = config.local_size();
    let v = point.value();
    match *config.params() {
        FamilyParams::Bitonic => format!("Running for lsz = {lsz}, size = {v}"),
        FamilyParams::Filter { filter_size, .. } => {
            format!("Running for fsz = {filter_size}, lsz = {lsz}, size = {v}")
        }
        FamilyParams::Gemm { .. } => format!("Running for lsz = {lsz}, ax = {v}"),
        FamilyParams::Hist {
            size_multiplier, ..
        } => format!(
            "Running for lsz = {lsz}, sz = {}",
            v.saturating_mul(size_multiplier)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Family;

    fn config(family: Family) -> ExperimentConfig {
        ExperimentConfig::builder(family)
            .executable_path("bench")
            .output_path("out.dat")
            .build()
            .unwrap()
    }

    #[test]
    fn test_redirect_for_point() {
        assert_eq!(Redirect::for_point(true).operator(), ">");
        assert_eq!(Redirect::for_point(false).operator(), ">>");
    }

    #[test]
    fn test_bitonic_line() {
        let inv = format_invocation(&config(Family::Bitonic), ParameterPoint::new(1, 19), false);
        assert_eq!(inv.to_string(), "bench -quiet=1 -size=19 -lsz=256 >> out.dat");
    }

    #[test]
    fn test_filter_line() {
        let inv = format_invocation(&config(Family::Filter), ParameterPoint::new(0, 256), true);
        assert_eq!(
            inv.to_string(),
            "bench -quiet -randboxes=256 -randfilter=9 -lsz=16 > out.dat"
        );
    }

    #[test]
    fn test_gemm_line() {
        let inv = format_invocation(&config(Family::Gemm), ParameterPoint::new(0, 4), true);
        assert_eq!(
            inv.to_string(),
            "bench -quiet=1 -ay=8 -by=6 -ax=4 -lsz=8 -bsz=256 > out.dat"
        );
    }

    #[test]
    fn test_hist_line_scales_size() {
        let inv = format_invocation(&config(Family::Hist), ParameterPoint::new(2, 12), false);
        assert_eq!(
            inv.to_string(),
            "bench -quiet=1 -sz=120000 -lsz=256 -bsz=1024 >> out.dat"
        );
        assert_eq!(
            progress_line(&config(Family::Hist), ParameterPoint::new(2, 12)),
            "Running for lsz = 256, sz = 120000"
        );
    }

    #[test]
    fn test_progress_lines() {
        let p = ParameterPoint::new(0, 21);
        assert_eq!(
            progress_line(&config(Family::Bitonic), p),
            "Running for lsz = 256, size = 21"
        );
        assert_eq!(
            progress_line(&config(Family::Filter), p),
            "Running for fsz = 9, lsz = 16, size = 21"
        );
        assert_eq!(
            progress_line(&config(Family::Gemm), p),
            "Running for lsz = 8, ax = 21"
        );
    }

    #[test]
    fn test_paths_with_spaces_are_quoted_for_display_only() {
        let config = ExperimentConfig::builder(Family::Bitonic)
            .executable_path("my bench/sort")
            .output_path("results dir/out.dat")
            .build()
            .unwrap();
        let inv = format_invocation(&config, ParameterPoint::new(0, 18), true);
        assert_eq!(inv.program(), Path::new("my bench/sort"));
        assert_eq!(inv.output_path(), Path::new("results dir/out.dat"));
        assert_eq!(
            inv.to_string(),
            "\"my bench/sort\" -quiet=1 -size=18 -lsz=256 > \"results dir/out.dat\""
        );
    }

    #[test]
    fn test_redirect_ignores_point_value() {
        // A first point whose value differs from range_start still truncates.
        let inv = format_invocation(&config(Family::Bitonic), ParameterPoint::new(0, 99), true);
        assert_eq!(inv.redirect(), Redirect::Truncate);
    }
}
