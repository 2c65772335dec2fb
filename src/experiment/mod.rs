//! Run bookkeeping
//!
//! Records what every child invocation did, independent of the measurement
//! data the child writes into its results file.
//!
//! ## Schema Overview
//!
//! ```text
//! SweepReport (1) ──< VariantOutcome (N) ──< RunRecord (N)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use bench_sweep::config::Family;
//! use bench_sweep::experiment::{RunRecord, RunStatus, SweepReport, VariantOutcome};
//! use bench_sweep::sweep::ParameterPoint;
//!
//! let mut outcome = VariantOutcome::new("bitonic", Family::Bitonic, "bitonicsort.dat", "tgllp");
//!
//! let mut run = RunRecord::new("bitonic", ParameterPoint::new(0, 18), "sort -size=18 > bitonicsort.dat");
//! run.start();
//! run.complete(RunStatus::Succeeded);
//! outcome.push_run(run);
//!
//! let mut report = SweepReport::new();
//! report.push_variant(outcome);
//! assert_eq!(report.total_runs(), 1);
//! ```

mod run_record;
mod sweep_report;

pub use run_record::{RunRecord, RunStatus};
pub use sweep_report::{SweepReport, VariantOutcome};
