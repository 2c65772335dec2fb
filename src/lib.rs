//! # bench-sweep: Parameter-Sweep Runner for External Compute Benchmarks
//!
//! bench-sweep repeatedly invokes an external benchmark executable (bitonic
//! sort, convolution filter, matrix multiply, histogram) over a range of one
//! numeric parameter, collecting every run's stdout into one results file.
//! The numerical kernels live in the external binaries; this crate only
//! sequences, formats and launches them.
//!
//! ## Pipeline
//!
//! ```text
//! config::resolve ─> sweep::SweepRange ─┬─> command::format_invocation ─> executor::Executor
//!                                       └──────────── orchestrator::Orchestrator (per variant)
//! ```
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Jidoka**: first point of a sweep truncates, every later one appends;
//!   the orchestrator passes that decision explicitly
//! - **Poka-Yoke**: arguments and redirect target are never joined into a
//!   shell string, so paths with spaces cannot split
//! - **Genchi Genbutsu**: strictly sequential runs, so timings are not
//!   disturbed by concurrent benchmarks
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bench_sweep::config::{resolve, Family, Overrides};
//! use bench_sweep::executor::ProcessExecutor;
//! use bench_sweep::orchestrator::Orchestrator;
//!
//! let overrides = Overrides::new().with("progname", "./bitonicsort").with("last", 20);
//! let config = resolve(Family::Bitonic, &overrides)?;
//!
//! let report = Orchestrator::single(config)
//!     .run(&mut ProcessExecutor::new(), &mut std::io::stdout())?;
//! println!("{} runs, {} failed", report.total_runs(), report.failed_runs().len());
//! # Ok::<(), bench_sweep::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod experiment;
pub mod orchestrator;
pub mod plan;
pub mod sweep;

pub use error::{Error, Result};
