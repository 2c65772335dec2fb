//! Run Orchestrator
//!
//! Drives enumerator, formatter and executor for every declared variant,
//! strictly in order: variants in declaration order, points in sweep order,
//! one child at a time. The only state carried between points is the
//! position in the sweep, which decides truncate-vs-append.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tracing::{error, info_span, warn};

use crate::command::{format_invocation, progress_line};
use crate::config::{ExperimentConfig, Family};
use crate::executor::Executor;
use crate::experiment::{RunRecord, RunStatus, SweepReport, VariantOutcome};
use crate::{Error, Result};

/// One flavor of a benchmark family: its own executable, results file and knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    name: String,
    config: ExperimentConfig,
}

impl Variant {
    /// Create a named variant.
    #[must_use]
    pub fn new(name: impl Into<String>, config: ExperimentConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Variant name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &ExperimentConfig {
        &self.config
    }
}

/// Sequential driver over a list of variants.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    variants: Vec<Variant>,
}

impl Orchestrator {
    /// Create an orchestrator over `variants`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOption` when two variants share a name or a results
    /// file; each results file belongs to exactly one variant. Results files
    /// are compared by their absolute, lexically normalized path, so
    /// `a.dat` and `./a.dat` count as the same file. Returns `Io` if the
    /// working directory cannot be determined.
    pub fn new(variants: Vec<Variant>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let mut names = HashSet::new();
        let mut outputs = HashSet::new();
        for variant in &variants {
            if !names.insert(variant.name()) {
                return Err(Error::invalid_option(format!(
                    "variant '{}' is declared twice",
                    variant.name()
                )));
            }
            if !outputs.insert(results_key(&cwd, variant.config().output_path())) {
                return Err(Error::invalid_option(format!(
                    "variant '{}' reuses results file {}",
                    variant.name(),
                    variant.config().output_path().display()
                )));
            }
        }
        Ok(Self { variants })
    }

    /// Orchestrator over a single variant named after its family.
    #[must_use]
    pub fn single(config: ExperimentConfig) -> Self {
        Self {
            variants: vec![Variant::new(config.family().name(), config)],
        }
    }

    /// Declared variants, in execution order.
    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Run every variant.
    ///
    /// Prints the family banner, then for every point a progress line and the
    /// echoed command, before handing the invocation to `executor`. A failing
    /// child never stops the sweep; an unwritable results file stops only its
    /// own variant and is recorded in the report.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` only if writing to `console` fails.
    pub fn run<E, W>(&self, executor: &mut E, console: &mut W) -> Result<SweepReport>
    where
        E: Executor,
        W: Write,
    {
        let mut report = SweepReport::new();
        let mut current_family: Option<Family> = None;

        for variant in &self.variants {
            let config = variant.config();
            if current_family != Some(config.family()) {
                writeln!(console, "{}", config.family().banner())?;
                current_family = Some(config.family());
            }
            let outcome = Self::run_variant(variant, executor, console)?;
            report.push_variant(outcome);
        }

        Ok(report)
    }

    fn run_variant<E, W>(variant: &Variant, executor: &mut E, console: &mut W) -> Result<VariantOutcome>
    where
        E: Executor,
        W: Write,
    {
        let config = variant.config();
        let _span = info_span!("variant", name = variant.name(), family = %config.family()).entered();

        let range = config.sweep_range();
        let repeats = range.collapsed_repeats();
        if repeats > 0 {
            warn!(repeats, "step is 0: sweeping a single point, repeat measurements dropped");
        }

        let mut outcome = VariantOutcome::new(
            variant.name(),
            config.family(),
            config.output_path(),
            config.device_name(),
        );

        for (position, point) in range.points().enumerate() {
            let invocation = format_invocation(config, point, position == 0);
            let mut run = RunRecord::new(variant.name(), point, invocation.to_string());

            writeln!(console, "{}", progress_line(config, point))?;
            writeln!(console, "{invocation}")?;
            console.flush()?;

            run.start();
            match executor.execute(&invocation) {
                Ok(status) => {
                    run.complete(status);
                    outcome.push_run(run);
                }
                Err(err) => {
                    error!("{err}");
                    run.complete(RunStatus::OutputUnwritable {
                        reason: err.to_string(),
                    });
                    outcome.push_run(run);
                    outcome.abort(err.to_string());
                    break;
                }
            }
        }

        Ok(outcome)
    }
}

/// Absolute, lexically normalized form of a results path.
///
/// Symlinks are not resolved and the file need not exist yet.
fn results_key(cwd: &Path, path: &Path) -> PathBuf {
    let mut key = PathBuf::new();
    for component in cwd.join(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                key.pop();
            }
            other => key.push(other),
        }
    }
    key
}
