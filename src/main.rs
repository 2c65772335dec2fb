//! bench-sweep CLI - run parameter sweeps over external benchmark executables

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bench_sweep::cli::{self, Cli, Parsed};
use bench_sweep::executor::{DryRunExecutor, ProcessExecutor};
use bench_sweep::experiment::SweepReport;
use bench_sweep::orchestrator::Orchestrator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit code for rejected options, matching clap's usage errors.
const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    let cli = match cli::parse_from(std::env::args_os()) {
        Ok(Parsed::Help(text)) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
        Ok(Parsed::Run(cli)) => cli,
        Err(err) => err.exit(),
    };

    match run(&cli) {
        Ok(report) if report.aborted_variants().is_empty() => ExitCode::SUCCESS,
        Ok(report) => {
            for variant in report.aborted_variants() {
                eprintln!(
                    "error: variant '{}' aborted: {}",
                    variant.name(),
                    variant.aborted().unwrap_or_default()
                );
            }
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            let usage = err
                .downcast_ref::<bench_sweep::Error>()
                .is_some_and(bench_sweep::Error::is_fatal);
            if usage {
                eprintln!("\nFor more information, try '--help'.");
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: &Cli) -> Result<SweepReport> {
    let variants = cli.variants()?;

    let verbose = cli.verbose || variants.iter().any(|v| v.config().verbose());
    init_logging(verbose);

    for variant in &variants {
        tracing::debug!(
            variant = variant.name(),
            family = %variant.config().family(),
            device = variant.config().device_name(),
            program = %variant.config().executable_path().display(),
            output = %variant.config().output_path().display(),
            "resolved variant"
        );
    }

    let orchestrator = Orchestrator::new(variants)?;
    let mut stdout = io::stdout().lock();
    let report = if cli.dry_run {
        orchestrator.run(&mut DryRunExecutor::new(), &mut stdout)?
    } else {
        orchestrator.run(&mut ProcessExecutor::new(), &mut stdout)?
    };

    if let Some(path) = &cli.report {
        report
            .save(path)
            .with_context(|| format!("writing report to {}", path.display()))?;
    }

    let failed = report.failed_runs().len();
    if failed > 0 {
        tracing::warn!(failed, total = report.total_runs(), "some runs produced no data");
    }

    Ok(report)
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("bench_sweep={level}"))),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}
