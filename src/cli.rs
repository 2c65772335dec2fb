//! Command-line surface
//!
//! Every flag maps onto an override key; defaults live in the family
//! tables, not here, so `resolve` stays the single source of truth.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};

use crate::config::{resolve, Family, OverrideKey, Overrides};
use crate::orchestrator::Variant;
use crate::plan::SweepPlan;
use crate::Result;

/// Parameter-sweep runner for external compute benchmarks
#[derive(Parser, Debug)]
#[command(name = "bench-sweep", version, about, arg_required_else_help = true)]
pub struct Cli {
    /// Run verbosely (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print progress and commands without launching anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Write a JSON report of every run to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Family to sweep, or a plan file
    #[command(subcommand)]
    pub command: Commands,
}

/// Experiment families, plus multi-variant plans.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bitonic sort over log2 problem sizes (-size)
    Bitonic {
        /// Flags shared by every family
        #[command(flatten)]
        common: CommonArgs,
        /// Sweep bounds
        #[command(flatten)]
        range: DirectRangeArgs,
    },

    /// Convolution filter over image sizes (-randboxes)
    Filter {
        /// Flags shared by every family
        #[command(flatten)]
        common: CommonArgs,

        /// Filter size (default: 9)
        #[arg(short = 'k', long)]
        filter_size: Option<u64>,

        /// Starting image size (default: 256)
        #[arg(short, long, visible_short_alias = 'i', visible_alias = "image-size")]
        first: Option<u64>,

        /// Image size step (default: 256)
        #[arg(short, long)]
        step: Option<u64>,

        /// Number of steps after the first point (default: 10)
        #[arg(short = 'n', long)]
        npoints: Option<u64>,
    },

    /// Matrix multiply over the ax dimension (-ax)
    Gemm {
        /// Flags shared by every family
        #[command(flatten)]
        common: CommonArgs,
        /// Sweep bounds
        #[command(flatten)]
        range: DirectRangeArgs,

        /// Rows of A (default: 8)
        #[arg(long)]
        ay: Option<u64>,

        /// Columns of B (default: 6)
        #[arg(long)]
        by: Option<u64>,

        /// Batch size (default: 256)
        #[arg(short, long)]
        batch_size: Option<u64>,
    },

    /// Histogram over multiples of the size multiplier (-sz)
    Hist {
        /// Flags shared by every family
        #[command(flatten)]
        common: CommonArgs,
        /// Sweep bounds
        #[command(flatten)]
        range: DirectRangeArgs,

        /// Batch size (default: 1024)
        #[arg(short, long)]
        batch_size: Option<u64>,

        /// Size multiplier applied to the swept value (default: 10000)
        #[arg(short = 'm', long)]
        size_multiplier: Option<u64>,
    },

    /// Run the variants declared in a JSON plan file
    Plan {
        /// Plan file
        file: PathBuf,

        /// Device name recorded for every variant
        #[arg(short, long)]
        devname: Option<String>,
    },
}

/// Flags shared by every family.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Program name to run
    #[arg(short, long)]
    pub progname: Option<PathBuf>,

    /// Output file
    #[arg(short, long)]
    pub outfile: Option<PathBuf>,

    /// Local memory size
    #[arg(short, long)]
    pub local_size: Option<u64>,

    /// Device name (default: tgllp)
    #[arg(short, long)]
    pub devname: Option<String>,
}

/// Bounds of a direct (`first..=last`) sweep.
#[derive(Args, Debug)]
pub struct DirectRangeArgs {
    /// First swept value
    #[arg(short, long)]
    pub first: Option<u64>,

    /// Last swept value (inclusive)
    #[arg(short = 'e', long)]
    pub last: Option<u64>,
}

/// Result of parsing the command line.
#[derive(Debug)]
pub enum Parsed {
    /// Help or version was requested; print it and exit 0.
    Help(String),
    /// Run the sweep.
    Run(Cli),
}

/// Parse `args` (program name first).
///
/// A bare invocation, `--help` and `--version` come back as [`Parsed::Help`]
/// so that the caller can exit 0.
///
/// # Errors
///
/// Returns the clap error for unknown flags or ill-typed values.
pub fn parse_from<I, T>(args: I) -> std::result::Result<Parsed, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Parsed::Run(cli)),
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) =>
        {
            Ok(Parsed::Help(err.render().to_string()))
        }
        Err(err) => Err(err),
    }
}

impl Cli {
    /// Overrides that apply to every variant.
    #[must_use]
    pub fn global_overrides(&self) -> Overrides {
        let mut overrides = Overrides::new();
        if self.verbose {
            overrides.insert(OverrideKey::Verbose.as_str(), true);
        }
        overrides
    }

    /// Resolve the command line into the variants to run.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOption` for rejected overrides, `Io`/`Json` for an
    /// unreadable or malformed plan file.
    pub fn variants(&self) -> Result<Vec<Variant>> {
        let mut overrides = self.global_overrides();

        let family = match &self.command {
            Commands::Plan { file, devname } => {
                overrides.insert_opt(OverrideKey::DeviceName, devname.as_deref());
                return SweepPlan::load(file)?.resolve(&overrides);
            }
            Commands::Bitonic { common, range } => {
                common.collect(&mut overrides);
                range.collect(&mut overrides);
                Family::Bitonic
            }
            Commands::Filter {
                common,
                filter_size,
                first,
                step,
                npoints,
            } => {
                common.collect(&mut overrides);
                overrides.insert_opt(OverrideKey::FilterSize, *filter_size);
                overrides.insert_opt(OverrideKey::First, *first);
                overrides.insert_opt(OverrideKey::Step, *step);
                overrides.insert_opt(OverrideKey::PointCount, *npoints);
                Family::Filter
            }
            Commands::Gemm {
                common,
                range,
                ay,
                by,
                batch_size,
            } => {
                common.collect(&mut overrides);
                range.collect(&mut overrides);
                overrides.insert_opt(OverrideKey::RowCount, *ay);
                overrides.insert_opt(OverrideKey::ColCount, *by);
                overrides.insert_opt(OverrideKey::BatchSize, *batch_size);
                Family::Gemm
            }
            Commands::Hist {
                common,
                range,
                batch_size,
                size_multiplier,
            } => {
                common.collect(&mut overrides);
                range.collect(&mut overrides);
                overrides.insert_opt(OverrideKey::BatchSize, *batch_size);
                overrides.insert_opt(OverrideKey::SizeMultiplier, *size_multiplier);
                Family::Hist
            }
        };

        let config = resolve(family, &overrides)?;
        Ok(vec![Variant::new(family.name(), config)])
    }
}

impl CommonArgs {
    fn collect(&self, overrides: &mut Overrides) {
        overrides.insert_opt(
            OverrideKey::ProgramName,
            self.progname.as_ref().map(|p| p.to_string_lossy()),
        );
        overrides.insert_opt(
            OverrideKey::OutputPath,
            self.outfile.as_ref().map(|p| p.to_string_lossy()),
        );
        overrides.insert_opt(OverrideKey::LocalSize, self.local_size);
        overrides.insert_opt(OverrideKey::DeviceName, self.devname.as_deref());
    }
}

impl DirectRangeArgs {
    fn collect(&self, overrides: &mut Overrides) {
        overrides.insert_opt(OverrideKey::First, self.first);
        overrides.insert_opt(OverrideKey::Last, self.last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn run(args: &[&str]) -> Cli {
        match parse_from(args).unwrap() {
            Parsed::Run(cli) => cli,
            Parsed::Help(text) => panic!("unexpected help: {text}"),
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_subcommand_help_lists_flattened_flags() {
        let Parsed::Help(text) = parse_from(["bench-sweep", "gemm", "--help"]).unwrap() else {
            panic!("expected help");
        };
        assert!(text.contains("--progname"));
        assert!(text.contains("--last"));
        assert!(text.contains("--ay"));
    }

    #[test]
    fn test_bare_invocation_is_help() {
        assert!(matches!(parse_from(["bench-sweep"]).unwrap(), Parsed::Help(_)));
    }

    #[test]
    fn test_help_flag_is_help() {
        match parse_from(["bench-sweep", "filter", "--help"]).unwrap() {
            Parsed::Help(text) => assert!(text.contains("--filter-size")),
            Parsed::Run(_) => panic!("expected help"),
        }
    }

    #[test]
    fn test_unknown_flag_is_error() {
        assert!(parse_from(["bench-sweep", "bitonic", "--bogus"]).is_err());
    }

    #[test]
    fn test_wrong_type_is_error() {
        let err = parse_from(["bench-sweep", "bitonic", "-l", "wide"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_bitonic_flags_resolve() {
        let cli = run(&["bench-sweep", "bitonic", "-p", "./sort", "-o", "s.dat", "-l", "128", "-f", "4", "-e", "6"]);
        let variants = cli.variants().unwrap();
        let config = variants[0].config();
        assert_eq!(variants[0].name(), "bitonic");
        assert_eq!(config.executable_path(), Path::new("./sort"));
        assert_eq!(config.local_size(), 128);
        assert_eq!((config.range_start(), config.range_end()), (4, 6));
    }

    #[test]
    fn test_image_size_aliases_first() {
        let cli = run(&["bench-sweep", "filter", "-i", "512", "-n", "0"]);
        let config = cli.variants().unwrap().remove(0).config().clone();
        assert_eq!(config.range_start(), 512);
        assert_eq!(config.range_end(), 512);
    }

    #[test]
    fn test_global_verbose_reaches_config() {
        let cli = run(&["bench-sweep", "hist", "-v"]);
        assert!(cli.variants().unwrap()[0].config().verbose());
    }

    #[test]
    fn test_gemm_specific_flags() {
        let cli = run(&["bench-sweep", "gemm", "--ay", "16", "--by", "12", "-b", "64"]);
        let variants = cli.variants().unwrap();
        assert_eq!(
            variants[0].config().params(),
            &crate::config::FamilyParams::Gemm {
                row_count: 16,
                col_count: 12,
                batch_size: 64
            }
        );
    }
}
