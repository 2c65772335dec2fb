//! Configuration Resolver
//!
//! Merges a family's built-in defaults with user overrides into one
//! immutable [`ExperimentConfig`] per sweep.
//!
//! ```rust
//! use bench_sweep::config::{resolve, Family, Overrides};
//!
//! let overrides = Overrides::new().with("local_size", 128).with("last", 20);
//! let config = resolve(Family::Bitonic, &overrides)?;
//!
//! assert_eq!(config.local_size(), 128);
//! assert_eq!(config.range_start(), 18);
//! assert_eq!(config.range_end(), 20);
//! # Ok::<(), bench_sweep::Error>(())
//! ```

mod experiment_config;
mod family;
mod overrides;

pub use experiment_config::{ExperimentConfig, ExperimentConfigBuilder, FamilyParams};
pub use family::{Family, FamilyDefaults, DEFAULT_DEVICE};
pub use overrides::{OverrideKey, Overrides};

use overrides::{parse_count, parse_flag};

use crate::{Error, Result};

/// Resolve `overrides` on top of `family`'s defaults.
///
/// Missing overrides fall back to defaults silently.
///
/// # Errors
///
/// Returns `InvalidOption` when a key is unknown, does not apply to the
/// family, or carries a value of the wrong type.
pub fn resolve(family: Family, overrides: &Overrides) -> Result<ExperimentConfig> {
    let mut builder = ExperimentConfig::builder(family);

    for (name, raw) in overrides.iter() {
        let key: OverrideKey = name.parse()?;
        if !family.accepts(key) {
            return Err(Error::invalid_option(format!(
                "'{key}' does not apply to the {family} family"
            )));
        }
        builder = apply(builder, key, raw)?;
    }

    builder.build()
}

fn apply(builder: ExperimentConfigBuilder, key: OverrideKey, raw: &str) -> Result<ExperimentConfigBuilder> {
    Ok(match key {
        OverrideKey::ProgramName => builder.executable_path(raw),
        OverrideKey::OutputPath => builder.output_path(raw),
        OverrideKey::DeviceName => builder.device_name(raw),
        OverrideKey::Verbose => builder.verbose(parse_flag(key, raw)?),
        OverrideKey::LocalSize => builder.local_size(parse_count(key, raw)?),
        OverrideKey::First => builder.first(parse_count(key, raw)?),
        OverrideKey::Last => builder.last(parse_count(key, raw)?),
        OverrideKey::Step => builder.step(parse_count(key, raw)?),
        OverrideKey::PointCount => builder.point_count(parse_count(key, raw)?),
        OverrideKey::FilterSize => builder.filter_size(parse_count(key, raw)?),
        OverrideKey::RowCount => builder.row_count(parse_count(key, raw)?),
        OverrideKey::ColCount => builder.col_count(parse_count(key, raw)?),
        OverrideKey::BatchSize => builder.batch_size(parse_count(key, raw)?),
        OverrideKey::SizeMultiplier => builder.size_multiplier(parse_count(key, raw)?),
    })
}
