//! User overrides - the flag/plan-file side of configuration resolution

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A recognized override key.
///
/// The same names are used by CLI flags and by plan-file `overrides` maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OverrideKey {
    /// `progname`: benchmark executable.
    ProgramName,
    /// `outfile`: results file.
    OutputPath,
    /// `local_size`: work-group size.
    LocalSize,
    /// `devname`: informational device tag.
    DeviceName,
    /// `verbose`: debug logging.
    Verbose,
    /// `first`: first swept value.
    First,
    /// `last`: last swept value.
    Last,
    /// `step`: distance between swept values.
    Step,
    /// `npoints`: steps after the first point.
    PointCount,
    /// `filter_size`: convolution kernel size.
    FilterSize,
    /// `ay`: GEMM row count.
    RowCount,
    /// `by`: GEMM column count.
    ColCount,
    /// `batch_size`: `-bsz` value.
    BatchSize,
    /// `size_multiplier`: histogram size multiplier.
    SizeMultiplier,
}

impl OverrideKey {
    /// Every key, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::ProgramName,
        Self::OutputPath,
        Self::LocalSize,
        Self::DeviceName,
        Self::Verbose,
        Self::First,
        Self::Last,
        Self::Step,
        Self::PointCount,
        Self::FilterSize,
        Self::RowCount,
        Self::ColCount,
        Self::BatchSize,
        Self::SizeMultiplier,
    ];

    /// Canonical key name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProgramName => "progname",
            Self::OutputPath => "outfile",
            Self::LocalSize => "local_size",
            Self::DeviceName => "devname",
            Self::Verbose => "verbose",
            Self::First => "first",
            Self::Last => "last",
            Self::Step => "step",
            Self::PointCount => "npoints",
            Self::FilterSize => "filter_size",
            Self::RowCount => "ay",
            Self::ColCount => "by",
            Self::BatchSize => "batch_size",
            Self::SizeMultiplier => "size_multiplier",
        }
    }
}

impl fmt::Display for OverrideKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverrideKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::invalid_option(format!("unrecognized option '{s}'")))
    }
}

/// Raw user overrides, keyed by override name.
///
/// Values stay as text until resolution so that CLI flags and plan files
/// go through the same validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    entries: BTreeMap<String, String>,
}

impl Overrides {
    /// Create an empty override set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) one override.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Set (or replace) one override in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.entries.insert(key.into(), value.to_string());
    }

    /// Set `key` only when `value` is present.
    pub fn insert_opt<T: ToString>(&mut self, key: OverrideKey, value: Option<T>) {
        if let Some(value) = value {
            self.insert(key.as_str(), value);
        }
    }

    /// Raw value for `key`, if overridden.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no override was given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate overrides in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Build overrides from a plan-file JSON object.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOption` for values that are not strings, numbers or booleans.
    pub fn from_json(map: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let mut overrides = Self::new();
        for (key, value) in map {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(Error::invalid_option(format!(
                        "override '{key}' must be a string, number or boolean, got {other}"
                    )))
                }
            };
            overrides.insert(key.clone(), text);
        }
        Ok(overrides)
    }
}

/// Parse an unsigned integer override value.
pub(crate) fn parse_count(key: OverrideKey, raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|_| {
        Error::invalid_option(format!(
            "'{key}' expects a non-negative integer, got '{raw}'"
        ))
    })
}

/// Parse a boolean override value.
pub(crate) fn parse_flag(key: OverrideKey, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::invalid_option(format!(
            "'{key}' expects a boolean, got '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_roundtrip() {
        for key in OverrideKey::ALL {
            assert_eq!(key.as_str().parse::<OverrideKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_unknown_key_is_invalid_option() {
        let err = "lsz".parse::<OverrideKey>().unwrap_err();
        assert!(matches!(err, Error::InvalidOption(_)));
        assert!(err.to_string().contains("lsz"));
    }

    #[test]
    fn test_from_json_accepts_scalars() {
        let json = serde_json::json!({ "local_size": 16, "outfile": "a.dat", "verbose": true });
        let overrides = Overrides::from_json(json.as_object().unwrap()).unwrap();
        assert_eq!(overrides.get("local_size"), Some("16"));
        assert_eq!(overrides.get("outfile"), Some("a.dat"));
        assert_eq!(overrides.get("verbose"), Some("true"));
    }

    #[test]
    fn test_from_json_rejects_arrays() {
        let json = serde_json::json!({ "first": [1, 2] });
        assert!(Overrides::from_json(json.as_object().unwrap()).is_err());
    }

    #[test]
    fn test_parse_count_rejects_negative() {
        assert_eq!(parse_count(OverrideKey::Step, " 64 ").unwrap(), 64);
        assert!(parse_count(OverrideKey::Step, "-1").is_err());
        assert!(parse_count(OverrideKey::Step, "ten").is_err());
    }
}
