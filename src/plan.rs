//! Sweep plans - multi-variant sweeps declared in a JSON file
//!
//! ```json
//! {
//!   "variants": [
//!     { "name": "nopriv", "family": "gemm",
//!       "overrides": { "progname": "sgemm/matmult_groups.exe", "outfile": "nopriv.dat" } },
//!     { "name": "priv", "family": "gemm",
//!       "overrides": { "progname": "sgemm/matmult_groups_priv.exe", "outfile": "priv.dat" } }
//!   ]
//! }
//! ```
//!
//! Every variant's overrides go through the same resolver as CLI flags.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{resolve, Family, Overrides};
use crate::orchestrator::Variant;
use crate::{Error, Result};

/// A declared list of variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepPlan {
    /// Variants, in execution order.
    pub variants: Vec<VariantSpec>,
}

/// One unresolved variant of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantSpec {
    /// Unique variant name.
    pub name: String,
    /// Benchmark family.
    pub family: Family,
    /// Override keys and values for this variant.
    #[serde(default)]
    pub overrides: serde_json::Map<String, serde_json::Value>,
}

impl SweepPlan {
    /// Parse a plan from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` for malformed JSON or unknown fields.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a plan file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, `Error::Json` if it
    /// does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Resolve every variant, layering its own overrides over `base`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOption` for an empty plan or any override the
    /// variant's family rejects.
    pub fn resolve(&self, base: &Overrides) -> Result<Vec<Variant>> {
        if self.variants.is_empty() {
            return Err(Error::invalid_option("plan declares no variants"));
        }
        self.variants
            .iter()
            .map(|spec| {
                let mut overrides = base.clone();
                for (key, value) in Overrides::from_json(&spec.overrides)?.iter() {
                    overrides.insert(key, value);
                }
                let config = resolve(spec.family, &overrides).map_err(|err| match err {
                    Error::InvalidOption(msg) => {
                        Error::invalid_option(format!("variant '{}': {msg}", spec.name))
                    }
                    other => other,
                })?;
                Ok(Variant::new(spec.name.clone(), config))
            })
            .collect()
    }
}
