//! TOML suite files: several benchmarks run one after another.
//!
//! ```toml
//! [defaults]
//! curve = "bls12_381"
//!
//! [[bench]]
//! circuit = "expo"
//! size = 1000
//! algo = "verify"
//! ```
//!
//! Each `[[bench]]` entry starts from the command-line parameters, then
//! `[defaults]`, then its own fields.

use std::path::Path;

use serde::Deserialize;

use crate::config::RawParams;
use crate::{BenchError, BenchResult};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamOverrides {
    pub circuit: Option<String>,
    pub size: Option<i64>,
    pub count: Option<i64>,
    pub algo: Option<String>,
    pub profile: Option<String>,
    pub curve: Option<String>,
}

impl ParamOverrides {
    pub fn apply(&self, base: &RawParams) -> RawParams {
        RawParams {
            circuit: self.circuit.clone().unwrap_or_else(|| base.circuit.clone()),
            size: self.size.unwrap_or(base.size),
            count: self.count.unwrap_or(base.count),
            algo: self.algo.clone().unwrap_or_else(|| base.algo.clone()),
            profile: self.profile.clone().unwrap_or_else(|| base.profile.clone()),
            curve: self.curve.clone().unwrap_or_else(|| base.curve.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SuiteFile {
    #[serde(default)]
    defaults: ParamOverrides,
    #[serde(rename = "bench", default)]
    benches: Vec<ParamOverrides>,
}

pub fn parse_suite(text: &str, base: &RawParams) -> BenchResult<Vec<RawParams>> {
    let suite: SuiteFile =
        toml::from_str(text).map_err(|e| BenchError::Message(format!("invalid suite file: {e}")))?;
    if suite.benches.is_empty() {
        return Err(BenchError::Message("suite defines no [[bench]] entries".into()));
    }
    let base = suite.defaults.apply(base);
    Ok(suite.benches.iter().map(|b| b.apply(&base)).collect())
}

pub fn load_suite(path: &Path, base: &RawParams) -> BenchResult<Vec<RawParams>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| BenchError::Message(format!("failed to read {}: {e}", path.display())))?;
    parse_suite(&text, base)
}
