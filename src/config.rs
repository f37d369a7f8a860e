//! Benchmark parameters and their validation.
//!
//! [`validate`] is the only way to obtain a [`BenchmarkConfig`]; it either
//! resolves every field or returns the first failing check.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::circuit::CircuitRegistry;
use crate::curve::CurveId;

pub const DEFAULT_CIRCUIT: &str = "expo";
pub const DEFAULT_SIZE: i64 = 10_000;
pub const DEFAULT_COUNT: i64 = 2;
pub const DEFAULT_ALGO: &str = "prove";
pub const DEFAULT_PROFILE: &str = "none";
pub const DEFAULT_CURVE: &str = "bn254";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("circuit size must be > 0 (got {0})")]
    InvalidSize(i64),
    #[error("bench count must be > 0 (got {0})")]
    InvalidCount(i64),
    #[error("invalid algo {0:?}: must be compile, setup, prove or verify")]
    InvalidAlgorithm(String),
    #[error("invalid profile {0:?}: must be none, trace, cpu or mem")]
    InvalidProfile(String),
    #[error("invalid curve {name:?}: must be one of {supported}")]
    InvalidCurve { name: String, supported: String },
    #[error("unknown circuit {name:?}: available circuits are {available}")]
    UnknownCircuit { name: String, available: String },
}

/// Algorithm stage, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Compile,
    Setup,
    Prove,
    Verify,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Compile, Stage::Setup, Stage::Prove, Stage::Verify];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Compile => "compile",
            Stage::Setup => "setup",
            Stage::Prove => "prove",
            Stage::Verify => "verify",
        }
    }

    /// Stages that must have run before this one can.
    pub fn prerequisites(&self) -> &'static [Stage] {
        let idx = Stage::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or_default();
        &Stage::ALL[..idx]
    }
}

impl FromStr for Stage {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidAlgorithm(s.to_string()))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    None,
    Trace,
    Cpu,
    Mem,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 4] = [
        ProfileKind::None,
        ProfileKind::Trace,
        ProfileKind::Cpu,
        ProfileKind::Mem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::None => "none",
            ProfileKind::Trace => "trace",
            ProfileKind::Cpu => "cpu",
            ProfileKind::Mem => "mem",
        }
    }
}

impl FromStr for ProfileKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfileKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidProfile(s.to_string()))
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated parameters as they come from flags or a suite file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawParams {
    pub circuit: String,
    pub size: i64,
    pub count: i64,
    pub algo: String,
    pub profile: String,
    pub curve: String,
}

impl Default for RawParams {
    fn default() -> Self {
        RawParams {
            circuit: DEFAULT_CIRCUIT.to_string(),
            size: DEFAULT_SIZE,
            count: DEFAULT_COUNT,
            algo: DEFAULT_ALGO.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            curve: DEFAULT_CURVE.to_string(),
        }
    }
}

/// Fully resolved benchmark configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    pub circuit: String,
    pub size: usize,
    pub stage: Stage,
    pub curve: CurveId,
    pub profile: ProfileKind,
    pub count: usize,
}

/// Validates `raw` against the known curves and `circuits`.
pub fn validate(raw: &RawParams, circuits: &CircuitRegistry) -> Result<BenchmarkConfig, ConfigError> {
    let size = positive(raw.size).ok_or(ConfigError::InvalidSize(raw.size))?;
    let count = positive(raw.count).ok_or(ConfigError::InvalidCount(raw.count))?;
    let stage: Stage = raw.algo.parse()?;
    let profile: ProfileKind = raw.profile.parse()?;
    let curve = CurveId::from_name(&raw.curve).ok_or_else(|| ConfigError::InvalidCurve {
        name: raw.curve.clone(),
        supported: CurveId::supported_names(),
    })?;
    if !circuits.contains(&raw.circuit) {
        return Err(ConfigError::UnknownCircuit {
            name: raw.circuit.clone(),
            available: circuits.names().join(", "),
        });
    }

    Ok(BenchmarkConfig {
        circuit: raw.circuit.clone(),
        size,
        stage,
        curve,
        profile,
        count,
    })
}

fn positive(v: i64) -> Option<usize> {
    if v > 0 { usize::try_from(v).ok() } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CircuitRegistry {
        CircuitRegistry::with_defaults()
    }

    #[test]
    fn test_defaults_validate() {
        let cfg = validate(&RawParams::default(), &registry()).unwrap();
        assert_eq!(
            cfg,
            BenchmarkConfig {
                circuit: "expo".into(),
                size: 10_000,
                stage: Stage::Prove,
                curve: CurveId::Bn254,
                profile: ProfileKind::None,
                count: 2,
            }
        );
    }

    #[test]
    fn test_every_valid_combination_echoes_inputs() {
        let reg = registry();
        for stage in Stage::ALL {
            for profile in ProfileKind::ALL {
                for curve in CurveId::implemented() {
                    let raw = RawParams {
                        circuit: "cubic".into(),
                        size: 3,
                        count: 4,
                        algo: stage.as_str().into(),
                        profile: profile.as_str().into(),
                        curve: curve.name().to_uppercase(),
                    };
                    let cfg = validate(&raw, &reg).unwrap();
                    assert_eq!(cfg.stage, stage);
                    assert_eq!(cfg.profile, profile);
                    assert_eq!(cfg.curve, *curve);
                    assert_eq!(cfg.curve.name(), curve.name());
                    assert_eq!((cfg.size, cfg.count), (3, 4));
                    assert_eq!(cfg.circuit, "cubic");
                }
            }
        }
    }

    fn expect_err(raw: RawParams, check: impl Fn(&ConfigError) -> bool) {
        let err = validate(&raw, &registry()).unwrap_err();
        assert!(check(&err), "unexpected error {err:?} for {raw:?}");
    }

    #[test]
    fn test_single_violation_reports_specific_error() {
        expect_err(RawParams { size: 0, ..Default::default() }, |e| {
            matches!(e, ConfigError::InvalidSize(0))
        });
        expect_err(RawParams { size: -4, ..Default::default() }, |e| {
            matches!(e, ConfigError::InvalidSize(-4))
        });
        expect_err(RawParams { count: 0, ..Default::default() }, |e| {
            matches!(e, ConfigError::InvalidCount(0))
        });
        expect_err(RawParams { algo: "bogus".into(), ..Default::default() }, |e| {
            matches!(e, ConfigError::InvalidAlgorithm(_))
        });
        expect_err(RawParams { profile: "bogus".into(), ..Default::default() }, |e| {
            matches!(e, ConfigError::InvalidProfile(_))
        });
        expect_err(RawParams { curve: "bogus".into(), ..Default::default() }, |e| {
            matches!(e, ConfigError::InvalidCurve { .. })
        });
        expect_err(RawParams { circuit: "bogus".into(), ..Default::default() }, |e| {
            matches!(e, ConfigError::UnknownCircuit { .. })
        });
    }

    #[test]
    fn test_algo_and_profile_are_case_sensitive() {
        let reg = registry();
        let raw = RawParams { algo: "Prove".into(), ..Default::default() };
        assert!(matches!(validate(&raw, &reg), Err(ConfigError::InvalidAlgorithm(_))));
        let raw = RawParams { profile: "CPU".into(), ..Default::default() };
        assert!(matches!(validate(&raw, &reg), Err(ConfigError::InvalidProfile(_))));
    }

    #[test]
    fn test_curve_case_insensitive_and_idempotent() {
        let reg = registry();
        let upper = RawParams { curve: "BN254".into(), ..Default::default() };
        let lower = RawParams { curve: "bn254".into(), ..Default::default() };
        let a = validate(&upper, &reg).unwrap();
        let b = validate(&lower, &reg).unwrap();
        assert_eq!(a.curve, b.curve);
        assert_eq!(validate(&upper, &reg).unwrap(), a);
    }

    #[test]
    fn test_prerequisites_follow_chain() {
        assert!(Stage::Compile.prerequisites().is_empty());
        assert_eq!(Stage::Setup.prerequisites(), &[Stage::Compile]);
        assert_eq!(
            Stage::Verify.prerequisites(),
            &[Stage::Compile, Stage::Setup, Stage::Prove]
        );
    }
}
