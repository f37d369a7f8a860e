//! BenchRecord schema v1 - machine-readable output of one benchmark.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::env::EnvironmentInfo;
use crate::config::{BenchmarkConfig, ProfileKind, Stage};
use crate::curve::CurveId;
use crate::engine::{Measurement, as_ms};

/// Schema version for forward compatibility
pub const SCHEMA_VERSION: u32 = 1;

/// Timing of the benchmarked stage, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingStat {
    pub iterations: u32,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub samples_ms: Vec<f64>,
}

impl TimingStat {
    pub fn from_durations(samples: &[Duration]) -> Self {
        let ms: Vec<f64> = samples.iter().copied().map(as_ms).collect();
        Self::from_samples(&ms)
    }

    /// Create TimingStat from a slice of sample times in milliseconds
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return TimingStat {
                iterations: 0,
                mean_ms: 0.0,
                min_ms: 0.0,
                max_ms: 0.0,
                samples_ms: Vec::new(),
            };
        }

        let sum: f64 = samples.iter().sum();
        TimingStat {
            iterations: n as u32,
            mean_ms: sum / n as f64,
            min_ms: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max_ms: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            samples_ms: samples.to_vec(),
        }
    }
}

/// Backend information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendInfo {
    pub name: String,
    pub curve: CurveId,
}

/// Canonical benchmark record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchRecord {
    /// Schema version for forward compatibility
    pub schema_version: u32,

    /// Unique identifier for this record
    pub record_id: String,

    /// ISO 8601 timestamp
    pub timestamp: String,

    pub circuit_name: String,
    pub circuit_size: usize,
    pub stage: Stage,
    pub profile: ProfileKind,

    /// Environment information (CPU, OS, git state)
    pub env: EnvironmentInfo,

    pub backend: BackendInfo,

    pub stats: TimingStat,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<u64>,

    /// Path of the profiling artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_artifact: Option<String>,

    /// Command line arguments used
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cli_args: Vec<String>,
}

impl BenchRecord {
    pub fn new(config: &BenchmarkConfig, measurement: &Measurement, env: EnvironmentInfo) -> Self {
        let timestamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let record_id = format!("{:x}-{}-{}", nanos, config.circuit, config.stage);

        BenchRecord {
            schema_version: SCHEMA_VERSION,
            record_id,
            timestamp,
            circuit_name: config.circuit.clone(),
            circuit_size: config.size,
            stage: config.stage,
            profile: config.profile,
            env,
            backend: BackendInfo {
                name: measurement.backend.clone(),
                curve: config.curve,
            },
            stats: TimingStat::from_durations(&measurement.samples),
            constraints: measurement.constraints.map(|c| c as u64),
            profile_artifact: measurement
                .profile_artifact
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            cli_args: Vec::new(),
        }
    }
}
