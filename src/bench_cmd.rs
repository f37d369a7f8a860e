use std::path::{Path, PathBuf};

use tracing::info;

use crate::bench::load_suite;
use crate::circuit::CircuitRegistry;
use crate::config::{BenchmarkConfig, RawParams, validate};
use crate::core::{BenchRecord, EnvironmentInfo};
use crate::curve::CurveId;
use crate::engine::{Executor, Measurement, as_ms};
use crate::profile::SystemProfiles;
use crate::storage::{JsonlWriter, write_json};
use crate::BenchResult;

/// Output options shared by single runs and suites.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub profile_dir: PathBuf,
    pub json: Option<PathBuf>,
    pub jsonl: Option<PathBuf>,
    pub cli_args: Vec<String>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        OutputOptions {
            profile_dir: PathBuf::from("."),
            json: None,
            jsonl: None,
            cli_args: Vec::new(),
        }
    }
}

/// Validate, run and report one benchmark.
pub fn run(
    raw: &RawParams,
    circuits: &CircuitRegistry,
    opts: &OutputOptions,
) -> BenchResult<Measurement> {
    let config = validate(raw, circuits)?;
    let (measurement, record) = run_one(&config, circuits, &opts.profile_dir, opts)?;
    if let Some(path) = &opts.json {
        write_json(path, &record)?;
    }
    Ok(measurement)
}

/// Run every entry of a suite file. All entries are validated before the
/// first one runs.
pub fn run_suite(
    suite: &Path,
    base: &RawParams,
    circuits: &CircuitRegistry,
    opts: &OutputOptions,
) -> BenchResult<Vec<Measurement>> {
    let configs = load_suite(suite, base)?
        .iter()
        .map(|raw| validate(raw, circuits))
        .collect::<Result<Vec<_>, _>>()?;
    info!(benchmarks = configs.len(), suite = %suite.display(), "running suite");

    let mut measurements = Vec::with_capacity(configs.len());
    let mut records = Vec::with_capacity(configs.len());
    for (index, config) in configs.iter().enumerate() {
        let profile_dir = opts
            .profile_dir
            .join(format!("{index}-{}-{}", config.circuit, config.stage));
        let (measurement, record) = run_one(config, circuits, &profile_dir, opts)?;
        measurements.push(measurement);
        records.push(record);
    }
    if let Some(path) = &opts.json {
        write_json(path, &records)?;
    }
    Ok(measurements)
}

fn run_one(
    config: &BenchmarkConfig,
    circuits: &CircuitRegistry,
    profile_dir: &Path,
    opts: &OutputOptions,
) -> BenchResult<(Measurement, BenchRecord)> {
    let profiles = SystemProfiles::new(profile_dir);
    let measurement = Executor::new(circuits, &profiles).run(config)?;

    println!("{}", summary(config, &measurement));
    if let Some(path) = &measurement.profile_artifact {
        println!("profile: {}", path.display());
    }

    let mut record = BenchRecord::new(config, &measurement, EnvironmentInfo::detect());
    record.cli_args = opts.cli_args.clone();
    if let Some(path) = &opts.jsonl {
        JsonlWriter::new(path).append(&record)?;
    }
    Ok((measurement, record))
}

/// One-line human summary.
pub fn summary(config: &BenchmarkConfig, m: &Measurement) -> String {
    format!(
        "{} {} size={} curve={}: avg={:.3}ms over {} runs",
        config.stage,
        config.circuit,
        config.size,
        config.curve,
        as_ms(m.average),
        m.repetitions()
    )
}

/// Registered circuits and supported curves, for `--list`.
pub fn list(circuits: &CircuitRegistry) -> String {
    format!(
        "circuits: {}\ncurves: {}",
        circuits.names().join(", "),
        CurveId::supported_names()
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::{ProfileKind, Stage};

    #[test]
    fn test_summary_format() {
        let config = BenchmarkConfig {
            circuit: "expo".into(),
            size: 10,
            stage: Stage::Prove,
            curve: CurveId::Bn254,
            profile: ProfileKind::None,
            count: 2,
        };
        let m = Measurement {
            backend: "groth16".into(),
            stage: Stage::Prove,
            samples: vec![Duration::from_micros(1250), Duration::from_micros(1750)],
            total: Duration::from_millis(3),
            average: Duration::from_micros(1500),
            constraints: Some(11),
            profile_artifact: None,
        };
        assert_eq!(
            summary(&config, &m),
            "prove expo size=10 curve=bn254: avg=1.500ms over 2 runs"
        );
    }

    #[test]
    fn test_list_mentions_defaults() {
        let text = list(&CircuitRegistry::with_defaults());
        assert!(text.contains("expo"));
        assert!(text.contains("bn254"));
    }
}
