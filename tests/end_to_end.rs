//! End-to-end runs through validation and the Groth16 backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use zk_bench::bench_cmd::{self, OutputOptions};
use zk_bench::circuit::{BenchCircuit, Blueprint, BlueprintBuilder, CircuitRegistry};
use zk_bench::config::{ConfigError, RawParams, Stage, validate};
use zk_bench::core::BenchRecord;
use zk_bench::curve::CurveId;
use zk_bench::profile::SystemProfiles;
use zk_bench::storage::JsonlWriter;
use zk_bench::{BenchError, Executor};

struct CountingCircuit {
    built: Arc<AtomicUsize>,
}

impl BenchCircuit for CountingCircuit {
    fn name(&self) -> &str {
        "counting"
    }

    fn construct(&self, size: usize) -> Blueprint {
        self.built.fetch_add(1, Ordering::SeqCst);
        let mut b = BlueprintBuilder::new("counting");
        let mut x = b.secret(3);
        for _ in 0..size {
            x = b.mul(x, x);
        }
        b.output(x);
        b.build()
    }
}

#[test]
fn prove_expo_on_bn254() {
    let circuits = CircuitRegistry::with_defaults();
    let raw = RawParams {
        size: 64,
        ..Default::default()
    };
    let config = validate(&raw, &circuits).unwrap();
    assert_eq!(config.stage, Stage::Prove);
    assert_eq!(config.curve, CurveId::Bn254);

    let dir = tempfile::tempdir().unwrap();
    let profiles = SystemProfiles::new(dir.path());
    let m = Executor::new(&circuits, &profiles).run(&config).unwrap();

    assert_eq!(m.backend, "groth16");
    assert_eq!(m.repetitions(), 2);
    assert!(m.average > Duration::ZERO);
    assert_eq!(m.constraints, Some(65));
    assert!(m.profile_artifact.is_none());
}

#[test]
fn verify_cubic_on_every_curve() {
    let circuits = CircuitRegistry::with_defaults();
    for curve in CurveId::implemented() {
        let raw = RawParams {
            circuit: "cubic".into(),
            size: 4,
            count: 1,
            algo: "verify".into(),
            curve: curve.name().to_uppercase(),
            ..Default::default()
        };
        let config = validate(&raw, &circuits).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let profiles = SystemProfiles::new(dir.path());
        let m = Executor::new(&circuits, &profiles).run(&config).unwrap();
        assert_eq!(m.stage, Stage::Verify, "{curve}");
        assert_eq!(m.samples.len(), 1);
    }
}

#[test]
fn bogus_algo_constructs_nothing() {
    let built = Arc::new(AtomicUsize::new(0));
    let mut circuits = CircuitRegistry::new();
    circuits.register(CountingCircuit {
        built: built.clone(),
    });

    let dir = tempfile::tempdir().unwrap();
    let opts = OutputOptions {
        profile_dir: dir.path().join("profiles"),
        ..Default::default()
    };
    let raw = RawParams {
        circuit: "counting".into(),
        algo: "bogus".into(),
        profile: "mem".into(),
        ..Default::default()
    };

    let err = bench_cmd::run(&raw, &circuits, &opts).unwrap_err();
    assert!(matches!(err, BenchError::Config(ConfigError::InvalidAlgorithm(_))));
    assert_eq!(built.load(Ordering::SeqCst), 0);
    assert!(!dir.path().join("profiles").exists());
}

#[test]
fn run_writes_json_and_jsonl_records() {
    let built = Arc::new(AtomicUsize::new(0));
    let mut circuits = CircuitRegistry::with_defaults();
    circuits.register(CountingCircuit {
        built: built.clone(),
    });

    let dir = tempfile::tempdir().unwrap();
    let opts = OutputOptions {
        profile_dir: dir.path().join("profiles"),
        json: Some(dir.path().join("report.json")),
        jsonl: Some(dir.path().join("runs.jsonl")),
        cli_args: vec!["zk-bench".into()],
    };
    let raw = RawParams {
        circuit: "counting".into(),
        size: 8,
        count: 3,
        algo: "setup".into(),
        profile: "trace".into(),
        curve: "bls12_381".into(),
    };

    let m = bench_cmd::run(&raw, &circuits, &opts).unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert_eq!(m.repetitions(), 3);
    assert!(m.profile_artifact.as_ref().unwrap().exists());

    let record: BenchRecord =
        serde_json::from_slice(&std::fs::read(dir.path().join("report.json")).unwrap()).unwrap();
    assert_eq!(record.circuit_name, "counting");
    assert_eq!(record.stage, Stage::Setup);
    assert_eq!(record.backend.curve, CurveId::Bls12_381);
    assert_eq!(record.stats.iterations, 3);
    assert_eq!(record.cli_args, vec!["zk-bench".to_string()]);

    let records = JsonlWriter::new(dir.path().join("runs.jsonl")).read_all().unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn suite_validates_every_entry_first() {
    let built = Arc::new(AtomicUsize::new(0));
    let mut circuits = CircuitRegistry::with_defaults();
    circuits.register(CountingCircuit {
        built: built.clone(),
    });

    let dir = tempfile::tempdir().unwrap();
    let suite = dir.path().join("suite.toml");
    std::fs::write(
        &suite,
        r#"
[[bench]]
circuit = "counting"
size = 4

[[bench]]
circuit = "counting"
curve = "secp256k1"
"#,
    )
    .unwrap();

    let err = bench_cmd::run_suite(&suite, &RawParams::default(), &circuits, &OutputOptions::default())
        .unwrap_err();
    assert!(matches!(err, BenchError::Config(ConfigError::InvalidCurve { .. })));
    assert_eq!(built.load(Ordering::SeqCst), 0);
}

#[test]
fn suite_runs_entries_in_order() {
    let circuits = CircuitRegistry::with_defaults();
    let dir = tempfile::tempdir().unwrap();
    let suite = dir.path().join("suite.toml");
    std::fs::write(
        &suite,
        r#"
[defaults]
size = 8
count = 1

[[bench]]
algo = "compile"

[[bench]]
circuit = "cubic"
algo = "prove"
curve = "bls12_377"
"#,
    )
    .unwrap();

    let opts = OutputOptions {
        profile_dir: dir.path().to_path_buf(),
        json: Some(dir.path().join("suite.json")),
        ..Default::default()
    };
    let ms = bench_cmd::run_suite(&suite, &RawParams::default(), &circuits, &opts).unwrap();
    assert_eq!(ms.len(), 2);
    assert_eq!(ms[0].stage, Stage::Compile);
    assert_eq!(ms[1].stage, Stage::Prove);

    let records: Vec<BenchRecord> =
        serde_json::from_slice(&std::fs::read(dir.path().join("suite.json")).unwrap()).unwrap();
    assert_eq!(records[1].circuit_name, "cubic");
    assert_eq!(records[1].backend.curve, CurveId::Bls12_377);
}
