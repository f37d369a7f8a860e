//! Benchmark execution: prerequisite chain, profiling scope, timed loop.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use ark_bls12_377::Bls12_377;
use ark_bls12_381::Bls12_381;
use ark_bn254::Bn254;
use ark_bw6_761::BW6_761;
use ark_bw6_767::BW6_767;
use ark_mnt4_298::MNT4_298;
use ark_mnt6_298::MNT6_298;
use thiserror::Error;
use tracing::{debug, debug_span, info, info_span};

use crate::backend::{BackendError, DEFAULT_SEED, Groth16Backend, ProofBackend};
use crate::circuit::{Blueprint, CircuitRegistry};
use crate::config::{BenchmarkConfig, ConfigError, ProfileKind, Stage};
use crate::curve::CurveId;
use crate::profile::{ProfileBackend, ProfileScope};
use crate::BenchResult;

/// A stage failed, either while building prerequisites or while timed.
#[derive(Debug, Error)]
#[error("{stage} failed: {cause}")]
pub struct ExecutionError {
    pub stage: Stage,
    #[source]
    pub cause: BackendError,
}

impl ExecutionError {
    pub fn new(stage: Stage, cause: BackendError) -> Self {
        ExecutionError { stage, cause }
    }
}

/// Result of one benchmark invocation.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub backend: String,
    pub stage: Stage,
    /// One entry per timed repetition
    pub samples: Vec<Duration>,
    pub total: Duration,
    pub average: Duration,
    /// Constraint count, when the compile stage ran
    pub constraints: Option<usize>,
    /// Profiling artifact, if the profile kind writes one
    pub profile_artifact: Option<PathBuf>,
}

impl Measurement {
    pub fn repetitions(&self) -> usize {
        self.samples.len()
    }
}

/// Runs validated configurations against the Groth16 backend of their curve.
pub struct Executor<'a> {
    circuits: &'a CircuitRegistry,
    profiles: &'a dyn ProfileBackend,
    seed: u64,
}

impl<'a> Executor<'a> {
    pub fn new(circuits: &'a CircuitRegistry, profiles: &'a dyn ProfileBackend) -> Self {
        Executor {
            circuits,
            profiles,
            seed: DEFAULT_SEED,
        }
    }

    /// Seed for the backend RNG used by setup and prove.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn run(&self, config: &BenchmarkConfig) -> BenchResult<Measurement> {
        match config.curve {
            CurveId::Bn254 => self.run_with(&mut Groth16Backend::<Bn254>::new(self.seed), config),
            CurveId::Bls12_377 => {
                self.run_with(&mut Groth16Backend::<Bls12_377>::new(self.seed), config)
            }
            CurveId::Bls12_381 => {
                self.run_with(&mut Groth16Backend::<Bls12_381>::new(self.seed), config)
            }
            CurveId::Bw6_761 => self.run_with(&mut Groth16Backend::<BW6_761>::new(self.seed), config),
            CurveId::Bw6_767 => self.run_with(&mut Groth16Backend::<BW6_767>::new(self.seed), config),
            CurveId::Mnt4_298 => {
                self.run_with(&mut Groth16Backend::<MNT4_298>::new(self.seed), config)
            }
            CurveId::Mnt6_298 => {
                self.run_with(&mut Groth16Backend::<MNT6_298>::new(self.seed), config)
            }
        }
    }

    /// Like [`Executor::run`] but with a caller-provided backend; the curve
    /// in `config` is only used for logging.
    pub fn run_with<B: ProofBackend>(
        &self,
        backend: &mut B,
        config: &BenchmarkConfig,
    ) -> BenchResult<Measurement> {
        let blueprint = self.circuits.resolve(&config.circuit)?.construct(config.size);
        info!(
            circuit = %config.circuit,
            size = config.size,
            curve = %config.curve,
            backend = backend.name(),
            stage = %config.stage,
            count = config.count,
            profile = %config.profile,
            "starting benchmark"
        );
        execute(
            backend,
            &blueprint,
            config.stage,
            config.count,
            config.profile,
            self.profiles,
        )
    }
}

/// Curve-independent benchmark algorithm.
///
/// Runs every stage before `stage` once, untimed, then times `stage`
/// `count` times inside a profiling scope. Any failure discards the samples.
pub fn execute<B: ProofBackend>(
    backend: &mut B,
    blueprint: &Blueprint,
    stage: Stage,
    count: usize,
    profile: ProfileKind,
    profiles: &dyn ProfileBackend,
) -> BenchResult<Measurement> {
    if count == 0 {
        return Err(ConfigError::InvalidCount(0).into());
    }

    let mut chain = Chain::<B>::new(blueprint);
    for &prereq in stage.prerequisites() {
        let _span = info_span!("prerequisite", stage = %prereq).entered();
        let elapsed = chain.run(backend, prereq)?;
        debug!(stage = %prereq, elapsed_ms = as_ms(elapsed), "prerequisite done");
    }

    let scope = ProfileScope::acquire(profiles, profile)?;
    let mut samples = Vec::with_capacity(count);
    for index in 0..count {
        let _span = debug_span!("repetition", stage = %stage, index).entered();
        // An error here drops `scope`, which stops the session.
        let elapsed = chain.run(backend, stage)?;
        debug!(elapsed_ms = as_ms(elapsed), "repetition done");
        samples.push(elapsed);
    }
    let profile_artifact = scope.release()?;

    let total: Duration = samples.iter().sum();
    let average = average(total, count);
    info!(
        stage = %stage,
        count,
        avg_ms = as_ms(average),
        total_ms = as_ms(total),
        "benchmark done"
    );

    Ok(Measurement {
        backend: backend.name().to_string(),
        stage,
        samples,
        total,
        average,
        constraints: chain.cs.as_ref().map(|cs| backend.num_constraints(cs)),
        profile_artifact,
    })
}

/// Artifacts carried between stages of one invocation.
struct Chain<'b, B: ProofBackend> {
    blueprint: &'b Blueprint,
    cs: Option<B::ConstraintSystem>,
    keys: Option<(B::ProvingKey, B::VerifyingKey)>,
    proof: Option<B::Proof>,
}

impl<'b, B: ProofBackend> Chain<'b, B> {
    fn new(blueprint: &'b Blueprint) -> Self {
        Chain {
            blueprint,
            cs: None,
            keys: None,
            proof: None,
        }
    }

    /// Runs `stage` once, storing its artifact. Only the backend call is
    /// measured.
    fn run(&mut self, backend: &mut B, stage: Stage) -> Result<Duration, ExecutionError> {
        let fail = move |cause: BackendError| ExecutionError::new(stage, cause);
        match stage {
            Stage::Compile => {
                let (cs, elapsed) = timed(|| backend.compile(self.blueprint));
                self.cs = Some(cs.map_err(fail)?);
                Ok(elapsed)
            }
            Stage::Setup => {
                let cs = self.cs.as_ref().ok_or_else(|| missing(stage, "constraint system"))?;
                let (keys, elapsed) = timed(|| backend.setup(cs));
                self.keys = Some(keys.map_err(fail)?);
                Ok(elapsed)
            }
            Stage::Prove => {
                let cs = self.cs.as_ref().ok_or_else(|| missing(stage, "constraint system"))?;
                let (pk, _) = self.keys.as_ref().ok_or_else(|| missing(stage, "proving key"))?;
                let (proof, elapsed) = timed(|| backend.prove(cs, pk));
                self.proof = Some(proof.map_err(fail)?);
                Ok(elapsed)
            }
            Stage::Verify => {
                let cs = self.cs.as_ref().ok_or_else(|| missing(stage, "constraint system"))?;
                let (_, vk) = self.keys.as_ref().ok_or_else(|| missing(stage, "verifying key"))?;
                let proof = self.proof.as_ref().ok_or_else(|| missing(stage, "proof"))?;
                let (ok, elapsed) = timed(|| backend.verify(cs, vk, proof));
                if !ok.map_err(fail)? {
                    return Err(fail(BackendError::ProofRejected));
                }
                Ok(elapsed)
            }
        }
    }
}

fn missing(stage: Stage, artifact: &str) -> ExecutionError {
    ExecutionError::new(
        stage,
        BackendError::Message(format!("no {artifact} available for {stage}")),
    )
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

/// `total / count` at nanosecond resolution.
pub fn average(total: Duration, count: usize) -> Duration {
    if count == 0 {
        return Duration::ZERO;
    }
    let nanos = total.as_nanos() / count as u128;
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

pub fn as_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1e3
}
