//! Mock backend for testing.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use crate::circuit::Blueprint;
use crate::config::Stage;

use super::traits::{BackendError, ProofBackend};

/// Configuration for mock backend responses.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Time each stage sleeps before returning
    pub delays: HashMap<Stage, Duration>,
    /// Stage that fails, and on which call (1-based)
    pub fail_on: Option<(Stage, usize)>,
    /// Whether verify reports `false`
    pub rejects_proofs: bool,
}

impl MockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `stage` take `delay`.
    pub fn with_delay(mut self, stage: Stage, delay: Duration) -> Self {
        self.delays.insert(stage, delay);
        self
    }

    /// Make the `call`-th invocation of `stage` fail.
    pub fn fail_on(mut self, stage: Stage, call: usize) -> Self {
        self.fail_on = Some((stage, call));
        self
    }

    /// Make verify return `false`.
    pub fn rejects_proofs(mut self) -> Self {
        self.rejects_proofs = true;
        self
    }
}

/// Backend whose stages only sleep and count calls.
///
/// The compiled system is the blueprint's constraint count, keys are unit
/// values, and a proof is the call number of the prove that made it.
#[derive(Debug, Default)]
pub struct MockBackend {
    config: MockConfig,
    calls: HashMap<Stage, usize>,
}

impl MockBackend {
    pub fn new(config: MockConfig) -> Self {
        MockBackend {
            config,
            calls: HashMap::new(),
        }
    }

    /// How many times `stage` has been invoked.
    pub fn calls(&self, stage: Stage) -> usize {
        self.calls.get(&stage).copied().unwrap_or(0)
    }

    fn enter(&mut self, stage: Stage) -> Result<usize, BackendError> {
        let call = {
            let n = self.calls.entry(stage).or_insert(0);
            *n += 1;
            *n
        };
        if let Some(delay) = self.config.delays.get(&stage) {
            thread::sleep(*delay);
        }
        if self.config.fail_on == Some((stage, call)) {
            return Err(BackendError::Message(format!("mock {stage} failed on call {call}")));
        }
        Ok(call)
    }
}

impl ProofBackend for MockBackend {
    type ConstraintSystem = usize;
    type ProvingKey = ();
    type VerifyingKey = ();
    type Proof = usize;

    fn name(&self) -> &str {
        "mock"
    }

    fn compile(&mut self, blueprint: &Blueprint) -> Result<usize, BackendError> {
        self.enter(Stage::Compile)?;
        Ok(blueprint.num_constraints())
    }

    fn num_constraints(&self, cs: &usize) -> usize {
        *cs
    }

    fn setup(&mut self, _cs: &usize) -> Result<((), ()), BackendError> {
        self.enter(Stage::Setup)?;
        Ok(((), ()))
    }

    fn prove(&mut self, _cs: &usize, _pk: &()) -> Result<usize, BackendError> {
        self.enter(Stage::Prove)
    }

    fn verify(&mut self, _cs: &usize, _vk: &(), _proof: &usize) -> Result<bool, BackendError> {
        self.enter(Stage::Verify)?;
        Ok(!self.config.rejects_proofs)
    }
}
