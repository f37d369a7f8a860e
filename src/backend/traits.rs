//! Proof backend trait and its error type.

use ark_relations::r1cs::SynthesisError;
use thiserror::Error;

use crate::circuit::Blueprint;

/// Failure reported by a backend stage.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("constraint synthesis failed: {0}")]
    Synthesis(SynthesisError),
    #[error("proof was rejected by the verifier")]
    ProofRejected,
    #[error("{0}")]
    Message(String),
}

impl From<SynthesisError> for BackendError {
    fn from(err: SynthesisError) -> Self {
        BackendError::Synthesis(err)
    }
}

/// The four stages of a proof system, over one fixed curve.
///
/// Each stage consumes the artifacts produced by the stages before it; the
/// executor owns those artifacts and decides which calls are timed.
pub trait ProofBackend {
    type ConstraintSystem;
    type ProvingKey;
    type VerifyingKey;
    type Proof;

    /// Backend name for records and logs (e.g., "groth16").
    fn name(&self) -> &str;

    /// Translate a blueprint into a constraint system.
    fn compile(&mut self, blueprint: &Blueprint) -> Result<Self::ConstraintSystem, BackendError>;

    /// Number of constraints in a compiled system.
    fn num_constraints(&self, cs: &Self::ConstraintSystem) -> usize;

    /// Circuit-specific key generation.
    fn setup(
        &mut self,
        cs: &Self::ConstraintSystem,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey), BackendError>;

    /// Prove using the witness carried by the compiled system.
    fn prove(
        &mut self,
        cs: &Self::ConstraintSystem,
        pk: &Self::ProvingKey,
    ) -> Result<Self::Proof, BackendError>;

    /// Check a proof against the system's public inputs.
    fn verify(
        &mut self,
        cs: &Self::ConstraintSystem,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
    ) -> Result<bool, BackendError>;
}
