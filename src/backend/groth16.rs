//! Groth16 over arkworks, generic over the pairing curve.

use std::marker::PhantomData;
use std::sync::Arc;

use ark_ec::pairing::Pairing;
use ark_ff::PrimeField;
use ark_groth16::{Groth16, Proof, ProvingKey, VerifyingKey};
use ark_relations::r1cs::{
    ConstraintMatrices, ConstraintSynthesizer, ConstraintSystem, OptimizationGoal,
};
use ark_snark::SNARK;
use ark_std::UniformRand;
use ark_std::rand::SeedableRng;
use ark_std::rand::rngs::StdRng;
use tracing::debug;

use crate::circuit::{Blueprint, BlueprintCircuit};

use super::traits::{BackendError, ProofBackend};

/// Seed used when none is given, so repeated runs do identical work.
pub const DEFAULT_SEED: u64 = 0x5eed;

/// Output of the compile stage: the R1CS matrices and the full variable
/// assignment, so prove never synthesizes again.
///
/// `circuit` is kept for setup only; arkworks has no key generation that
/// takes prebuilt matrices.
pub struct CompiledCircuit<F: PrimeField> {
    pub circuit: BlueprintCircuit<F>,
    pub matrices: ConstraintMatrices<F>,
    /// Instance variables (leading `1` included) followed by witness variables
    pub assignment: Vec<F>,
    pub public_inputs: Vec<F>,
}

pub struct Groth16Backend<E: Pairing> {
    rng: StdRng,
    _curve: PhantomData<E>,
}

impl<E: Pairing> Groth16Backend<E> {
    pub fn new(seed: u64) -> Self {
        Groth16Backend {
            rng: StdRng::seed_from_u64(seed),
            _curve: PhantomData,
        }
    }
}

impl<E: Pairing> Default for Groth16Backend<E> {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl<E: Pairing> ProofBackend for Groth16Backend<E> {
    type ConstraintSystem = CompiledCircuit<E::ScalarField>;
    type ProvingKey = ProvingKey<E>;
    type VerifyingKey = VerifyingKey<E>;
    type Proof = Proof<E>;

    fn name(&self) -> &str {
        "groth16"
    }

    fn compile(&mut self, blueprint: &Blueprint) -> Result<Self::ConstraintSystem, BackendError> {
        let circuit = BlueprintCircuit::<E::ScalarField>::new(Arc::new(blueprint.clone()));
        let cs = ConstraintSystem::<E::ScalarField>::new_ref();
        cs.set_optimization_goal(OptimizationGoal::Constraints);
        circuit.clone().generate_constraints(cs.clone())?;
        cs.finalize();
        let matrices = cs
            .to_matrices()
            .ok_or_else(|| BackendError::Message("constraint matrices were not constructed".into()))?;
        let (assignment, public_inputs) = {
            let system = cs
                .borrow()
                .ok_or_else(|| BackendError::Message("constraint system was released".into()))?;
            let assignment = [
                system.instance_assignment.as_slice(),
                system.witness_assignment.as_slice(),
            ]
            .concat();
            let public = system.instance_assignment.get(1..).unwrap_or_default().to_vec();
            (assignment, public)
        };
        debug!(
            constraints = matrices.num_constraints,
            instance = matrices.num_instance_variables,
            witness = matrices.num_witness_variables,
            "compiled circuit"
        );
        Ok(CompiledCircuit {
            circuit,
            matrices,
            assignment,
            public_inputs,
        })
    }

    fn num_constraints(&self, cs: &Self::ConstraintSystem) -> usize {
        cs.matrices.num_constraints
    }

    fn setup(
        &mut self,
        cs: &Self::ConstraintSystem,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey), BackendError> {
        let keys = Groth16::<E>::circuit_specific_setup(cs.circuit.clone(), &mut self.rng)?;
        Ok(keys)
    }

    fn prove(
        &mut self,
        cs: &Self::ConstraintSystem,
        pk: &Self::ProvingKey,
    ) -> Result<Self::Proof, BackendError> {
        let r = E::ScalarField::rand(&mut self.rng);
        let s = E::ScalarField::rand(&mut self.rng);
        let proof = Groth16::<E>::create_proof_with_reduction_and_matrices(
            pk,
            r,
            s,
            &cs.matrices,
            cs.matrices.num_instance_variables,
            cs.matrices.num_constraints,
            &cs.assignment,
        )?;
        Ok(proof)
    }

    fn verify(
        &mut self,
        cs: &Self::ConstraintSystem,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
    ) -> Result<bool, BackendError> {
        let ok = Groth16::<E>::verify(vk, &cs.public_inputs, proof)?;
        Ok(ok)
    }
}
