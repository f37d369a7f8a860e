//! Field-agnostic circuit description.
//!
//! A [`Blueprint`] is a straight-line arithmetic program. Circuits build one
//! with [`BlueprintBuilder`] and never see a concrete field; the proof backend
//! instantiates it over a curve's scalar field through [`BlueprintCircuit`],
//! which both synthesizes the R1CS and assigns the witness.

use std::marker::PhantomData;
use std::sync::Arc;

use ark_ff::PrimeField;
use ark_relations::lc;
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystemRef, LinearCombination, SynthesisError, Variable,
};

/// Handle to a value produced by an earlier [`Op`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wire(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Private witness input.
    Secret(u64),
    Constant(u64),
    Add(Wire, Wire),
    /// One multiplication constraint.
    Mul(Wire, Wire),
    /// Exposes the wire as a public input and constrains it.
    Output(Wire),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    name: String,
    ops: Vec<Op>,
}

impl Blueprint {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Number of multiplication and output constraints the R1CS will have.
    pub fn num_constraints(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Mul(..) | Op::Output(_)))
            .count()
    }

    /// Evaluates every op over `F`, one value per op. `Output` ops repeat the
    /// value they expose.
    pub fn evaluate<F: PrimeField>(&self) -> Vec<F> {
        let mut values: Vec<F> = Vec::with_capacity(self.ops.len());
        for op in &self.ops {
            let v = match *op {
                Op::Secret(x) | Op::Constant(x) => F::from(x),
                Op::Add(a, b) => values[a.0] + values[b.0],
                Op::Mul(a, b) => values[a.0] * values[b.0],
                Op::Output(w) => values[w.0],
            };
            values.push(v);
        }
        values
    }

    /// Public inputs in allocation order, as the verifier expects them.
    pub fn public_inputs<F: PrimeField>(&self) -> Vec<F> {
        let values = self.evaluate::<F>();
        self.ops
            .iter()
            .zip(values)
            .filter_map(|(op, v)| matches!(op, Op::Output(_)).then_some(v))
            .collect()
    }
}

/// Append-only builder. Wires can only refer to ops already pushed, so every
/// finished blueprint is well formed.
#[derive(Debug)]
pub struct BlueprintBuilder {
    name: String,
    ops: Vec<Op>,
}

impl BlueprintBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        BlueprintBuilder {
            name: name.into(),
            ops: Vec::new(),
        }
    }

    fn push(&mut self, op: Op) -> Wire {
        self.ops.push(op);
        Wire(self.ops.len() - 1)
    }

    pub fn secret(&mut self, value: u64) -> Wire {
        self.push(Op::Secret(value))
    }

    pub fn constant(&mut self, value: u64) -> Wire {
        self.push(Op::Constant(value))
    }

    pub fn add(&mut self, a: Wire, b: Wire) -> Wire {
        self.push(Op::Add(a, b))
    }

    pub fn mul(&mut self, a: Wire, b: Wire) -> Wire {
        self.push(Op::Mul(a, b))
    }

    pub fn output(&mut self, w: Wire) {
        self.push(Op::Output(w));
    }

    pub fn build(self) -> Blueprint {
        Blueprint {
            name: self.name,
            ops: self.ops,
        }
    }
}

/// A blueprint bound to the scalar field `F`.
pub struct BlueprintCircuit<F: PrimeField> {
    blueprint: Arc<Blueprint>,
    _field: PhantomData<F>,
}

impl<F: PrimeField> BlueprintCircuit<F> {
    pub fn new(blueprint: Arc<Blueprint>) -> Self {
        BlueprintCircuit {
            blueprint,
            _field: PhantomData,
        }
    }

    pub fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }
}

impl<F: PrimeField> Clone for BlueprintCircuit<F> {
    fn clone(&self) -> Self {
        BlueprintCircuit::new(self.blueprint.clone())
    }
}

impl<F: PrimeField> ConstraintSynthesizer<F> for BlueprintCircuit<F> {
    fn generate_constraints(self, cs: ConstraintSystemRef<F>) -> Result<(), SynthesisError> {
        let values = self.blueprint.evaluate::<F>();
        let mut lcs: Vec<LinearCombination<F>> = Vec::with_capacity(values.len());

        for (op, value) in self.blueprint.ops().iter().zip(values.iter().copied()) {
            let lc = match *op {
                Op::Secret(_) => {
                    let var = cs.new_witness_variable(|| Ok(value))?;
                    lc!() + var
                }
                Op::Constant(_) => lc!() + (value, Variable::One),
                Op::Add(a, b) => lcs[a.0].clone() + &lcs[b.0],
                Op::Mul(a, b) => {
                    let var = cs.new_witness_variable(|| Ok(value))?;
                    cs.enforce_constraint(lcs[a.0].clone(), lcs[b.0].clone(), lc!() + var)?;
                    lc!() + var
                }
                Op::Output(w) => {
                    let var = cs.new_input_variable(|| Ok(value))?;
                    cs.enforce_constraint(lcs[w.0].clone(), lc!() + Variable::One, lc!() + var)?;
                    lc!() + var
                }
            };
            lcs.push(lc);
        }
        Ok(())
    }
}
