use super::{BenchCircuit, Blueprint, BlueprintBuilder};

/// Iterates `x <- x^3 + x + 5` `size` times from a secret seed and exposes
/// the final value. Two multiplication constraints per round.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubicCircuit;

const SEED: u64 = 3;
const OFFSET: u64 = 5;

impl BenchCircuit for CubicCircuit {
    fn name(&self) -> &str {
        "cubic"
    }

    fn construct(&self, size: usize) -> Blueprint {
        let mut b = BlueprintBuilder::new(self.name());
        let five = b.constant(OFFSET);
        let mut x = b.secret(SEED);
        for _ in 0..size {
            let x2 = b.mul(x, x);
            let x3 = b.mul(x2, x);
            let t = b.add(x3, x);
            x = b.add(t, five);
        }
        b.output(x);
        b.build()
    }
}
