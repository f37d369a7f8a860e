use super::{BenchCircuit, Blueprint, BlueprintBuilder};

/// Base used for the secret input of [`ExpoCircuit`].
pub const EXPO_BASE: u64 = 2;

/// Proves knowledge of `x` such that `x^(2^size) == y`, with `y` public.
///
/// Each round squares the running value, so the circuit has exactly `size`
/// multiplication constraints plus one for the public output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpoCircuit;

impl BenchCircuit for ExpoCircuit {
    fn name(&self) -> &str {
        "expo"
    }

    fn construct(&self, size: usize) -> Blueprint {
        let mut b = BlueprintBuilder::new(self.name());
        let mut x = b.secret(EXPO_BASE);
        for _ in 0..size {
            x = b.mul(x, x);
        }
        b.output(x);
        b.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::Field;

    #[test]
    fn test_expo_constraint_count() {
        assert_eq!(ExpoCircuit.construct(10).num_constraints(), 11);
    }

    #[test]
    fn test_expo_output_value() {
        // 2^(2^5) = 2^32
        let public = ExpoCircuit.construct(5).public_inputs::<Fr>();
        assert_eq!(public, vec![Fr::from(EXPO_BASE).pow([32u64])]);
    }
}
