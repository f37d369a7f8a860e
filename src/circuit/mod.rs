//! Circuit registry.
//!
//! Circuits are registered once into a [`CircuitRegistry`] which is then
//! shared by reference with the validator and the executor.

pub mod blueprint;
pub mod cubic;
pub mod expo;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::ConfigError;

pub use blueprint::{Blueprint, BlueprintBuilder, BlueprintCircuit, Op, Wire};
pub use cubic::CubicCircuit;
pub use expo::ExpoCircuit;

/// Constructor capability for one benchmark circuit.
pub trait BenchCircuit: Send + Sync {
    /// Registry key (e.g., "expo").
    fn name(&self) -> &str;

    /// Builds the circuit for the given size parameter, witness included.
    fn construct(&self, size: usize) -> Blueprint;
}

#[derive(Clone, Default)]
pub struct CircuitRegistry {
    circuits: BTreeMap<String, Arc<dyn BenchCircuit>>,
}

impl CircuitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in circuits.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ExpoCircuit);
        registry.register(CubicCircuit);
        registry
    }

    /// Adds a circuit. A circuit with the same name is replaced.
    pub fn register(&mut self, circuit: impl BenchCircuit + 'static) {
        let name = circuit.name().to_string();
        if self.circuits.insert(name.clone(), Arc::new(circuit)).is_some() {
            debug!(circuit = %name, "replaced registered circuit");
        }
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn BenchCircuit>, ConfigError> {
        self.circuits
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownCircuit {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.circuits.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.circuits.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tiny;

    impl BenchCircuit for Tiny {
        fn name(&self) -> &str {
            "tiny"
        }

        fn construct(&self, size: usize) -> Blueprint {
            let mut b = BlueprintBuilder::new("tiny");
            let x = b.secret(size as u64);
            b.output(x);
            b.build()
        }
    }

    #[test]
    fn test_defaults_registered() {
        let registry = CircuitRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["cubic", "expo"]);
        assert!(registry.resolve("expo").is_ok());
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = CircuitRegistry::with_defaults();
        let err = registry.resolve("bogus").err().unwrap();
        assert!(matches!(err, ConfigError::UnknownCircuit { .. }));
        assert!(err.to_string().contains("expo"));
    }

    #[test]
    fn test_register_custom() {
        let mut registry = CircuitRegistry::new();
        registry.register(Tiny);
        let circuit = registry.resolve("tiny").unwrap();
        assert_eq!(circuit.construct(7).ops().len(), 2);
    }
}
