//! Proof-system backends.
//!
//! The `ProofBackend` trait exposes the compile, setup, prove and verify
//! stages over one curve; `Groth16Backend` implements it with arkworks.

pub mod groth16;
pub mod mock;
pub mod traits;

// Re-export key types
pub use groth16::{CompiledCircuit, DEFAULT_SEED, Groth16Backend};
pub use mock::{MockBackend, MockConfig};
pub use traits::{BackendError, ProofBackend};
