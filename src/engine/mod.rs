//! Benchmark engine.
//!
//! The [`Executor`] turns a validated `BenchmarkConfig` into a [`Measurement`]:
//! it builds the circuit, runs the untimed prerequisite stages, then times the
//! requested stage inside a profiling scope.

pub mod executor;

pub use executor::{ExecutionError, Executor, Measurement, as_ms, average, execute};
