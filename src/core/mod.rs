//! Core record types for zk-bench.
//!
//! This module contains the canonical `BenchRecord` schema (v1) written by
//! `--json` and `--jsonl`.

pub mod env;
pub mod schema;

// Re-export key types for convenience
pub use env::EnvironmentInfo;
pub use schema::{BackendInfo, BenchRecord, SCHEMA_VERSION, TimingStat};
