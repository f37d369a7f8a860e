//! Storage layer for benchmark records.

pub mod jsonl;

// Re-export key types
pub use jsonl::{JsonlWriter, write_json};
