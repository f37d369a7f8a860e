pub mod backend;
pub mod bench;
pub mod bench_cmd;
pub mod circuit;
pub mod config;
pub mod core;
pub mod curve;
pub mod engine;
pub mod profile;
pub mod storage;

use thiserror::Error;

pub use config::{BenchmarkConfig, ConfigError, ProfileKind, RawParams, Stage, validate};
pub use curve::CurveId;
pub use engine::{ExecutionError, Executor, Measurement};
pub use profile::ProfileError;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error("{0}")]
    Message(String),
}

pub type BenchResult<T> = Result<T, BenchError>;
