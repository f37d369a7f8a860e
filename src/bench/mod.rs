pub mod config;

pub use config::{ParamOverrides, load_suite, parse_suite};
