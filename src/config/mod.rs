// src/config/mod.rs
pub mod eval;

pub use eval::{ConfigError, EvalConfig, SAMPLE_PLACEHOLDER, TERM_PLACEHOLDER};
