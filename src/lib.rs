// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod config;
pub mod error;
pub mod evaluate;
pub mod judge;
pub mod mapping;
pub mod ontology;
pub mod prompt;
pub mod samples;

// Result flattening for selection-stage output (`select_to_tsv` binary)
pub mod select;

// ---- Re-exports for stable public API ----
pub use crate::config::EvalConfig;
pub use crate::error::EvalError;
pub use crate::evaluate::{run, EvalContext, EvaluationRecord, RunOptions, RunSummary};
pub use crate::judge::{FixedJudge, HttpJudge, HttpJudgeOptions, Judge, Judgment};
pub use crate::mapping::MappingIndex;
pub use crate::ontology::{AttributeSet, Ontology};
pub use crate::samples::Sample;
