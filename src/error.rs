// src/error.rs
//! Top-level error for an evaluation run and its process exit code.

use crate::config::ConfigError;
use crate::judge::JudgeError;
use crate::mapping::MappingError;
use crate::ontology::OntologyError;
use crate::samples::SampleError;

/// Exit code when an input file is missing.
pub const EXIT_INPUT_NOT_FOUND: i32 = 1;
/// Exit code for every other failure.
pub const EXIT_FAILURE: i32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ontology(#[from] OntologyError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Samples(#[from] SampleError),
    #[error("judging sample `{accession}` against term `{term_id}`: {source}")]
    Judgment {
        accession: String,
        term_id: String,
        source: JudgeError,
    },
    #[error(transparent)]
    Judge(#[from] JudgeError),
    #[error("sample `{accession}` is not present in the mapping index")]
    SampleNotMapped { accession: String },
    #[error("mapping index references sample `{accession}`, which is not in the sample collection")]
    UnknownSample { accession: String },
    #[error("failed to serialize sample `{accession}`: {source}")]
    Serialize {
        accession: String,
        source: serde_json::Error,
    },
    #[error("failed to write evaluation output: {0}")]
    Output(#[from] std::io::Error),
}

impl EvalError {
    pub fn is_input_not_found(&self) -> bool {
        matches!(
            self,
            EvalError::Config(ConfigError::NotFound { .. })
                | EvalError::Ontology(OntologyError::NotFound { .. })
                | EvalError::Mapping(MappingError::NotFound { .. })
                | EvalError::Samples(SampleError::NotFound { .. })
        )
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_input_not_found() {
            EXIT_INPUT_NOT_FOUND
        } else {
            EXIT_FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_inputs_map_to_exit_one() {
        let e: EvalError = MappingError::NotFound {
            path: PathBuf::from("m.tsv"),
        }
        .into();
        assert_eq!(e.exit_code(), EXIT_INPUT_NOT_FOUND);

        let e: EvalError = OntologyError::NoLabel {
            term_id: "T1".into(),
        }
        .into();
        assert_eq!(e.exit_code(), EXIT_FAILURE);

        let e = EvalError::SampleNotMapped {
            accession: "S1".into(),
        };
        assert_eq!(e.exit_code(), EXIT_FAILURE);
    }
}
