// src/samples.rs
//! Sample collection: a JSON array of records, each carrying an `accession`.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("sample file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read sample file `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid sample JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("sample collection must be a JSON array")]
    NotAnArray,
    #[error("sample #{index} is not a JSON object")]
    NotAnObject { index: usize },
    #[error("sample #{index} has no string `accession`")]
    MissingAccession { index: usize },
}

/// One sample record. The full record (key order preserved) goes into prompts.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub accession: String,
    pub record: Map<String, Value>,
}

impl Sample {
    pub fn from_value(index: usize, value: Value) -> Result<Self, SampleError> {
        let Value::Object(record) = value else {
            return Err(SampleError::NotAnObject { index });
        };
        let accession = record
            .get("accession")
            .and_then(Value::as_str)
            .ok_or(SampleError::MissingAccession { index })?
            .to_string();
        Ok(Self { accession, record })
    }

    /// Record as JSON with 4-space indentation.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        use serde::Serialize;

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.record.serialize(&mut ser)?;
        // serde_json only ever writes valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

pub fn load_samples(path: &Path) -> Result<Vec<Sample>, SampleError> {
    let data = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SampleError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            SampleError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse_samples(&data)
}

pub fn parse_samples(s: &str) -> Result<Vec<Sample>, SampleError> {
    let Value::Array(items) = serde_json::from_str::<Value>(s)? else {
        return Err(SampleError::NotAnArray);
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, v)| Sample::from_value(i, v))
        .collect()
}
