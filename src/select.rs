// src/select.rs
//! Flatten a selection-stage result file into `accession / extracted / term id / label` rows.
//!
//! Input is a JSON array of samples shaped like
//! `{"accession": .., "results": {<attr>: {<extracted>: {"term_id": .., "label": ..}}}, "extract_output": {<attr>: ..}}`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid selection JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("selection result must be a JSON array")]
    NotAnArray,
    #[error("sample #{index} is missing `{field}`")]
    MissingField { index: usize, field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectRow {
    pub accession: String,
    pub extracted: String,
    pub term_id: String,
    pub label: String,
}

impl fmt::Display for SelectRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.accession, self.extracted, self.term_id, self.label
        )
    }
}

pub fn load_select_results(path: &Path) -> Result<Value, SelectError> {
    let data = fs::read_to_string(path).map_err(|source| SelectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&data)?)
}

/// Rows for one attribute across all samples.
///
/// A sample without `attr` yields one blank row; a sample whose `attr` has no
/// extracted strings yields one row carrying the raw extract output.
///
/// Term id and label are taken from each entry alone: an entry without a
/// `term_id` gets blank columns, never the previous entry's values.
pub fn flatten_select_results(root: &Value, attr: &str) -> Result<Vec<SelectRow>, SelectError> {
    let samples = root.as_array().ok_or(SelectError::NotAnArray)?;
    let mut rows = Vec::new();
    for (index, sample) in samples.iter().enumerate() {
        let accession = sample
            .get("accession")
            .map(text_of)
            .ok_or(SelectError::MissingField {
                index,
                field: "accession",
            })?;
        let results = sample.get("results").ok_or(SelectError::MissingField {
            index,
            field: "results",
        })?;

        let Some(extracted) = results.get(attr) else {
            rows.push(SelectRow {
                accession,
                extracted: String::new(),
                term_id: String::new(),
                label: String::new(),
            });
            continue;
        };

        match extracted.as_object() {
            Some(map) if !map.is_empty() => {
                for (text, hit) in map {
                    let field = |k: &str| hit.get(k).map(text_of).unwrap_or_default();
                    let (term_id, label) = if hit.get("term_id").is_some() {
                        (field("term_id"), field("label"))
                    } else {
                        (String::new(), String::new())
                    };
                    rows.push(SelectRow {
                        accession: accession.clone(),
                        extracted: text.clone(),
                        term_id,
                        label,
                    });
                }
            }
            _ => {
                let raw = sample
                    .get("extract_output")
                    .and_then(|o| o.get(attr))
                    .map(text_of)
                    .unwrap_or_default();
                rows.push(SelectRow {
                    accession,
                    extracted: raw,
                    term_id: String::new(),
                    label: String::new(),
                });
            }
        }
    }
    Ok(rows)
}

/// Strings as-is, null as empty, anything else as compact JSON.
fn text_of(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_hits_empty_and_absent() {
        let root = json!([
            {
                "accession": "S1",
                "results": {"tissue": {
                    "brain": {"term_id": "UBERON_0000955", "label": "brain"},
                    "cortex": {}
                }},
                "extract_output": {"tissue": "brain, cortex"}
            },
            {
                "accession": "S2",
                "results": {"tissue": {}},
                "extract_output": {"tissue": "unknown tissue"}
            },
            {"accession": "S3", "results": {"cell_line": {}}}
        ]);
        let rows = flatten_select_results(&root, "tissue").unwrap();
        let lines: Vec<String> = rows.iter().map(|r| r.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "S1\tbrain\tUBERON_0000955\tbrain",
                "S1\tcortex\t\t",
                "S2\tunknown tissue\t\t",
                "S3\t\t\t",
            ]
        );
    }

    #[test]
    fn null_extract_output_is_blank() {
        let root = json!([{"accession": "S1", "results": {"tissue": {}}, "extract_output": {"tissue": null}}]);
        let rows = flatten_select_results(&root, "tissue").unwrap();
        assert_eq!(rows[0].extracted, "");
    }

    #[test]
    fn missing_results_is_error() {
        let root = json!([{"accession": "S1"}]);
        assert!(matches!(
            flatten_select_results(&root, "tissue"),
            Err(SelectError::MissingField { index: 0, field: "results" })
        ));
        assert!(matches!(
            flatten_select_results(&json!({}), "tissue"),
            Err(SelectError::NotAnArray)
        ));
    }
}
