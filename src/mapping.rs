// src/mapping.rs
//! Mapping index: `<sample-id>\t<term-id>` rows grouped by sample id.
//!
//! Candidate order is row order. An empty term-id is kept as-is; it stands for
//! the "sample maps to no term" hypothesis.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("mapping file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read mapping file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("malformed mapping row at line {line}: expected `<sample-id>\\t<term-id>`, got {content:?}")]
    MalformedRow { line: usize, content: String },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MappingIndex {
    entries: HashMap<String, Vec<String>>,
    order: Vec<String>,
}

impl MappingIndex {
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let file = File::open(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                MappingError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                MappingError::Io { source }
            }
        })?;
        let index = Self::parse(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            samples = index.len(),
            candidates = index.total_candidates(),
            "mapping index loaded"
        );
        Ok(index)
    }

    /// Parse TSV rows. Any malformed row fails the whole parse.
    pub fn parse<R: Read>(reader: R) -> Result<Self, MappingError> {
        let mut index = MappingIndex::default();
        for (i, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            // Tabs are significant: `S1\t` carries an empty term id.
            let row = line.trim_matches(|c| matches!(c, ' ' | '\r' | '\n'));
            let mut fields = row.split('\t');
            let (Some(sample_id), Some(term_id)) = (fields.next(), fields.next()) else {
                return Err(MappingError::MalformedRow {
                    line: i + 1,
                    content: line.clone(),
                });
            };
            index.push(sample_id, term_id);
        }
        Ok(index)
    }

    fn push(&mut self, sample_id: &str, term_id: &str) {
        match self.entries.get_mut(sample_id) {
            Some(terms) => terms.push(term_id.to_string()),
            None => {
                self.order.push(sample_id.to_string());
                self.entries
                    .insert(sample_id.to_string(), vec![term_id.to_string()]);
            }
        }
    }

    /// Candidate term ids for a sample, in file order.
    pub fn candidates(&self, sample_id: &str) -> Option<&[String]> {
        self.entries.get(sample_id).map(|v| v.as_slice())
    }

    /// Sample ids in first-seen order.
    pub fn sample_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn total_candidates(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_rows_in_encounter_order() {
        let idx = MappingIndex::parse("S1\tT1\nS1\t\nS2\tT9\n".as_bytes()).unwrap();
        assert_eq!(idx.candidates("S1").unwrap(), ["T1", ""]);
        assert_eq!(idx.candidates("S2").unwrap(), ["T9"]);
        assert_eq!(idx.sample_ids().collect::<Vec<_>>(), vec!["S1", "S2"]);
        assert_eq!(idx.total_candidates(), 3);
    }

    #[test]
    fn duplicates_are_kept() {
        let idx = MappingIndex::parse("S1\tT1\nS2\tT2\nS1\tT1\n".as_bytes()).unwrap();
        assert_eq!(idx.candidates("S1").unwrap(), ["T1", "T1"]);
        assert_eq!(idx.len(), 2);
    }

    #[test]
    fn crlf_and_trailing_spaces_are_stripped() {
        let idx = MappingIndex::parse("S1\tT1  \r\nS1\t\r\n".as_bytes()).unwrap();
        assert_eq!(idx.candidates("S1").unwrap(), ["T1", ""]);
    }

    #[test]
    fn extra_columns_ignored() {
        let idx = MappingIndex::parse("S1\tT1\tbrain\nS2\tT2\n".as_bytes()).unwrap();
        assert_eq!(idx.candidates("S1").unwrap(), ["T1"]);
        assert_eq!(idx.candidates("S2").unwrap(), ["T2"]);
    }

    #[test]
    fn blank_and_space_only_lines_are_malformed() {
        for input in ["S1\tT1\n\nS2\tT2\n", "S1\tT1\n   \nS2\tT2\n"] {
            match MappingIndex::parse(input.as_bytes()) {
                Err(MappingError::MalformedRow { line, .. }) => assert_eq!(line, 2),
                other => panic!("unexpected result for {input:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn single_trailing_newline_is_not_a_row() {
        let idx = MappingIndex::parse("S1\tT1\n".as_bytes()).unwrap();
        assert_eq!(idx.total_candidates(), 1);
    }

    #[test]
    fn single_column_row_is_malformed() {
        let err = MappingIndex::parse("S1\tT1\nS2\nS3\tT3\n".as_bytes()).unwrap_err();
        match err {
            MappingError::MalformedRow { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "S2");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_sample_has_no_candidates() {
        let idx = MappingIndex::parse("S1\tT1\n".as_bytes()).unwrap();
        assert!(idx.candidates("S404").is_none());
    }

    #[test]
    fn load_missing_file() {
        let err = MappingIndex::load(Path::new("/no/such/mapping.tsv")).unwrap_err();
        assert!(matches!(err, MappingError::NotFound { .. }));
    }
}
