// src/ontology/mod.rs
//! Ontology accessor: load an OWL/RDF document once, then resolve term ids
//! to rendered attributes and labels.
//!
//! The loaded [`Ontology`] is immutable. Callers pass it by reference into
//! every lookup; there is no process-wide instance.

pub mod attributes;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use oxrdf::{Term, Triple};
use oxrdfxml::RdfXmlParser;
use oxttl::{NTriplesParser, TurtleParser};
use tracing::{debug, info};

pub use attributes::{Attribute, AttributeSet};
use attributes::RDFS_LABEL;

const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    #[error("ontology file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read ontology `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse ontology `{origin}`: {message}")]
    Parse { origin: String, message: String },
    #[error("term `{term_id}` not found in namespace `{namespace}`")]
    TermNotFound { term_id: String, namespace: String },
    #[error("term `{term_id}` has no label")]
    NoLabel { term_id: String },
    #[error("unknown ontology attribute `{name}`")]
    UnknownAttribute { name: String },
}

/// Serialization the document is parsed with. Picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OntologyFormat {
    RdfXml,
    NTriples,
    Turtle,
}

impl OntologyFormat {
    /// `.nt` and `.ttl` are recognised; everything else (`.owl`, `.rdf`, ...) is RDF/XML.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "nt" => Self::NTriples,
            "ttl" => Self::Turtle,
            _ => Self::RdfXml,
        }
    }
}

/// A stored object value of an annotation/property assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Literal { value: String, datatype: String },
    Iri(String),
}

impl Value {
    /// Plain text of the value (literal lexical form or full IRI).
    pub fn as_str(&self) -> &str {
        match self {
            Value::Literal { value, .. } => value,
            Value::Iri(iri) => iri,
        }
    }

    /// Element form used inside a rendered list literal.
    fn render(&self) -> String {
        match self {
            Value::Iri(iri) => local_name(iri).to_string(),
            Value::Literal { value, datatype } => match datatype.strip_prefix(XSD) {
                Some("boolean") => {
                    if value == "true" || value == "1" {
                        "True".to_string()
                    } else {
                        "False".to_string()
                    }
                }
                Some(
                    "integer" | "int" | "long" | "short" | "decimal" | "double" | "float"
                    | "nonNegativeInteger" | "positiveInteger",
                ) => value.clone(),
                _ => quote(value),
            },
        }
    }
}

#[derive(Debug, Default)]
struct TermRecord {
    props: HashMap<String, Vec<Value>>,
}

/// Loaded ontology: subject IRI → predicate IRI → values in document order.
#[derive(Debug, Default)]
pub struct Ontology {
    terms: HashMap<String, TermRecord>,
    triples: usize,
}

impl Ontology {
    /// Parse an ontology file. Logs how long the load took.
    pub fn load(path: &Path) -> Result<Self, OntologyError> {
        info!("Loading ontology...");
        let started = Instant::now();

        let file = File::open(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                OntologyError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                OntologyError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let format = OntologyFormat::from_path(path);
        let ontology = Self::parse(
            BufReader::new(file),
            format,
            &path.display().to_string(),
        )?;

        info!(
            terms = ontology.terms.len(),
            triples = ontology.triples,
            "Ontology loaded in {:.2} seconds",
            started.elapsed().as_secs_f64()
        );
        Ok(ontology)
    }

    /// Parse from any reader (in-memory documents, tests).
    pub fn from_reader<R: Read>(reader: R, format: OntologyFormat) -> Result<Self, OntologyError> {
        Self::parse(reader, format, "<reader>")
    }

    fn parse<R: Read>(reader: R, format: OntologyFormat, origin: &str) -> Result<Self, OntologyError> {
        let mut ontology = Ontology::default();
        match format {
            OntologyFormat::RdfXml => {
                ontology.collect(RdfXmlParser::new().for_reader(reader), origin)?
            }
            OntologyFormat::NTriples => {
                ontology.collect(NTriplesParser::new().for_reader(reader), origin)?
            }
            OntologyFormat::Turtle => {
                ontology.collect(TurtleParser::new().for_reader(reader), origin)?
            }
        }
        debug!(origin, triples = ontology.triples, "ontology parsed");
        Ok(ontology)
    }

    fn collect<I, E>(&mut self, triples: I, origin: &str) -> Result<(), OntologyError>
    where
        I: Iterator<Item = Result<Triple, E>>,
        E: std::fmt::Display,
    {
        for triple in triples {
            let triple = triple.map_err(|e| OntologyError::Parse {
                origin: origin.to_string(),
                message: e.to_string(),
            })?;
            self.triples += 1;

            // Blank-node subjects (restrictions, axioms) are not addressable terms.
            let subject = match Term::from(triple.subject) {
                Term::NamedNode(n) => n.into_string(),
                _ => continue,
            };
            let value = match triple.object {
                Term::NamedNode(n) => Some(Value::Iri(n.into_string())),
                Term::Literal(l) => Some(Value::Literal {
                    value: l.value().to_string(),
                    datatype: l.datatype().as_str().to_string(),
                }),
                _ => None,
            };

            let record = self.terms.entry(subject).or_default();
            let values = record
                .props
                .entry(triple.predicate.into_string())
                .or_default();
            if let Some(v) = value {
                values.push(v);
            }
        }
        Ok(())
    }

    /// Number of named subjects.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    fn lookup(&self, term_id: &str, namespace: &str) -> Result<&TermRecord, OntologyError> {
        let iri = format!("{namespace}{term_id}");
        self.terms
            .get(&iri)
            .ok_or_else(|| OntologyError::TermNotFound {
                term_id: term_id.to_string(),
                namespace: namespace.to_string(),
            })
    }

    /// All stored values of one predicate for a term (empty when unset).
    pub fn values(
        &self,
        term_id: &str,
        namespace: &str,
        predicate: &str,
    ) -> Result<&[Value], OntologyError> {
        let record = self.lookup(term_id, namespace)?;
        Ok(record
            .props
            .get(predicate)
            .map(|v| v.as_slice())
            .unwrap_or(&[]))
    }

    /// One `  <attribute>: <values>` line per attribute, in `attributes` order.
    pub fn render(
        &self,
        term_id: &str,
        namespace: &str,
        attributes: &AttributeSet,
    ) -> Result<String, OntologyError> {
        let record = self.lookup(term_id, namespace)?;
        let mut out = String::new();
        for attr in attributes.iter() {
            let values = record
                .props
                .get(&attr.predicate)
                .map(|v| v.as_slice())
                .unwrap_or(&[]);
            out.push_str("  ");
            out.push_str(&attr.name);
            out.push_str(": ");
            out.push_str(&render_list(values));
            out.push('\n');
        }
        Ok(out)
    }

    /// First `rdfs:label` value of the term.
    pub fn label_of(&self, term_id: &str, namespace: &str) -> Result<String, OntologyError> {
        self.values(term_id, namespace, RDFS_LABEL)?
            .first()
            .map(|v| v.as_str().to_string())
            .ok_or_else(|| OntologyError::NoLabel {
                term_id: term_id.to_string(),
            })
    }
}

fn render_list(values: &[Value]) -> String {
    let items: Vec<String> = values.iter().map(Value::render).collect();
    format!("[{}]", items.join(", "))
}

fn local_name(iri: &str) -> &str {
    iri.rsplit(['#', '/']).next().unwrap_or(iri)
}

/// Quote a string as a list-literal element: single quotes unless the text
/// contains `'` and no `"`.
fn quote(s: &str) -> String {
    let q = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(q);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == q => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(q);
    out
}
