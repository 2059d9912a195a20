// src/ontology/attributes.rs
//! Attribute registry: configured attribute names → ontology predicates.
//!
//! Names are resolved once at startup so a typo in `props_for_dump` fails
//! before any sample is evaluated instead of rendering an empty line.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::OntologyError;

pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const OBO_IN_OWL: &str = "http://www.geneontology.org/formats/oboInOwl#";
pub const OBO: &str = "http://purl.obolibrary.org/obo/";

pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// Known attribute names and the predicate IRI each one reads.
static REGISTRY: Lazy<HashMap<&'static str, String>> = Lazy::new(|| {
    let mut m = HashMap::new();
    // rdfs
    m.insert("label", format!("{RDFS}label"));
    m.insert("comment", format!("{RDFS}comment"));
    m.insert("seeAlso", format!("{RDFS}seeAlso"));
    // oboInOwl
    for name in [
        "hasExactSynonym",
        "hasRelatedSynonym",
        "hasNarrowSynonym",
        "hasBroadSynonym",
        "hasDbXref",
        "inSubset",
        "hasOBONamespace",
        "id",
    ] {
        m.insert(name, format!("{OBO_IN_OWL}{name}"));
    }
    // definition (IAO) + friendly alias
    m.insert("IAO_0000115", format!("{OBO}IAO_0000115"));
    m.insert("definition", format!("{OBO}IAO_0000115"));
    // owl
    m.insert("deprecated", format!("{OWL}deprecated"));
    m
});

/// One configured attribute: the name as written in config + its predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub predicate: String,
}

/// Ordered, validated list of attributes to render for a term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    attrs: Vec<Attribute>,
}

impl AttributeSet {
    /// Resolve configured names in order. The first unknown name is an error.
    pub fn resolve<S: AsRef<str>>(names: &[S]) -> Result<Self, OntologyError> {
        let mut attrs = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let predicate = REGISTRY
                .get(name)
                .ok_or_else(|| OntologyError::UnknownAttribute {
                    name: name.to_string(),
                })?;
            attrs.push(Attribute {
                name: name.to_string(),
                predicate: predicate.clone(),
            });
        }
        Ok(Self { attrs })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

/// Names accepted by [`AttributeSet::resolve`], sorted (for error hints).
pub fn known_attribute_names() -> Vec<&'static str> {
    let mut v: Vec<&'static str> = REGISTRY.keys().copied().collect();
    v.sort_unstable();
    v
}
