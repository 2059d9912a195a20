// src/prompt.rs
//! Judgment prompt rendering.
//!
//! Two configured templates, two literal placeholders. `{sample}` is replaced
//! first, then `{term}`, so a sample whose own text contains `{term}` gets
//! that occurrence substituted too. No escaping is attempted.

use crate::config::{SAMPLE_PLACEHOLDER, TERM_PLACEHOLDER};
use crate::samples::Sample;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    /// Used when a term rendering is present.
    pub mapped: String,
    /// Used for the "no term" candidate.
    pub non_mapped: String,
}

impl PromptTemplates {
    pub fn select(&self, term_rendering: &str) -> &str {
        if term_rendering.is_empty() {
            &self.non_mapped
        } else {
            &self.mapped
        }
    }
}

pub fn build_prompt(
    sample: &Sample,
    term_rendering: &str,
    templates: &PromptTemplates,
) -> Result<String, serde_json::Error> {
    let sample_json = sample.to_pretty_json()?;
    Ok(templates
        .select(term_rendering)
        .replace(SAMPLE_PLACEHOLDER, &sample_json)
        .replace(TERM_PLACEHOLDER, term_rendering))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::parse_samples;

    fn templates() -> PromptTemplates {
        PromptTemplates {
            mapped: "MAPPED\n{sample}\n--\n{term}END".to_string(),
            non_mapped: "UNMAPPED\n{sample}\n{term}END".to_string(),
        }
    }

    fn sample(json: &str) -> Sample {
        parse_samples(json).unwrap().remove(0)
    }

    #[test]
    fn non_empty_rendering_selects_mapped() {
        let s = sample(r#"[{"accession":"S1"}]"#);
        let out = build_prompt(&s, "  label: ['brain']\n", &templates()).unwrap();
        assert_eq!(
            out,
            "MAPPED\n{\n    \"accession\": \"S1\"\n}\n--\n  label: ['brain']\nEND"
        );
    }

    #[test]
    fn empty_rendering_selects_non_mapped() {
        let s = sample(r#"[{"accession":"S1","other":"x"}]"#);
        let out = build_prompt(&s, "", &templates()).unwrap();
        assert!(out.starts_with("UNMAPPED\n"));
        assert!(!out.contains("{sample}"));
        assert!(!out.contains("{term}"));
        assert!(out.ends_with("}\nEND"));
    }

    #[test]
    fn placeholder_inside_sample_is_substituted_too() {
        let s = sample(r#"[{"accession":"S1","note":"{term}"}]"#);
        let out = build_prompt(&s, "TERM", &templates()).unwrap();
        assert!(out.contains("\"note\": \"TERM\""));
    }
}
