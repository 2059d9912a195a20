// src/config/eval.rs
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::prompt::PromptTemplates;

pub const SAMPLE_PLACEHOLDER: &str = "{sample}";
pub const TERM_PLACEHOLDER: &str = "{term}";

fn default_props_for_dump() -> Vec<String> {
    vec!["label".to_string()]
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read config `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Evaluation settings (`config.json` / `config.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalConfig {
    /// Local ontology document (OWL RDF/XML, N-Triples or Turtle).
    pub ontology_file: PathBuf,
    /// Namespace the term ids live in, e.g. `http://purl.obolibrary.org/obo/`.
    pub base_uri: String,
    /// Attributes rendered for a mapped term, in this order.
    #[serde(default = "default_props_for_dump")]
    pub props_for_dump: Vec<String>,
    pub prompt_mapped: String,
    pub prompt_non_mapped: String,
}

impl EvalConfig {
    /// Load from an explicit path. `.toml` is TOML, `.json` is JSON; anything
    /// else tries JSON first, then TOML.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = match ext.as_str() {
            "toml" => toml::from_str::<EvalConfig>(&data)?,
            "json" => serde_json::from_str::<EvalConfig>(&data)?,
            _ => match serde_json::from_str::<EvalConfig>(&data) {
                Ok(cfg) => cfg,
                Err(json_err) => toml::from_str(&data).map_err(|_| json_err)?,
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_uri.trim().is_empty() {
            return Err(ConfigError::Invalid("`base_uri` must not be empty".into()));
        }
        for (name, tpl) in [
            ("prompt_mapped", &self.prompt_mapped),
            ("prompt_non_mapped", &self.prompt_non_mapped),
        ] {
            if !tpl.contains(SAMPLE_PLACEHOLDER) {
                tracing::warn!("`{name}` has no {SAMPLE_PLACEHOLDER} placeholder; sample will be dropped");
            }
        }
        if !self.prompt_mapped.contains(TERM_PLACEHOLDER) {
            tracing::warn!("`prompt_mapped` has no {TERM_PLACEHOLDER} placeholder; term context will be dropped");
        }
        Ok(())
    }

    pub fn templates(&self) -> PromptTemplates {
        PromptTemplates {
            mapped: self.prompt_mapped.clone(),
            non_mapped: self.prompt_non_mapped.clone(),
        }
    }
}
