//! Declarative engine specification.
//!
//! This is the persisted format of a rule base: variables with their
//! universes and term shapes, then rules written in the kernel's textual
//! antecedent syntax. The same structure reads from TOML or JSON.

use crate::error::SpecError;
use fuzzdx_kernel::{FuzzySet, VariableRole};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

pub const SPEC_DIGEST_PREFIX: &str = "fis1_";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniverseSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    pub role: VariableRole,
    pub universe: UniverseSpec,
    pub terms: Vec<FuzzySet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Defaults to `R<n>` (1-based position) when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Antecedent, e.g. `symptom is mild and risk is low`.
    pub when: String,
    /// Consequent, e.g. `diagnosis is negative`.
    pub then: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl RuleSpec {
    pub fn resolved_id(&self, position: usize) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("R{}", position + 1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub variables: Vec<VariableSpec>,
    pub rules: Vec<RuleSpec>,
}

impl EngineSpec {
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, SpecError> {
        toml::from_str(text).map_err(|source| SpecError::ParseToml {
            path: origin.to_string(),
            source,
        })
    }

    pub fn from_json_str(text: &str, origin: &str) -> Result<Self, SpecError> {
        serde_json::from_str(text).map_err(|source| SpecError::ParseJson {
            path: origin.to_string(),
            source,
        })
    }

    /// Load from a `.toml` or `.json` file, chosen by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpecError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| SpecError::ReadFile {
            path: display.clone(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&text, &display),
            Some("json") => Self::from_json_str(&text, &display),
            _ => Err(SpecError::UnsupportedFormat(display)),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, SpecError> {
        toml::to_string(self).map_err(|e| SpecError::Serialize(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, SpecError> {
        serde_json::to_string_pretty(self).map_err(|e| SpecError::Serialize(e.to_string()))
    }

    /// Content digest over the canonical JSON encoding.
    ///
    /// Two specs with the same digest describe the same engine bit-for-bit.
    /// Comments and key order in the source file do not affect it.
    pub fn digest(&self) -> Result<String, SpecError> {
        let bytes = serde_json::to_vec(self).map_err(|e| SpecError::Serialize(e.to_string()))?;
        let hash = Sha256::digest(&bytes);
        Ok(format!("{SPEC_DIGEST_PREFIX}{hash:x}"))
    }

    pub fn variable(&self, name: &str) -> Option<&VariableSpec> {
        self.variables.iter().find(|v| v.name == name)
    }
}

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("identifier regex must compile"))
}

/// Variable and term names must be usable inside rule text: an ASCII
/// identifier that is not one of the syntax keywords.
pub fn validate_identifier(kind: &'static str, name: &str) -> Result<(), SpecError> {
    let keyword = matches!(name.to_ascii_lowercase().as_str(), "and" | "or" | "is");
    if keyword || !identifier_re().is_match(name) {
        return Err(SpecError::InvalidIdentifier {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}
