//! UX composition layer.
//!
//! Owns the query shapes used by frontends: assess one patient, describe
//! the loaded rule base. The engine is built once and only read afterwards,
//! so one [`ScreeningService`] serves every request by shared reference.

pub mod http;

use fuzzdx_config::{EngineSpec, SpecError, build_engine};
use fuzzdx_kernel::{Engine, InferenceError};
use fuzzdx_screen::{Assessment, Flags, ScoreError, Screener};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// One assessment request: the form fields of a single patient.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessQuery {
    pub age: f64,
    pub flags: Flags,
}

#[derive(Debug, Error)]
pub enum AssessQueryError {
    /// The request cannot be scored as given.
    #[error("{0}")]
    Invalid(String),
    /// The rule base has no opinion on these inputs.
    #[error("{0}")]
    Indeterminate(String),
    /// The engine is not shaped for screening.
    #[error("{0}")]
    Engine(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigView<'a> {
    pub name: &'a str,
    pub digest: &'a str,
    pub rule_count: usize,
    pub spec: &'a EngineSpec,
}

#[derive(Debug)]
pub struct ScreeningService {
    spec: EngineSpec,
    digest: String,
    engine: Engine,
    screener: Screener,
}

impl ScreeningService {
    pub fn new(spec: EngineSpec, engine: Engine, screener: Screener) -> Result<Self, SpecError> {
        let digest = spec.digest()?;
        Ok(Self {
            spec,
            digest,
            engine,
            screener,
        })
    }

    pub fn from_spec(spec: EngineSpec) -> Result<Self, SpecError> {
        let engine = build_engine(&spec)?;
        Self::new(spec, engine, Screener::default())
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn assess(&self, query: &AssessQuery) -> Result<Assessment, AssessQueryError> {
        self.screener
            .assess(&self.engine, query.age, &query.flags)
            .map_err(|err| match err {
                ScoreError::Inference(InferenceError::NoRuleFired { .. }) => {
                    AssessQueryError::Indeterminate(err.to_string())
                }
                ScoreError::Inference(InferenceError::UnknownOutput { .. }) => {
                    AssessQueryError::Engine(err.to_string())
                }
                other => AssessQueryError::Invalid(other.to_string()),
            })
    }

    pub fn assess_json(&self, query: &AssessQuery) -> Result<Value, AssessQueryError> {
        let assessment = self.assess(query)?;
        serde_json::to_value(assessment).map_err(|e| AssessQueryError::Serialization(e.to_string()))
    }

    pub fn config_view(&self) -> ConfigView<'_> {
        ConfigView {
            name: &self.spec.name,
            digest: &self.digest,
            rule_count: self.spec.rules.len(),
            spec: &self.spec,
        }
    }

    pub fn config_json(&self) -> Result<Value, AssessQueryError> {
        serde_json::to_value(self.config_view())
            .map_err(|e| AssessQueryError::Serialization(e.to_string()))
    }
}
