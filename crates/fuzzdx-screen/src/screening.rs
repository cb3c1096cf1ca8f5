//! Screening inputs, classification, and single-patient assessment.

use crate::error::ScoreError;
use crate::indicators::{Flags, IndicatorGroup};
use fuzzdx_config::{AGE, DIAGNOSIS, DIAGNOSIS_BOUNDARY, RISK, SYMPTOM};
use fuzzdx_kernel::{CrispInputs, Engine, InferenceError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores at or above this value are labelled positive. It sits on the
/// boundary between the `negative` and `positive` diagnosis terms.
pub const POSITIVE_THRESHOLD: f64 = DIAGNOSIS_BOUNDARY;

/// The three crisp inputs of the screening engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningInputs {
    pub age: f64,
    pub symptom_score: f64,
    pub risk_score: f64,
}

impl ScreeningInputs {
    pub fn new(age: f64, symptom_score: f64, risk_score: f64) -> Self {
        Self {
            age,
            symptom_score,
            risk_score,
        }
    }

    pub fn to_crisp(&self) -> CrispInputs {
        CrispInputs::new()
            .with(AGE, self.age)
            .with(SYMPTOM, self.symptom_score)
            .with(RISK, self.risk_score)
    }
}

/// Run the engine on screening inputs and return the diagnosis score.
pub fn score_screening(engine: &Engine, inputs: &ScreeningInputs) -> Result<f64, InferenceError> {
    let result = engine.infer(&inputs.to_crisp())?;
    result
        .score(DIAGNOSIS)
        .ok_or_else(|| InferenceError::UnknownOutput {
            variable: DIAGNOSIS.to_string(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    pub fn classify(score: f64) -> Self {
        if score >= POSITIVE_THRESHOLD {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    /// Dataset encoding: `1` is positive, `0` negative.
    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            1 => Some(Self::Positive),
            0 => Some(Self::Negative),
            _ => None,
        }
    }

    pub fn is_positive(self) -> bool {
        self == Self::Positive
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "POSITIVE"),
            Self::Negative => write!(f, "NEGATIVE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub score: f64,
    pub label: Label,
    pub details: ScreeningInputs,
}

/// Indicator groups plus the engine-facing conversion from raw flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Screener {
    symptoms: IndicatorGroup,
    risk_factors: IndicatorGroup,
}

impl Default for Screener {
    fn default() -> Self {
        Self::new(IndicatorGroup::symptoms(), IndicatorGroup::risk_factors())
    }
}

impl Screener {
    pub fn new(symptoms: IndicatorGroup, risk_factors: IndicatorGroup) -> Self {
        Self {
            symptoms,
            risk_factors,
        }
    }

    pub fn symptoms(&self) -> &IndicatorGroup {
        &self.symptoms
    }

    pub fn risk_factors(&self) -> &IndicatorGroup {
        &self.risk_factors
    }

    /// Fixed-normalization inputs. Age passes through unchanged.
    pub fn inputs(&self, age: f64, flags: &Flags) -> Result<ScreeningInputs, ScoreError> {
        Ok(ScreeningInputs::new(
            age,
            self.symptoms.score(flags)?,
            self.risk_factors.score(flags)?,
        ))
    }

    pub fn assess(&self, engine: &Engine, age: f64, flags: &Flags) -> Result<Assessment, ScoreError> {
        let details = self.inputs(age, flags)?;
        let score = score_screening(engine, &details)?;
        Ok(Assessment {
            score,
            label: Label::classify(score),
            details,
        })
    }
}
