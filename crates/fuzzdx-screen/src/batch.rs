//! Batch scoring of patient records.
//!
//! Indicator scores are computed up front (they may need the whole batch
//! for [`Normalization::DatasetMax`]), then rows are partitioned across
//! scoped threads that share one `&Engine`. Results come back in input
//! order regardless of the thread count.

use crate::error::ScoreError;
use crate::record::PatientRecord;
use crate::screening::{Label, Screener, ScreeningInputs, score_screening};
use fuzzdx_kernel::{Engine, InferenceError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::thread;

/// How raw indicator sums become 0–100 engine inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    /// `raw * 100`, as for a single form submission.
    #[default]
    Fixed,
    /// `raw / max(raw) * 100` over the batch; 0 when the max is 0.
    DatasetMax,
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::DatasetMax => write!(f, "dataset-max"),
        }
    }
}

impl FromStr for Normalization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "dataset-max" => Ok(Self::DatasetMax),
            _ => Err(format!(
                "unknown normalization `{s}` (expected fixed or dataset-max)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Scored { score: f64, label: Label },
    /// No rule fired: the engine has no opinion on this row.
    Indeterminate,
}

impl Outcome {
    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Scored { score, .. } => Some(*score),
            Self::Indeterminate => None,
        }
    }

    pub fn label(&self) -> Option<Label> {
        match self {
            Self::Scored { label, .. } => Some(*label),
            Self::Indeterminate => None,
        }
    }
}

/// One batch result row, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRecord {
    pub index: usize,
    pub inputs: ScreeningInputs,
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<Label>,
}

/// Engine inputs for every record under the chosen normalization.
pub fn batch_inputs(
    screener: &Screener,
    records: &[PatientRecord],
    normalization: Normalization,
) -> Result<Vec<ScreeningInputs>, ScoreError> {
    let mut raw = Vec::with_capacity(records.len());
    for record in records {
        raw.push((
            screener.symptoms().raw(&record.flags)?,
            screener.risk_factors().raw(&record.flags)?,
        ));
    }

    let (symptom_scale, risk_scale) = match normalization {
        Normalization::Fixed => (100.0, 100.0),
        Normalization::DatasetMax => {
            let max_symptom = raw.iter().map(|(s, _)| *s).fold(0.0f64, f64::max);
            let max_risk = raw.iter().map(|(_, r)| *r).fold(0.0f64, f64::max);
            (scale_for(max_symptom), scale_for(max_risk))
        }
    };

    Ok(records
        .iter()
        .zip(raw)
        .map(|(record, (symptom, risk))| {
            ScreeningInputs::new(record.age, symptom * symptom_scale, risk * risk_scale)
        })
        .collect())
}

fn scale_for(max: f64) -> f64 {
    if max > 0.0 { 100.0 / max } else { 0.0 }
}

fn outcome_for(engine: &Engine, inputs: &ScreeningInputs) -> Result<Outcome, InferenceError> {
    match score_screening(engine, inputs) {
        Ok(score) => Ok(Outcome::Scored {
            score,
            label: Label::classify(score),
        }),
        Err(InferenceError::NoRuleFired { .. }) => Ok(Outcome::Indeterminate),
        Err(other) => Err(other),
    }
}

pub fn default_threads() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Score every record. `threads` is clamped to `1..=records.len()`.
pub fn score_batch(
    engine: &Engine,
    screener: &Screener,
    records: &[PatientRecord],
    normalization: Normalization,
    threads: usize,
) -> Result<Vec<ScoredRecord>, ScoreError> {
    let inputs = batch_inputs(screener, records, normalization)?;
    if inputs.is_empty() {
        return Ok(Vec::new());
    }

    let threads = threads.clamp(1, inputs.len());
    let chunk_size = inputs.len().div_ceil(threads);
    tracing::debug!(
        rows = inputs.len(),
        threads,
        %normalization,
        "batch scoring started"
    );

    let outcomes: Vec<Outcome> = thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|row| outcome_for(engine, row))
                        .collect::<Result<Vec<_>, _>>()
                })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(inputs.len());
        for handle in handles {
            match handle.join() {
                Ok(chunk) => outcomes.extend(chunk?),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        Ok::<_, InferenceError>(outcomes)
    })?;

    let indeterminate = outcomes
        .iter()
        .filter(|o| matches!(o, Outcome::Indeterminate))
        .count();
    if indeterminate > 0 {
        tracing::warn!(indeterminate, "rows with no rule fired");
    }

    Ok(records
        .iter()
        .zip(inputs)
        .zip(outcomes)
        .enumerate()
        .map(|(index, ((record, inputs), outcome))| ScoredRecord {
            index,
            inputs,
            outcome,
            actual: record.label(),
        })
        .collect())
}
