//! Weighted binary indicator groups.
//!
//! A group is an ordered list of `(key, weight)` pairs. Its raw score is the
//! weighted sum of 0/1 flags, accumulated in key order so results are
//! reproducible to the bit; the normalized score is `raw * 100`.

use crate::error::ScoreError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Indicator flags keyed by column name (`COUGHING`, `SMOKING`, ...).
pub type Flags = BTreeMap<String, i64>;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

const SYMPTOM_WEIGHTS: &[(&str, f64)] = &[
    ("COUGHING", 0.22),
    ("SHORTNESS_OF_BREATH", 0.22),
    ("WHEEZING", 0.08),
    ("CHEST_PAIN", 0.22),
    ("SWALLOWING_DIFFICULTY", 0.08),
    ("FATIGUE", 0.18),
];

const RISK_WEIGHTS: &[(&str, f64)] = &[
    ("SMOKING", 0.27),
    ("ALCOHOL_CONSUMING", 0.12),
    ("YELLOW_FINGERS", 0.23),
    ("CHRONIC_DISEASE", 0.08),
    ("GENDER", 0.05),
    ("ANXIETY", 0.05),
    ("PEER_PRESSURE", 0.10),
    ("ALLERGY", 0.10),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorWeight {
    pub key: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorGroup {
    name: String,
    weights: Vec<IndicatorWeight>,
}

impl IndicatorGroup {
    /// Build a custom group. Weights must be finite and non-negative; a
    /// total other than 1.0 is accepted but logged, since the engine clamps
    /// inputs to the universe anyway.
    pub fn new(
        name: impl Into<String>,
        weights: impl IntoIterator<Item = (String, f64)>,
    ) -> Result<Self, ScoreError> {
        let name = name.into();
        let weights: Vec<IndicatorWeight> = weights
            .into_iter()
            .map(|(key, weight)| IndicatorWeight { key, weight })
            .collect();
        for entry in &weights {
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(ScoreError::InvalidWeight {
                    group: name,
                    key: entry.key.clone(),
                    weight: entry.weight,
                });
            }
        }
        let group = Self { name, weights };
        let total = group.weight_sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            tracing::warn!(group = %group.name, total, "indicator weights do not sum to 1.0");
        }
        Ok(group)
    }

    fn from_table(name: &str, table: &[(&str, f64)]) -> Self {
        Self {
            name: name.to_string(),
            weights: table
                .iter()
                .map(|(key, weight)| IndicatorWeight {
                    key: (*key).to_string(),
                    weight: *weight,
                })
                .collect(),
        }
    }

    /// Respiratory symptom indicators.
    pub fn symptoms() -> Self {
        Self::from_table("symptom", SYMPTOM_WEIGHTS)
    }

    /// Lifestyle and history risk indicators.
    pub fn risk_factors() -> Self {
        Self::from_table("risk", RISK_WEIGHTS)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weights(&self) -> &[IndicatorWeight] {
        &self.weights
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.weights.iter().map(|w| w.key.as_str())
    }

    pub fn weight_sum(&self) -> f64 {
        self.weights.iter().map(|w| w.weight).sum()
    }

    /// Weighted flag sum. Absent keys count as 0.
    pub fn raw(&self, flags: &Flags) -> Result<f64, ScoreError> {
        let mut total = 0.0f64;
        for entry in &self.weights {
            let value = flags.get(&entry.key).copied().unwrap_or(0);
            let indicator = match value {
                0 => 0.0,
                1 => 1.0,
                _ => {
                    return Err(ScoreError::NonBinaryFlag {
                        key: entry.key.clone(),
                        value,
                    });
                }
            };
            total += indicator * entry.weight;
        }
        Ok(total)
    }

    /// `raw * 100`, the fixed normalization used for single assessments.
    pub fn score(&self, flags: &Flags) -> Result<f64, ScoreError> {
        Ok(self.raw(flags)? * 100.0)
    }
}
