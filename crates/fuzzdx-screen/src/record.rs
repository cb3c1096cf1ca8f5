//! Cleaned patient rows as stored in the dataset JSONL.

use crate::indicators::Flags;
use crate::screening::Label;
use serde::{Deserialize, Serialize};

/// One cleaned survey row.
///
/// Column names follow the cleaned dataset: `AGE`, the indicator columns
/// (`SMOKING`, `COUGHING`, ...) as 0/1, and an optional `LUNG_CANCER` 0/1
/// ground-truth label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(rename = "AGE")]
    pub age: f64,

    #[serde(
        rename = "LUNG_CANCER",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub lung_cancer: Option<u8>,

    #[serde(flatten)]
    pub flags: Flags,
}

impl PatientRecord {
    pub fn new(age: f64, flags: Flags) -> Self {
        Self {
            age,
            lung_cancer: None,
            flags,
        }
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.lung_cancer = Some(u8::from(label.is_positive()));
        self
    }

    /// Ground truth, when the row carries a valid one.
    pub fn label(&self) -> Option<Label> {
        self.lung_cancer.and_then(Label::from_flag)
    }
}
