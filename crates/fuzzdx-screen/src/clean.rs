//! Survey dataset cleaning.
//!
//! Raw rows come straight from the survey export: free-form column names,
//! `1`/`2` coded answers, `M`/`F` gender and `YES`/`NO` labels. Cleaning
//! produces [`PatientRecord`]s with 0/1 indicators.
//!
//! Steps, in order:
//! 1. drop exact duplicate raw rows, keeping the first occurrence
//! 2. normalize column names (trim, uppercase, spaces to `_`)
//! 3. uppercase string values
//! 4. recode `1 → 0`, `2 → 1` in every numeric column except `AGE`;
//!    whole floats such as `2.0` count as integers
//! 5. `GENDER`: `M → 1`, `F → 0`; anywhere: `YES → 1`, `NO → 0`

use crate::error::ScoreError;
use crate::record::PatientRecord;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

pub type RawRow = Map<String, Value>;

const AGE_COLUMN: &str = "AGE";
const GENDER_COLUMN: &str = "GENDER";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanReport {
    pub records: Vec<PatientRecord>,
    pub duplicates_dropped: usize,
}

pub fn normalize_column(name: &str) -> String {
    name.trim().to_uppercase().replace(' ', "_")
}

/// Integer value of a numeric cell, accepting whole floats such as `2.0`.
fn whole_number(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
            .map(|v| v as i64)
    })
}

fn recode_survey_answer(value: &Value) -> Value {
    match whole_number(value) {
        Some(1) => Value::from(0),
        Some(2) => Value::from(1),
        Some(other) => Value::from(other),
        None => value.clone(),
    }
}

fn clean_value(column: &str, value: &Value) -> Value {
    let value = match value {
        Value::String(text) => Value::String(text.trim().to_uppercase()),
        Value::Number(_) if column != AGE_COLUMN => recode_survey_answer(value),
        other => other.clone(),
    };
    match value.as_str() {
        Some("M") if column == GENDER_COLUMN => Value::from(1),
        Some("F") if column == GENDER_COLUMN => Value::from(0),
        Some("YES") => Value::from(1),
        Some("NO") => Value::from(0),
        _ => value,
    }
}

/// Clean one raw row (without deduplication).
pub fn clean_row(row: &RawRow) -> RawRow {
    row.iter()
        .map(|(column, value)| {
            let column = normalize_column(column);
            let value = clean_value(&column, value);
            (column, value)
        })
        .collect()
}

/// Clean a whole raw dataset. Row numbers in errors are 1-based positions
/// in the input.
pub fn clean_rows(rows: &[RawRow]) -> Result<CleanReport, ScoreError> {
    let mut seen = BTreeSet::new();
    let mut report = CleanReport::default();
    for (index, row) in rows.iter().enumerate() {
        // serde_json maps are key-ordered, so the encoding is canonical.
        let fingerprint = Value::Object(row.clone()).to_string();
        if !seen.insert(fingerprint) {
            report.duplicates_dropped += 1;
            continue;
        }
        let cleaned = clean_row(row);
        let record: PatientRecord =
            serde_json::from_value(Value::Object(cleaned)).map_err(|e| ScoreError::Clean {
                row: index + 1,
                message: e.to_string(),
            })?;
        report.records.push(record);
    }
    tracing::debug!(
        rows = rows.len(),
        kept = report.records.len(),
        duplicates = report.duplicates_dropped,
        "dataset cleaned"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::Label;
    use serde_json::json;

    fn raw(value: Value) -> RawRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn survey_row_is_recoded() {
        let row = raw(json!({
            "GENDER": "m",
            " AGE ": 2,
            "SMOKING": 1,
            "YELLOW FINGERS": 2,
            "LUNG_CANCER": "yes"
        }));
        let cleaned = clean_row(&row);
        assert_eq!(cleaned["GENDER"], json!(1));
        assert_eq!(cleaned["AGE"], json!(2));
        assert_eq!(cleaned["SMOKING"], json!(0));
        assert_eq!(cleaned["YELLOW_FINGERS"], json!(1));
        assert_eq!(cleaned["LUNG_CANCER"], json!(1));
    }

    #[test]
    fn whole_float_answers_are_recoded() {
        let cleaned = clean_row(&raw(json!({
            "AGE": 63.0,
            "SMOKING": 2.0,
            "ANXIETY": 1.0,
            "ALLERGY": 0.0,
            "FATIGUE": 1.5
        })));
        assert_eq!(cleaned["AGE"], json!(63.0));
        assert_eq!(cleaned["SMOKING"], json!(1));
        assert_eq!(cleaned["ANXIETY"], json!(0));
        assert_eq!(cleaned["ALLERGY"], json!(0));
        assert_eq!(cleaned["FATIGUE"], json!(1.5));

        let row = raw(json!({"AGE": 63.0, "SMOKING": 2.0, "LUNG_CANCER": "YES"}));
        let report = clean_rows(&[row]).expect("float survey row should clean");
        assert_eq!(report.records[0].flags.get("SMOKING"), Some(&1));
        assert_eq!(report.records[0].label(), Some(Label::Positive));
    }

    #[test]
    fn other_values_pass_through() {
        let cleaned = clean_row(&raw(json!({"AGE": 64, "ANXIETY": 0, "GENDER": "F"})));
        assert_eq!(cleaned["AGE"], json!(64));
        assert_eq!(cleaned["ANXIETY"], json!(0));
        assert_eq!(cleaned["GENDER"], json!(0));
    }

    #[test]
    fn duplicates_keep_the_first_row() {
        let rows = vec![
            raw(json!({"AGE": 50, "SMOKING": 2, "LUNG_CANCER": "NO"})),
            raw(json!({"AGE": 50, "SMOKING": 2, "LUNG_CANCER": "NO"})),
            raw(json!({"AGE": 51, "SMOKING": 1, "LUNG_CANCER": "YES"})),
        ];
        let report = clean_rows(&rows).unwrap();
        assert_eq!(report.duplicates_dropped, 1);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].flags.get("SMOKING"), Some(&1));
        assert_eq!(report.records[0].label(), Some(Label::Negative));
        assert_eq!(report.records[1].label(), Some(Label::Positive));
    }

    #[test]
    fn uncleanable_rows_report_their_position() {
        let rows = vec![
            raw(json!({"AGE": 50})),
            raw(json!({"AGE": 51, "SMOKING": "SOMETIMES"})),
        ];
        match clean_rows(&rows).unwrap_err() {
            ScoreError::Clean { row, .. } => assert_eq!(row, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
