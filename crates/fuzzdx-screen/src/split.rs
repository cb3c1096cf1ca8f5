//! Deterministic stratified train/test split.
//!
//! Within each class, rows are ordered by `sha256("{seed}:{index}")` and the
//! first `round(n * test_fraction)` go to the test set. The same seed always
//! yields the same split, on every platform, with no RNG dependency.

use crate::error::ScoreError;
use crate::screening::Label;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Split {
    /// Row indices, ascending.
    pub train: Vec<usize>,
    /// Row indices, ascending.
    pub test: Vec<usize>,
}

fn shuffle_key(seed: &str, index: usize) -> String {
    let hash = Sha256::digest(format!("{seed}:{index}").as_bytes());
    format!("{hash:x}")
}

/// Split row indices by class. Rows without a label are kept out of both
/// sides.
pub fn stratified_split(
    labels: &[Option<Label>],
    test_fraction: f64,
    seed: &str,
) -> Result<Split, ScoreError> {
    if !(0.0..=1.0).contains(&test_fraction) {
        return Err(ScoreError::InvalidFraction(test_fraction));
    }

    let mut classes: BTreeMap<bool, Vec<usize>> = BTreeMap::new();
    for (index, label) in labels.iter().enumerate() {
        if let Some(label) = label {
            classes.entry(label.is_positive()).or_default().push(index);
        }
    }

    let mut split = Split::default();
    for mut members in classes.into_values() {
        members.sort_by_cached_key(|&index| shuffle_key(seed, index));
        let test_len = (members.len() as f64 * test_fraction).round() as usize;
        split.test.extend_from_slice(&members[..test_len]);
        split.train.extend_from_slice(&members[test_len..]);
    }
    split.train.sort_unstable();
    split.test.sort_unstable();
    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(positive: usize, negative: usize) -> Vec<Option<Label>> {
        (0..positive)
            .map(|_| Some(Label::Positive))
            .chain((0..negative).map(|_| Some(Label::Negative)))
            .collect()
    }

    #[test]
    fn preserves_class_proportions() {
        let labels = labels(70, 30);
        let split = stratified_split(&labels, 0.3, "42").unwrap();
        assert_eq!(split.test.len(), 30);
        assert_eq!(split.train.len(), 70);
        let positives = split
            .test
            .iter()
            .filter(|&&i| labels[i] == Some(Label::Positive))
            .count();
        assert_eq!(positives, 21);
    }

    #[test]
    fn same_seed_same_split() {
        let labels = labels(40, 25);
        let a = stratified_split(&labels, 0.3, "42").unwrap();
        let b = stratified_split(&labels, 0.3, "42").unwrap();
        let c = stratified_split(&labels, 0.3, "7").unwrap();
        assert_eq!(a, b);
        assert_ne!(a.test, c.test);
    }

    #[test]
    fn unlabelled_rows_are_excluded_and_sides_are_disjoint() {
        let mut labels = labels(10, 10);
        labels.push(None);
        let split = stratified_split(&labels, 0.5, "seed").unwrap();
        assert_eq!(split.train.len() + split.test.len(), 20);
        assert!(!split.train.contains(&20) && !split.test.contains(&20));
        assert!(split.test.iter().all(|i| !split.train.contains(i)));
    }

    #[test]
    fn fraction_must_be_a_probability() {
        assert!(matches!(
            stratified_split(&labels(1, 1), 1.5, "42"),
            Err(ScoreError::InvalidFraction(_))
        ));
        let all_train = stratified_split(&labels(3, 3), 0.0, "42").unwrap();
        assert!(all_train.test.is_empty());
    }
}
