//! Classification metrics over scored, labelled rows.

use crate::batch::ScoredRecord;
use crate::screening::Label;
use serde::Serialize;

/// Probabilities are clipped to `[LOG_LOSS_EPSILON, 1 - LOG_LOSS_EPSILON]`.
pub const LOG_LOSS_EPSILON: f64 = 1e-15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionMatrix {
    pub fn record(&mut self, predicted: Label, actual: Label) {
        match (predicted, actual) {
            (Label::Positive, Label::Positive) => self.true_positive += 1,
            (Label::Positive, Label::Negative) => self.false_positive += 1,
            (Label::Negative, Label::Negative) => self.true_negative += 1,
            (Label::Negative, Label::Positive) => self.false_negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// `None` when no row was evaluated.
    pub log_loss: Option<f64>,
    /// Rows with a label but no score.
    pub indeterminate: usize,
    /// Rows with a score but no label.
    pub unlabelled: usize,
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Evaluate determinate, labelled rows. Indeterminate rows are counted but
/// never folded into a class.
pub fn evaluate<'a>(rows: impl IntoIterator<Item = &'a ScoredRecord>) -> Metrics {
    let mut confusion = ConfusionMatrix::default();
    let mut loss_sum = 0.0f64;
    let mut indeterminate = 0;
    let mut unlabelled = 0;

    for row in rows {
        let Some(actual) = row.actual else {
            unlabelled += 1;
            continue;
        };
        let (Some(score), Some(predicted)) = (row.outcome.score(), row.outcome.label()) else {
            indeterminate += 1;
            continue;
        };
        confusion.record(predicted, actual);

        let p = (score / 100.0).clamp(LOG_LOSS_EPSILON, 1.0 - LOG_LOSS_EPSILON);
        loss_sum -= if actual.is_positive() {
            p.ln()
        } else {
            (1.0 - p).ln()
        };
    }

    let evaluated = confusion.total();
    let precision = ratio(
        confusion.true_positive,
        confusion.true_positive + confusion.false_positive,
    );
    let recall = ratio(
        confusion.true_positive,
        confusion.true_positive + confusion.false_negative,
    );
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    Metrics {
        confusion,
        accuracy: ratio(confusion.true_positive + confusion.true_negative, evaluated),
        precision,
        recall,
        f1,
        log_loss: (evaluated > 0).then(|| loss_sum / evaluated as f64),
        indeterminate,
        unlabelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Outcome;
    use crate::screening::ScreeningInputs;

    fn row(score: Option<f64>, actual: Option<Label>) -> ScoredRecord {
        ScoredRecord {
            index: 0,
            inputs: ScreeningInputs::new(50.0, 0.0, 0.0),
            outcome: match score {
                Some(score) => Outcome::Scored {
                    score,
                    label: Label::classify(score),
                },
                None => Outcome::Indeterminate,
            },
            actual,
        }
    }

    #[test]
    fn counts_each_quadrant() {
        let rows = vec![
            row(Some(80.0), Some(Label::Positive)),
            row(Some(70.0), Some(Label::Negative)),
            row(Some(20.0), Some(Label::Negative)),
            row(Some(30.0), Some(Label::Positive)),
            row(Some(90.0), Some(Label::Positive)),
        ];
        let metrics = evaluate(&rows);
        assert_eq!(
            metrics.confusion,
            ConfusionMatrix {
                true_positive: 2,
                false_positive: 1,
                true_negative: 1,
                false_negative: 1,
            }
        );
        assert!((metrics.accuracy - 0.6).abs() < 1e-12);
        assert!((metrics.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((metrics.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((metrics.f1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn zero_division_reports_zero() {
        let rows = vec![row(Some(10.0), Some(Label::Negative))];
        let metrics = evaluate(&rows);
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1, 0.0);
        assert_eq!(metrics.accuracy, 1.0);
    }

    #[test]
    fn indeterminate_and_unlabelled_rows_are_set_aside() {
        let rows = vec![
            row(None, Some(Label::Positive)),
            row(Some(60.0), None),
            row(Some(100.0), Some(Label::Positive)),
        ];
        let metrics = evaluate(&rows);
        assert_eq!(metrics.indeterminate, 1);
        assert_eq!(metrics.unlabelled, 1);
        assert_eq!(metrics.confusion.total(), 1);
        // p = 1 is clipped, so the loss is tiny but finite.
        let loss = metrics.log_loss.unwrap();
        assert!(loss.is_finite() && loss >= 0.0 && loss < 1e-12);
    }

    #[test]
    fn empty_input_has_no_log_loss() {
        let metrics = evaluate(&Vec::<ScoredRecord>::new());
        assert_eq!(metrics.log_loss, None);
        assert_eq!(metrics.accuracy, 0.0);
    }
}
