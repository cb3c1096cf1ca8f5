//! Scoring vectors against the canonical lung-screening engine.

use fuzzdx_config::{EngineSpec, build_engine, lung_screening_engine};
use fuzzdx_kernel::{Engine, InferenceError};
use fuzzdx_screen::{
    Flags, IndicatorGroup, Label, Normalization, Outcome, POSITIVE_THRESHOLD, PatientRecord,
    Screener, ScreeningInputs, evaluate, score_batch, score_screening,
};

fn engine() -> Engine {
    lung_screening_engine().expect("canonical engine should build")
}

fn all_flags(value: i64) -> Flags {
    IndicatorGroup::symptoms()
        .keys()
        .chain(IndicatorGroup::risk_factors().keys())
        .map(|k| (k.to_string(), value))
        .collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn older_patient_with_every_indicator_is_positive() {
    let engine = engine();
    let assessment = Screener::default()
        .assess(&engine, 70.0, &all_flags(1))
        .expect("should assess");
    assert_close(assessment.details.symptom_score, 100.0);
    assert_close(assessment.details.risk_score, 100.0);
    assert_close(assessment.score, 85.333_333_333_333_31);
    assert_eq!(assessment.label, Label::Positive);

    let result = engine
        .infer(&assessment.details.to_crisp())
        .expect("should infer");
    let full: Vec<&str> = result
        .firings
        .iter()
        .filter(|f| f.strength == 1.0)
        .map(|f| f.rule_id.as_str())
        .collect();
    assert_eq!(full, vec!["R1", "R10"]);
}

#[test]
fn young_patient_without_indicators_is_negative() {
    let engine = engine();
    let assessment = Screener::default()
        .assess(&engine, 20.0, &all_flags(0))
        .expect("should assess");
    assert_eq!(assessment.details.symptom_score, 0.0);
    assert_eq!(assessment.details.risk_score, 0.0);
    assert_close(assessment.score, 18.0);
    assert_eq!(assessment.label, Label::Negative);
}

#[test]
fn reference_vectors() {
    let engine = engine();
    let cases = [
        (ScreeningInputs::new(45.0, 44.0, 0.0), 19.327_839_484_055_9),
        (ScreeningInputs::new(60.0, 50.0, 50.0), 85.029_782_037_514_05),
        (ScreeningInputs::new(55.0, 44.0, 73.0), 78.633_915_476_168_21),
    ];
    for (inputs, expected) in cases {
        let score = score_screening(&engine, &inputs).expect("should score");
        assert_close(score, expected);
    }
}

#[test]
fn risk_monotone_rules_never_weaken_as_risk_rises() {
    let engine = engine();
    for symptom in [0.0, 20.0, 50.0, 80.0] {
        let mut previous = (0.0f64, 0.0f64);
        for risk in 0..=100 {
            let inputs = ScreeningInputs::new(55.0, symptom, risk as f64);
            let result = engine.infer(&inputs.to_crisp()).expect("should infer");
            let r1 = result.firings[0].strength;
            let r3 = result.firings[2].strength;
            assert!(r1 >= previous.0, "R1 fell at symptom={symptom} risk={risk}");
            assert!(r3 >= previous.1, "R3 fell at symptom={symptom} risk={risk}");
            previous = (r1, r3);
        }
    }
}

#[test]
fn scores_stay_in_range_across_the_grid() {
    let engine = engine();
    for age in (0..=100).step_by(10) {
        for symptom in (0..=100).step_by(10) {
            for risk in (0..=100).step_by(10) {
                let inputs = ScreeningInputs::new(age as f64, symptom as f64, risk as f64);
                let score = score_screening(&engine, &inputs).expect("canonical rules fire");
                assert!((0.0..=100.0).contains(&score));
            }
        }
    }
}

fn narrow_engine() -> Engine {
    let spec = EngineSpec::from_json_str(
        r#"{
            "name": "narrow",
            "variables": [
                {"name": "age", "role": "input",
                 "universe": {"min": 0.0, "max": 100.0, "step": 1.0},
                 "terms": [{"name": "old", "shape": "gaussian", "mean": 70.0, "sigma": 10.0}]},
                {"name": "symptom", "role": "input",
                 "universe": {"min": 0.0, "max": 100.0, "step": 1.0},
                 "terms": [{"name": "severe", "shape": "triangular", "a": 60.0, "b": 100.0, "c": 100.0}]},
                {"name": "risk", "role": "input",
                 "universe": {"min": 0.0, "max": 100.0, "step": 1.0},
                 "terms": [{"name": "high", "shape": "triangular", "a": 60.0, "b": 100.0, "c": 100.0}]},
                {"name": "diagnosis", "role": "output",
                 "universe": {"min": 0.0, "max": 100.0, "step": 1.0},
                 "terms": [{"name": "positive", "shape": "triangular", "a": 55.0, "b": 100.0, "c": 100.0}]}
            ],
            "rules": [{"when": "symptom is severe and risk is high", "then": "diagnosis is positive"}]
        }"#,
        "narrow.json",
    )
    .expect("spec should parse");
    build_engine(&spec).expect("engine should build")
}

#[test]
fn zero_support_is_indeterminate_not_negative() {
    let engine = narrow_engine();
    let quiet = ScreeningInputs::new(40.0, 10.0, 10.0);
    assert_eq!(
        score_screening(&engine, &quiet),
        Err(InferenceError::NoRuleFired {
            variable: "diagnosis".to_string()
        })
    );

    let records = vec![
        PatientRecord::new(40.0, Flags::new()).with_label(Label::Negative),
        PatientRecord::new(70.0, all_flags(1)).with_label(Label::Positive),
    ];
    let scored = score_batch(
        &engine,
        &Screener::default(),
        &records,
        Normalization::Fixed,
        2,
    )
    .expect("batch should score");
    assert_eq!(scored[0].outcome, Outcome::Indeterminate);
    assert_eq!(scored[1].outcome.label(), Some(Label::Positive));

    let metrics = evaluate(&scored);
    assert_eq!(metrics.indeterminate, 1);
    assert_eq!(metrics.confusion.total(), 1);
    assert_eq!(metrics.confusion.true_negative, 0);
}

/// One rule on `age is old` and a single-point output spike at `peak`, so
/// a full firing puts the centroid exactly on `peak`.
fn spike_engine(output: &str, peak: f64) -> Engine {
    let text = format!(
        r#"{{
            "name": "spike",
            "variables": [
                {{"name": "age", "role": "input",
                 "universe": {{"min": 0.0, "max": 100.0, "step": 1.0}},
                 "terms": [{{"name": "old", "shape": "gaussian", "mean": 70.0, "sigma": 10.0}}]}},
                {{"name": "{output}", "role": "output",
                 "universe": {{"min": 0.0, "max": 100.0, "step": 1.0}},
                 "terms": [{{"name": "spike", "shape": "triangular", "a": {a}, "b": {peak}, "c": {c}}}]}}
            ],
            "rules": [{{"when": "age is old", "then": "{output} is spike"}}]
        }}"#,
        a = peak - 0.5,
        c = peak + 0.5,
    );
    let spec = EngineSpec::from_json_str(&text, "spike.json").expect("spec should parse");
    build_engine(&spec).expect("engine should build")
}

#[test]
fn score_exactly_at_threshold_is_positive() {
    let engine = spike_engine("diagnosis", POSITIVE_THRESHOLD);
    let assessment = Screener::default()
        .assess(&engine, 70.0, &Flags::new())
        .expect("should assess");
    assert_eq!(assessment.score, POSITIVE_THRESHOLD);
    assert_eq!(assessment.label, Label::Positive);

    let below = spike_engine("diagnosis", POSITIVE_THRESHOLD - 1.0);
    let assessment = Screener::default()
        .assess(&below, 70.0, &Flags::new())
        .expect("should assess");
    assert_eq!(assessment.score, POSITIVE_THRESHOLD - 1.0);
    assert_eq!(assessment.label, Label::Negative);
}

#[test]
fn engine_without_diagnosis_output_is_an_error() {
    let engine = spike_engine("verdict", 50.0);
    assert_eq!(
        score_screening(&engine, &ScreeningInputs::new(70.0, 0.0, 0.0)),
        Err(InferenceError::UnknownOutput {
            variable: "diagnosis".to_string()
        })
    );
}

#[test]
fn batch_results_do_not_depend_on_thread_count() {
    let engine = engine();
    let screener = Screener::default();
    let keys: Vec<String> = IndicatorGroup::symptoms()
        .keys()
        .chain(IndicatorGroup::risk_factors().keys())
        .map(str::to_string)
        .collect();
    let records: Vec<PatientRecord> = (0..200usize)
        .map(|i| {
            let flags: Flags = keys
                .iter()
                .enumerate()
                .map(|(bit, key)| (key.clone(), ((i >> (bit % 8)) & 1) as i64))
                .collect();
            PatientRecord::new((i % 90) as f64 + 10.0, flags)
        })
        .collect();

    let sequential = score_batch(&engine, &screener, &records, Normalization::DatasetMax, 1)
        .expect("batch should score");
    for threads in [2, 3, 8, 500] {
        let parallel =
            score_batch(&engine, &screener, &records, Normalization::DatasetMax, threads)
                .expect("batch should score");
        assert_eq!(parallel.len(), sequential.len());
        for (a, b) in parallel.iter().zip(&sequential) {
            assert_eq!(a.index, b.index);
            assert_eq!(
                a.outcome.score().map(f64::to_bits),
                b.outcome.score().map(f64::to_bits)
            );
        }
    }
}
