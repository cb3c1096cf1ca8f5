use crate::support::{exit_with, load_engine_or_exit, print_json};
use fuzzdx_kernel::InferenceError;
use fuzzdx_screen::{Flags, ScoreError, Screener};

pub fn run(age: f64, flags: Vec<(String, i64)>, config: Option<String>, json_output: bool) {
    let loaded = load_engine_or_exit(config.as_deref());
    let flags: Flags = flags.into_iter().collect();
    let screener = Screener::default();

    let assessment = match screener.assess(&loaded.engine, age, &flags) {
        Ok(assessment) => assessment,
        Err(ScoreError::Inference(InferenceError::NoRuleFired { variable })) => {
            exit_with(format!("indeterminate: no rule fired for `{variable}`"))
        }
        Err(err) => exit_with(err),
    };

    if json_output {
        print_json(&assessment);
    } else {
        let details = &assessment.details;
        println!("fuzzdx assess");
        println!("  Age: {}", details.age);
        println!("  Symptom score: {:.2}", details.symptom_score);
        println!("  Risk score: {:.2}", details.risk_score);
        println!("  Score: {:.2}", assessment.score);
        println!("  Label: {}", assessment.label);
    }
}
