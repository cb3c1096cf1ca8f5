use crate::support::{exit_with, load_engine_or_exit, print_json};
use fuzzdx_config::DIAGNOSIS;
use fuzzdx_kernel::InferenceError;
use fuzzdx_screen::{Label, ScreeningInputs};
use serde_json::json;

pub fn run(age: f64, symptom: f64, risk: f64, config: Option<String>, json_output: bool) {
    let loaded = load_engine_or_exit(config.as_deref());
    let inputs = ScreeningInputs::new(age, symptom, risk);

    let inference = match loaded.engine.infer(&inputs.to_crisp()) {
        Ok(inference) => inference,
        Err(InferenceError::NoRuleFired { variable }) => {
            exit_with(format!("indeterminate: no rule fired for `{variable}`"))
        }
        Err(err) => exit_with(err),
    };
    let score = inference.score(DIAGNOSIS).unwrap_or_else(|| {
        exit_with(format!(
            "engine `{}` has no output variable `{DIAGNOSIS}`",
            loaded.spec.name
        ))
    });
    let label = Label::classify(score);

    if json_output {
        print_json(&json!({
            "inputs": inputs,
            "score": score,
            "label": label,
            "outputs": inference.outputs,
            "firings": inference.firings,
            "digest": loaded.digest,
        }));
    } else {
        println!("fuzzdx infer");
        println!("  Spec: {} ({})", loaded.spec.name, loaded.source);
        println!("  Inputs: age={age} symptom={symptom} risk={risk}");
        println!("  Score: {score:.2}");
        println!("  Label: {label}");
        println!("  Rule firings:");
        for firing in inference.firings.iter().filter(|f| f.strength > 0.0) {
            println!("    - {}: {:.4}", firing.rule_id, firing.strength);
        }
    }
}
