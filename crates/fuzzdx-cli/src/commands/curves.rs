use crate::support::{exit_with, load_engine_or_exit, print_json};
use fuzzdx_kernel::{LinguisticVariable, TermCurve};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VariableCurves<'a> {
    variable: &'a str,
    role: String,
    curves: Vec<TermCurve>,
}

fn sample(variable: &LinguisticVariable) -> VariableCurves<'_> {
    VariableCurves {
        variable: variable.name(),
        role: variable.role().to_string(),
        curves: variable.curves(),
    }
}

pub fn run(variable: Option<String>, config: Option<String>, json_output: bool) {
    let loaded = load_engine_or_exit(config.as_deref());
    let selected: Vec<&LinguisticVariable> = match &variable {
        Some(name) => match loaded.engine.variable(name) {
            Some(found) => vec![found],
            None => exit_with(format!("unknown variable `{name}`")),
        },
        None => loaded.engine.variables().iter().collect(),
    };
    let sampled: Vec<VariableCurves<'_>> = selected.into_iter().map(sample).collect();

    if json_output {
        print_json(&sampled);
        return;
    }

    // Tab-separated: variable, term, x, degree. One line per grid point.
    println!("variable\tterm\tx\tdegree");
    for entry in &sampled {
        for curve in &entry.curves {
            for (x, degree) in &curve.points {
                println!("{}\t{}\t{x}\t{degree:.6}", entry.variable, curve.term);
            }
        }
    }
}
