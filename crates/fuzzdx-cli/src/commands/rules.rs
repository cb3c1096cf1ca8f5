use crate::cli::ExportFormatArg;
use crate::support::{exit_with, load_engine_or_exit, print_json};
use serde_json::json;

pub fn run(config: Option<String>, export: Option<ExportFormatArg>, json_output: bool) {
    let loaded = load_engine_or_exit(config.as_deref());

    match export {
        Some(ExportFormatArg::Toml) => {
            let text = loaded.spec.to_toml_string().unwrap_or_else(|e| exit_with(e));
            print!("{text}");
            return;
        }
        Some(ExportFormatArg::Json) => {
            let text = loaded.spec.to_json_pretty().unwrap_or_else(|e| exit_with(e));
            println!("{text}");
            return;
        }
        None => {}
    }

    let rules = loaded.engine.rules();
    if json_output {
        let rendered: Vec<String> = rules.iter().map(ToString::to_string).collect();
        print_json(&json!({
            "name": loaded.spec.name,
            "digest": loaded.digest,
            "source": loaded.source,
            "ruleCount": rules.len(),
            "rules": rendered,
        }));
    } else {
        println!("fuzzdx rules");
        println!("  Spec: {} ({})", loaded.spec.name, loaded.source);
        println!("  Digest: {}", loaded.digest);
        println!("  Variables:");
        for variable in loaded.engine.variables() {
            let terms: Vec<&str> = variable.terms().iter().map(|t| t.name.as_str()).collect();
            println!(
                "    - {} ({}): {}",
                variable.name(),
                variable.role(),
                terms.join(", ")
            );
        }
        println!("  Rules ({}):", rules.len());
        for rule in rules {
            println!("    {rule}");
        }
    }
}
