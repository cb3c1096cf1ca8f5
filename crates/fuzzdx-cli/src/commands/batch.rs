use crate::support::{exit_with, load_engine_or_exit, percent, print_json};
use fuzzdx_screen::{
    Normalization, PatientRecord, ScoredRecord, Screener, default_threads, evaluate,
    read_jsonl_from_path, score_batch, stratified_split, write_jsonl_to_path,
};
use serde_json::json;

pub struct Args {
    pub input: String,
    pub output: Option<String>,
    pub normalization: Normalization,
    pub test_fraction: Option<f64>,
    pub seed: String,
    pub threads: Option<usize>,
    pub config: Option<String>,
    pub json: bool,
}

pub fn run(args: Args) {
    let loaded = load_engine_or_exit(args.config.as_deref());
    let records: Vec<PatientRecord> = read_jsonl_from_path(&args.input)
        .unwrap_or_else(|e| exit_with(format!("failed to read {}: {e}", args.input)));

    let threads = args.threads.unwrap_or_else(default_threads);
    // Normalization spans the whole dataset; the split only picks rows to evaluate.
    let scored = score_batch(
        &loaded.engine,
        &Screener::default(),
        &records,
        args.normalization,
        threads,
    )
    .unwrap_or_else(|e| exit_with(format!("{}: {e}", args.input)));

    let evaluated: Vec<&ScoredRecord> = match args.test_fraction {
        Some(fraction) => {
            let labels: Vec<_> = records.iter().map(PatientRecord::label).collect();
            let split = stratified_split(&labels, fraction, &args.seed)
                .unwrap_or_else(|e| exit_with(e));
            split.test.iter().map(|&i| &scored[i]).collect()
        }
        None => scored.iter().collect(),
    };
    let metrics = evaluate(evaluated.iter().copied());

    if let Some(output) = &args.output {
        write_jsonl_to_path(output, &scored)
            .unwrap_or_else(|e| exit_with(format!("failed to write {output}: {e}")));
    }

    if args.json {
        print_json(&json!({
            "input": args.input,
            "digest": loaded.digest,
            "normalization": args.normalization,
            "records": records.len(),
            "evaluatedRows": evaluated.len(),
            "testFraction": args.test_fraction,
            "seed": args.seed,
            "metrics": metrics,
        }));
    } else {
        println!("fuzzdx batch");
        println!("  Input: {} ({} records)", args.input, records.len());
        println!("  Normalization: {}", args.normalization);
        if let Some(fraction) = args.test_fraction {
            println!("  Test split: {fraction} (seed {})", args.seed);
        }
        println!("  Evaluated rows: {}", evaluated.len());
        println!("  Indeterminate: {}", metrics.indeterminate);
        println!("  Accuracy : {}", percent(metrics.accuracy));
        println!("  Precision: {}", percent(metrics.precision));
        println!("  Recall   : {}", percent(metrics.recall));
        println!("  F1 Score : {}", percent(metrics.f1));
        match metrics.log_loss {
            Some(loss) => println!("  Log Loss : {loss:.4}"),
            None => println!("  Log Loss : n/a"),
        }
    }
}
