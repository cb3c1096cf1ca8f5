use crate::support::{exit_with, print_json};
use fuzzdx_screen::{RawRow, clean_rows, read_jsonl_from_path, write_jsonl_to_path};
use serde_json::json;

pub fn run(input: String, output: String, json_output: bool) {
    let rows: Vec<RawRow> = read_jsonl_from_path(&input)
        .unwrap_or_else(|e| exit_with(format!("failed to read {input}: {e}")));
    let report = clean_rows(&rows).unwrap_or_else(|e| exit_with(format!("{input}: {e}")));
    write_jsonl_to_path(&output, &report.records)
        .unwrap_or_else(|e| exit_with(format!("failed to write {output}: {e}")));

    let labelled = report
        .records
        .iter()
        .filter(|r| r.label().is_some())
        .count();

    if json_output {
        print_json(&json!({
            "input": input,
            "output": output,
            "rowsRead": rows.len(),
            "recordsWritten": report.records.len(),
            "duplicatesDropped": report.duplicates_dropped,
            "labelled": labelled,
        }));
    } else {
        println!("fuzzdx clean");
        println!("  Input: {input} ({} rows)", rows.len());
        println!("  Output: {output} ({} records)", report.records.len());
        println!("  Duplicates dropped: {}", report.duplicates_dropped);
        println!("  Labelled: {labelled}");
    }
}
