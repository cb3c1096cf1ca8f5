use clap::{Parser, Subcommand, ValueEnum};
use fuzzdx_screen::Normalization;

#[derive(Parser)]
#[command(
    name = "fuzzdx",
    about = "fuzzdx: Mamdani fuzzy inference for lung-cancer risk screening",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the engine on crisp inputs (age, symptom score, risk score)
    Infer {
        /// Age in years
        #[arg(long)]
        age: f64,

        /// Symptom score in [0, 100]
        #[arg(long)]
        symptom: f64,

        /// Risk score in [0, 100]
        #[arg(long)]
        risk: f64,

        /// Engine spec (.toml or .json); defaults to the embedded rule base
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assess one patient from indicator flags
    Assess {
        /// Age in years
        #[arg(long)]
        age: f64,

        /// Indicator flag as KEY=0|1 (repeatable), e.g. --flag COUGHING=1
        #[arg(long = "flag", value_parser = parse_flag)]
        flags: Vec<(String, i64)>,

        /// Engine spec (.toml or .json); defaults to the embedded rule base
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the rule base and its digest
    Rules {
        /// Engine spec (.toml or .json); defaults to the embedded rule base
        #[arg(long)]
        config: Option<String>,

        /// Output format for the full spec
        #[arg(long, value_enum)]
        export: Option<ExportFormatArg>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sample every term of every variable over its universe
    Curves {
        /// Only this variable
        #[arg(long)]
        variable: Option<String>,

        /// Engine spec (.toml or .json); defaults to the embedded rule base
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clean a raw survey JSONL export into patient records
    Clean {
        /// Raw survey rows (JSONL)
        #[arg(long)]
        input: String,

        /// Cleaned records output path (JSONL)
        #[arg(long)]
        output: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score a cleaned dataset and evaluate against its labels
    Batch {
        /// Cleaned patient records (JSONL)
        #[arg(long)]
        input: String,

        /// Write per-row results (JSONL)
        #[arg(long)]
        output: Option<String>,

        /// How raw indicator sums are scaled to [0, 100]
        #[arg(long, default_value = "dataset-max")]
        normalization: Normalization,

        /// Evaluate only a stratified test split of this fraction
        #[arg(long)]
        test_fraction: Option<f64>,

        /// Seed for the stratified split
        #[arg(long, default_value = "42")]
        seed: String,

        /// Worker threads (defaults to available parallelism)
        #[arg(long)]
        threads: Option<usize>,

        /// Engine spec (.toml or .json); defaults to the embedded rule base
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the assess API over HTTP
    Serve {
        /// Bind address (host:port)
        #[arg(long, default_value = "127.0.0.1:43180")]
        bind: String,

        /// Engine spec (.toml or .json); defaults to the embedded rule base
        #[arg(long)]
        config: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportFormatArg {
    #[value(name = "toml")]
    Toml,
    #[value(name = "json")]
    Json,
}

fn parse_flag(raw: &str) -> Result<(String, i64), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("flag value for `{key}` must be an integer, got `{value}`"))?;
    Ok((fuzzdx_screen::normalize_column(key), value))
}
