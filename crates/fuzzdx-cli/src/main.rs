//! fuzzdx CLI: the `fuzzdx` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{EnvFilter, fmt};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Infer {
            age,
            symptom,
            risk,
            config,
            json,
        } => commands::infer::run(age, symptom, risk, config, json),

        Commands::Assess {
            age,
            flags,
            config,
            json,
        } => commands::assess::run(age, flags, config, json),

        Commands::Rules {
            config,
            export,
            json,
        } => commands::rules::run(config, export, json),

        Commands::Curves {
            variable,
            config,
            json,
        } => commands::curves::run(variable, config, json),

        Commands::Clean {
            input,
            output,
            json,
        } => commands::clean::run(input, output, json),

        Commands::Batch {
            input,
            output,
            normalization,
            test_fraction,
            seed,
            threads,
            config,
            json,
        } => commands::batch::run(commands::batch::Args {
            input,
            output,
            normalization,
            test_fraction,
            seed,
            threads,
            config,
            json,
        }),

        Commands::Serve { bind, config } => commands::serve::run(bind, config),
    }
}
