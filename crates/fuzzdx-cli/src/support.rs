use fuzzdx_config::{EngineSpec, load_engine};
use fuzzdx_kernel::Engine;
use serde::Serialize;
use std::path::Path;

pub struct LoadedEngine {
    pub spec: EngineSpec,
    pub engine: Engine,
    pub digest: String,
    pub source: String,
}

pub fn load_engine_or_exit(config: Option<&str>) -> LoadedEngine {
    let (spec, engine) = load_engine(config.map(Path::new)).unwrap_or_else(|e| {
        eprintln!("error: failed to load engine spec: {e}");
        std::process::exit(1);
    });
    let digest = spec.digest().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });
    tracing::debug!(name = %spec.name, %digest, "engine loaded");
    LoadedEngine {
        spec,
        engine,
        digest,
        source: config.unwrap_or("<embedded>").to_string(),
    }
}

pub fn print_json<T: Serialize>(payload: &T) {
    let text = serde_json::to_string_pretty(payload).unwrap_or_else(|e| {
        eprintln!("error: failed to render JSON output: {e}");
        std::process::exit(1);
    });
    println!("{text}");
}

pub fn exit_with(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}

pub fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}
