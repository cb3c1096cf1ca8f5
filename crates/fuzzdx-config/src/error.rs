use fuzzdx_kernel::{ConfigError, SyntaxError};

/// Errors raised while loading or building an engine specification.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("failed to read file: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid json at {path}: {source}")]
    ParseJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported spec format for {0} (expected .toml or .json)")]
    UnsupportedFormat(String),

    #[error("failed to serialize spec: {0}")]
    Serialize(String),

    #[error("invalid {kind} name `{name}`")]
    InvalidIdentifier { kind: &'static str, name: String },

    #[error("rule {rule}: {source}")]
    Syntax {
        rule: String,
        #[source]
        source: SyntaxError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
