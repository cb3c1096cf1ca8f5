use crate::jsonl::JsonlError;
use fuzzdx_kernel::InferenceError;

/// Errors from turning screening data into engine inputs and scores.
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("indicator `{key}` must be 0 or 1, got {value}")]
    NonBinaryFlag { key: String, value: i64 },

    #[error("indicator group `{group}`: weight for `{key}` must be finite and non-negative, got {weight}")]
    InvalidWeight {
        group: String,
        key: String,
        weight: f64,
    },

    #[error("row {row}: {message}")]
    Clean { row: usize, message: String },

    #[error("test fraction must lie in [0, 1], got {0}")]
    InvalidFraction(f64),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Jsonl(#[from] JsonlError),
}
