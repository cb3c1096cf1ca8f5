//! # fuzzdx Screen
//!
//! The screening layer around the fuzzy engine.
//!
//! This crate provides:
//! - weighted indicator groups turning 0/1 flags into symptom and risk scores
//! - [`ScreeningInputs`], [`score_screening`] and the [`Label`] policy
//! - [`PatientRecord`] and survey cleaning
//! - JSONL dataset read/write
//! - batch scoring across threads, stratified split, evaluation metrics
//!
//! ## Data flow
//!
//! ```text
//! raw survey rows ─► clean ─► PatientRecord ─► IndicatorGroup ─► ScreeningInputs
//!                                                                      │
//!                                             Label ◄─ score ◄─ Engine ┘
//! ```

pub mod batch;
pub mod clean;
pub mod error;
pub mod indicators;
pub mod jsonl;
pub mod metrics;
pub mod record;
pub mod screening;
pub mod split;

pub use batch::{
    Normalization, Outcome, ScoredRecord, batch_inputs, default_threads, score_batch,
};
pub use clean::{CleanReport, RawRow, clean_row, clean_rows, normalize_column};
pub use error::ScoreError;
pub use indicators::{Flags, IndicatorGroup, IndicatorWeight};
pub use jsonl::{JsonlError, read_jsonl, read_jsonl_from_path, write_jsonl, write_jsonl_to_path};
pub use metrics::{ConfusionMatrix, LOG_LOSS_EPSILON, Metrics, evaluate};
pub use record::PatientRecord;
pub use screening::{
    Assessment, Label, POSITIVE_THRESHOLD, Screener, ScreeningInputs, score_screening,
};
pub use split::{Split, stratified_split};
