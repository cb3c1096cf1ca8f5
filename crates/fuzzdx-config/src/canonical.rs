//! The lung-screening rule base shipped with the crate.

use crate::compile::build_engine;
use crate::error::SpecError;
use crate::spec::EngineSpec;
use fuzzdx_kernel::Engine;

pub const LUNG_SCREENING_TOML: &str = include_str!("../config/lung_screening.toml");

pub const AGE: &str = "age";
pub const SYMPTOM: &str = "symptom";
pub const RISK: &str = "risk";
pub const DIAGNOSIS: &str = "diagnosis";

/// Negative/positive boundary on the diagnosis universe. The `negative`
/// term ends and the `positive` term starts here.
pub const DIAGNOSIS_BOUNDARY: f64 = 55.0;

pub fn lung_screening() -> Result<EngineSpec, SpecError> {
    EngineSpec::from_toml_str(LUNG_SCREENING_TOML, "lung_screening.toml")
}

pub fn lung_screening_engine() -> Result<Engine, SpecError> {
    build_engine(&lung_screening()?)
}
