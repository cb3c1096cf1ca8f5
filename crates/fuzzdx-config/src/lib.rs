//! # fuzzdx Config
//!
//! Declarative engine specifications. A spec names the variables, their
//! universes and term shapes, and the rules in textual form:
//!
//! ```toml
//! [[rules]]
//! id = "R1"
//! when = "symptom is severe or risk is high"
//! then = "diagnosis is positive"
//! ```
//!
//! [`build_engine`] turns a spec into a validated [`fuzzdx_kernel::Engine`];
//! [`EngineSpec::from_engine`] goes the other way. The canonical lung
//! screening rule base is embedded and available through [`canonical`].

pub mod canonical;
pub mod compile;
pub mod error;
pub mod spec;

pub use canonical::{
    AGE, DIAGNOSIS, DIAGNOSIS_BOUNDARY, RISK, SYMPTOM, lung_screening, lung_screening_engine,
};
pub use compile::build_engine;
pub use error::SpecError;
pub use spec::{EngineSpec, RuleSpec, SPEC_DIGEST_PREFIX, UniverseSpec, VariableSpec};

use fuzzdx_kernel::Engine;
use std::path::Path;

/// Load a spec from disk, or the canonical one when no path is given, and
/// build it. Returns the spec alongside so callers can report its digest.
pub fn load_engine(path: Option<&Path>) -> Result<(EngineSpec, Engine), SpecError> {
    let spec = match path {
        Some(path) => EngineSpec::load(path)?,
        None => lung_screening()?,
    };
    let engine = build_engine(&spec)?;
    Ok((spec, engine))
}
