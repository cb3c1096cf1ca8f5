//! # fuzzdx Kernel
//!
//! A Mamdani fuzzy inference engine: crisp measurements go in, are
//! fuzzified against linguistic terms, combined by a fixed rule base, and
//! come back out as one crisp score per output variable.
//!
//! This crate is **domain-agnostic**: it does not know what the variables
//! mean. It only prescribes how membership, firing strength, implication,
//! aggregation and defuzzification behave.
//!
//! ## Architecture
//!
//! ```text
//! Universe              ← Discretized domain {min, max, step}
//!     │
//! MembershipShape       ← Triangular(a,b,c) | Gaussian(mean,sigma)
//!     │
//! LinguisticVariable    ← Named universe + named terms, input or output role
//!     │
//! AntecedentExpr        ← Term(v,t) | And(l,r) | Or(l,r)
//!     │
//! RuleBase              ← Ordered, non-empty, immutable rules
//!     │
//! Engine                ← fuzzify → fire → imply → aggregate → centroid
//! ```
//!
//! An [`Engine`] is built once, validated up front, and is read-only
//! afterwards. Every [`Engine::infer`] call owns its own scratch buffers, so
//! one engine can be shared across threads by reference.

pub mod engine;
pub mod error;
pub mod expr;
pub mod membership;
pub mod rule;
pub mod syntax;
pub mod universe;
pub mod variable;

pub use engine::{CrispInputs, Engine, Inference, OutputScore, RuleFiring};
pub use error::{ConfigError, InferenceError};
pub use expr::AntecedentExpr;
pub use membership::{FuzzySet, MembershipShape};
pub use rule::{Consequent, Rule, RuleBase};
pub use syntax::SyntaxError;
pub use universe::{MAX_UNIVERSE_POINTS, Universe};
pub use variable::{LinguisticVariable, TermCurve, VariableRole};
