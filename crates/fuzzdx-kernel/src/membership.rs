//! Membership function library.
//!
//! Shapes are pure functions `x → [0, 1]`. They know nothing about
//! universes; clamping a crisp input to its universe happens one level up,
//! in [`LinguisticVariable::fuzzify`](crate::LinguisticVariable::fuzzify).

use serde::{Deserialize, Serialize};

/// The shape of a fuzzy set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MembershipShape {
    /// Zero outside `[a, c]`, rising linearly to 1 at `b`, falling linearly
    /// back to 0 at `c`. With `a == b` (or `b == c`) the corresponding ramp
    /// collapses into a step and the set is 1 at the shared point.
    Triangular { a: f64, b: f64, c: f64 },

    /// `exp(-(x - mean)^2 / (2 sigma^2))`. Never clipped; the tails are
    /// tiny but nonzero.
    Gaussian { mean: f64, sigma: f64 },
}

impl MembershipShape {
    pub fn triangular(a: f64, b: f64, c: f64) -> Self {
        Self::Triangular { a, b, c }
    }

    pub fn gaussian(mean: f64, sigma: f64) -> Self {
        Self::Gaussian { mean, sigma }
    }

    /// Check the parameters can be evaluated. Returns a human-readable
    /// reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        match *self {
            Self::Triangular { a, b, c } => {
                if !(a.is_finite() && b.is_finite() && c.is_finite()) {
                    return Err(format!("triangular({a}, {b}, {c}) has non-finite parameters"));
                }
                if !(a <= b && b <= c) {
                    return Err(format!("triangular({a}, {b}, {c}) requires a <= b <= c"));
                }
                Ok(())
            }
            Self::Gaussian { mean, sigma } => {
                if !(mean.is_finite() && sigma.is_finite()) {
                    return Err(format!("gaussian({mean}, {sigma}) has non-finite parameters"));
                }
                if sigma <= 0.0 {
                    return Err(format!("gaussian sigma ({sigma}) must be positive"));
                }
                Ok(())
            }
        }
    }

    /// Degree of membership of `x`, always within `[0, 1]`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let degree = match *self {
            Self::Triangular { a, b, c } => {
                if x < a || x > c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            Self::Gaussian { mean, sigma } => {
                let d = x - mean;
                (-(d * d) / (2.0 * sigma * sigma)).exp()
            }
        };
        degree.clamp(0.0, 1.0)
    }
}

/// A named fuzzy set: one term of a linguistic variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzySet {
    pub name: String,
    #[serde(flatten)]
    pub shape: MembershipShape,
}

impl FuzzySet {
    pub fn new(name: impl Into<String>, shape: MembershipShape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.shape.evaluate(x)
    }
}
