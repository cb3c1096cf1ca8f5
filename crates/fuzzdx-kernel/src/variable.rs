//! Linguistic variables: a universe plus named terms.

use crate::error::ConfigError;
use crate::membership::FuzzySet;
use crate::universe::Universe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Whether a variable is read by antecedents or written by consequents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableRole {
    Input,
    Output,
}

impl fmt::Display for VariableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

impl std::str::FromStr for VariableRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "input" | "antecedent" => Ok(Self::Input),
            "output" | "consequent" => Ok(Self::Output),
            _ => Err(format!("unknown variable role: {s}")),
        }
    }
}

/// A named universe with an ordered set of named terms.
///
/// Terms may overlap and need not cover the universe. Declaration order is
/// preserved for diagnostics and round-tripping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinguisticVariable {
    name: String,
    role: VariableRole,
    universe: Universe,
    terms: Vec<FuzzySet>,
}

/// One term sampled over its variable's grid, for export and plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermCurve {
    pub term: String,
    pub points: Vec<(f64, f64)>,
}

impl LinguisticVariable {
    /// Build a variable, validating every term's shape and rejecting empty
    /// or duplicated term sets.
    pub fn new(
        name: impl Into<String>,
        role: VariableRole,
        universe: Universe,
        terms: Vec<FuzzySet>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if terms.is_empty() {
            return Err(ConfigError::EmptyVariable(name));
        }

        let mut seen = BTreeSet::new();
        for term in &terms {
            if !seen.insert(term.name.as_str()) {
                return Err(ConfigError::DuplicateTerm {
                    variable: name,
                    term: term.name.clone(),
                });
            }
            term.shape
                .validate()
                .map_err(|reason| ConfigError::InvalidShape {
                    variable: name.clone(),
                    term: term.name.clone(),
                    reason,
                })?;
        }

        Ok(Self {
            name,
            role,
            universe,
            terms,
        })
    }

    /// Convenience for inputs.
    pub fn input(
        name: impl Into<String>,
        universe: Universe,
        terms: Vec<FuzzySet>,
    ) -> Result<Self, ConfigError> {
        Self::new(name, VariableRole::Input, universe, terms)
    }

    /// Convenience for outputs.
    pub fn output(
        name: impl Into<String>,
        universe: Universe,
        terms: Vec<FuzzySet>,
    ) -> Result<Self, ConfigError> {
        Self::new(name, VariableRole::Output, universe, terms)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> VariableRole {
        self.role
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn terms(&self) -> &[FuzzySet] {
        &self.terms
    }

    pub fn term(&self, name: &str) -> Option<&FuzzySet> {
        self.terms.iter().find(|t| t.name == name)
    }

    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.name == name)
    }

    /// Degrees of every term at `x`, in declaration order, after clamping
    /// `x` into the universe.
    pub fn fuzzify(&self, x: f64) -> Vec<f64> {
        let x = self.universe.clamp(x);
        self.terms.iter().map(|t| t.evaluate(x)).collect()
    }

    /// Sample one term over the grid.
    pub fn sample_term(&self, index: usize) -> Vec<f64> {
        let term = &self.terms[index];
        self.universe.points().map(|x| term.evaluate(x)).collect()
    }

    /// Every term sampled over the grid.
    pub fn curves(&self) -> Vec<TermCurve> {
        self.terms
            .iter()
            .map(|term| TermCurve {
                term: term.name.clone(),
                points: self
                    .universe
                    .points()
                    .map(|x| (x, term.evaluate(x)))
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::MembershipShape;

    fn grid() -> Universe {
        Universe::new(0.0, 100.0, 1.0).unwrap()
    }

    fn symptom() -> LinguisticVariable {
        LinguisticVariable::input(
            "symptom",
            grid(),
            vec![
                FuzzySet::new("mild", MembershipShape::triangular(0.0, 0.0, 40.0)),
                FuzzySet::new("moderate", MembershipShape::triangular(30.0, 50.0, 70.0)),
                FuzzySet::new("severe", MembershipShape::triangular(60.0, 100.0, 100.0)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn fuzzify_reports_overlapping_degrees_in_order() {
        let v = symptom();
        assert_eq!(v.fuzzify(35.0), vec![0.125, 0.25, 0.0]);
        assert_eq!(v.fuzzify(65.0), vec![0.0, 0.25, 0.125]);
    }

    #[test]
    fn fuzzify_clamps_out_of_range_inputs() {
        let v = symptom();
        assert_eq!(v.fuzzify(140.0), v.fuzzify(100.0));
        assert_eq!(v.fuzzify(-3.0), v.fuzzify(0.0));
        assert_eq!(v.fuzzify(140.0), vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn term_lookup_by_name() {
        let v = symptom();
        assert_eq!(v.term_index("moderate"), Some(1));
        assert_eq!(v.term_index("extreme"), None);
        assert!(v.term("severe").is_some());
    }

    #[test]
    fn duplicate_terms_are_rejected() {
        let err = LinguisticVariable::input(
            "risk",
            grid(),
            vec![
                FuzzySet::new("low", MembershipShape::triangular(0.0, 0.0, 40.0)),
                FuzzySet::new("low", MembershipShape::triangular(30.0, 50.0, 70.0)),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateTerm {
                variable: "risk".to_string(),
                term: "low".to_string()
            }
        );
    }

    #[test]
    fn empty_and_invalid_terms_are_rejected() {
        assert_eq!(
            LinguisticVariable::input("age", grid(), vec![]).unwrap_err(),
            ConfigError::EmptyVariable("age".to_string())
        );
        let err = LinguisticVariable::input(
            "age",
            grid(),
            vec![FuzzySet::new("young", MembershipShape::gaussian(25.0, 0.0))],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidShape { .. }));
    }

    #[test]
    fn curves_cover_the_whole_grid() {
        let curves = symptom().curves();
        assert_eq!(curves.len(), 3);
        assert!(curves.iter().all(|c| c.points.len() == 101));
        assert_eq!(curves[2].points[100], (100.0, 1.0));
    }

    #[test]
    fn role_parses_from_either_vocabulary() {
        assert_eq!("input".parse::<VariableRole>().unwrap(), VariableRole::Input);
        assert_eq!(
            "Consequent".parse::<VariableRole>().unwrap(),
            VariableRole::Output
        );
        assert!("hidden".parse::<VariableRole>().is_err());
    }
}
