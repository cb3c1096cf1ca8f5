//! The Mamdani inference pipeline.
//!
//! ```text
//! crisp inputs ─► fuzzify ─► fire rules ─► imply (min) ─► aggregate (max) ─► centroid
//! ```
//!
//! All reference resolution happens once in [`Engine::new`]; rules are
//! compiled to index form so [`Engine::infer`] never looks names up in the
//! hot loop. Consequent term curves over the output grid are sampled at
//! build time too, since they never change.
//!
//! Each `infer` call allocates its own fuzzification table and one
//! aggregation buffer per output variable. Nothing is shared between calls,
//! which is what makes `&Engine` safe to use from any number of threads.

use crate::error::{ConfigError, InferenceError};
use crate::expr::AntecedentExpr;
use crate::rule::{Rule, RuleBase};
use crate::variable::{LinguisticVariable, VariableRole};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Crisp values keyed by input variable name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrispInputs(BTreeMap<String, f64>);

impl CrispInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, variable: impl Into<String>, value: f64) -> Self {
        self.set(variable, value);
        self
    }

    pub fn set(&mut self, variable: impl Into<String>, value: f64) {
        self.0.insert(variable.into(), value);
    }

    pub fn get(&self, variable: &str) -> Option<f64> {
        self.0.get(variable).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for CrispInputs {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Firing strength of one rule for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFiring {
    pub rule_id: String,
    pub strength: f64,
}

/// Defuzzified value of one output variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputScore {
    pub variable: String,
    pub score: f64,
}

/// Result of one inference request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inference {
    /// One score per output variable, in declaration order.
    pub outputs: Vec<OutputScore>,
    /// One entry per rule, in rule-base order.
    pub firings: Vec<RuleFiring>,
}

impl Inference {
    pub fn score(&self, variable: &str) -> Option<f64> {
        self.outputs
            .iter()
            .find(|o| o.variable == variable)
            .map(|o| o.score)
    }
}

#[derive(Debug, Clone)]
enum CompiledExpr {
    Term { variable: usize, term: usize },
    And(Box<CompiledExpr>, Box<CompiledExpr>),
    Or(Box<CompiledExpr>, Box<CompiledExpr>),
}

#[derive(Debug, Clone)]
struct CompiledRule {
    antecedent: CompiledExpr,
    output: usize,
    term: usize,
    weight: f64,
}

/// An output variable with its term curves pre-sampled over the grid.
#[derive(Debug, Clone)]
struct OutputSlot {
    variable: usize,
    grid: Vec<f64>,
    curves: Vec<Vec<f64>>,
}

/// An immutable, validated fuzzy inference system.
#[derive(Debug, Clone)]
pub struct Engine {
    variables: Vec<LinguisticVariable>,
    rules: RuleBase,
    compiled: Vec<CompiledRule>,
    outputs: Vec<OutputSlot>,
}

impl Engine {
    /// Validate and compile. Every reference in every rule must resolve to
    /// a declared variable of the right role and one of its terms.
    pub fn new(variables: Vec<LinguisticVariable>, rules: RuleBase) -> Result<Self, ConfigError> {
        let mut names = BTreeSet::new();
        for variable in &variables {
            if !names.insert(variable.name()) {
                return Err(ConfigError::DuplicateVariable(variable.name().to_string()));
            }
        }

        let outputs: Vec<OutputSlot> = variables
            .iter()
            .enumerate()
            .filter(|(_, v)| v.role() == VariableRole::Output)
            .map(|(index, v)| OutputSlot {
                variable: index,
                grid: v.universe().points().collect(),
                curves: (0..v.terms().len()).map(|t| v.sample_term(t)).collect(),
            })
            .collect();
        if outputs.is_empty() {
            return Err(ConfigError::NoOutputVariable);
        }

        let compiled = rules
            .iter()
            .map(|rule| compile_rule(rule, &variables, &outputs))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            variables = variables.len(),
            outputs = outputs.len(),
            rules = compiled.len(),
            "fuzzy engine built"
        );

        Ok(Self {
            variables,
            rules,
            compiled,
            outputs,
        })
    }

    pub fn variables(&self) -> &[LinguisticVariable] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&LinguisticVariable> {
        self.variables.iter().find(|v| v.name() == name)
    }

    pub fn input_variables(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.variables
            .iter()
            .filter(|v| v.role() == VariableRole::Input)
    }

    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    /// Run one inference request.
    pub fn infer(&self, inputs: &CrispInputs) -> Result<Inference, InferenceError> {
        let table = self.fuzzify(inputs)?;

        let mut firings = Vec::with_capacity(self.compiled.len());
        let mut strengths = Vec::with_capacity(self.compiled.len());
        for (rule, compiled) in self.rules.iter().zip(&self.compiled) {
            let degree = self.evaluate(&compiled.antecedent, &table)?;
            let strength = (degree * compiled.weight).clamp(0.0, 1.0);
            tracing::trace!(rule = %rule.id, strength, "rule fired");
            strengths.push(strength);
            firings.push(RuleFiring {
                rule_id: rule.id.clone(),
                strength,
            });
        }

        let mut outputs = Vec::with_capacity(self.outputs.len());
        for (slot_index, slot) in self.outputs.iter().enumerate() {
            let mut aggregated = vec![0.0f64; slot.grid.len()];
            for (compiled, &strength) in self.compiled.iter().zip(&strengths) {
                if compiled.output != slot_index || strength == 0.0 {
                    continue;
                }
                let curve = &slot.curves[compiled.term];
                for (acc, &mu) in aggregated.iter_mut().zip(curve) {
                    *acc = acc.max(strength.min(mu));
                }
            }

            let variable = self.variables[slot.variable].name();
            let score = centroid(&slot.grid, &aggregated).ok_or_else(|| {
                InferenceError::NoRuleFired {
                    variable: variable.to_string(),
                }
            })?;
            outputs.push(OutputScore {
                variable: variable.to_string(),
                score,
            });
        }

        Ok(Inference { outputs, firings })
    }

    /// Per-variable term degrees for every declared input that was supplied.
    fn fuzzify(&self, inputs: &CrispInputs) -> Result<Vec<Option<Vec<f64>>>, InferenceError> {
        let mut table = Vec::with_capacity(self.variables.len());
        for variable in &self.variables {
            if variable.role() != VariableRole::Input {
                table.push(None);
                continue;
            }
            match inputs.get(variable.name()) {
                Some(value) if !value.is_finite() => {
                    return Err(InferenceError::NonFiniteInput {
                        variable: variable.name().to_string(),
                        value,
                    });
                }
                Some(value) => table.push(Some(variable.fuzzify(value))),
                None => table.push(None),
            }
        }
        Ok(table)
    }

    fn evaluate(
        &self,
        expr: &CompiledExpr,
        table: &[Option<Vec<f64>>],
    ) -> Result<f64, InferenceError> {
        match expr {
            CompiledExpr::Term { variable, term } => match &table[*variable] {
                Some(degrees) => Ok(degrees[*term]),
                None => Err(InferenceError::MissingInput {
                    variable: self.variables[*variable].name().to_string(),
                }),
            },
            CompiledExpr::And(l, r) => Ok(self.evaluate(l, table)?.min(self.evaluate(r, table)?)),
            CompiledExpr::Or(l, r) => Ok(self.evaluate(l, table)?.max(self.evaluate(r, table)?)),
        }
    }
}

/// `Σ y·μ(y) / Σ μ(y)`, or `None` when the curve is identically zero.
fn centroid(grid: &[f64], curve: &[f64]) -> Option<f64> {
    let mut numerator = 0.0f64;
    let mut denominator = 0.0f64;
    for (&y, &mu) in grid.iter().zip(curve) {
        numerator += y * mu;
        denominator += mu;
    }
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

fn compile_rule(
    rule: &Rule,
    variables: &[LinguisticVariable],
    outputs: &[OutputSlot],
) -> Result<CompiledRule, ConfigError> {
    let antecedent = compile_expr(&rule.id, &rule.antecedent, variables)?;

    let consequent = &rule.consequent;
    let (index, variable) = resolve_variable(&rule.id, &consequent.variable, variables)?;
    if variable.role() != VariableRole::Output {
        return Err(ConfigError::RoleMismatch {
            rule: rule.id.clone(),
            variable: consequent.variable.clone(),
            expected: "a consequent (output)",
        });
    }
    let term = resolve_term(&rule.id, variable, &consequent.term)?;
    let output = outputs
        .iter()
        .position(|slot| slot.variable == index)
        .ok_or(ConfigError::NoOutputVariable)?;

    Ok(CompiledRule {
        antecedent,
        output,
        term,
        weight: rule.weight,
    })
}

fn compile_expr(
    rule_id: &str,
    expr: &AntecedentExpr,
    variables: &[LinguisticVariable],
) -> Result<CompiledExpr, ConfigError> {
    match expr {
        AntecedentExpr::Term { variable, term } => {
            let (index, resolved) = resolve_variable(rule_id, variable, variables)?;
            if resolved.role() != VariableRole::Input {
                return Err(ConfigError::RoleMismatch {
                    rule: rule_id.to_string(),
                    variable: variable.clone(),
                    expected: "an antecedent (input)",
                });
            }
            let term = resolve_term(rule_id, resolved, term)?;
            Ok(CompiledExpr::Term {
                variable: index,
                term,
            })
        }
        AntecedentExpr::And(l, r) => Ok(CompiledExpr::And(
            Box::new(compile_expr(rule_id, l, variables)?),
            Box::new(compile_expr(rule_id, r, variables)?),
        )),
        AntecedentExpr::Or(l, r) => Ok(CompiledExpr::Or(
            Box::new(compile_expr(rule_id, l, variables)?),
            Box::new(compile_expr(rule_id, r, variables)?),
        )),
    }
}

fn resolve_variable<'a>(
    rule_id: &str,
    name: &str,
    variables: &'a [LinguisticVariable],
) -> Result<(usize, &'a LinguisticVariable), ConfigError> {
    variables
        .iter()
        .enumerate()
        .find(|(_, v)| v.name() == name)
        .ok_or_else(|| ConfigError::UnknownVariable {
            rule: rule_id.to_string(),
            variable: name.to_string(),
        })
}

fn resolve_term(
    rule_id: &str,
    variable: &LinguisticVariable,
    term: &str,
) -> Result<usize, ConfigError> {
    variable
        .term_index(term)
        .ok_or_else(|| ConfigError::UnknownTerm {
            rule: rule_id.to_string(),
            variable: variable.name().to_string(),
            term: term.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::{FuzzySet, MembershipShape};
    use crate::rule::Consequent;
    use crate::universe::Universe;

    fn grid() -> Universe {
        Universe::new(0.0, 100.0, 1.0).unwrap()
    }

    fn level() -> LinguisticVariable {
        LinguisticVariable::input(
            "level",
            grid(),
            vec![
                FuzzySet::new("low", MembershipShape::triangular(0.0, 0.0, 50.0)),
                FuzzySet::new("high", MembershipShape::triangular(50.0, 100.0, 100.0)),
            ],
        )
        .unwrap()
    }

    fn out() -> LinguisticVariable {
        LinguisticVariable::output(
            "out",
            grid(),
            vec![
                FuzzySet::new("neg", MembershipShape::triangular(0.0, 0.0, 50.0)),
                FuzzySet::new("pos", MembershipShape::triangular(50.0, 100.0, 100.0)),
            ],
        )
        .unwrap()
    }

    fn rule(id: &str, when: AntecedentExpr, term: &str) -> Rule {
        Rule::new(id, when, Consequent::new("out", term))
    }

    fn small_engine() -> Engine {
        let rules = RuleBase::new(vec![
            rule("R1", AntecedentExpr::term("level", "low"), "neg"),
            rule("R2", AntecedentExpr::term("level", "high"), "pos"),
        ])
        .unwrap();
        Engine::new(vec![level(), out()], rules).unwrap()
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn single_full_rule_gives_term_centroid() {
        let engine = small_engine();
        let result = engine
            .infer(&CrispInputs::new().with("level", 100.0))
            .unwrap();
        assert_eq!(result.firings[0].strength, 0.0);
        assert_eq!(result.firings[1].strength, 1.0);
        // Centroid of the discretized right triangle (50, 100, 100).
        let expected: f64 = {
            let mu = |y: f64| if y <= 50.0 { 0.0 } else { (y - 50.0) / 50.0 };
            let num: f64 = (0..=100).map(|y| y as f64 * mu(y as f64)).sum();
            let den: f64 = (0..=100).map(|y| mu(y as f64)).sum();
            num / den
        };
        assert!((result.score("out").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn symmetric_firing_lands_in_the_middle() {
        let engine = small_engine();
        let result = engine.infer(&CrispInputs::new().with("level", 50.0));
        // Both rules have zero strength exactly at the crossover.
        assert_eq!(
            result,
            Err(InferenceError::NoRuleFired {
                variable: "out".to_string()
            })
        );

        let result = engine.infer(&CrispInputs::new().with("level", 25.0)).unwrap();
        assert_eq!(result.firings[0].strength, 0.5);
        assert_eq!(result.firings[1].strength, 0.0);
        assert!(result.score("out").unwrap() < 50.0);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let engine = small_engine();
        let high = engine.infer(&CrispInputs::new().with("level", 100.0)).unwrap();
        let above = engine.infer(&CrispInputs::new().with("level", 250.0)).unwrap();
        assert_eq!(high, above);
    }

    #[test]
    fn missing_and_non_finite_inputs_fail() {
        let engine = small_engine();
        assert_eq!(
            engine.infer(&CrispInputs::new()),
            Err(InferenceError::MissingInput {
                variable: "level".to_string()
            })
        );
        assert!(matches!(
            engine.infer(&CrispInputs::new().with("level", f64::NAN)),
            Err(InferenceError::NonFiniteInput { .. })
        ));
    }

    #[test]
    fn weight_scales_firing_strength() {
        let rules = RuleBase::new(vec![
            rule("R1", AntecedentExpr::term("level", "high"), "pos").with_weight(0.25),
        ])
        .unwrap();
        let engine = Engine::new(vec![level(), out()], rules).unwrap();
        let result = engine.infer(&CrispInputs::new().with("level", 100.0)).unwrap();
        assert_eq!(result.firings[0].strength, 0.25);
    }

    #[test]
    fn zero_weight_rules_never_fire() {
        let rules = RuleBase::new(vec![
            rule("R1", AntecedentExpr::term("level", "high"), "pos").with_weight(0.0),
        ])
        .unwrap();
        let engine = Engine::new(vec![level(), out()], rules).unwrap();
        assert!(matches!(
            engine.infer(&CrispInputs::new().with("level", 100.0)),
            Err(InferenceError::NoRuleFired { .. })
        ));
    }

    #[test]
    fn unresolved_references_fail_at_build_time() {
        let build = |when: AntecedentExpr, then: Consequent| {
            let rules = RuleBase::new(vec![Rule::new("R1", when, then)]).unwrap();
            Engine::new(vec![level(), out()], rules).unwrap_err()
        };

        assert_eq!(
            build(
                AntecedentExpr::term("age", "old"),
                Consequent::new("out", "pos")
            ),
            ConfigError::UnknownVariable {
                rule: "R1".to_string(),
                variable: "age".to_string()
            }
        );
        assert_eq!(
            build(
                AntecedentExpr::term("level", "extreme"),
                Consequent::new("out", "pos")
            ),
            ConfigError::UnknownTerm {
                rule: "R1".to_string(),
                variable: "level".to_string(),
                term: "extreme".to_string()
            }
        );
        assert!(matches!(
            build(
                AntecedentExpr::term("out", "pos"),
                Consequent::new("out", "pos")
            ),
            ConfigError::RoleMismatch { .. }
        ));
        assert!(matches!(
            build(
                AntecedentExpr::term("level", "low"),
                Consequent::new("level", "high")
            ),
            ConfigError::RoleMismatch { .. }
        ));
        assert!(matches!(
            build(
                AntecedentExpr::term("level", "low"),
                Consequent::new("out", "maybe")
            ),
            ConfigError::UnknownTerm { .. }
        ));
    }

    #[test]
    fn duplicate_variables_and_missing_outputs_fail() {
        let rules = RuleBase::new(vec![rule("R1", AntecedentExpr::term("level", "low"), "neg")])
            .unwrap();
        assert_eq!(
            Engine::new(vec![level(), level(), out()], rules.clone()).unwrap_err(),
            ConfigError::DuplicateVariable("level".to_string())
        );
        assert_eq!(
            Engine::new(vec![level()], rules).unwrap_err(),
            ConfigError::NoOutputVariable
        );
    }

    #[test]
    fn centroid_of_zero_curve_is_none() {
        assert_eq!(centroid(&[0.0, 1.0, 2.0], &[0.0, 0.0, 0.0]), None);
        assert_eq!(centroid(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]), Some(1.0));
    }
}
