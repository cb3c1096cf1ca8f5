//! Spec ⇄ engine conversion.

use crate::error::SpecError;
use crate::spec::{EngineSpec, RuleSpec, UniverseSpec, VariableSpec, validate_identifier};
use fuzzdx_kernel::{
    AntecedentExpr, ConfigError, Consequent, Engine, LinguisticVariable, Rule, RuleBase, Universe,
};

/// Validate a spec and build the engine it describes.
///
/// Identifier checks run first, then rule text is parsed, then the kernel
/// resolves every reference. The first failure is returned.
pub fn build_engine(spec: &EngineSpec) -> Result<Engine, SpecError> {
    let variables = spec
        .variables
        .iter()
        .map(build_variable)
        .collect::<Result<Vec<_>, _>>()?;

    let rules = spec
        .rules
        .iter()
        .enumerate()
        .map(|(position, rule)| build_rule(position, rule))
        .collect::<Result<Vec<_>, _>>()?;

    let engine = Engine::new(variables, RuleBase::new(rules)?)?;
    tracing::debug!(name = %spec.name, rules = spec.rules.len(), "engine spec compiled");
    Ok(engine)
}

fn build_variable(spec: &VariableSpec) -> Result<LinguisticVariable, SpecError> {
    validate_identifier("variable", &spec.name)?;
    for term in &spec.terms {
        validate_identifier("term", &term.name)?;
    }
    let UniverseSpec { min, max, step } = spec.universe;
    let universe =
        Universe::new(min, max, step).map_err(|reason| ConfigError::InvalidUniverse {
            variable: spec.name.clone(),
            reason,
        })?;
    Ok(LinguisticVariable::new(
        spec.name.clone(),
        spec.role,
        universe,
        spec.terms.clone(),
    )?)
}

fn build_rule(position: usize, spec: &RuleSpec) -> Result<Rule, SpecError> {
    let id = spec.resolved_id(position);
    let antecedent: AntecedentExpr = spec.when.parse().map_err(|source| SpecError::Syntax {
        rule: id.clone(),
        source,
    })?;
    let consequent: Consequent = spec.then.parse().map_err(|source| SpecError::Syntax {
        rule: id.clone(),
        source,
    })?;
    Ok(Rule::new(id, antecedent, consequent).with_weight(spec.weight.unwrap_or(1.0)))
}

impl EngineSpec {
    /// Describe an already-built engine. Rule text is the canonical
    /// rendering, so parsing it back yields the same expression trees.
    pub fn from_engine(name: impl Into<String>, engine: &Engine) -> Self {
        let variables = engine
            .variables()
            .iter()
            .map(|v| VariableSpec {
                name: v.name().to_string(),
                role: v.role(),
                universe: UniverseSpec {
                    min: v.universe().min(),
                    max: v.universe().max(),
                    step: v.universe().step(),
                },
                terms: v.terms().to_vec(),
            })
            .collect();
        let rules = engine
            .rules()
            .iter()
            .map(|rule| RuleSpec {
                id: Some(rule.id.clone()),
                when: rule.antecedent.to_string(),
                then: rule.consequent.to_string(),
                weight: (rule.weight != 1.0).then_some(rule.weight),
            })
            .collect();
        Self {
            name: name.into(),
            description: None,
            variables,
            rules,
        }
    }
}
