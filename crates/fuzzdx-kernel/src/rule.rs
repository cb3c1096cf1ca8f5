//! Rules and the ordered rule base.

use crate::error::ConfigError;
use crate::expr::AntecedentExpr;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// `output_variable is output_term`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Consequent {
    pub variable: String,
    pub term: String,
}

impl Consequent {
    pub fn new(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            term: term.into(),
        }
    }
}

impl fmt::Display for Consequent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is {}", self.variable, self.term)
    }
}

/// One IF-THEN rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Stable label used in diagnostics and error messages.
    pub id: String,
    pub antecedent: AntecedentExpr,
    pub consequent: Consequent,
    /// Scales the firing strength; must lie in `[0, 1]`.
    pub weight: f64,
}

impl Rule {
    pub fn new(id: impl Into<String>, antecedent: AntecedentExpr, consequent: Consequent) -> Self {
        Self {
            id: id.into(),
            antecedent,
            consequent,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: if {} then {}",
            self.id, self.antecedent, self.consequent
        )?;
        if self.weight != 1.0 {
            write!(f, " [weight {}]", self.weight)?;
        }
        Ok(())
    }
}

/// A non-empty, ordered, immutable sequence of rules.
///
/// Min and max are order-independent, so ordering never changes a score;
/// it is preserved so diagnostics list rules the way they were declared.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleBase {
    rules: Vec<Rule>,
}

impl RuleBase {
    pub fn new(rules: Vec<Rule>) -> Result<Self, ConfigError> {
        if rules.is_empty() {
            return Err(ConfigError::EmptyRuleBase);
        }
        let mut seen = BTreeSet::new();
        for rule in &rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(ConfigError::DuplicateRuleId(rule.id.clone()));
            }
            if !(rule.weight.is_finite() && (0.0..=1.0).contains(&rule.weight)) {
                return Err(ConfigError::InvalidWeight {
                    rule: rule.id.clone(),
                    weight: rule.weight,
                });
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Never true for a constructed rule base.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl<'a> IntoIterator for &'a RuleBase {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl fmt::Display for RuleBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}
