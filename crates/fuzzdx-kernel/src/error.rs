//! Error types for fuzzdx kernel operations.

/// Malformed variable or rule definitions, discovered while building an
/// [`Engine`](crate::Engine). Always fatal: an engine is never partially built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A universe is empty, inverted, or has a non-positive step.
    #[error("invalid universe for `{variable}`: {reason}")]
    InvalidUniverse { variable: String, reason: String },

    /// A membership shape has parameters it cannot be evaluated with.
    #[error("invalid shape for term `{variable}.{term}`: {reason}")]
    InvalidShape {
        variable: String,
        term: String,
        reason: String,
    },

    /// Two variables share a name.
    #[error("duplicate variable: {0}")]
    DuplicateVariable(String),

    /// Two terms of one variable share a name.
    #[error("duplicate term `{term}` in variable `{variable}`")]
    DuplicateTerm { variable: String, term: String },

    /// A variable declares no terms at all.
    #[error("variable `{0}` declares no terms")]
    EmptyVariable(String),

    /// No output variable was declared.
    #[error("no output variable declared")]
    NoOutputVariable,

    /// The rule base is empty.
    #[error("rule base is empty")]
    EmptyRuleBase,

    /// Two rules share an id.
    #[error("duplicate rule id: {0}")]
    DuplicateRuleId(String),

    /// A rule references a variable that was never declared.
    #[error("rule {rule}: unknown variable `{variable}`")]
    UnknownVariable { rule: String, variable: String },

    /// A rule references a term that its variable does not declare.
    #[error("rule {rule}: unknown term `{variable}.{term}`")]
    UnknownTerm {
        rule: String,
        variable: String,
        term: String,
    },

    /// A rule uses a variable in the wrong role (output in an antecedent,
    /// or input in a consequent).
    #[error("rule {rule}: variable `{variable}` cannot be used as {expected}")]
    RoleMismatch {
        rule: String,
        variable: String,
        expected: &'static str,
    },

    /// A rule weight is outside [0, 1] or not finite.
    #[error("rule {rule}: weight {weight} is outside [0, 1]")]
    InvalidWeight { rule: String, weight: f64 },
}

/// Failures of a single inference request. None of these affect the
/// engine or any other request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    /// A rule references an input variable absent from the request.
    #[error("missing input: {variable}")]
    MissingInput { variable: String },

    /// A crisp input is NaN or infinite and cannot be clamped.
    #[error("non-finite input for `{variable}`: {value}")]
    NonFiniteInput { variable: String, value: f64 },

    /// The aggregated curve of an output variable is identically zero.
    /// The result is indeterminate, not zero.
    #[error("no rule fired for output `{variable}`")]
    NoRuleFired { variable: String },

    /// The caller asked for an output variable the engine does not declare.
    #[error("engine has no output variable `{variable}`")]
    UnknownOutput { variable: String },
}
