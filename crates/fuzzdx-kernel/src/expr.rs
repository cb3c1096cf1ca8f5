//! Rule antecedents as an explicit expression tree.
//!
//! `And` is `min`, `Or` is `max`. Trees are built with plain constructors
//! or parsed from text (see [`crate::syntax`]); `Display` renders the
//! canonical text form, which re-parses into the identical tree.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AntecedentExpr {
    /// `variable is term`
    Term { variable: String, term: String },
    And(Box<AntecedentExpr>, Box<AntecedentExpr>),
    Or(Box<AntecedentExpr>, Box<AntecedentExpr>),
}

impl AntecedentExpr {
    pub fn term(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self::Term {
            variable: variable.into(),
            term: term.into(),
        }
    }

    pub fn and(self, other: Self) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Self) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Or(..) => 0,
            Self::And(..) => 1,
            Self::Term { .. } => 2,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min_precedence: u8) -> fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for AntecedentExpr {
    // Operators are left-associative, so a right operand of equal precedence
    // needs parentheses to keep the tree shape through a re-parse.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term { variable, term } => write!(f, "{variable} is {term}"),
            Self::And(l, r) => {
                l.fmt_operand(f, 1)?;
                f.write_str(" and ")?;
                r.fmt_operand(f, 2)
            }
            Self::Or(l, r) => {
                l.fmt_operand(f, 0)?;
                f.write_str(" or ")?;
                r.fmt_operand(f, 1)
            }
        }
    }
}
