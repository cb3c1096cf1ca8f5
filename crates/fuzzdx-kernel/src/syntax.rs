//! Textual rule syntax.
//!
//! ```text
//! expr     := and_expr ( "or" and_expr )*
//! and_expr := atom ( "and" atom )*
//! atom     := "(" expr ")" | IDENT "is" IDENT
//! ```
//!
//! Keywords are case-insensitive; identifiers are kept verbatim. Both
//! operators are left-associative, matching how [`AntecedentExpr`] renders.

use crate::expr::AntecedentExpr;
use crate::rule::Consequent;
use std::str::FromStr;

/// A parse failure, with the byte offset where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at offset {offset}: {message}")]
pub struct SyntaxError {
    pub offset: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    And,
    Or,
    Is,
    LParen,
    RParen,
}

fn err(offset: usize, message: impl Into<String>) -> SyntaxError {
    SyntaxError {
        offset,
        message: message.into(),
    }
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token<'_>)>, SyntaxError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        let ch = bytes[i];
        if ch.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        match ch {
            b'(' => {
                tokens.push((i, Token::LParen));
                i += 1;
            }
            b')' => {
                tokens.push((i, Token::RParen));
                i += 1;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                let word = &input[start..i];
                let token = match word.to_ascii_lowercase().as_str() {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "is" => Token::Is,
                    _ => Token::Ident(word),
                };
                tokens.push((start, token));
            }
            _ => {
                let bad = input[i..].chars().next().unwrap_or('?');
                return Err(err(i, format!("unexpected character `{bad}`")));
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<(usize, Token<'a>)>,
    pos: usize,
    end: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, SyntaxError> {
        Ok(Self {
            tokens: tokenize(input)?,
            pos: 0,
            end: input.len(),
        })
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(o, _)| *o)
            .unwrap_or(self.end)
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect_ident(&mut self, what: &str) -> Result<&'a str, SyntaxError> {
        let offset = self.offset();
        match self.bump() {
            Some(Token::Ident(name)) => Ok(name),
            Some(other) => Err(err(offset, format!("expected {what}, found {other:?}"))),
            None => Err(err(offset, format!("expected {what}, found end of input"))),
        }
    }

    fn expect_is(&mut self) -> Result<(), SyntaxError> {
        let offset = self.offset();
        match self.bump() {
            Some(Token::Is) => Ok(()),
            _ => Err(err(offset, "expected `is`")),
        }
    }

    fn finish(&self) -> Result<(), SyntaxError> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(err(
                self.offset(),
                format!("unexpected trailing {token:?}"),
            )),
        }
    }

    fn expr(&mut self) -> Result<AntecedentExpr, SyntaxError> {
        let mut lhs = self.and_expr()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.and_expr()?;
            lhs = lhs.or(rhs);
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<AntecedentExpr, SyntaxError> {
        let mut lhs = self.atom()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.atom()?;
            lhs = lhs.and(rhs);
        }
        Ok(lhs)
    }

    fn atom(&mut self) -> Result<AntecedentExpr, SyntaxError> {
        if self.peek() == Some(&Token::LParen) {
            self.pos += 1;
            let inner = self.expr()?;
            let offset = self.offset();
            return match self.bump() {
                Some(Token::RParen) => Ok(inner),
                _ => Err(err(offset, "expected `)`")),
            };
        }
        let variable = self.expect_ident("variable name")?;
        self.expect_is()?;
        let term = self.expect_ident("term name")?;
        Ok(AntecedentExpr::term(variable, term))
    }
}

/// Parse an antecedent such as `symptom is mild and (risk is low or age is young)`.
pub fn parse_antecedent(input: &str) -> Result<AntecedentExpr, SyntaxError> {
    let mut parser = Parser::new(input)?;
    if parser.peek().is_none() {
        return Err(err(0, "empty antecedent"));
    }
    let expr = parser.expr()?;
    parser.finish()?;
    Ok(expr)
}

/// Parse a consequent such as `diagnosis is positive`.
pub fn parse_consequent(input: &str) -> Result<Consequent, SyntaxError> {
    let mut parser = Parser::new(input)?;
    let variable = parser.expect_ident("output variable name")?;
    parser.expect_is()?;
    let term = parser.expect_ident("output term name")?;
    parser.finish()?;
    Ok(Consequent::new(variable, term))
}

impl FromStr for AntecedentExpr {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_antecedent(s)
    }
}

impl FromStr for Consequent {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_consequent(s)
    }
}
