//! Lifting scalar predicates over list-shaped operands.
//!
//! A list operand is tested element by element, a scalar operand is tested as
//! is, and two lists are paired up by position. The [`Quantifier`] decides
//! whether one passing pairing is enough or every pairing has to pass.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::errors::Diagnostic;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quantifier {
    Any,
    All,
}

/// Raised when an operand has the wrong shape for a predicate, e.g. a
/// string given to `and` or an object given to `mt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    pub left: &'static str,
    pub right: &'static str,
}

impl TypeMismatch {
    pub fn new(a: &Value, b: &Value) -> Self {
        Self {
            left: a.type_name(),
            right: b.type_name(),
        }
    }
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot apply to {} and {}", self.left, self.right)
    }
}

/// What a predicate returns for one pairing. A mismatch counts as `false`.
pub type Outcome = Result<bool, TypeMismatch>;

impl Quantifier {
    /// Picks the quantifier from how an operator token was typed: all lower
    /// case is `Any`, all upper case is `All`.
    pub fn from_spelling(spelling: &str) -> Result<Quantifier, Diagnostic> {
        let letters = spelling.chars().filter(|c| c.is_alphabetic());
        let (mut lower, mut upper) = (false, false);
        for c in letters {
            lower |= c.is_lowercase();
            upper |= c.is_uppercase();
        }
        match (lower, upper) {
            (_, false) => Ok(Quantifier::Any),
            (false, true) => Ok(Quantifier::All),
            (true, true) => Err(Diagnostic::MixedCaseOperator {
                spelling: spelling.to_string(),
            }),
        }
    }

    fn reduce(self, mut results: impl Iterator<Item = bool>) -> bool {
        match self {
            Quantifier::Any => results.any(|r| r),
            Quantifier::All => results.all(|r| r),
        }
    }
}

fn settle(outcome: Outcome) -> bool {
    outcome.unwrap_or_else(|e| {
        trace!(error = %e, "pairing evaluates to false");
        false
    })
}

/// Applies a one-operand predicate, broadcasting over a list operand.
pub fn apply_unary<F>(q: Quantifier, pred: F, a: &Value) -> bool
where
    F: Fn(&Value) -> Outcome,
{
    match a {
        Value::List(items) => q.reduce(items.iter().map(|x| settle(pred(x)))),
        _ => settle(pred(a)),
    }
}

/// Applies a two-operand predicate across the shapes of `a` and `b`.
///
/// A scalar is paired with every element of a list operand. Two lists are
/// zipped, stopping at the end of the shorter one.
pub fn apply_binary<F>(q: Quantifier, pred: F, a: &Value, b: &Value) -> bool
where
    F: Fn(&Value, &Value) -> Outcome,
{
    let holds = |x: &Value, y: &Value| settle(pred(x, y));
    match (a, b) {
        (Value::List(xs), Value::List(ys)) => q.reduce(xs.iter().zip(ys).map(|(x, y)| holds(x, y))),
        (Value::List(xs), _) => q.reduce(xs.iter().map(|x| holds(x, b))),
        (_, Value::List(ys)) => q.reduce(ys.iter().map(|y| holds(a, y))),
        _ => holds(a, b),
    }
}
