// src/expression.rs
use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::operators::Operator;
use crate::path::PropertyPath;
use crate::value::Value;

/// A node of a compiled query. Built once by the parser and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExpressionNode {
    Literal(Value),
    PropertyPath(PropertyPath),
    Operator {
        op: Operator,
        /// The token as typed; its casing selects the quantifier.
        spelling: String,
        /// Always exactly `op.arity()` entries.
        children: Vec<ExpressionNode>,
    },
}

impl ExpressionNode {
    /// Number of tokens this subtree was built from.
    pub fn token_count(&self) -> usize {
        match self {
            ExpressionNode::Operator { children, .. } => {
                1 + children.iter().map(ExpressionNode::token_count).sum::<usize>()
            }
            _ => 1,
        }
    }

    /// Visits every node, parents before children.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a ExpressionNode)) {
        f(self);
        if let ExpressionNode::Operator { children, .. } = self {
            for c in children {
                c.walk(f);
            }
        }
    }
}

impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionNode::Literal(Value::String(s)) => write!(f, "{s:?}"),
            ExpressionNode::Literal(v) => write!(f, "{v}"),
            ExpressionNode::PropertyPath(p) => write!(f, "{p}"),
            ExpressionNode::Operator {
                spelling, children, ..
            } => write!(f, "({} {})", spelling, children.iter().join(" ")),
        }
    }
}
