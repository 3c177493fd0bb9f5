// src/parser.rs
use std::collections::VecDeque;

use tracing::debug;

use crate::errors::ParseError;
use crate::expression::ExpressionNode;
use crate::operators::Operator;
use crate::path::PropertyPath;
use crate::scanner::Scanner;
use crate::value::Value;

/// Builds an expression tree from a prefix-notation token stream.
///
/// Every token must be consumed: a stream that ends early or carries extra
/// tokens after the root expression is rejected.
pub fn parse<I, S>(tokens: I) -> Result<ExpressionNode, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut p = Parser::new(tokens);
    if p.tokens.is_empty() {
        return Err(ParseError::EmptyQuery);
    }
    let root = p.parse_node()?;
    if !p.tokens.is_empty() {
        return Err(ParseError::TrailingTokens(p.tokens.len()));
    }
    Ok(root)
}

pub struct Parser {
    tokens: VecDeque<String>,
    /// Literals in the order they were popped, for `$n` back-references.
    emitted: Vec<Value>,
}

impl Parser {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            emitted: Vec::new(),
        }
    }

    pub fn parse_node(&mut self) -> Result<ExpressionNode, ParseError> {
        let token = self.tokens.pop_front().ok_or(ParseError::EmptyQuery)?;
        match Operator::lookup(&token) {
            Some(op) => self.parse_operator(op, token),
            None => self.classify(token),
        }
    }

    fn parse_operator(&mut self, op: Operator, spelling: String) -> Result<ExpressionNode, ParseError> {
        let arity = op.arity();
        if self.tokens.len() < arity {
            return Err(ParseError::UnexpectedEnd {
                operator: spelling,
                expected: arity,
                found: self.tokens.len(),
            });
        }
        let mut children = Vec::with_capacity(arity);
        for found in 0..arity {
            if self.tokens.is_empty() {
                return Err(ParseError::UnexpectedEnd {
                    operator: spelling,
                    expected: arity,
                    found,
                });
            }
            children.push(self.parse_node()?);
        }
        Ok(ExpressionNode::Operator {
            op,
            spelling,
            children,
        })
    }

    /// Literal classification, first match wins: integer, float, boolean,
    /// back-reference, property path, bare string.
    fn classify(&mut self, token: String) -> Result<ExpressionNode, ParseError> {
        if Operator::looks_like_operator(&token) {
            return Err(ParseError::UnknownOperator(token));
        }
        if let Some(n) = Scanner::new(&token).parse_number_literal() {
            return Ok(self.emit(n));
        }
        if token.eq_ignore_ascii_case("true") {
            return Ok(self.emit(Value::Bool(true)));
        }
        if token.eq_ignore_ascii_case("false") {
            return Ok(self.emit(Value::Bool(false)));
        }
        if let Some(v) = self.back_reference(&token) {
            debug!(%token, value = %v, "back-reference");
            return Ok(ExpressionNode::Literal(v));
        }
        if let Ok(path) = token.parse::<PropertyPath>() {
            return Ok(ExpressionNode::PropertyPath(path));
        }
        Ok(self.emit(Value::String(token)))
    }

    /// `$n` names the n-th literal emitted so far (1-based). Anything out of
    /// range is not a back-reference.
    fn back_reference(&self, token: &str) -> Option<Value> {
        let digits = token.strip_prefix('$')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let n = digits.parse::<usize>().ok()?;
        n.checked_sub(1).and_then(|i| self.emitted.get(i)).cloned()
    }

    fn emit(&mut self, v: Value) -> ExpressionNode {
        self.emitted.push(v.clone());
        ExpressionNode::Literal(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lit(v: impl Into<Value>) -> ExpressionNode {
        ExpressionNode::Literal(v.into())
    }

    fn path(s: &str) -> ExpressionNode {
        ExpressionNode::PropertyPath(s.parse().unwrap())
    }

    fn children(node: &ExpressionNode) -> &[ExpressionNode] {
        match node {
            ExpressionNode::Operator { children, .. } => children,
            other => panic!("not an operator: {other}"),
        }
    }

    #[test]
    fn builds_nested_tree() {
        let tree = parse(["-and", "-eq", ".First", "Jon", "-eq", ".Last", "Snow"]).unwrap();
        assert_eq!(
            tree.to_string(),
            r#"(-and (-eq .First "Jon") (-eq .Last "Snow"))"#
        );
        assert_eq!(tree.token_count(), 7);
    }

    #[test]
    fn keeps_operator_casing() {
        let tree = parse(["-EQ", ".arr", "3"]).unwrap();
        match &tree {
            ExpressionNode::Operator { op, spelling, .. } => {
                assert_eq!(*op, Operator::Eq);
                assert_eq!(spelling, "-EQ");
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn classifies_literals() {
        let tree = parse(["-in", "-eq", "12", "-1.5", "-eq", "TRUE", "x"]).unwrap();
        let kids = children(&tree);
        assert_eq!(children(&kids[0]), &[lit(12i64), lit(-1.5)]);
        assert_eq!(children(&kids[1]), &[lit(true), lit("x")]);
    }

    #[test]
    fn numeric_looking_paths_stay_paths() {
        let tree = parse(["-eq", ".5", "1."]).unwrap();
        assert_eq!(children(&tree), &[path(".5"), lit("1.")]);
    }

    #[test]
    fn back_reference_follows_pop_order() {
        let tree = parse(["-or", "-eq", ".a", "foo", "-eq", ".b", "$1"]).unwrap();
        let kids = children(&tree);
        assert_eq!(children(&kids[1]), &[path(".b"), lit("foo")]);
    }

    #[test]
    fn back_reference_keeps_type_and_skips_paths() {
        let tree = parse(["-and", "-eq", ".a", "7", "-eq", "$1", "$2"]).unwrap();
        let kids = children(&tree);
        assert_eq!(children(&kids[1]), &[lit(7i64), lit("$2")]);
    }

    #[test]
    fn out_of_range_back_reference_is_a_string() {
        let tree = parse(["-eq", "$0", "$1"]).unwrap();
        assert_eq!(children(&tree), &[lit("$0"), lit("$0")]);
    }

    #[test]
    fn arity_errors() {
        assert_eq!(
            parse(["-eq", ".a"]).unwrap_err(),
            ParseError::UnexpectedEnd {
                operator: "-eq".into(),
                expected: 2,
                found: 1
            }
        );
        assert_eq!(
            parse(["-and", "-not", "x"]).unwrap_err(),
            ParseError::UnexpectedEnd {
                operator: "-and".into(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn stream_errors() {
        assert_eq!(parse(Vec::<String>::new()).unwrap_err(), ParseError::EmptyQuery);
        assert_eq!(parse(["-ex", ".a", "b"]).unwrap_err(), ParseError::TrailingTokens(1));
        assert_eq!(
            parse(["-equals", ".a", "b"]).unwrap_err(),
            ParseError::UnknownOperator("-equals".into())
        );
    }
}
