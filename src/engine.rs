use std::cmp::Ordering;
use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::broadcast::{apply_binary, apply_unary, Outcome, Quantifier, TypeMismatch};
use crate::comparison::Comparer;
use crate::context::Context;
use crate::errors::{Diagnostic, JqlError, Result};
use crate::expression::ExpressionNode;
use crate::operators::Operator;
use crate::path::{self, PropertyPath};
use crate::value::Value;

/// How many times a path found inside a document may lead to another path.
const MAX_EXPANSION_DEPTH: usize = 16;

/// How many nested paths one top-level lookup may resolve in total.
const MAX_EXPANSIONS: usize = 4096;

/// Result of running a query against one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub matched: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Walks an expression tree against a document.
///
/// Holds only read-only state (the run context and the regexes compiled from
/// literal patterns), so one instance can serve any number of documents,
/// including from several threads at once.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    ctx: Context,
    comparer: Comparer,
    patterns: HashMap<String, Regex>,
}

impl Evaluator {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            comparer: ctx.comparer(),
            patterns: HashMap::new(),
        }
    }

    /// Compiles the literal patterns of every `mt`/`rx` in `tree` up front.
    /// Patterns that fail to compile are left for evaluation to report.
    pub fn with_patterns(mut self, tree: &ExpressionNode) -> Self {
        let mut texts = Vec::new();
        tree.walk(&mut |node| {
            if let ExpressionNode::Operator {
                op: Operator::Mt | Operator::Rx,
                children,
                ..
            } = node
            {
                if let Some(ExpressionNode::Literal(v)) = children.get(1) {
                    texts.push(v.render());
                }
            }
        });
        for text in texts {
            if let Ok(re) = self.build_regex(&text) {
                self.patterns.insert(text, re);
            }
        }
        self
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Evaluates `node` against `document`. Diagnostics are logged and
    /// otherwise dropped; use [`Evaluator::verdict`] to collect them.
    pub fn evaluate(&self, document: &Value, node: &ExpressionNode) -> Value {
        let mut diagnostics = Vec::new();
        self.eval_node(document, node, &mut diagnostics)
    }

    /// Evaluates a whole query. The root has to come out as a boolean.
    pub fn verdict(&self, document: &Value, tree: &ExpressionNode) -> Result<Verdict> {
        let mut diagnostics = Vec::new();
        match self.eval_node(document, tree, &mut diagnostics) {
            Value::Bool(matched) => Ok(Verdict {
                matched,
                diagnostics,
            }),
            other => Err(JqlError::NonBooleanRoot {
                rendered: other.render(),
            }),
        }
    }

    fn eval_node(&self, root: &Value, node: &ExpressionNode, diags: &mut Vec<Diagnostic>) -> Value {
        match node {
            ExpressionNode::Literal(v) => v.clone(),
            // Paths are always resolved from the document root.
            ExpressionNode::PropertyPath(p) => self.lookup(root, p, &mut Expansion::default()),
            ExpressionNode::Operator {
                op,
                spelling,
                children,
            } => {
                // Only hand-built trees get here; the parser enforces arity.
                if children.len() != op.arity() {
                    debug!(
                        operator = %spelling,
                        expected = op.arity(),
                        found = children.len(),
                        "wrong number of operands, evaluating to false"
                    );
                    return Value::Bool(false);
                }
                let args = children
                    .iter()
                    .map(|c| self.eval_node(root, c, diags))
                    .collect::<Vec<_>>();
                self.dispatch(*op, spelling, children, &args, diags)
            }
        }
    }

    fn dispatch(
        &self,
        op: Operator,
        spelling: &str,
        children: &[ExpressionNode],
        args: &[Value],
        diags: &mut Vec<Diagnostic>,
    ) -> Value {
        match op {
            Operator::Len => length(&args[0]),
            Operator::Ex => Value::Bool(!args[0].is_absent()),
            Operator::Nex => Value::Bool(args[0].is_absent()),
            _ => match Quantifier::from_spelling(spelling) {
                Ok(q) => Value::Bool(self.broadcast(op, q, children, args, diags)),
                Err(d) => {
                    report(d, diags);
                    Value::Bool(false)
                }
            },
        }
    }

    fn broadcast(
        &self,
        op: Operator,
        q: Quantifier,
        children: &[ExpressionNode],
        args: &[Value],
        diags: &mut Vec<Diagnostic>,
    ) -> bool {
        let c = &self.comparer;
        let ordered = |pred: fn(Ordering) -> bool| {
            apply_binary(q, |a, b| Ok(c.test(a, b, pred)), &args[0], &args[1])
        };
        match op {
            Operator::Not => apply_unary(q, |a| truth(a).map(|t| !t), &args[0]),
            Operator::And => apply_binary(q, |a, b| Ok(truth(a)? && truth(b)?), &args[0], &args[1]),
            Operator::Or => apply_binary(q, |a, b| Ok(truth(a)? || truth(b)?), &args[0], &args[1]),
            Operator::In => apply_unary(q, |n| self.contains(&args[1], n), &args[0]),
            Operator::Nin => apply_unary(q, |n| self.contains(&args[1], n).map(|r| !r), &args[0]),
            Operator::Eq => ordered(Ordering::is_eq),
            Operator::Ne => ordered(Ordering::is_ne),
            Operator::Lt => ordered(Ordering::is_lt),
            Operator::Le => ordered(Ordering::is_le),
            Operator::Gt => ordered(Ordering::is_gt),
            Operator::Ge => ordered(Ordering::is_ge),
            Operator::Mt | Operator::Rx => self.search(q, &children[1], &args[0], &args[1], diags),
            Operator::Obj => apply_unary(q, |a| Ok(a.is_object()), &args[0]),
            Operator::Arr => apply_unary(q, |a| Ok(a.is_array()), &args[0]),
            Operator::Str => apply_unary(q, |a| Ok(a.is_string()), &args[0]),
            Operator::Num => apply_unary(q, |a| Ok(a.is_number()), &args[0]),
            Operator::Bool => apply_unary(q, |a| Ok(a.is_bool()), &args[0]),
            // Not broadcast; handled in dispatch.
            Operator::Ex | Operator::Nex | Operator::Len => false,
        }
    }

    /// Is `needle` in `haystack`? Lists hold elements, strings hold
    /// substrings and objects hold keys.
    fn contains(&self, haystack: &Value, needle: &Value) -> Outcome {
        let c = &self.comparer;
        match haystack {
            Value::List(items) => Ok(items.iter().any(|x| c.test(needle, x, Ordering::is_eq))),
            Value::String(s) => {
                let text = scalar_text(needle).ok_or_else(|| TypeMismatch::new(needle, haystack))?;
                Ok(c.fold(s).contains(c.fold(&text).as_ref()))
            }
            Value::Object(map) => {
                let key = scalar_text(needle).ok_or_else(|| TypeMismatch::new(needle, haystack))?;
                let key = c.fold(&key);
                Ok(map.keys().any(|k| c.fold(k) == key))
            }
            _ => Ok(c.test(needle, haystack, Ordering::is_eq)),
        }
    }

    /// `mt`/`rx`: searches `pattern` in `subject`.
    fn search(
        &self,
        q: Quantifier,
        pattern_node: &ExpressionNode,
        subject: &Value,
        pattern: &Value,
        diags: &mut Vec<Diagnostic>,
    ) -> bool {
        if subject.is_absent() {
            return false;
        }
        if pattern.is_absent() {
            report(
                Diagnostic::InvalidRegularExpression {
                    operand: pattern_node.to_string(),
                    reason: "pattern is absent".into(),
                },
                diags,
            );
            return false;
        }

        // Compile everything first so failures can be reported once.
        let texts: Vec<String> = match pattern {
            Value::List(items) => items.iter().filter_map(scalar_text).collect(),
            other => scalar_text(other).into_iter().collect(),
        };
        let mut compiled: HashMap<&str, Regex> = HashMap::new();
        for text in &texts {
            let re = match self.patterns.get(text) {
                Some(re) => Ok(re.clone()),
                None => self.build_regex(text),
            };
            match re {
                Ok(re) => {
                    compiled.insert(text.as_str(), re);
                }
                Err(e) => report(
                    Diagnostic::InvalidRegularExpression {
                        operand: text.clone(),
                        reason: e.to_string(),
                    },
                    diags,
                ),
            }
        }

        apply_binary(
            q,
            |s, p| {
                let (Some(s), Some(p)) = (scalar_text(s), scalar_text(p)) else {
                    return Err(TypeMismatch::new(s, p));
                };
                Ok(compiled.get(p.as_str()).is_some_and(|re| re.is_match(&s)))
            },
            subject,
            pattern,
        )
    }

    fn build_regex(&self, text: &str) -> std::result::Result<Regex, regex::Error> {
        RegexBuilder::new(text)
            .case_insensitive(self.comparer.options().case_insensitive)
            .build()
    }

    fn lookup(&self, root: &Value, p: &PropertyPath, exp: &mut Expansion) -> Value {
        let found = path::resolve(root, p);
        if !self.ctx.eval.expand_nested_paths {
            return found;
        }
        let Value::List(items) = found else {
            return found;
        };
        exp.chain.push(p.to_string());
        let expanded = items
            .into_iter()
            .map(|item| self.expand(root, item, exp))
            .collect();
        exp.chain.pop();
        Value::List(expanded)
    }

    /// Re-evaluates one element of a fanned-out result: strings that are
    /// property paths resolve against the root, everything else stays.
    ///
    /// A path already being expanded further up resolves to `Absent`, as does
    /// anything past the depth or total expansion limits.
    fn expand(&self, root: &Value, item: Value, exp: &mut Expansion) -> Value {
        let Value::String(s) = &item else {
            return item;
        };
        let Ok(p) = s.parse::<PropertyPath>() else {
            return item;
        };
        let key = p.to_string();
        if exp.chain.contains(&key) {
            debug!(path = %p, "nested path refers back to itself, treating as absent");
            return Value::Absent;
        }
        if exp.chain.len() > MAX_EXPANSION_DEPTH || exp.spent >= MAX_EXPANSIONS {
            debug!(path = %p, depth = exp.chain.len(), "nested path expansion limit reached, treating as absent");
            return Value::Absent;
        }
        exp.spent += 1;
        self.lookup(root, &p, exp)
    }
}

/// Bookkeeping for one top-level lookup with nested expansion on: the paths
/// currently being expanded and how many nested paths were resolved so far.
#[derive(Debug, Default)]
struct Expansion {
    chain: Vec<String>,
    spent: usize,
}

fn report(d: Diagnostic, diags: &mut Vec<Diagnostic>) {
    warn!("{d}");
    diags.push(d);
}

fn truth(v: &Value) -> Outcome {
    v.as_bool().ok_or(TypeMismatch {
        left: v.type_name(),
        right: "bool",
    })
}

/// Text of a scalar for substring and regex matching.
fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Int(_) | Value::Float(_) | Value::Bool(_) => Some(v.render()),
        _ => None,
    }
}

fn length(v: &Value) -> Value {
    match v {
        Value::String(s) => Value::Int(s.chars().count() as i64),
        Value::List(items) => Value::Int(items.len() as i64),
        Value::Object(map) => Value::Int(map.len() as i64),
        _ => Value::Absent,
    }
}
