//! A small prefix-notation filter language for JSON documents.
//!
//! A query such as `-and -eq .First Jon -eq .Last Snow` is parsed once into an
//! [`ExpressionNode`] tree and then evaluated against any number of documents,
//! each yielding a boolean.
//!
//! ```
//! use serde_json::json;
//!
//! let tokens = ["-and", "-eq", ".First", "Jon", "-eq", ".Last", "Snow"];
//! assert!(jql_filter::matches(tokens, &json!({"First": "Jon", "Last": "Snow"})).unwrap());
//! assert!(!jql_filter::matches(tokens, &json!({"First": "Jon", "Last": "Stark"})).unwrap());
//! ```

pub mod broadcast;
pub mod comparison;
pub mod context;
pub mod driver;
pub mod engine;
pub mod errors;
pub mod expression;
pub mod operators;
pub mod parser;
pub mod path;
mod scanner;
pub mod value;

pub use broadcast::Quantifier;
pub use comparison::{Comparer, ComparerOptions};
pub use context::{Context, EvalOptions};
pub use engine::{Evaluator, Verdict};
pub use errors::{Diagnostic, JqlError, ParseError, Result};
pub use expression::ExpressionNode;
pub use value::Value;

/// A parsed query together with the evaluator configured for the run.
#[derive(Debug, Clone)]
pub struct Query {
    tree: ExpressionNode,
    evaluator: Evaluator,
}

impl Query {
    /// Parses `tokens` and prepares an evaluator for `ctx`.
    pub fn compile<I, S>(tokens: I, ctx: Context) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tree = parser::parse(tokens)?;
        let evaluator = Evaluator::new(ctx).with_patterns(&tree);
        Ok(Self { tree, evaluator })
    }

    pub fn tree(&self) -> &ExpressionNode {
        &self.tree
    }

    pub fn context(&self) -> &Context {
        self.evaluator.context()
    }

    /// Runs the query against one decoded document.
    pub fn evaluate(&self, document: &Value) -> Result<Verdict> {
        self.evaluator.verdict(document, &self.tree)
    }

    pub fn matches_json(&self, document: &serde_json::Value) -> Result<bool> {
        self.evaluate(&Value::from(document)).map(|v| v.matched)
    }
}

/// Convenience: compile with the default context and test one document.
pub fn matches<I, S>(tokens: I, document: &serde_json::Value) -> Result<bool>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Query::compile(tokens, Context::default())?.matches_json(document)
}
