use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning a token stream into an expression tree.
///
/// Any of these aborts the run before a single document is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty query: expected an operator or a literal")]
    EmptyQuery,

    #[error("operator '{operator}' expects {expected} operand(s) but only {found} token(s) remain")]
    UnexpectedEnd {
        operator: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("{0} unused token(s) after the end of the expression")]
    TrailingTokens(usize),

    #[error("invalid property path '{0}': {1}")]
    InvalidPath(String, String),
}

/// Top-level error for a run.
#[derive(Debug, Error)]
pub enum JqlError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    // The tree is the same for every document, so this is a malformed query.
    #[error("query does not resolve to a boolean (resolves to '{rendered}')")]
    NonBooleanRoot { rendered: String },

    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write output as JSON: {0}")]
    Output(#[source] serde_json::Error),
}

/// Non-fatal findings reported alongside a verdict. The sub-expression that
/// produced one evaluates to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("invalid regular expression '{operand}': {reason}")]
    InvalidRegularExpression { operand: String, reason: String },

    #[error("operator '{spelling}' mixes upper and lower case; use all lower case (any) or all upper case (all)")]
    MixedCaseOperator { spelling: String },
}

pub type Result<T> = std::result::Result<T, JqlError>;
