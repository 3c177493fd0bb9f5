use serde::{Deserialize, Serialize};

use crate::comparison::{Comparer, ComparerOptions};

/// Evaluation knobs that are not about comparing values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalOptions {
    /// Resolve string elements of a fanned-out path that are themselves
    /// property paths, against the document root.
    pub expand_nested_paths: bool,
}

/// Run-wide evaluation context. Built once before the first document and
/// only read afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub comparer: ComparerOptions,
    pub eval: EvalOptions,
}

impl Context {
    pub fn new(comparer: ComparerOptions, eval: EvalOptions) -> Self {
        Self { comparer, eval }
    }

    pub fn comparer(&self) -> Comparer {
        Comparer::new(self.comparer)
    }
}
