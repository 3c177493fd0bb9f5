use std::borrow::Cow;
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Comparison knobs, chosen once per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparerOptions {
    /// Lower-case strings before comparing.
    pub case_insensitive: bool,
    /// Render every operand as a string before comparing.
    pub force_string: bool,
}

/// The ordering/equality policy used by `eq ne lt le gt ge` (and the
/// membership tests) for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Comparer {
    opts: ComparerOptions,
}

impl Comparer {
    pub fn new(opts: ComparerOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> ComparerOptions {
        self.opts
    }

    /// Orders two values by the bytes of their string renderings.
    ///
    /// Every pair of values has an order: `10 < 9`, `1 != 1.0`, and two
    /// identical objects (or two absent values) are equal. `force_string` is
    /// the explicit form of the same coercion.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let (a, b) = (a.render(), b.render());
        self.fold(&a).as_bytes().cmp(self.fold(&b).as_bytes())
    }

    /// Runs `pred` on the ordering of `a` and `b`.
    pub fn test<F>(&self, a: &Value, b: &Value, pred: F) -> bool
    where
        F: Fn(Ordering) -> bool,
    {
        pred(self.compare(a, b))
    }

    /// Applies the case policy to free text (renderings, substring
    /// membership, regexes).
    pub fn fold<'a>(&self, s: &'a str) -> Cow<'a, str> {
        if self.opts.case_insensitive {
            Cow::Owned(s.to_lowercase())
        } else {
            Cow::Borrowed(s)
        }
    }
}
