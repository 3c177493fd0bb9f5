use serde::Serialize;

/// Every operator the language knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Not,
    And,
    Or,
    Ex,
    Nex,
    In,
    Nin,
    Eq,
    Ne,
    Mt,
    Rx,
    Lt,
    Le,
    Gt,
    Ge,
    Len,
    Obj,
    Arr,
    Str,
    Num,
    Bool,
}

/// (name, operator, arity). Names are matched case-insensitively after the
/// leading `-` of the token.
pub const OPERATORS: &[(&str, Operator, usize)] = &[
    ("not", Operator::Not, 1),
    ("and", Operator::And, 2),
    ("or", Operator::Or, 2),
    ("ex", Operator::Ex, 1),
    ("nex", Operator::Nex, 1),
    ("in", Operator::In, 2),
    ("nin", Operator::Nin, 2),
    ("eq", Operator::Eq, 2),
    ("ne", Operator::Ne, 2),
    ("mt", Operator::Mt, 2),
    ("rx", Operator::Rx, 2),
    ("lt", Operator::Lt, 2),
    ("le", Operator::Le, 2),
    ("gt", Operator::Gt, 2),
    ("ge", Operator::Ge, 2),
    ("len", Operator::Len, 1),
    ("obj", Operator::Obj, 1),
    ("arr", Operator::Arr, 1),
    ("str", Operator::Str, 1),
    ("num", Operator::Num, 1),
    ("bool", Operator::Bool, 1),
];

impl Operator {
    /// Looks up an operator token such as `-eq` or `-EQ`.
    pub fn lookup(token: &str) -> Option<Operator> {
        let name = token.strip_prefix('-')?;
        OPERATORS
            .iter()
            .find(|(n, _, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, op, _)| *op)
    }

    /// True for tokens shaped like an operator (`-` followed by letters only),
    /// whether or not the name is registered.
    pub fn looks_like_operator(token: &str) -> bool {
        token
            .strip_prefix('-')
            .is_some_and(|name| !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic()))
    }

    pub fn arity(self) -> usize {
        OPERATORS
            .iter()
            .find(|(_, op, _)| *op == self)
            .map(|(_, _, n)| *n)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(Operator::lookup("-eq"), Some(Operator::Eq));
        assert_eq!(Operator::lookup("-EQ"), Some(Operator::Eq));
        assert_eq!(Operator::lookup("-Eq"), Some(Operator::Eq));
        assert_eq!(Operator::lookup("eq"), None);
        assert_eq!(Operator::lookup("-equals"), None);
    }

    #[test]
    fn arities() {
        assert_eq!(Operator::Not.arity(), 1);
        assert_eq!(Operator::Rx.arity(), 2);
        assert_eq!(Operator::Bool.arity(), 1);
        assert_eq!(OPERATORS.len(), 21);
    }

    #[test]
    fn operator_shape() {
        assert!(Operator::looks_like_operator("-foo"));
        assert!(!Operator::looks_like_operator("-5"));
        assert!(!Operator::looks_like_operator("-"));
        assert!(!Operator::looks_like_operator(".a"));
    }
}
