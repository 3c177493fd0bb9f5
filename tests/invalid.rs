use jql_filter as jql;
use jql::{JqlError, ParseError};
use serde_json::json;

// Parse failures surface before any document is looked at.
#[test]
fn test_operator_missing_operands() {
    let err = jql::Query::compile(["-and", "-eq", ".a", "1"], jql::Context::default()).unwrap_err();
    assert!(
        matches!(
            err,
            JqlError::Parse(ParseError::UnexpectedEnd { ref operator, expected: 2, found: 1 }) if operator == "-and"
        ),
        "unexpected error: {err}"
    );
}

#[test]
fn test_leftover_tokens() {
    let err = jql::Query::compile(["-ex", ".a", ".b", ".c"], jql::Context::default()).unwrap_err();
    assert!(matches!(err, JqlError::Parse(ParseError::TrailingTokens(2))));
}

#[test]
fn test_unknown_operator() {
    let err = jql::Query::compile(["-contains", ".a", "x"], jql::Context::default()).unwrap_err();
    assert_eq!(err.to_string(), "parse error: unknown operator '-contains'");
}

#[test]
fn test_empty_query() {
    let err = jql::Query::compile(Vec::<String>::new(), jql::Context::default()).unwrap_err();
    assert!(matches!(err, JqlError::Parse(ParseError::EmptyQuery)));
}

#[test]
fn test_non_boolean_root() {
    let err = jql::matches([".name"], &json!({"name": "Jon"})).unwrap_err();
    assert_eq!(
        err.to_string(),
        "query does not resolve to a boolean (resolves to 'Jon')"
    );
}

#[test]
fn test_absent_pattern_is_diagnosed_not_fatal() {
    let query = jql::Query::compile(["-rx", ".name", ".pattern"], jql::Context::default()).unwrap();
    let verdict = query.evaluate(&jql::Value::from(json!({"name": "Jon"}))).unwrap();
    assert!(!verdict.matched);
    assert!(matches!(
        verdict.diagnostics.as_slice(),
        [jql::Diagnostic::InvalidRegularExpression { .. }]
    ));
}

#[test]
fn test_type_mismatch_is_false_not_error() {
    let doc = json!({"list": [1, 2], "obj": {"a": 1}, "name": "Jon"});
    assert!(!jql::matches(["-and", ".list", ".obj"], &doc).unwrap());
    assert!(!jql::matches(["-not", ".name"], &doc).unwrap());
    assert!(!jql::matches(["-mt", ".obj", "a"], &doc).unwrap());
    assert!(!jql::matches(["-in", ".obj", ".name"], &doc).unwrap());
}
