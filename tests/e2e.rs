use jql_filter as jql;
use serde_json::json;

const JON_SNOW: [&str; 7] = ["-and", "-eq", ".First", "Jon", "-eq", ".Last", "Snow"];

#[test]
fn test_first_and_last_name() {
    assert!(jql::matches(JON_SNOW, &json!({"First": "Jon", "Last": "Snow"})).unwrap());
    assert!(!jql::matches(JON_SNOW, &json!({"First": "Jon", "Last": "Stark"})).unwrap());
}

#[test]
fn test_one_tree_many_documents() {
    let query = jql::Query::compile(["-EQ", ".arr", "3"], jql::Context::default()).unwrap();
    assert!(query.matches_json(&json!({"arr": [3, 3, 3]})).unwrap());
    assert!(!query.matches_json(&json!({"arr": [3, 4, 3]})).unwrap());

    let any = jql::Query::compile(["-eq", ".arr", "3"], jql::Context::default()).unwrap();
    assert!(any.matches_json(&json!({"arr": [3, 3, 3]})).unwrap());
    assert!(any.matches_json(&json!({"arr": [3, 4, 3]})).unwrap());
}

#[test]
fn test_existence() {
    let doc = json!({"a": 1});
    assert!(!jql::matches(["-ex", ".b"], &doc).unwrap());
    assert!(jql::matches(["-nex", ".b"], &doc).unwrap());
}

#[test]
fn test_back_reference_across_branches() {
    let tokens = ["-and", "-eq", ".a", "foo", "-eq", ".b", "$1"];
    assert!(jql::matches(tokens, &json!({"a": "foo", "b": "foo"})).unwrap());
    assert!(!jql::matches(tokens, &json!({"a": "foo", "b": "bar"})).unwrap());
}

#[test]
fn test_people_search() {
    let doc = json!({
        "name": "Jon Snow",
        "house": "Stark",
        "age": 23,
        "titles": ["Lord Commander", "King in the North"],
        "allies": [
            {"name": "Samwell", "house": "Tarly"},
            {"name": "Tormund", "house": "Free Folk"}
        ]
    });
    let q = |tokens: &[&str]| jql::matches(tokens.iter().copied(), &doc).unwrap();

    assert!(q(&["-and", "-ge", ".age", "18", "-mt", ".name", "Snow$"]));
    assert!(q(&["-in", "King in the North", ".titles"]));
    assert!(q(&["-eq", ".allies[].house", "Tarly"]));
    assert!(!q(&["-EQ", ".allies[].house", "Tarly"]));
    assert!(q(&["-eq", ".allies[1].name", "Tormund"]));
    assert!(q(&["-eq", "-len", ".allies", "2"]));
    assert!(q(&["-not", "-ex", ".allies[2]"]));
    assert!(q(&["-or", "-eq", ".house", "Lannister", "-str", ".house"]));
}

#[test]
fn test_ignore_case_context() {
    let ctx = jql::Context::new(
        jql::ComparerOptions {
            case_insensitive: true,
            force_string: false,
        },
        jql::EvalOptions::default(),
    );
    let query = jql::Query::compile(["-eq", ".Last", "SNOW"], ctx).unwrap();
    assert!(query.matches_json(&json!({"Last": "Snow"})).unwrap());
    assert!(!jql::matches(["-eq", ".Last", "SNOW"], &json!({"Last": "Snow"})).unwrap());
}

#[test]
fn test_explain_tree_serializes() {
    let query = jql::Query::compile(["-eq", ".a[]", "1"], jql::Context::default()).unwrap();
    let out = serde_json::to_value(query.tree()).unwrap();
    assert_eq!(
        out,
        json!({"Operator": {"op": "eq", "spelling": "-eq", "children": [{"PropertyPath": ".a[]"}, {"Literal": 1}]}})
    );
}

#[test]
fn test_comparisons_use_text_order() {
    let doc = json!({"o": {"k": [1, 2]}, "n": 10});
    assert!(jql::matches(["-eq", ".o", ".o"], &doc).unwrap());
    assert!(jql::matches(["-eq", ".missing", ".also_missing"], &doc).unwrap());
    assert!(!jql::matches(["-eq", "1", "1.0"], &doc).unwrap());
    assert!(jql::matches(["-lt", "10", "9"], &doc).unwrap());
    assert!(jql::matches(["-lt", ".n", "9"], &doc).unwrap());
}

#[test]
fn test_query_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<jql::Query>();

    let query = std::sync::Arc::new(
        jql::Query::compile(["-gt", ".n", "5"], jql::Context::default()).unwrap(),
    );
    let handles = (0..4)
        .map(|n| {
            let query = query.clone();
            std::thread::spawn(move || query.matches_json(&json!({"n": n * 2})).unwrap())
        })
        .collect::<Vec<_>>();
    let results = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(results, vec![false, false, false, true]);
}
