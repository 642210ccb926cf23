//! Tests for merging databases

use paramgen_rs::append::{append, appended};
use paramgen_rs::environment::SimpleEnvironment;
use paramgen_rs::{ErrorKind, Node, ParamGen};

use crate::test_helpers::tree;

#[test]
fn test_append_overrides_and_orders() {
    let merged = appended(&tree(r#"{"a": 1, "b": 2}"#), &tree(r#"{"b": 3, "c": 4}"#)).unwrap();

    let entries: Vec<(&str, &Node)> = merged.iter().map(|(k, v)| (k.as_str(), v)).collect();
    assert_eq!(
        entries,
        vec![("a", &Node::from(1)), ("b", &Node::from(3)), ("c", &Node::from(4))]
    );
}

#[test]
fn test_append_replaces_whole_guarded_entries() {
    let mut base = tree(r#"{"p": {"$X == 1": "one", "else": "default"}}"#);
    append(&mut base, &tree(r#"{"p": "fixed"}"#)).unwrap();
    assert_eq!(base["p"], Node::from("fixed"));
}

#[test]
fn test_append_rejects_guard_typed_roots() {
    let mut base = tree(r#"{"a": 1}"#);
    let err = append(&mut base, &tree(r#"{"else": {"a": 2}}"#)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);

    let err = appended(&tree(r#"{"$X == 1": {"a": 2}}"#), &tree(r#"{"a": 1}"#)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_append_then_reduce() {
    let mut defaults = ParamGen::new(tree(
        r#"{"dt": {"$NX > 100": 900, "else": 1800}, "days_per_year": 365}"#,
    ));
    let user = ParamGen::new(tree(r#"{"dt": 600, "ice_ic": "none"}"#));
    defaults.append(&user).unwrap();

    let reduced = defaults.reduce(&SimpleEnvironment::new()).unwrap();
    let keys: Vec<&str> = reduced.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["dt", "days_per_year", "ice_ic"]);
    assert_eq!(reduced["dt"], Node::from(600));
}
