//! Tests for guard classification and selection

use std::cell::RefCell;

use paramgen_rs::environment::{FnEnvironment, SimpleEnvironment};
use paramgen_rs::guard::{classify, evaluate_guard, is_guard_key, select, GroupKind, ELSE};
use paramgen_rs::{ErrorKind, MatchPolicy, Node, Scalar};

use crate::test_helpers::tree;

#[test]
fn test_single_true_guard_wins_under_both_policies() {
    let group = tree(r#"{"$N == 1": "one", "$N == 2": "two", "$N == 3": "three"}"#);
    let env = SimpleEnvironment::new().with("N", 2);

    for policy in [MatchPolicy::First, MatchPolicy::Last] {
        let (guard, node) = select(&group, &env, policy, "p").unwrap().unwrap();
        assert_eq!(guard, "$N == 2");
        assert_eq!(node, &Node::from("two"));
    }
}

#[test]
fn test_conflicting_guards() {
    let group = tree(r#"{"$A": 1, "$B": 0}"#);
    let env = SimpleEnvironment::new().with("A", true).with("B", true);

    let (_, last) = select(&group, &env, MatchPolicy::Last, "").unwrap().unwrap();
    assert_eq!(last, &Node::from(0));

    let (_, first) = select(&group, &env, MatchPolicy::First, "").unwrap().unwrap();
    assert_eq!(first, &Node::from(1));
}

#[test]
fn test_else_selected_iff_all_guards_false() {
    let group = tree(r#"{"$N < 0": "negative", "else": "other", "$N > 10": "large"}"#);

    for (n, expected) in [(-1, "negative"), (5, "other"), (11, "large")] {
        let env = SimpleEnvironment::new().with("N", n);
        let (_, node) = select(&group, &env, MatchPolicy::Last, "").unwrap().unwrap();
        assert_eq!(node, &Node::from(expected), "N = {}", n);
    }
}

#[test]
fn test_no_match_without_else() {
    let group = tree(r#"{"$N < 0": "negative"}"#);
    let env = SimpleEnvironment::new().with("N", 3);
    assert!(select(&group, &env, MatchPolicy::Last, "").unwrap().is_none());
}

#[test]
fn test_guards_are_evaluated_in_document_order() {
    let lookups = RefCell::new(Vec::new());
    let env = FnEnvironment::new(|name: &str| {
        lookups.borrow_mut().push(name.to_string());
        Some(Scalar::Integer(1))
    });
    let group = tree(r#"{"$C == 1": "c", "else": "e", "$A == 1": "a", "$B == 2": "b"}"#);

    let (guard, _) = select(&group, &env, MatchPolicy::Last, "").unwrap().unwrap();
    assert_eq!(guard, "$A == 1");
    assert_eq!(*lookups.borrow(), vec!["C", "A", "B"]);

    lookups.borrow_mut().clear();
    let (guard, _) = select(&group, &env, MatchPolicy::First, "").unwrap().unwrap();
    assert_eq!(guard, "$C == 1");
    assert_eq!(*lookups.borrow(), vec!["C"]);
}

#[test]
fn test_non_boolean_guard_is_structural() {
    let env = SimpleEnvironment::new().with("N", 3);
    let err = evaluate_guard("$N + 1", &env).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);

    let err = evaluate_guard("$N ==", &env).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
}

#[test]
fn test_classification() {
    assert!(is_guard_key(ELSE));
    assert!(is_guard_key("$COMP == \"cice\" and $NX > 1"));
    assert!(!is_guard_key("${COMP}_nml"));

    assert_eq!(classify(&tree(r#"{"a": 1}"#)).unwrap(), GroupKind::Names);
    assert_eq!(classify(&tree(r#"{"else": 1}"#)).unwrap(), GroupKind::Guards);
    assert_eq!(
        classify(&tree(r#"{"else": 1, "b": 2}"#)).unwrap_err().kind(),
        ErrorKind::Structural
    );
}

#[test]
fn test_extreme_integer_variables() {
    let env = SimpleEnvironment::new()
        .with("LOW", i64::MIN)
        .with("HIGH", i64::MAX);

    assert!(evaluate_guard("$LOW < 0", &env).unwrap());
    assert!(evaluate_guard("$LOW < -$HIGH", &env).unwrap());
    assert!(evaluate_guard("$HIGH > 0 and $LOW != $HIGH", &env).unwrap());
}
