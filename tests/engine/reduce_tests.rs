//! Tests for tree reduction

use paramgen_rs::environment::SimpleEnvironment;
use paramgen_rs::reduce::reduce;
use paramgen_rs::{ErrorKind, Group, MatchPolicy, Node, Scalar};

use crate::test_helpers::{init_tracing, tree};

fn env() -> SimpleEnvironment {
    SimpleEnvironment::new()
        .with("COMP", "cice")
        .with("ICE_GRID", "gx1v6")
        .with("NX", 320)
        .with("two", 2.0)
        .with("ROOT", "/inputdata")
}

/// True if a reduced tree still holds a guard-typed group or a reference
fn has_guards_or_references(group: &Group) -> bool {
    group.iter().any(|(key, node)| {
        paramgen_rs::guard::is_guard_key(key)
            || paramgen_rs::expand::has_references(key)
            || match node {
                Node::Group(child) => has_guards_or_references(child),
                Node::Scalar(scalar) => scalar
                    .as_str()
                    .map(paramgen_rs::expand::has_references)
                    .unwrap_or(false),
            }
    })
}

#[test]
fn test_plain_tree_is_identity() {
    let plain = tree(
        r#"{
            "days_per_year": 365,
            "dt": 1800.0,
            "use_esmf": false,
            "model": "cice",
            "missing": null,
            "nested": {"a": {"b": "deep"}}
        }"#,
    );

    for policy in [MatchPolicy::First, MatchPolicy::Last] {
        let reduced = reduce(&plain, &SimpleEnvironment::new(), policy).unwrap();
        assert_eq!(reduced, plain);
        assert!(reduced.keys().eq(plain.keys()));
    }
}

#[test]
fn test_selected_branch_is_reduced_further() {
    let dpd = tree(
        r#"{
            "ice_ic": {
                "$ICE_GRID == \"gx1v6\"": "${ROOT}/ice/${ICE_GRID}.nc",
                "else": "none"
            },
            "dx": {"$NX > 0": "= 360.0 / $NX"}
        }"#,
    );

    let reduced = reduce(&dpd, &env(), MatchPolicy::Last).unwrap();
    assert_eq!(reduced["ice_ic"], Node::from("/inputdata/ice/gx1v6.nc"));
    assert_eq!(reduced["dx"], Node::Scalar(Scalar::Float(1.125)));
}

#[test]
fn test_match_policies() {
    let dpd = tree(r#"{"p": {"$NX > 1": 1, "$NX > 2": 0}}"#);

    let last = reduce(&dpd, &env(), MatchPolicy::Last).unwrap();
    assert_eq!(last["p"], Node::from(0));

    let first = reduce(&dpd, &env(), MatchPolicy::First).unwrap();
    assert_eq!(first["p"], Node::from(1));
}

#[test]
fn test_no_match_is_null() {
    let dpd = tree(r#"{"p": {"$NX < 1": 1}, "q": 2}"#);
    let reduced = reduce(&dpd, &env(), MatchPolicy::Last).unwrap();
    assert_eq!(reduced["p"], Node::null());
    assert_eq!(reduced["q"], Node::from(2));
}

#[test]
fn test_formulas_reduce() {
    let dpd = tree(r#"{"five": "= 2+3", "half": "= (2+3) / $two", "literal": "=not a formula"}"#);
    let reduced = reduce(&dpd, &env(), MatchPolicy::Last).unwrap();

    assert_eq!(reduced["five"], Node::from(5));
    assert_eq!(reduced["half"], Node::from(2.5));
    assert_eq!(reduced["literal"], Node::from("=not a formula"));
}

#[test]
fn test_keys_are_expanded() {
    let dpd = tree(r#"{"${COMP}_nml": {"${COMP}_dt": 1800}}"#);
    let reduced = reduce(&dpd, &env(), MatchPolicy::Last).unwrap();

    let section = reduced["cice_nml"].as_group().unwrap();
    assert_eq!(section["cice_dt"], Node::from(1800));
}

#[test]
fn test_unselected_branches_may_reference_undefined_variables() {
    let dpd = tree(
        r#"{
            "p": {
                "$COMP == \"cice\"": "ice",
                "else": "${OCN_ONLY_VARIABLE}"
            },
            "q": {
                "$COMP == \"pop\"": {"$OCN_ONLY_VARIABLE > 1": 1},
                "else": 2
            }
        }"#,
    );
    let reduced = reduce(&dpd, &env(), MatchPolicy::Last).unwrap();
    assert_eq!(reduced["p"], Node::from("ice"));
    assert_eq!(reduced["q"], Node::from(2));
}

#[test]
fn test_reduced_tree_has_no_guards_or_references() {
    init_tracing();
    let dpd = tree(
        r#"{
            "$NX > 100": {
                "grid": {"$ICE_GRID .startswith(\"gx1\")": "${ICE_GRID}", "else": "other"},
                "nx": "$NX",
                "name": "${COMP}_${ICE_GRID}"
            },
            "else": {"grid": "coarse"}
        }"#,
    );

    let reduced = reduce(&dpd, &env(), MatchPolicy::Last).unwrap();
    assert!(!has_guards_or_references(&reduced));
    assert_eq!(reduced["grid"], Node::from("gx1v6"));
    assert_eq!(reduced["nx"], Node::from(320));
    assert_eq!(reduced["name"], Node::from("cice_gx1v6"));
}

#[test]
fn test_idempotence() {
    let dpd = tree(
        r#"{
            "ice_ic": {"$ICE_GRID .startswith(\"gx1v\")": "${ROOT}/gx1.nc", "else": "default"},
            "quoted": "$ICE_GRID",
            "dt": "= 3600 / 2",
            "flag": {"$NX > 1": true},
            "absent": {"$NX < 1": 1}
        }"#,
    );

    let once = reduce(&dpd, &env(), MatchPolicy::Last).unwrap();
    let twice = reduce(&once, &env(), MatchPolicy::Last).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_error_kinds_and_paths() {
    let cases = [
        (r#"{"a": {"b": {"x": 1, "$NX > 1": 2}}}"#, ErrorKind::Structural, "a/b"),
        (r#"{"a": {"$NX": 1}}"#, ErrorKind::Structural, "a/$NX"),
        (r#"{"a": {"b": "= 1 // 0"}}"#, ErrorKind::FormulaEvaluation, "a/b"),
        (r#"{"a": {"b": "$UNDEFINED"}}"#, ErrorKind::UndefinedVariable, "a/b"),
        (r#"{"a": {"$UNDEFINED == 1": 1}}"#, ErrorKind::UndefinedVariable, "a/$UNDEFINED == 1"),
    ];

    for (json, kind, path) in cases {
        let err = reduce(&tree(json), &env(), MatchPolicy::Last).unwrap_err();
        assert_eq!(err.kind(), kind, "{}", json);
        assert_eq!(err.path(), Some(path), "{}", json);
    }
}

#[test]
fn test_key_expanding_to_non_name_is_rejected() {
    let spaced = env().with("CASE", "my case");
    let case_tree = tree(r#"{"${CASE}": 1}"#);

    let err = reduce(&case_tree, &spaced, MatchPolicy::Last).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.path(), Some("my case"));

    let plain = env().with("CASE", "b1850");
    let reduced = reduce(&case_tree, &plain, MatchPolicy::Last).unwrap();
    assert_eq!(reduced["b1850"], Node::from(1));
    assert_eq!(reduce(&reduced, &plain, MatchPolicy::Last).unwrap(), reduced);
}

#[test]
fn test_variable_values_are_not_expanded_again() {
    let scratch = env().with("SCRATCH", "/scratch/$USER");
    let files = tree(r#"{"f": "${SCRATCH}/ice.nc"}"#);

    let reduced = reduce(&files, &scratch, MatchPolicy::Last).unwrap();
    assert_eq!(reduced["f"], Node::from("/scratch/$USER/ice.nc"));
}

#[test]
fn test_formula_text_from_a_variable_is_not_evaluated() {
    let formula_env = env().with("F", "= 1 + 1");
    let values = tree(r#"{"p": "${F}"}"#);

    let reduced = reduce(&values, &formula_env, MatchPolicy::Last).unwrap();
    assert_eq!(
        reduced["p"],
        Node::Scalar(Scalar::String("= 1 + 1".to_string()))
    );
}
