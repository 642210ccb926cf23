//! Tests for expression parsing and evaluation

use approx::assert_relative_eq;
use paramgen_rs::expression::{evaluate_str, Expression, ExpressionError, Value};

fn eval(input: &str) -> Value {
    evaluate_str(input).unwrap_or_else(|e| panic!("'{}' failed: {}", input, e))
}

#[test]
fn test_typical_guards() {
    assert_eq!(eval(r#""gx1v6" == "gx1v6""#), Value::Bool(true));
    assert_eq!(eval(r#""gx1v6" .startswith("gx1v")"#), Value::Bool(true));
    assert_eq!(eval(r#""gx1v6".endswith(("v6", "v7"))"#), Value::Bool(true));
    assert_eq!(eval(r#""tx0.66v1" in ["gx1v6", "tx0.66v1"]"#), Value::Bool(true));
    assert_eq!(eval(r#""v6" not in "gx3v7""#), Value::Bool(true));
    assert_eq!(eval(r#"re.search("^gx[13]v", "gx3v7")"#), Value::Bool(true));
    assert_eq!(eval(r#"re.match("v7", "gx3v7")"#), Value::Bool(false));
    assert_eq!(eval(r#"re.fullmatch("gx\d+v\d+", "gx1v6")"#), Value::Bool(true));
    assert_eq!(eval(r#"not "CAM60" .lower() == "cam60""#), Value::Bool(false));
}

#[test]
fn test_boolean_connectives_return_operands() {
    assert_eq!(eval("True and False or True"), Value::Bool(true));
    assert_eq!(eval("0 or 5"), Value::Int(5));
    assert_eq!(eval("\"\" and 1 / 0"), Value::Str(String::new()));
    assert_eq!(eval("not 0"), Value::Bool(true));
}

#[test]
fn test_chained_comparisons() {
    assert_eq!(eval("1 < 2 < 3"), Value::Bool(true));
    assert_eq!(eval("1 < 3 < 2"), Value::Bool(false));
    assert_eq!(eval("3 >= 3 == 3.0"), Value::Bool(true));
}

#[test]
fn test_python_arithmetic() {
    assert_eq!(eval("2 + 3 * 4"), Value::Int(14));
    assert_eq!(eval("7 / 2"), Value::Float(3.5));
    assert_eq!(eval("-7 // 2"), Value::Int(-4));
    assert_eq!(eval("-7 % 3"), Value::Int(2));
    assert_eq!(eval("2 ** 10"), Value::Int(1024));
    assert_eq!(eval("2 ** 3 ** 2"), Value::Int(512));
    assert_eq!(eval("\"a\" + \"b\""), Value::Str("ab".to_string()));

    if let Value::Float(dx) = eval("360.0 / 320") {
        assert_relative_eq!(dx, 1.125);
    } else {
        panic!("expected a float");
    }
}

#[test]
fn test_builtin_functions() {
    assert_eq!(eval("max(1, 5, 3)"), Value::Int(5));
    assert_eq!(eval("min([4, 2.5])"), Value::Float(2.5));
    assert_eq!(eval("abs(-3)"), Value::Int(3));
    assert_eq!(eval("int(\"42\") + int(2.9)"), Value::Int(44));
    assert_eq!(eval("float(\"1.5\")"), Value::Float(1.5));
    assert_eq!(eval("len(\"gx1v6\")"), Value::Int(5));
    assert_eq!(eval("round(2.5)"), Value::Int(2));
    assert_eq!(eval("bool(\"\")"), Value::Bool(false));
    assert_eq!(
        eval(r#"" cice ".strip().upper().replace("C", "K")"#),
        Value::Str("KIKE".to_string())
    );
}

#[test]
fn test_errors() {
    assert_eq!(evaluate_str("1 / 0"), Err(ExpressionError::DivisionByZero));
    assert_eq!(evaluate_str("5 % 0"), Err(ExpressionError::DivisionByZero));
    assert_eq!(
        evaluate_str("9223372036854775807 + 1"),
        Err(ExpressionError::Overflow)
    );
    assert!(matches!(
        evaluate_str("gx1v6 == 1"),
        Err(ExpressionError::UnknownName { .. })
    ));
    assert!(matches!(
        evaluate_str("open(\"/etc/passwd\")"),
        Err(ExpressionError::UndefinedFunction { .. })
    ));
    assert!(matches!(
        evaluate_str("__import__(\"os\")"),
        Err(ExpressionError::UndefinedFunction { .. })
    ));
    assert!(matches!(
        evaluate_str("1 +"),
        Err(ExpressionError::ParseError { .. })
    ));
    assert!(matches!(
        evaluate_str("lambda: 1"),
        Err(ExpressionError::ParseError { .. })
    ));
    assert!(matches!(
        evaluate_str("\"a\" - 1"),
        Err(ExpressionError::InvalidOperation { .. })
    ));
}

#[test]
fn test_parse_is_reusable() {
    let expr = Expression::parse("(1 + 2) * 3").unwrap();
    assert_eq!(expr.evaluate().unwrap(), Value::Int(9));
    assert_eq!(expr.evaluate().unwrap(), Value::Int(9));
}

#[test]
fn test_deep_nesting_is_a_parse_error() {
    let depth = paramgen_rs::expression::MAX_DEPTH;
    let nest = |n: usize| format!("{}1{}", "(".repeat(n), ")".repeat(n));

    assert_eq!(eval(&format!("{} + 1", nest(depth))), Value::Int(2));
    assert!(matches!(
        evaluate_str(&nest(depth + 1)),
        Err(ExpressionError::ParseError { .. })
    ));
    assert!(matches!(
        evaluate_str(&nest(20_000)),
        Err(ExpressionError::ParseError { .. })
    ));
}
