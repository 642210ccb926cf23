//! Tree-walking evaluator for parsed expressions
//!
//! Arithmetic follows Python 3: `/` always produces a float, `//` and `%`
//! round towards negative infinity, and integer overflow is an error rather
//! than a silent wrap.

use regex::Regex;
use std::cmp::Ordering;

use super::value::Number;
use super::{BinaryOp, CompareOp, ExprResult, Expression, ExpressionError, UnaryOp, Value};

pub(super) fn evaluate(expr: &Expression) -> ExprResult<Value> {
    match expr {
        Expression::Literal(value) => Ok(value.clone()),

        Expression::List(items) => items
            .iter()
            .map(evaluate)
            .collect::<ExprResult<Vec<_>>>()
            .map(Value::List),

        Expression::Name(name) => Err(ExpressionError::UnknownName { name: name.clone() }),

        Expression::Unary(op, operand) => unary(*op, evaluate(operand)?),

        Expression::Binary(op, left, right) => {
            let lhs = evaluate(left)?;
            let rhs = evaluate(right)?;
            binary(*op, lhs, rhs)
        }

        Expression::And(left, right) => {
            let lhs = evaluate(left)?;
            if lhs.truthy() {
                evaluate(right)
            } else {
                Ok(lhs)
            }
        }

        Expression::Or(left, right) => {
            let lhs = evaluate(left)?;
            if lhs.truthy() {
                Ok(lhs)
            } else {
                evaluate(right)
            }
        }

        Expression::Compare(first, rest) => {
            let mut lhs = evaluate(first)?;
            for (op, operand) in rest {
                let rhs = evaluate(operand)?;
                if !compare(*op, &lhs, &rhs)? {
                    return Ok(Value::Bool(false));
                }
                lhs = rhs;
            }
            Ok(Value::Bool(true))
        }

        Expression::Call(name, args) => {
            let args = args.iter().map(evaluate).collect::<ExprResult<Vec<_>>>()?;
            call_function(name, args)
        }

        Expression::Method(target, name, args) => {
            let target = evaluate(target)?;
            let args = args.iter().map(evaluate).collect::<ExprResult<Vec<_>>>()?;
            call_method(target, name, args)
        }
    }
}

fn invalid(message: impl Into<String>) -> ExpressionError {
    ExpressionError::InvalidOperation {
        message: message.into(),
    }
}

fn unsupported(symbol: &str, lhs: &Value, rhs: &Value) -> ExpressionError {
    invalid(format!(
        "unsupported operand types for {}: '{}' and '{}'",
        symbol,
        lhs.type_name(),
        rhs.type_name()
    ))
}

fn unary(op: UnaryOp, value: Value) -> ExprResult<Value> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!value.truthy())),
        UnaryOp::Neg => match value.as_number() {
            Some(Number::Int(i)) => i.checked_neg().map(Value::Int).ok_or(ExpressionError::Overflow),
            Some(Number::Float(f)) => Ok(Value::Float(-f)),
            None => Err(invalid(format!("bad operand type for unary -: '{}'", value.type_name()))),
        },
        UnaryOp::Pos => match value.as_number() {
            Some(Number::Int(i)) => Ok(Value::Int(i)),
            Some(Number::Float(f)) => Ok(Value::Float(f)),
            None => Err(invalid(format!("bad operand type for unary +: '{}'", value.type_name()))),
        },
    }
}

fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> ExprResult<Value> {
    if op == BinaryOp::Add {
        match (&lhs, &rhs) {
            (Value::Str(a), Value::Str(b)) => return Ok(Value::Str(format!("{}{}", a, b))),
            (Value::List(a), Value::List(b)) => {
                return Ok(Value::List(a.iter().chain(b).cloned().collect()))
            }
            _ => {}
        }
    }

    let symbol = match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::FloorDiv => "//",
        BinaryOp::Mod => "%",
        BinaryOp::Pow => "**",
    };
    let (a, b) = match (lhs.as_number(), rhs.as_number()) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(unsupported(symbol, &lhs, &rhs)),
    };

    match (a, b) {
        (Number::Int(a), Number::Int(b)) => int_binary(op, a, b),
        (a, b) => float_binary(op, a.to_f64(), b.to_f64()),
    }
}

fn int_binary(op: BinaryOp, a: i64, b: i64) -> ExprResult<Value> {
    let checked = |result: Option<i64>| result.map(Value::Int).ok_or(ExpressionError::Overflow);

    match op {
        BinaryOp::Add => checked(a.checked_add(b)),
        BinaryOp::Sub => checked(a.checked_sub(b)),
        BinaryOp::Mul => checked(a.checked_mul(b)),
        BinaryOp::Div => float_binary(op, a as f64, b as f64),
        BinaryOp::FloorDiv => {
            if b == 0 {
                return Err(ExpressionError::DivisionByZero);
            }
            let quotient = a.checked_div(b).ok_or(ExpressionError::Overflow)?;
            if a % b != 0 && ((a < 0) != (b < 0)) {
                Ok(Value::Int(quotient - 1))
            } else {
                Ok(Value::Int(quotient))
            }
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Err(ExpressionError::DivisionByZero);
            }
            let remainder = a.checked_rem(b).ok_or(ExpressionError::Overflow)?;
            if remainder != 0 && ((remainder < 0) != (b < 0)) {
                Ok(Value::Int(remainder + b))
            } else {
                Ok(Value::Int(remainder))
            }
        }
        BinaryOp::Pow => {
            if b < 0 {
                return float_binary(op, a as f64, b as f64);
            }
            let exponent = u32::try_from(b).map_err(|_| ExpressionError::Overflow)?;
            checked(a.checked_pow(exponent))
        }
    }
}

fn float_binary(op: BinaryOp, a: f64, b: f64) -> ExprResult<Value> {
    let divisor = |b: f64| {
        if Number::Float(b).is_zero() {
            Err(ExpressionError::DivisionByZero)
        } else {
            Ok(b)
        }
    };

    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / divisor(b)?,
        BinaryOp::FloorDiv => (a / divisor(b)?).floor(),
        BinaryOp::Mod => {
            let b = divisor(b)?;
            let remainder = a % b;
            if remainder != 0.0 && ((remainder < 0.0) != (b < 0.0)) {
                remainder + b
            } else {
                remainder
            }
        }
        BinaryOp::Pow => {
            if a == 0.0 && b < 0.0 {
                return Err(ExpressionError::DivisionByZero);
            }
            a.powf(b)
        }
    };
    Ok(Value::Float(result))
}

fn compare(op: CompareOp, lhs: &Value, rhs: &Value) -> ExprResult<bool> {
    match op {
        CompareOp::Eq => Ok(lhs.loosely_equals(rhs)),
        CompareOp::Ne => Ok(!lhs.loosely_equals(rhs)),
        CompareOp::Lt => Ok(lhs.try_cmp(rhs)? == Ordering::Less),
        CompareOp::Le => Ok(lhs.try_cmp(rhs)? != Ordering::Greater),
        CompareOp::Gt => Ok(lhs.try_cmp(rhs)? == Ordering::Greater),
        CompareOp::Ge => Ok(lhs.try_cmp(rhs)? != Ordering::Less),
        CompareOp::In => contains(rhs, lhs),
        CompareOp::NotIn => contains(rhs, lhs).map(|found| !found),
    }
}

fn contains(container: &Value, item: &Value) -> ExprResult<bool> {
    match (container, item) {
        (Value::Str(haystack), Value::Str(needle)) => Ok(haystack.contains(needle.as_str())),
        (Value::List(items), item) => Ok(items.iter().any(|candidate| candidate.loosely_equals(item))),
        _ => Err(invalid(format!(
            "'in' not supported between '{}' and '{}'",
            item.type_name(),
            container.type_name()
        ))),
    }
}

fn expect_args(name: &str, args: &[Value], count: usize) -> ExprResult<()> {
    if args.len() == count {
        Ok(())
    } else {
        Err(invalid(format!(
            "{}() requires {} argument{}, got {}",
            name,
            count,
            if count == 1 { "" } else { "s" },
            args.len()
        )))
    }
}

fn expect_str<'v>(name: &str, value: &'v Value) -> ExprResult<&'v str> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(invalid(format!(
            "{}() expects a string, got '{}'",
            name,
            other.type_name()
        ))),
    }
}

fn call_function(name: &str, args: Vec<Value>) -> ExprResult<Value> {
    match name {
        "abs" => {
            expect_args(name, &args, 1)?;
            match args[0].as_number() {
                Some(Number::Int(i)) => i.checked_abs().map(Value::Int).ok_or(ExpressionError::Overflow),
                Some(Number::Float(f)) => Ok(Value::Float(f.abs())),
                None => Err(invalid(format!("bad operand type for abs(): '{}'", args[0].type_name()))),
            }
        }
        "min" | "max" => extremum(name, args),
        "int" => {
            expect_args(name, &args, 1)?;
            match &args[0] {
                Value::Str(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| invalid(format!("invalid literal for int(): '{}'", s))),
                Value::Float(f) if f.is_finite() && f.abs() < 9.2e18 => Ok(Value::Int(f.trunc() as i64)),
                Value::Float(f) => Err(invalid(format!("cannot convert float {} to integer", f))),
                other => match other.as_number() {
                    Some(Number::Int(i)) => Ok(Value::Int(i)),
                    _ => Err(invalid(format!("int() argument must be a string or a number, not '{}'", other.type_name()))),
                },
            }
        }
        "float" => {
            expect_args(name, &args, 1)?;
            match &args[0] {
                Value::Str(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| invalid(format!("could not convert string to float: '{}'", s))),
                other => other
                    .as_number()
                    .map(|n| Value::Float(n.to_f64()))
                    .ok_or_else(|| invalid(format!("float() argument must be a string or a number, not '{}'", other.type_name()))),
            }
        }
        "str" => {
            expect_args(name, &args, 1)?;
            Ok(Value::Str(args[0].to_string()))
        }
        "bool" => {
            expect_args(name, &args, 1)?;
            Ok(Value::Bool(args[0].truthy()))
        }
        "len" => {
            expect_args(name, &args, 1)?;
            let length = match &args[0] {
                Value::Str(s) => s.chars().count(),
                Value::List(items) => items.len(),
                other => return Err(invalid(format!("object of type '{}' has no len()", other.type_name()))),
            };
            i64::try_from(length).map(Value::Int).map_err(|_| ExpressionError::Overflow)
        }
        "round" => round(args),
        "re.search" | "re.match" | "re.fullmatch" => {
            expect_args(name, &args, 2)?;
            let pattern = expect_str(name, &args[0])?;
            let text = expect_str(name, &args[1])?;
            let anchored = match name {
                "re.match" => format!("^(?:{})", pattern),
                "re.fullmatch" => format!("^(?:{})$", pattern),
                _ => pattern.to_string(),
            };
            let regex = Regex::new(&anchored)
                .map_err(|e| invalid(format!("invalid regular expression '{}': {}", pattern, e)))?;
            Ok(Value::Bool(regex.is_match(text)))
        }
        _ => Err(ExpressionError::UndefinedFunction {
            name: name.to_string(),
        }),
    }
}

/// `min`/`max` over either one list argument or several arguments
fn extremum(name: &str, args: Vec<Value>) -> ExprResult<Value> {
    let items = match <[Value; 1]>::try_from(args) {
        Ok([Value::List(items)]) => items,
        Ok([single]) => vec![single],
        Err(args) => args,
    };

    let mut iter = items.into_iter();
    let mut best = iter
        .next()
        .ok_or_else(|| invalid(format!("{}() arg is an empty sequence", name)))?;
    for item in iter {
        let ordering = item.try_cmp(&best)?;
        let better = if name == "min" {
            ordering == Ordering::Less
        } else {
            ordering == Ordering::Greater
        };
        if better {
            best = item;
        }
    }
    Ok(best)
}

/// Round half to even, like Python's `round`
fn round_half_even(x: f64) -> f64 {
    let rounded = x.round();
    if (x - x.trunc()).abs() == 0.5 {
        2.0 * (x / 2.0).round()
    } else {
        rounded
    }
}

fn round(args: Vec<Value>) -> ExprResult<Value> {
    let (value, digits) = match args.as_slice() {
        [value] => (value, None),
        [value, Value::Int(digits)] => (value, Some(*digits)),
        _ => return Err(invalid("round() takes a number and an optional integer digit count")),
    };

    let x = match value.as_number() {
        Some(Number::Int(i)) => return Ok(Value::Int(i)),
        Some(Number::Float(f)) => f,
        None => return Err(invalid(format!("type '{}' doesn't define __round__", value.type_name()))),
    };

    match digits {
        None => {
            let rounded = round_half_even(x);
            if rounded.is_finite() && rounded.abs() < 9.2e18 {
                Ok(Value::Int(rounded as i64))
            } else {
                Err(ExpressionError::Overflow)
            }
        }
        Some(digits) => {
            let digits = i32::try_from(digits).map_err(|_| ExpressionError::Overflow)?;
            let scale = 10f64.powi(digits);
            Ok(Value::Float(round_half_even(x * scale) / scale))
        }
    }
}

fn call_method(target: Value, name: &str, args: Vec<Value>) -> ExprResult<Value> {
    let text = match &target {
        Value::Str(text) => text.as_str(),
        other => {
            return Err(ExpressionError::UndefinedFunction {
                name: format!("{}.{}", other.type_name(), name),
            })
        }
    };

    match name {
        "startswith" | "endswith" => {
            expect_args(name, &args, 1)?;
            let affixes: Vec<&str> = match &args[0] {
                Value::List(items) => items
                    .iter()
                    .map(|item| expect_str(name, item))
                    .collect::<ExprResult<_>>()?,
                other => vec![expect_str(name, other)?],
            };
            let matched = affixes.iter().any(|affix| {
                if name == "startswith" {
                    text.starts_with(*affix)
                } else {
                    text.ends_with(*affix)
                }
            });
            Ok(Value::Bool(matched))
        }
        "lower" => {
            expect_args(name, &args, 0)?;
            Ok(Value::Str(text.to_lowercase()))
        }
        "upper" => {
            expect_args(name, &args, 0)?;
            Ok(Value::Str(text.to_uppercase()))
        }
        "strip" => {
            expect_args(name, &args, 0)?;
            Ok(Value::Str(text.trim().to_string()))
        }
        "replace" => {
            expect_args(name, &args, 2)?;
            let old = expect_str(name, &args[0])?;
            let new = expect_str(name, &args[1])?;
            Ok(Value::Str(text.replace(old, new)))
        }
        _ => Err(ExpressionError::UndefinedFunction {
            name: format!("str.{}", name),
        }),
    }
}
