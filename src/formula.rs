//! Formula evaluation
//!
//! A formula is a scalar written as `= <expression>`. Its variables are
//! expanded first and the resulting text is evaluated with the embedded
//! expression language; the value replaces the formula in the reduced tree.

use tracing::trace;

use crate::environment::Environment;
use crate::error::{ParamGenError, Result};
use crate::expand::expand_text;
use crate::expression::Expression;
use crate::tree::{formula_body, Scalar};

/// Evaluate the expression text of a formula (the part after `=`)
///
/// # Examples
///
/// ```
/// use paramgen_rs::environment::SimpleEnvironment;
/// use paramgen_rs::formula::evaluate_formula;
/// use paramgen_rs::tree::Scalar;
///
/// let env = SimpleEnvironment::new().with("two", 2.0);
/// assert_eq!(evaluate_formula(" 2+3", &env).unwrap(), Scalar::Integer(5));
/// assert_eq!(evaluate_formula(" (2+3) / $two", &env).unwrap(), Scalar::Float(2.5));
/// ```
pub fn evaluate_formula<E: Environment + ?Sized>(expression: &str, env: &E) -> Result<Scalar> {
    let expanded = expand_text(expression, env)?;
    let expanded = expanded.trim();

    let value = Expression::parse(expanded)
        .and_then(|expr| expr.evaluate())
        .and_then(|value| value.into_scalar())
        .map_err(|source| ParamGenError::formula(expanded, source))?;

    trace!(formula = expanded, result = %value, "evaluated formula");
    Ok(value)
}

/// Evaluate `text` if it is written as a formula, otherwise return `None`
pub fn evaluate_if_formula<E: Environment + ?Sized>(text: &str, env: &E) -> Option<Result<Scalar>> {
    formula_body(text).map(|body| evaluate_formula(body, env))
}
