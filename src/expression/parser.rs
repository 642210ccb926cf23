//! nom parser for the expression language
//!
//! Every token parser skips leading whitespace, so the grammar functions can
//! be composed without threading whitespace handling through each rule.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0, one_of, satisfy},
    combinator::{map, not, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::{fold_many0, many0, separated_list0},
    sequence::{pair, preceded, terminated},
    IResult, Parser,
};

use super::{BinaryOp, CompareOp, ExprResult, Expression, ExpressionError, UnaryOp, Value};

type PResult<'a, O> = IResult<&'a str, O>;

/// Deepest nesting of brackets and prefix operators an expression may use
pub const MAX_DEPTH: usize = 32;

/// Magnitude of `i64::MIN`, which only parses as a negated literal
const MIN_INT_MAGNITUDE: &str = "9223372036854775808";

/// Parse a complete expression, rejecting trailing input
pub(super) fn parse_expression(input: &str) -> ExprResult<Expression> {
    match expression(input, 0) {
        Ok((remainder, expr)) => {
            // Make sure the entire input was consumed
            if remainder.trim().is_empty() {
                Ok(expr)
            } else {
                Err(ExpressionError::ParseError {
                    message: format!("Unexpected trailing characters: '{}'", remainder.trim()),
                })
            }
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ExpressionError::ParseError {
            message: if e.code == ErrorKind::TooLarge {
                format!("expression is nested more than {} levels deep", MAX_DEPTH)
            } else if e.input.trim().is_empty() {
                "unexpected end of expression".to_string()
            } else {
                format!("unexpected input at '{}'", e.input.trim())
            },
        }),
        Err(nom::Err::Incomplete(_)) => Err(ExpressionError::ParseError {
            message: "incomplete expression".to_string(),
        }),
    }
}

fn ws(input: &str) -> PResult<'_, &str> {
    multispace0(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// An operator or punctuation token
fn symbol<'a>(text: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = Error<&'a str>> {
    preceded(ws, tag(text))
}

/// A keyword that must not run on into an identifier (`in` but not `index`)
fn keyword<'a>(word: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = Error<&'a str>> {
    preceded(ws, terminated(tag(word), not(satisfy(is_ident_char))))
}

/// Enter one more level of nesting, failing hard past [`MAX_DEPTH`]
fn nested(input: &str, depth: usize) -> PResult<'_, usize> {
    if depth >= MAX_DEPTH {
        Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)))
    } else {
        Ok((input, depth + 1))
    }
}

fn expression(input: &str, depth: usize) -> PResult<'_, Expression> {
    or_expr(input, depth)
}

fn or_expr(input: &str, depth: usize) -> PResult<'_, Expression> {
    let (input, first) = and_expr(input, depth)?;
    fold_many0(
        preceded(keyword("or"), move |i| and_expr(i, depth)),
        move || first.clone(),
        |lhs, rhs| Expression::Or(Box::new(lhs), Box::new(rhs)),
    )
    .parse(input)
}

fn and_expr(input: &str, depth: usize) -> PResult<'_, Expression> {
    let (input, first) = not_expr(input, depth)?;
    fold_many0(
        preceded(keyword("and"), move |i| not_expr(i, depth)),
        move || first.clone(),
        |lhs, rhs| Expression::And(Box::new(lhs), Box::new(rhs)),
    )
    .parse(input)
}

fn not_expr(input: &str, depth: usize) -> PResult<'_, Expression> {
    alt((
        map(
            preceded(keyword("not"), move |i| {
                let (i, depth) = nested(i, depth)?;
                not_expr(i, depth)
            }),
            |expr| Expression::Unary(UnaryOp::Not, Box::new(expr)),
        ),
        move |i| comparison(i, depth),
    ))
    .parse(input)
}

/// Comparisons chain like Python: `a < b < c` means `a < b and b < c`
fn comparison(input: &str, depth: usize) -> PResult<'_, Expression> {
    let (input, first) = additive(input, depth)?;
    let (input, rest) = many0(pair(compare_op, move |i| additive(i, depth))).parse(input)?;
    if rest.is_empty() {
        Ok((input, first))
    } else {
        Ok((input, Expression::Compare(Box::new(first), rest)))
    }
}

fn compare_op(input: &str) -> PResult<'_, CompareOp> {
    alt((
        value(CompareOp::Eq, symbol("==")),
        value(CompareOp::Ne, symbol("!=")),
        value(CompareOp::Le, symbol("<=")),
        value(CompareOp::Ge, symbol(">=")),
        value(CompareOp::Lt, symbol("<")),
        value(CompareOp::Gt, symbol(">")),
        value(CompareOp::In, keyword("in")),
        value(CompareOp::NotIn, pair(keyword("not"), keyword("in"))),
    ))
    .parse(input)
}

fn additive(input: &str, depth: usize) -> PResult<'_, Expression> {
    let (input, first) = term(input, depth)?;
    fold_many0(
        pair(
            alt((
                value(BinaryOp::Add, symbol("+")),
                value(BinaryOp::Sub, symbol("-")),
            )),
            move |i| term(i, depth),
        ),
        move || first.clone(),
        |lhs, (op, rhs)| Expression::Binary(op, Box::new(lhs), Box::new(rhs)),
    )
    .parse(input)
}

fn term(input: &str, depth: usize) -> PResult<'_, Expression> {
    let (input, first) = unary(input, depth)?;
    fold_many0(
        pair(
            alt((
                value(BinaryOp::FloorDiv, symbol("//")),
                value(BinaryOp::Div, symbol("/")),
                value(BinaryOp::Mod, symbol("%")),
                value(BinaryOp::Mul, symbol("*")),
            )),
            move |i| unary(i, depth),
        ),
        move || first.clone(),
        |lhs, (op, rhs)| Expression::Binary(op, Box::new(lhs), Box::new(rhs)),
    )
    .parse(input)
}

fn unary(input: &str, depth: usize) -> PResult<'_, Expression> {
    alt((
        preceded(symbol("-"), min_int),
        map(preceded(symbol("-"), move |i| nested_unary(i, depth)), |expr| {
            Expression::Unary(UnaryOp::Neg, Box::new(expr))
        }),
        map(preceded(symbol("+"), move |i| nested_unary(i, depth)), |expr| {
            Expression::Unary(UnaryOp::Pos, Box::new(expr))
        }),
        move |i| power(i, depth),
    ))
    .parse(input)
}

fn nested_unary(input: &str, depth: usize) -> PResult<'_, Expression> {
    let (input, depth) = nested(input, depth)?;
    unary(input, depth)
}

/// The literal after a minus sign when it is exactly `i64::MIN`
fn min_int(input: &str) -> PResult<'_, Expression> {
    let (rest, text) = preceded(ws, number_text).parse(input)?;
    if text != MIN_INT_MAGNITUDE {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Digit)));
    }
    let (rest, _) = not(symbol("**")).parse(rest)?;
    Ok((rest, Expression::Literal(Value::Int(i64::MIN))))
}

/// `**` binds tighter than unary minus on its left and is right associative
fn power(input: &str, depth: usize) -> PResult<'_, Expression> {
    let (input, base) = postfix(input, depth)?;
    let (input, exponent) = opt(preceded(symbol("**"), move |i| nested_unary(i, depth))).parse(input)?;
    match exponent {
        Some(exponent) => Ok((
            input,
            Expression::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)),
        )),
        None => Ok((input, base)),
    }
}

fn postfix(input: &str, depth: usize) -> PResult<'_, Expression> {
    let (input, target) = primary(input, depth)?;
    fold_many0(
        pair(preceded(symbol("."), identifier), move |i| call_args(i, depth)),
        move || target.clone(),
        |target, (name, args)| Expression::Method(Box::new(target), name, args),
    )
    .parse(input)
}

fn primary(input: &str, depth: usize) -> PResult<'_, Expression> {
    preceded(
        ws,
        alt((
            number,
            map(string_literal, |s| Expression::Literal(Value::Str(s))),
            move |i| list_literal(i, depth),
            move |i| parenthesized(i, depth),
            move |i| call_or_name(i, depth),
        )),
    )
    .parse(input)
}

fn list_literal(input: &str, depth: usize) -> PResult<'_, Expression> {
    let (input, _) = char('[').parse(input)?;
    let (input, depth) = nested(input, depth)?;
    let (input, items) = separated_list0(symbol(","), move |i| expression(i, depth)).parse(input)?;
    let (input, _) = symbol("]").parse(input)?;
    Ok((input, Expression::List(items)))
}

/// A parenthesized expression, or a tuple when it contains a comma
fn parenthesized(input: &str, depth: usize) -> PResult<'_, Expression> {
    let (input, _) = symbol("(").parse(input)?;
    let (input, depth) = nested(input, depth)?;
    let (input, first) = expression(input, depth)?;
    let (input, rest) = many0(preceded(symbol(","), move |i| expression(i, depth))).parse(input)?;
    let (input, trailing_comma) = opt(symbol(",")).parse(input)?;
    let (input, _) = symbol(")").parse(input)?;

    if rest.is_empty() && trailing_comma.is_none() {
        Ok((input, first))
    } else {
        let mut items = vec![first];
        items.extend(rest);
        Ok((input, Expression::List(items)))
    }
}

/// A function call, a keyword literal, or a bare name
fn call_or_name(input: &str, depth: usize) -> PResult<'_, Expression> {
    let (input, name) = dotted_identifier(input)?;
    let (input, args) = opt(move |i| call_args(i, depth)).parse(input)?;

    let expr = match args {
        Some(args) => Expression::Call(name, args),
        None => match name.as_str() {
            "True" | "true" => Expression::Literal(Value::Bool(true)),
            "False" | "false" => Expression::Literal(Value::Bool(false)),
            "None" => Expression::Literal(Value::Null),
            _ => Expression::Name(name),
        },
    };
    Ok((input, expr))
}

fn call_args(input: &str, depth: usize) -> PResult<'_, Vec<Expression>> {
    let (input, _) = symbol("(").parse(input)?;
    let (input, depth) = nested(input, depth)?;
    terminated(
        separated_list0(symbol(","), move |i| expression(i, depth)),
        symbol(")"),
    )
    .parse(input)
}

/// Parse an identifier (variable or function name)
fn identifier(input: &str) -> PResult<'_, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        str::to_string,
    )
    .parse(input)
}

fn dotted_identifier(input: &str) -> PResult<'_, String> {
    map(
        recognize(pair(identifier, many0(pair(char('.'), identifier)))),
        str::to_string,
    )
    .parse(input)
}

fn number_text(input: &str) -> PResult<'_, &str> {
    recognize((
        digit1,
        opt(pair(char('.'), digit1)),
        opt((one_of("eE"), opt(one_of("+-")), digit1)),
    ))
    .parse(input)
}

/// Integers have neither a fractional part nor an exponent
fn number(input: &str) -> PResult<'_, Expression> {
    let (rest, text) = number_text(input)?;

    let literal = if text.contains(|c| matches!(c, '.' | 'e' | 'E')) {
        text.parse::<f64>().ok().map(Value::Float)
    } else {
        text.parse::<i64>().ok().map(Value::Int)
    };

    match literal {
        Some(literal) => Ok((rest, Expression::Literal(literal))),
        None => Err(nom::Err::Failure(Error::new(input, ErrorKind::Digit))),
    }
}

/// A single- or double-quoted string.
///
/// `\n`, `\t`, `\\` and escaped quotes are translated; any other escape is
/// kept verbatim so regular expressions such as `"\d+"` survive.
fn string_literal(input: &str) -> PResult<'_, String> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, q @ ('"' | '\''))) => q,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    };

    let mut text = String::new();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, escaped @ ('\\' | '"' | '\''))) => text.push(escaped),
                Some((_, other)) => {
                    text.push('\\');
                    text.push(other);
                }
                None => break,
            },
            c if c == quote => return Ok((&input[i + c.len_utf8()..], text)),
            c => text.push(c),
        }
    }

    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}
