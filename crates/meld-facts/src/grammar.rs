//! Fact-line grammar.
//!
//! One line of a runtime dump (after node markers are filtered out) holds one
//! fact:
//!
//! ```text
//! fact      := name [ "(" [ arg { "," arg } ] ")" ] [ "." ]
//! arg       := list | noderef | float | int | text
//! list      := "[" [ scalar { "," scalar } ] "]"
//! scalar    := noderef | float | int
//! noderef   := "@" int
//! float     := int ( "." digit+ [ exp ] | exp )
//! int       := [ "+" | "-" ] digit+
//! exp       := ( "e" | "E" ) [ "+" | "-" ] digit+
//! ```
//!
//! Arguments are split on commas at bracket depth 0, so list literals may
//! contain commas. A token that starts with `[` and ends with `]` is a list.
//! Anything else not fully consumed by one of the numeric shapes is kept as
//! `Text` (identifiers, hyphenated names, `inf`, `1.`, `a[1]`, ...); brackets
//! inside text only have to balance.

use nom::{
    branch::alt,
    character::complete::{char as pchar, digit1, multispace0, one_of},
    combinator::{all_consuming, map, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use crate::error::MalformedFactError;
use crate::value::{Fact, Scalar, Value};

/// Decode one fact line.
///
/// A trailing `.` terminator and surrounding whitespace are ignored. `name`,
/// `name()` and `name( )` all decode to a fact without arguments.
///
/// Numeric literals must fit their type: integers and node references are
/// `i64`, and a float that overflows to infinity (`1e400`) is rejected as out
/// of range rather than decoded, so every decoded value renders back to text
/// that decodes to the same value.
pub fn parse_fact(line: &str) -> Result<Fact, MalformedFactError> {
    let trimmed = line.trim();
    let fail = |message: String| MalformedFactError::new(trimmed, message);

    let body = trimmed.strip_suffix('.').unwrap_or(trimmed).trim_end();
    if body.is_empty() {
        return Err(fail("empty fact".to_string()));
    }

    let Some(open) = body.find('(') else {
        check_name(body).map_err(fail)?;
        return Ok(Fact::new(body, vec![]));
    };

    let name = body[..open].trim_end();
    check_name(name).map_err(fail)?;

    let rest = &body[open + 1..];
    let Some(inner) = rest.strip_suffix(')') else {
        let message = if rest.contains(')') {
            "unexpected content after `)`"
        } else {
            "missing closing parenthesis"
        };
        return Err(fail(message.to_string()));
    };
    if inner.contains(|c: char| c == '(' || c == ')') {
        return Err(fail("unbalanced parentheses".to_string()));
    }

    let args = parse_arguments(inner).map_err(fail)?;
    Ok(Fact::new(name, args))
}

fn check_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("missing predicate name".to_string());
    }
    if let Some(c) = name.chars().find(|c| matches!(*c, ')' | '[' | ']' | ',')) {
        return Err(format!("unexpected `{c}` in predicate name `{name}`"));
    }
    Ok(())
}

fn parse_arguments(inner: &str) -> Result<Vec<Value>, String> {
    if inner.trim().is_empty() {
        return Ok(vec![]);
    }
    split_top_level_commas(inner)?
        .into_iter()
        .enumerate()
        .map(|(i, part)| {
            let token = part.trim();
            if token.is_empty() {
                return Err(format!("argument {} is empty", i + 1));
            }
            parse_argument(token)
        })
        .collect()
}

fn split_top_level_commas(s: &str) -> Result<Vec<&str>, String> {
    let mut parts = Vec::new();
    let mut start = 0usize;
    let mut bracket_depth: i32 = 0;
    for (idx, ch) in s.char_indices() {
        match ch {
            '[' => bracket_depth += 1,
            ']' => {
                bracket_depth -= 1;
                if bracket_depth < 0 {
                    return Err("unbalanced `]`".to_string());
                }
            }
            ',' if bracket_depth == 0 => {
                parts.push(&s[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if bracket_depth != 0 {
        return Err("unclosed `[`".to_string());
    }
    parts.push(&s[start..]);
    Ok(parts)
}

fn parse_argument(token: &str) -> Result<Value, String> {
    if token.starts_with('[') && token.ends_with(']') {
        let (_, items) = all_consuming(list_literal)(token).map_err(|_| {
            format!("invalid list `{token}`: items must be node references, integers or floats")
        })?;
        return items
            .into_iter()
            .map(Literal::into_scalar)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List);
    }
    match all_consuming(literal)(token) {
        Ok((_, lit)) => lit.into_scalar().map(Value::from),
        Err(_) => Ok(Value::Text(token.to_string())),
    }
}

// ============================================================================
// Token shapes
// ============================================================================

/// A recognized numeric or address token, not yet range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Literal<'a> {
    NodeRef(&'a str),
    Float(&'a str),
    Int(&'a str),
}

impl Literal<'_> {
    fn into_scalar(self) -> Result<Scalar, String> {
        match self {
            Literal::NodeRef(digits) => digits
                .parse()
                .map(Scalar::NodeRef)
                .map_err(|_| format!("node reference `@{digits}` out of range")),
            Literal::Int(digits) => digits
                .parse()
                .map(Scalar::Int)
                .map_err(|_| format!("integer `{digits}` out of range")),
            Literal::Float(text) => match text.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Scalar::Float(v)),
                _ => Err(format!("float `{text}` out of range")),
            },
        }
    }
}

fn signed_digits(input: &str) -> IResult<&str, &str> {
    recognize(pair(opt(one_of("+-")), digit1))(input)
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(input)
}

fn float_digits(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        signed_digits,
        alt((
            recognize(pair(preceded(pchar('.'), digit1), opt(exponent))),
            exponent,
        )),
    )))(input)
}

// Float before Int: `0.5` would otherwise stop after `0`.
fn literal(input: &str) -> IResult<&str, Literal<'_>> {
    alt((
        map(preceded(pchar('@'), signed_digits), Literal::NodeRef),
        map(float_digits, Literal::Float),
        map(signed_digits, Literal::Int),
    ))(input)
}

fn list_literal(input: &str) -> IResult<&str, Vec<Literal<'_>>> {
    delimited(
        pchar('['),
        separated_list0(pchar(','), delimited(multispace0, literal, multispace0)),
        pair(multispace0, pchar(']')),
    )(input)
}
