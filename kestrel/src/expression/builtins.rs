/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::function::Function;
use super::math;
use super::Expression;
use crate::context::ExpressionContext;
use crate::error::EvalError;
use crate::solution::Solution;
use crate::value::Value;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::RegexBuilder;
use shared::node::{vocab, Iri, LiteralKind, Node};
use std::cmp::Ordering;

// RFC 3986 unreserved characters stay as they are
const URI_UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub(super) fn evaluate_call(
    function: &Function,
    args: &[Expression],
    solution: &Solution,
    context: &ExpressionContext,
) -> Result<Value, EvalError> {
    if let Some(arity) = function.arity() {
        if !arity.accepts(args.len()) {
            return Err(EvalError::ArityMismatch {
                functor: function.functor(),
                expected: arity.to_string(),
                actual: args.len(),
            });
        }
    }
    let eval = |i: usize| args[i].evaluate(solution, context);

    match function {
        // These look at their arguments before (or instead of) evaluating them.
        Function::Unknown(iri) => Err(EvalError::UnevaluableFunction {
            functor: iri.to_string(),
        }),
        Function::And => logical(args, solution, context, false),
        Function::Or => logical(args, solution, context, true),
        Function::Bound => match &args[0] {
            Expression::Variable(name) => Ok(Value::Boolean(solution.contains(name))),
            other => Err(EvalError::type_error("BOUND", format!("non-variable {}", other))),
        },
        Function::If => {
            if eval(0)?.effective_boolean_value()? {
                eval(1)
            } else {
                eval(2)
            }
        }
        Function::Coalesce => {
            let mut last_error = None;
            for arg in args {
                match arg.evaluate(solution, context) {
                    Ok(value) => return Ok(value),
                    Err(e) if e.is_recoverable() => last_error = Some(e),
                    Err(e) => return Err(e),
                }
            }
            Err(last_error.unwrap_or_else(|| EvalError::type_error("COALESCE", "no arguments")))
        }
        Function::Now => Ok(Value::DateTime(context.now.into())),
        _ => {
            let values = args
                .iter()
                .map(|a| a.evaluate(solution, context))
                .collect::<Result<Vec<Value>, EvalError>>()?;
            apply(function, &values)
        }
    }
}

/// Functions that only need the values of their arguments.
fn apply(function: &Function, values: &[Value]) -> Result<Value, EvalError> {
    let functor = function.functor();
    match function {
        Function::Add | Function::Subtract | Function::Multiply | Function::Divide => {
            arithmetic(function, &values[0], &values[1])
        }
        Function::Equal => Ok(Value::Boolean(values[0].value_equals(&values[1]))),
        Function::NotEqual => Ok(Value::Boolean(!values[0].value_equals(&values[1]))),
        Function::Less | Function::LessOrEqual | Function::Greater | Function::GreaterOrEqual => {
            let ordering = values[0].compare(&values[1]).ok_or_else(|| {
                EvalError::type_error(
                    &functor,
                    format!("{} and {}", values[0].type_name(), values[1].type_name()),
                )
            })?;
            Ok(Value::Boolean(match function {
                Function::Less => ordering == Ordering::Less,
                Function::LessOrEqual => ordering != Ordering::Greater,
                Function::Greater => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        Function::Not => Ok(Value::Boolean(!values[0].effective_boolean_value()?)),

        Function::Str => match values[0].to_node() {
            Node::Iri(iri) => Ok(Value::string(iri.as_str())),
            Node::Literal(literal) => Ok(Value::string(literal.value())),
            _ => Err(EvalError::type_error(&functor, values[0].type_name())),
        },
        Function::Lang => match values[0].to_node() {
            Node::Literal(literal) => Ok(Value::string(literal.language().unwrap_or(""))),
            _ => Err(EvalError::type_error(&functor, values[0].type_name())),
        },
        Function::Datatype => match values[0].to_node() {
            Node::Literal(literal) => {
                let datatype = match literal.kind() {
                    LiteralKind::Simple => Iri::new_unchecked(vocab::XSD_STRING),
                    LiteralKind::LanguageTagged(_) => Iri::new_unchecked(vocab::RDF_LANG_STRING),
                    LiteralKind::Typed(datatype) => datatype.clone(),
                };
                Ok(Value::Term(Node::Iri(datatype)))
            }
            _ => Err(EvalError::type_error(&functor, values[0].type_name())),
        },
        Function::IsIri => Ok(Value::Boolean(values[0].to_node().is_iri())),
        Function::IsBlank => Ok(Value::Boolean(values[0].to_node().is_blank())),
        Function::IsLiteral => Ok(Value::Boolean(values[0].to_node().is_literal())),
        Function::IsNumeric => Ok(Value::Boolean(values[0].is_numeric())),
        Function::SameTerm => Ok(Value::Boolean(values[0].to_node() == values[1].to_node())),

        Function::StrLen => {
            let (text, _) = string_arg(&functor, &values[0])?;
            Ok(Value::Integer(text.chars().count() as i64))
        }
        Function::UCase | Function::LCase => {
            let (text, language) = string_arg(&functor, &values[0])?;
            let value = if *function == Function::UCase {
                text.to_uppercase()
            } else {
                text.to_lowercase()
            };
            Ok(Value::String {
                value,
                language: language.map(str::to_string),
            })
        }
        Function::Concat => {
            let mut value = String::new();
            let mut language: Option<Option<&str>> = None;
            for arg in values {
                let (text, lang) = string_arg(&functor, arg)?;
                value.push_str(text);
                language = match language {
                    None => Some(lang),
                    Some(previous) if previous == lang => Some(previous),
                    Some(_) => Some(None),
                };
            }
            Ok(Value::String {
                value,
                language: language.flatten().map(str::to_string),
            })
        }
        Function::Contains | Function::StrStarts | Function::StrEnds => {
            let (haystack, _) = string_arg(&functor, &values[0])?;
            let (needle, _) = string_arg(&functor, &values[1])?;
            Ok(Value::Boolean(match function {
                Function::Contains => haystack.contains(needle),
                Function::StrStarts => haystack.starts_with(needle),
                _ => haystack.ends_with(needle),
            }))
        }
        Function::Regex => {
            let (text, _) = string_arg(&functor, &values[0])?;
            let (pattern, _) = string_arg(&functor, &values[1])?;
            let flags = match values.get(2) {
                Some(flags) => string_arg(&functor, flags)?.0,
                None => "",
            };
            regex_match(text, pattern, flags).map(Value::Boolean)
        }
        Function::EncodeForUri => {
            let (text, _) = string_arg(&functor, &values[0])?;
            Ok(Value::string(utf8_percent_encode(text, URI_UNRESERVED).to_string()))
        }

        Function::Abs => math::abs(function, &values[0]),
        Function::Ceil | Function::Floor | Function::Round => math::rounding(function, &values[0]),
        Function::Trigonometric { .. } | Function::Sqrt | Function::Ln => math::unary_real(function, &values[0]),
        Function::Pow => math::pow(function, &values[0], &values[1]),

        Function::Unknown(_)
        | Function::And
        | Function::Or
        | Function::Bound
        | Function::If
        | Function::Coalesce
        | Function::Now => Err(EvalError::type_error(&functor, "pre-evaluated arguments")),
    }
}

/// `&&` (`short_on == false`) and `||` (`short_on == true`) with SPARQL error
/// tolerance: a decisive operand wins over a recoverable error on the other side.
fn logical(
    args: &[Expression],
    solution: &Solution,
    context: &ExpressionContext,
    short_on: bool,
) -> Result<Value, EvalError> {
    let left = args[0].evaluate_boolean(solution, context);
    let right = args[1].evaluate_boolean(solution, context);
    for side in [&left, &right] {
        if let Err(e) = side {
            if !e.is_recoverable() {
                return Err(e.clone());
            }
        }
    }
    match (left, right) {
        (Ok(l), _) if l == short_on => Ok(Value::Boolean(short_on)),
        (_, Ok(r)) if r == short_on => Ok(Value::Boolean(short_on)),
        (Ok(_), Ok(_)) => Ok(Value::Boolean(!short_on)),
        (Err(e), _) | (_, Err(e)) => Err(e),
    }
}

fn arithmetic(function: &Function, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let functor = function.functor();
    if let (Value::Integer(a), Value::Integer(b)) = (left, right) {
        let result = match function {
            Function::Add => a.checked_add(*b),
            Function::Subtract => a.checked_sub(*b),
            Function::Multiply => a.checked_mul(*b),
            _ => {
                if *b == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                return Ok(Value::Double(*a as f64 / *b as f64));
            }
        };
        return result.map(Value::Integer).ok_or(EvalError::Overflow(functor));
    }
    let a = left
        .as_f64()
        .ok_or_else(|| EvalError::type_error(&functor, left.type_name()))?;
    let b = right
        .as_f64()
        .ok_or_else(|| EvalError::type_error(&functor, right.type_name()))?;
    Ok(Value::Double(match function {
        Function::Add => a + b,
        Function::Subtract => a - b,
        Function::Multiply => a * b,
        _ => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            a / b
        }
    }))
}

fn string_arg<'v>(functor: &str, value: &'v Value) -> Result<(&'v str, Option<&'v str>), EvalError> {
    match value {
        Value::String { value, language } => Ok((value.as_str(), language.as_deref())),
        other => Err(EvalError::type_error(functor, other.type_name())),
    }
}

fn regex_match(text: &str, pattern: &str, flags: &str) -> Result<bool, EvalError> {
    let invalid = |message: String| EvalError::InvalidRegex {
        pattern: pattern.to_string(),
        message,
    };
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            other => return Err(invalid(format!("unsupported flag '{}'", other))),
        };
    }
    let regex = builder.build().map_err(|e| invalid(e.to_string()))?;
    Ok(regex.is_match(text))
}
