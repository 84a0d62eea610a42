/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::error::EvalError;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use shared::node::{vocab, Literal, LiteralKind, Node};
use std::cmp::Ordering;
use std::fmt;

/// The result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String {
        value: String,
        language: Option<String>,
    },
    DateTime(DateTime<FixedOffset>),
    /// IRIs, blank nodes and literals of datatypes without a scalar projection.
    Term(Node),
}

impl Value {
    pub fn string(value: impl Into<String>) -> Self {
        Value::String {
            value: value.into(),
            language: None,
        }
    }

    pub fn from_node(node: &Node) -> Value {
        let literal = match node {
            Node::Literal(literal) => literal,
            other => return Value::Term(other.clone()),
        };
        let lexical = literal.value();
        match literal.kind() {
            LiteralKind::Simple => Value::string(lexical),
            LiteralKind::LanguageTagged(language) => Value::String {
                value: lexical.to_string(),
                language: Some(language.clone()),
            },
            LiteralKind::Typed(datatype) => {
                let parsed = match datatype.as_str() {
                    vocab::XSD_STRING => Some(Value::string(lexical)),
                    vocab::XSD_INTEGER | vocab::XSD_INT | vocab::XSD_LONG => {
                        lexical.trim().parse::<i64>().ok().map(Value::Integer)
                    }
                    vocab::XSD_DOUBLE | vocab::XSD_FLOAT | vocab::XSD_DECIMAL => {
                        parse_double(lexical.trim()).map(Value::Double)
                    }
                    vocab::XSD_BOOLEAN => match lexical.trim() {
                        "true" | "1" => Some(Value::Boolean(true)),
                        "false" | "0" => Some(Value::Boolean(false)),
                        _ => None,
                    },
                    vocab::XSD_DATE_TIME => DateTime::parse_from_rfc3339(lexical.trim())
                        .ok()
                        .map(Value::DateTime),
                    _ => None,
                };
                parsed.unwrap_or_else(|| Value::Term(node.clone()))
            }
        }
    }

    pub fn to_node(&self) -> Node {
        match self {
            Value::Boolean(b) => Node::boolean(*b),
            Value::Integer(i) => Node::integer(*i),
            Value::Double(d) => Node::double(*d),
            Value::String {
                value,
                language: None,
            } => Node::literal(value.clone()),
            Value::String {
                value,
                language: Some(language),
            } => Literal::language_tagged(value.clone(), language)
                .map(Node::Literal)
                .unwrap_or_else(|_| Node::literal(value.clone())),
            Value::DateTime(dt) => Node::typed_literal(
                dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                vocab::XSD_DATE_TIME,
            ),
            Value::Term(node) => node.clone(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Double(_))
    }

    /// SPARQL effective boolean value.
    pub fn effective_boolean_value(&self) -> Result<bool, EvalError> {
        match self {
            Value::Boolean(b) => Ok(*b),
            Value::Integer(i) => Ok(*i != 0),
            Value::Double(d) => Ok(*d != 0.0 && !d.is_nan()),
            Value::String { value, .. } => Ok(!value.is_empty()),
            other => Err(EvalError::type_error("EBV", other.type_name())),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Double(_) => "double",
            Value::String { .. } => "string",
            Value::DateTime(_) => "dateTime",
            Value::Term(Node::Iri(_)) => "IRI",
            Value::Term(Node::Blank(_)) => "blank node",
            Value::Term(Node::Literal(_)) => "literal",
            Value::Term(Node::Variable(_)) => "variable",
            Value::Term(Node::GraphLiteral(_)) => "graph literal",
        }
    }

    /// Ordering used by `<`, `<=`, `>`, `>=`; `None` when the values are not comparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (a, b) if a.is_numeric() && b.is_numeric() => a.as_f64()?.partial_cmp(&b.as_f64()?),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (
                Value::String {
                    value: a,
                    language: la,
                },
                Value::String {
                    value: b,
                    language: lb,
                },
            ) if la == lb => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Value equality for `=`: numeric by value, everything else as RDF terms.
    pub fn value_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_numeric() && b.is_numeric() => a.compare(b) == Some(Ordering::Equal),
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            _ => self.to_node() == other.to_node(),
        }
    }
}

fn parse_double(lexical: &str) -> Option<f64> {
    match lexical {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        other => other.parse::<f64>().ok(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_node())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_literals_are_projected() {
        assert_eq!(Value::from_node(&Node::integer(7)), Value::Integer(7));
        assert_eq!(Value::from_node(&Node::double(1.5)), Value::Double(1.5));
        assert_eq!(Value::from_node(&Node::boolean(true)), Value::Boolean(true));
        assert_eq!(
            Value::from_node(&Node::typed_literal("x", vocab::XSD_STRING)),
            Value::string("x")
        );
        let bad = Node::typed_literal("seven", vocab::XSD_INTEGER);
        assert_eq!(Value::from_node(&bad), Value::Term(bad.clone()));
    }

    #[test]
    fn test_effective_boolean_value() {
        assert_eq!(Value::string("").effective_boolean_value(), Ok(false));
        assert_eq!(Value::Integer(3).effective_boolean_value(), Ok(true));
        assert_eq!(Value::Double(f64::NAN).effective_boolean_value(), Ok(false));
        let iri = Value::Term(Node::iri("http://example.org/a").unwrap());
        assert!(iri.effective_boolean_value().is_err());
    }

    #[test]
    fn test_mixed_numeric_comparison() {
        assert_eq!(Value::Integer(2).compare(&Value::Double(2.5)), Some(Ordering::Less));
        assert!(Value::Integer(2).value_equals(&Value::Double(2.0)));
        assert_eq!(Value::Integer(2).compare(&Value::string("2")), None);
    }

    #[test]
    fn test_date_time_round_trip() {
        let node = Node::typed_literal("2026-01-02T03:04:05Z", vocab::XSD_DATE_TIME);
        let value = Value::from_node(&node);
        assert!(matches!(value, Value::DateTime(_)));
        assert_eq!(value.to_node(), node);
    }
}
