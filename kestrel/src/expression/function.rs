/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use shared::error::ModelError;
use shared::node::Iri;
use std::fmt;

/// Namespace of the numeric extension functions.
pub const EXTENSION_NAMESPACE: &str = "urn:kestrel:fn:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrigKind {
    Sine,
    Cosine,
    Tangent,
}

impl TrigKind {
    fn local_name(self) -> &'static str {
        match self {
            TrigKind::Sine => "sin",
            TrigKind::Cosine => "cos",
            TrigKind::Tangent => "tan",
        }
    }

    pub(crate) fn apply(self, inverse: bool, x: f64) -> f64 {
        match (self, inverse) {
            (TrigKind::Sine, false) => x.sin(),
            (TrigKind::Sine, true) => x.asin(),
            (TrigKind::Cosine, false) => x.cos(),
            (TrigKind::Cosine, true) => x.acos(),
            (TrigKind::Tangent, false) => x.tan(),
            (TrigKind::Tangent, true) => x.atan(),
        }
    }
}

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::Range(min, max) => (min..=max).contains(&count),
            Arity::AtLeast(min) => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Range(min, max) => write!(f, "{} to {}", min, max),
            Arity::AtLeast(min) => write!(f, "at least {}", min),
        }
    }
}

/// Every function an expression can call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Function {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    And,
    Or,
    Not,
    Bound,
    Str,
    Lang,
    Datatype,
    IsIri,
    IsBlank,
    IsLiteral,
    IsNumeric,
    SameTerm,
    If,
    Coalesce,
    StrLen,
    UCase,
    LCase,
    Concat,
    Contains,
    StrStarts,
    StrEnds,
    Regex,
    EncodeForUri,
    Abs,
    Ceil,
    Floor,
    Round,
    Now,
    /// One variant for a function and its inverse; the flag picks both the
    /// operation and the functor.
    Trigonometric { kind: TrigKind, inverse: bool },
    Sqrt,
    Ln,
    Pow,
    /// A function this engine has no implementation for.
    Unknown(Iri),
}

const KEYWORDS: &[(&str, Function)] = &[
    ("+", Function::Add),
    ("-", Function::Subtract),
    ("*", Function::Multiply),
    ("/", Function::Divide),
    ("=", Function::Equal),
    ("!=", Function::NotEqual),
    ("<", Function::Less),
    ("<=", Function::LessOrEqual),
    (">", Function::Greater),
    (">=", Function::GreaterOrEqual),
    ("&&", Function::And),
    ("||", Function::Or),
    ("!", Function::Not),
    ("BOUND", Function::Bound),
    ("STR", Function::Str),
    ("LANG", Function::Lang),
    ("DATATYPE", Function::Datatype),
    ("ISIRI", Function::IsIri),
    ("ISBLANK", Function::IsBlank),
    ("ISLITERAL", Function::IsLiteral),
    ("ISNUMERIC", Function::IsNumeric),
    ("SAMETERM", Function::SameTerm),
    ("IF", Function::If),
    ("COALESCE", Function::Coalesce),
    ("STRLEN", Function::StrLen),
    ("UCASE", Function::UCase),
    ("LCASE", Function::LCase),
    ("CONCAT", Function::Concat),
    ("CONTAINS", Function::Contains),
    ("STRSTARTS", Function::StrStarts),
    ("STRENDS", Function::StrEnds),
    ("REGEX", Function::Regex),
    ("ENCODE_FOR_URI", Function::EncodeForUri),
    ("ABS", Function::Abs),
    ("CEIL", Function::Ceil),
    ("FLOOR", Function::Floor),
    ("ROUND", Function::Round),
    ("NOW", Function::Now),
];

impl Function {
    /// Stable identity of the function.
    pub fn functor(&self) -> String {
        match self {
            Function::Trigonometric { kind, inverse } => {
                let suffix = if *inverse { "-1" } else { "" };
                format!("{}{}{}", EXTENSION_NAMESPACE, kind.local_name(), suffix)
            }
            Function::Sqrt => format!("{}sqrt", EXTENSION_NAMESPACE),
            Function::Ln => format!("{}ln", EXTENSION_NAMESPACE),
            Function::Pow => format!("{}pow", EXTENSION_NAMESPACE),
            Function::Unknown(iri) => iri.to_string(),
            keyword => KEYWORDS
                .iter()
                .find(|(_, f)| f == keyword)
                .map(|(name, _)| name.to_string())
                .unwrap_or_default(),
        }
    }

    /// Inverse of [`Function::functor`]. Any other absolute IRI yields `Unknown`.
    pub fn from_functor(functor: &str) -> Result<Function, ModelError> {
        let upper = functor.to_ascii_uppercase();
        if let Some((_, function)) = KEYWORDS.iter().find(|(name, _)| *name == upper) {
            return Ok(function.clone());
        }
        if let Some(local) = functor.strip_prefix(EXTENSION_NAMESPACE) {
            let (name, inverse) = match local.strip_suffix("-1") {
                Some(name) => (name, true),
                None => (local, false),
            };
            let kind = match name {
                "sin" => Some(TrigKind::Sine),
                "cos" => Some(TrigKind::Cosine),
                "tan" => Some(TrigKind::Tangent),
                _ => None,
            };
            match (kind, inverse, name) {
                (Some(kind), _, _) => return Ok(Function::Trigonometric { kind, inverse }),
                (None, false, "sqrt") => return Ok(Function::Sqrt),
                (None, false, "ln") => return Ok(Function::Ln),
                (None, false, "pow") => return Ok(Function::Pow),
                _ => {}
            }
        }
        Iri::parse(functor)
            .map(Function::Unknown)
            .map_err(|_| ModelError::UnknownFunctor(functor.to_string()))
    }

    /// `None` for `Unknown`, whose arity is whatever it was built with.
    pub fn arity(&self) -> Option<Arity> {
        let arity = match self {
            Function::Add
            | Function::Subtract
            | Function::Multiply
            | Function::Divide
            | Function::Equal
            | Function::NotEqual
            | Function::Less
            | Function::LessOrEqual
            | Function::Greater
            | Function::GreaterOrEqual
            | Function::And
            | Function::Or
            | Function::SameTerm
            | Function::Contains
            | Function::StrStarts
            | Function::StrEnds
            | Function::Pow => Arity::Exact(2),
            Function::Not
            | Function::Bound
            | Function::Str
            | Function::Lang
            | Function::Datatype
            | Function::IsIri
            | Function::IsBlank
            | Function::IsLiteral
            | Function::IsNumeric
            | Function::StrLen
            | Function::UCase
            | Function::LCase
            | Function::EncodeForUri
            | Function::Abs
            | Function::Ceil
            | Function::Floor
            | Function::Round
            | Function::Trigonometric { .. }
            | Function::Sqrt
            | Function::Ln => Arity::Exact(1),
            Function::If => Arity::Exact(3),
            Function::Coalesce => Arity::AtLeast(1),
            Function::Concat => Arity::AtLeast(0),
            Function::Regex => Arity::Range(2, 3),
            Function::Now => Arity::Exact(0),
            Function::Unknown(_) => return None,
        };
        Some(arity)
    }

    /// Rendered between its operands rather than as a call.
    pub fn infix_operator(&self) -> bool {
        matches!(
            self,
            Function::Add
                | Function::Subtract
                | Function::Multiply
                | Function::Divide
                | Function::Equal
                | Function::NotEqual
                | Function::Less
                | Function::LessOrEqual
                | Function::Greater
                | Function::GreaterOrEqual
                | Function::And
                | Function::Or
        )
    }

    pub fn is_extension(&self) -> bool {
        matches!(
            self,
            Function::Trigonometric { .. } | Function::Sqrt | Function::Ln | Function::Pow | Function::Unknown(_)
        )
    }
}
