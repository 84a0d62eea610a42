/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use shared::error::{CollectionError, ModelError, ReasonerError};
use shared::node::Iri;
use thiserror::Error;

/// Errors raised while evaluating an expression against one solution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("No implementation for {functor} available")]
    UnevaluableFunction { functor: String },
    #[error("{functor} is undefined for input {input}")]
    Domain { functor: String, input: f64 },
    #[error("variable ?{0} is not bound")]
    UnboundVariable(String),
    #[error("{functor} cannot be applied to {found}")]
    TypeError { functor: String, found: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in {0}")]
    Overflow(String),
    #[error("{functor} expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        functor: String,
        expected: String,
        actual: usize,
    },
    #[error("invalid regular expression '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },
}

impl EvalError {
    /// Whether error-tolerant constructs (FILTER, `||`, `&&`, COALESCE, BIND)
    /// may absorb this error. A function without an implementation never is.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EvalError::UnevaluableFunction { .. })
    }

    pub(crate) fn type_error(functor: &str, found: impl ToString) -> Self {
        EvalError::TypeError {
            functor: functor.to_string(),
            found: found.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("graph <{0}> does not exist in this store")]
    GraphNotFound(Iri),
    #[error("cannot reset the active graph: the scope stack is empty")]
    EmptyScopeStack,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown query engine '{0}'")]
    UnknownQueryEngine(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("cannot read configuration: {0}")]
    Json(String),
}

/// Reported by the query and update text parsers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error: {message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
        }
    }
}

/// Top level error of every store operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Scope(#[from] ScopeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Reasoner(#[from] ReasonerError),
    #[error(transparent)]
    Collection(#[from] CollectionError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("<{0}> is reserved for inferred triples")]
    ReservedGraphIri(Iri),
    #[error("update failed: {0}")]
    Update(String),
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
