/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

/// Errors raised while building nodes and triples.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid IRI '{iri}': {reason}")]
    InvalidIri { iri: String, reason: String },
    #[error("invalid language tag '{0}'")]
    InvalidLanguageTag(String),
    #[error("invalid variable name '{0}'")]
    InvalidVariable(String),
    #[error("unknown functor '{0}'")]
    UnknownFunctor(String),
}

/// Errors raised by structural changes to a graph collection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error("a graph named {0} already exists in this collection")]
    GraphExists(String),
}

/// Errors surfaced by an inference engine. The store never swallows these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReasonerError {
    #[error("reasoner '{reasoner}' failed: {message}")]
    Failed { reasoner: String, message: String },
    #[error("invalid rule: {0}")]
    InvalidRule(String),
}

impl ReasonerError {
    pub fn failed(reasoner: impl Into<String>, message: impl Into<String>) -> Self {
        ReasonerError::Failed {
            reasoner: reasoner.into(),
            message: message.into(),
        }
    }
}
