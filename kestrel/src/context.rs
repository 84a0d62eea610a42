/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::triple_store::TripleStore;
use chrono::{DateTime, Utc};
use shared::node::Iri;

/// Read-only state an expression may consult.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionContext {
    /// Start time of the query; every NOW() in one evaluation returns it.
    pub now: DateTime<Utc>,
    pub base_iri: Option<Iri>,
}

impl ExpressionContext {
    pub fn at(now: DateTime<Utc>) -> Self {
        ExpressionContext { now, base_iri: None }
    }

    pub fn with_base_iri(mut self, base_iri: Option<Iri>) -> Self {
        self.base_iri = base_iri;
        self
    }
}

impl Default for ExpressionContext {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

/// State of one query or update evaluation. All commands of an update share one.
pub struct EvaluationContext<'s> {
    pub store: &'s mut TripleStore,
    pub expressions: ExpressionContext,
}

impl<'s> EvaluationContext<'s> {
    pub fn new(store: &'s mut TripleStore) -> Self {
        let base_iri = store.base_iri().cloned();
        EvaluationContext {
            store,
            expressions: ExpressionContext::default().with_base_iri(base_iri),
        }
    }
}
