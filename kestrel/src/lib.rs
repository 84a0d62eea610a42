/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod algebra;
pub mod config;
pub mod context;
pub mod error;
pub mod expression;
pub mod query_engine;
pub mod solution;
pub mod triple_store;
pub mod update;
pub mod value;

pub use algebra::{GraphPattern, GraphTarget, Query, QueryForm, QueryParser, QueryResult, TermPattern, TriplePattern};
pub use config::{InferenceMode, StoreConfig};
pub use context::{EvaluationContext, ExpressionContext};
pub use error::{ConfigError, EvalError, ParseError, ScopeError, StoreError, StoreResult};
pub use expression::{Expression, Function, TrigKind};
pub use query_engine::{QueryProcessor, StandardEngine};
pub use solution::{Solution, SolutionSet};
pub use triple_store::{ActiveGraph, ScopeTarget, TripleStore};
pub use update::{UpdateCommand, UpdateCommandSet, UpdateParser};
pub use value::Value;

pub use datalog::RuleReasoner;
pub use shared::selector;
pub use shared::{
    read_graph, vocab, write_graph, CollectionError, Graph, GraphEvent, GraphName, GraphRef, InferenceEngine, Iri, Node, NodeFactory,
    ReasonerError, Triple,
};
