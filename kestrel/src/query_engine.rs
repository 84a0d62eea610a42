/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::algebra::{GraphPattern, GraphTarget, Query, QueryForm, QueryResult, TermPattern, TriplePattern};
use crate::config::STANDARD_ENGINE;
use crate::context::{EvaluationContext, ExpressionContext};
use crate::error::{StoreError, StoreResult};
use crate::expression::Expression;
use crate::solution::{Solution, SolutionSet};
use crate::triple_store::{ScopeTarget, TripleStore};
use log::{debug, warn};
use rustc_hash::FxHashSet;
use shared::graph::Graph;
use shared::node::Node;
use shared::node_factory::NodeFactory;

/// Evaluates query algebra against a store.
pub trait QueryProcessor: Send + Sync {
    fn name(&self) -> &str;
    fn evaluate(&self, query: &Query, context: &mut EvaluationContext<'_>) -> StoreResult<QueryResult>;
}

/// Built-in engine: patterns left to right, nested-loop joins, BGPs through
/// the store's indexed lookups.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardEngine;

impl StandardEngine {
    pub fn new() -> Self {
        StandardEngine
    }

    /// Solutions of a pattern in the store's current scope. Every scope pushed
    /// on the way is popped again before returning.
    pub fn solutions(
        &self,
        pattern: &GraphPattern,
        store: &mut TripleStore,
        expressions: &ExpressionContext,
    ) -> StoreResult<Vec<Solution>> {
        match pattern {
            GraphPattern::Bgp(patterns) => Ok(evaluate_bgp(patterns, store)),
            GraphPattern::Join(left, right) => {
                let left = self.solutions(left, store, expressions)?;
                let right = self.solutions(right, store, expressions)?;
                Ok(left
                    .iter()
                    .flat_map(|l| right.iter().filter_map(move |r| l.merge(r)))
                    .collect())
            }
            GraphPattern::LeftJoin { left, right, filter } => {
                let left = self.solutions(left, store, expressions)?;
                let right = self.solutions(right, store, expressions)?;
                let mut output = Vec::with_capacity(left.len());
                for l in &left {
                    let mut matched = false;
                    for r in &right {
                        if let Some(merged) = l.merge(r) {
                            let keep = match filter {
                                Some(expression) => passes(expression, &merged, expressions)?,
                                None => true,
                            };
                            if keep {
                                output.push(merged);
                                matched = true;
                            }
                        }
                    }
                    if !matched {
                        output.push(l.clone());
                    }
                }
                Ok(output)
            }
            GraphPattern::Union(left, right) => {
                let mut output = self.solutions(left, store, expressions)?;
                output.extend(self.solutions(right, store, expressions)?);
                Ok(output)
            }
            GraphPattern::Filter { expression, inner } => {
                let candidates = self.solutions(inner, store, expressions)?;
                let mut output = Vec::with_capacity(candidates.len());
                for solution in candidates {
                    if passes(expression, &solution, expressions)? {
                        output.push(solution);
                    }
                }
                Ok(output)
            }
            GraphPattern::Extend {
                inner,
                variable,
                expression,
            } => {
                let candidates = self.solutions(inner, store, expressions)?;
                let mut output = Vec::with_capacity(candidates.len());
                for solution in candidates {
                    if solution.contains(variable) {
                        return Err(StoreError::InvalidPattern(format!(
                            "BIND to ?{} which is already bound",
                            variable
                        )));
                    }
                    match expression.evaluate(&solution, expressions) {
                        Ok(value) => output.push(solution.with(variable, value.to_node())),
                        Err(e) if e.is_recoverable() => output.push(solution),
                        Err(e) => return Err(e.into()),
                    }
                }
                Ok(output)
            }
            GraphPattern::Graph { target, inner } => self.evaluate_graph(target, inner, store, expressions),
        }
    }

    fn evaluate_graph(
        &self,
        target: &GraphTarget,
        inner: &GraphPattern,
        store: &mut TripleStore,
        expressions: &ExpressionContext,
    ) -> StoreResult<Vec<Solution>> {
        let scope = match target {
            GraphTarget::Default => ScopeTarget::DefaultGraph,
            GraphTarget::Named(iri) => ScopeTarget::Iri(iri.clone()),
            GraphTarget::Union(iris) => ScopeTarget::Iris(iris.clone()),
            // Every named graph, the inference graph included.
            GraphTarget::Variable(variable) => {
                let mut output = Vec::new();
                for iri in store.graph_names().into_iter().flatten() {
                    let name = Node::Iri(iri.clone());
                    let inner_solutions =
                        store.with_active_graph(ScopeTarget::Iri(iri), |store| self.solutions(inner, store, expressions))?;
                    for solution in inner_solutions {
                        match solution.get(variable) {
                            Some(bound) if bound != &name => {}
                            Some(_) => output.push(solution),
                            None => output.push(solution.with(variable, name.clone())),
                        }
                    }
                }
                return Ok(output);
            }
        };
        store.with_active_graph(scope, |store| self.solutions(inner, store, expressions))
    }
}

impl QueryProcessor for StandardEngine {
    fn name(&self) -> &str {
        STANDARD_ENGINE
    }

    fn evaluate(&self, query: &Query, context: &mut EvaluationContext<'_>) -> StoreResult<QueryResult> {
        let expressions = context.expressions.clone();
        let solutions = match &query.dataset {
            Some(graphs) => context.store.with_active_graph(ScopeTarget::Iris(graphs.clone()), |store| {
                self.solutions(&query.pattern, store, &expressions)
            })?,
            None => self.solutions(&query.pattern, context.store, &expressions)?,
        };
        debug!("Pattern produced {} solution(s)", solutions.len());

        match &query.form {
            QueryForm::Ask => Ok(QueryResult::Boolean(!solutions.is_empty())),
            QueryForm::Select { variables, distinct } => {
                let variables = match variables {
                    Some(variables) => variables.clone(),
                    None => query.pattern.in_scope_variables().into_iter().collect(),
                };
                let mut rows: Vec<Solution> = solutions.iter().map(|s| s.project(&variables)).collect();
                if *distinct {
                    let mut seen = FxHashSet::default();
                    rows.retain(|row| seen.insert(row.clone()));
                }
                Ok(QueryResult::Solutions(SolutionSet::new(variables, rows)))
            }
            QueryForm::Construct { template } => Ok(QueryResult::Graph(construct(template, &solutions))),
            QueryForm::Describe { terms } => {
                let mut described = Graph::new();
                for node in describe_targets(terms, &solutions) {
                    described.assert_all(context.store.get_triples_with_subject(&node));
                }
                Ok(QueryResult::Graph(described))
            }
        }
    }
}

fn evaluate_bgp(patterns: &[TriplePattern], store: &TripleStore) -> Vec<Solution> {
    let mut solutions = vec![Solution::new()];
    for pattern in patterns {
        let mut next = Vec::new();
        for solution in &solutions {
            let subject = pattern.subject.resolve(solution);
            let predicate = pattern.predicate.resolve(solution);
            let object = pattern.object.resolve(solution);
            for triple in store.find(subject.as_ref(), predicate.as_ref(), object.as_ref()) {
                if let Some(extended) = pattern.bind(&triple, solution) {
                    next.push(extended);
                }
            }
        }
        solutions = next;
        if solutions.is_empty() {
            break;
        }
    }
    solutions
}

/// FILTER semantics: a recoverable error drops the solution, any other error propagates.
fn passes(expression: &Expression, solution: &Solution, context: &ExpressionContext) -> StoreResult<bool> {
    match expression.evaluate_boolean(solution, context) {
        Ok(keep) => Ok(keep),
        Err(e) if e.is_recoverable() => {
            warn!("Dropping solution, filter {} failed: {}", expression, e);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn construct(template: &[TriplePattern], solutions: &[Solution]) -> Graph {
    let mut graph = Graph::new();
    for solution in solutions {
        let mut blank_nodes = NodeFactory::new();
        for pattern in template {
            if let Some(triple) = pattern.instantiate(solution, &mut blank_nodes) {
                graph.assert(triple);
            }
        }
    }
    graph
}

fn describe_targets(terms: &[TermPattern], solutions: &[Solution]) -> Vec<Node> {
    let mut targets: Vec<Node> = Vec::new();
    for term in terms {
        match term {
            TermPattern::Node(node) => targets.push(node.clone()),
            TermPattern::Variable(name) => targets.extend(solutions.iter().filter_map(|s| s.get(name).cloned())),
        }
    }
    let mut seen = FxHashSet::default();
    targets.retain(|node| seen.insert(node.clone()));
    targets
}
