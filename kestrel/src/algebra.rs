/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::error::ParseError;
use crate::expression::Expression;
use crate::solution::{node_to_json, Solution, SolutionSet};
use serde_json::{json, Value as JsonValue};
use shared::graph::Graph;
use shared::node::{Iri, Node};
use shared::node_factory::NodeFactory;
use shared::triple::Triple;
use std::collections::BTreeSet;

/// A position in a triple pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermPattern {
    Node(Node),
    Variable(String),
}

impl TermPattern {
    pub fn var(name: &str) -> Self {
        TermPattern::Variable(name.trim_start_matches(['?', '$']).to_string())
    }

    /// The node this position stands for under a solution, if it is fixed.
    pub fn resolve(&self, solution: &Solution) -> Option<Node> {
        match self {
            TermPattern::Node(node) => Some(node.clone()),
            TermPattern::Variable(name) => solution.get(name).cloned(),
        }
    }

    /// Binds the position to `node`, failing on a conflicting binding.
    fn bind(&self, node: &Node, solution: &mut Solution) -> bool {
        match self {
            TermPattern::Node(constant) => constant == node,
            TermPattern::Variable(name) => match solution.get(name) {
                Some(bound) => bound == node,
                None => {
                    solution.insert(name, node.clone());
                    true
                }
            },
        }
    }
}

impl From<Node> for TermPattern {
    fn from(node: Node) -> Self {
        TermPattern::Node(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: TermPattern,
    pub predicate: TermPattern,
    pub object: TermPattern,
}

impl TriplePattern {
    pub fn new(subject: impl Into<TermPattern>, predicate: impl Into<TermPattern>, object: impl Into<TermPattern>) -> Self {
        TriplePattern {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    pub fn variables(&self) -> BTreeSet<String> {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter_map(|t| match t {
                TermPattern::Variable(name) => Some(name.clone()),
                TermPattern::Node(_) => None,
            })
            .collect()
    }

    /// Extends `solution` with the bindings that make this pattern match `triple`.
    pub fn bind(&self, triple: &Triple, solution: &Solution) -> Option<Solution> {
        let mut extended = solution.clone();
        let matched = self.subject.bind(triple.subject(), &mut extended)
            && self.predicate.bind(triple.predicate(), &mut extended)
            && self.object.bind(triple.object(), &mut extended);
        matched.then_some(extended)
    }

    /// The ground triple for a solution. `None` when a variable is unbound or
    /// the result would not be a valid RDF triple.
    pub fn instantiate(&self, solution: &Solution, blank_nodes: &mut NodeFactory) -> Option<Triple> {
        let mut ground = |term: &TermPattern| match term.resolve(solution)? {
            Node::Blank(blank) if matches!(term, TermPattern::Node(_)) => {
                Some(blank_nodes.create_blank_node_with_id(&blank.to_string()))
            }
            Node::Variable(_) => None,
            node => Some(node),
        };
        let subject = ground(&self.subject)?;
        let predicate = ground(&self.predicate)?;
        let object = ground(&self.object)?;
        if subject.is_literal() || !predicate.is_iri() {
            return None;
        }
        Some(Triple::new(subject, predicate, object))
    }
}

/// Where a GRAPH clause evaluates its inner pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphTarget {
    Default,
    Named(Iri),
    /// The merge of several named graphs.
    Union(Vec<Iri>),
    /// Every named graph in turn, bound to the variable.
    Variable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GraphPattern {
    Bgp(Vec<TriplePattern>),
    Join(Box<GraphPattern>, Box<GraphPattern>),
    LeftJoin {
        left: Box<GraphPattern>,
        right: Box<GraphPattern>,
        filter: Option<Expression>,
    },
    Union(Box<GraphPattern>, Box<GraphPattern>),
    Filter {
        expression: Expression,
        inner: Box<GraphPattern>,
    },
    Extend {
        inner: Box<GraphPattern>,
        variable: String,
        expression: Expression,
    },
    Graph {
        target: GraphTarget,
        inner: Box<GraphPattern>,
    },
}

impl GraphPattern {
    pub fn bgp(patterns: Vec<TriplePattern>) -> Self {
        GraphPattern::Bgp(patterns)
    }

    pub fn join(left: GraphPattern, right: GraphPattern) -> Self {
        GraphPattern::Join(Box::new(left), Box::new(right))
    }

    pub fn left_join(left: GraphPattern, right: GraphPattern, filter: Option<Expression>) -> Self {
        GraphPattern::LeftJoin {
            left: Box::new(left),
            right: Box::new(right),
            filter,
        }
    }

    pub fn union(left: GraphPattern, right: GraphPattern) -> Self {
        GraphPattern::Union(Box::new(left), Box::new(right))
    }

    pub fn filter(expression: Expression, inner: GraphPattern) -> Self {
        GraphPattern::Filter {
            expression,
            inner: Box::new(inner),
        }
    }

    pub fn extend(inner: GraphPattern, variable: &str, expression: Expression) -> Self {
        GraphPattern::Extend {
            inner: Box::new(inner),
            variable: variable.trim_start_matches(['?', '$']).to_string(),
            expression,
        }
    }

    pub fn graph(target: GraphTarget, inner: GraphPattern) -> Self {
        GraphPattern::Graph {
            target,
            inner: Box::new(inner),
        }
    }

    /// Variables a solution of this pattern may bind, used for `SELECT *`.
    pub fn in_scope_variables(&self) -> BTreeSet<String> {
        match self {
            GraphPattern::Bgp(patterns) => patterns.iter().flat_map(|p| p.variables()).collect(),
            GraphPattern::Join(left, right)
            | GraphPattern::Union(left, right)
            | GraphPattern::LeftJoin { left, right, .. } => {
                let mut variables = left.in_scope_variables();
                variables.extend(right.in_scope_variables());
                variables
            }
            GraphPattern::Filter { inner, .. } => inner.in_scope_variables(),
            GraphPattern::Extend { inner, variable, .. } => {
                let mut variables = inner.in_scope_variables();
                variables.insert(variable.clone());
                variables
            }
            GraphPattern::Graph { target, inner } => {
                let mut variables = inner.in_scope_variables();
                if let GraphTarget::Variable(name) = target {
                    variables.insert(name.clone());
                }
                variables
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryForm {
    Ask,
    /// `variables: None` projects every in-scope variable.
    Select {
        variables: Option<Vec<String>>,
        distinct: bool,
    },
    Construct {
        template: Vec<TriplePattern>,
    },
    Describe {
        terms: Vec<TermPattern>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub form: QueryForm,
    /// FROM graphs. When present the pattern is evaluated over their merge.
    pub dataset: Option<Vec<Iri>>,
    pub pattern: GraphPattern,
}

impl Query {
    pub fn select(variables: &[&str], pattern: GraphPattern) -> Self {
        Query {
            form: QueryForm::Select {
                variables: Some(
                    variables
                        .iter()
                        .map(|v| v.trim_start_matches(['?', '$']).to_string())
                        .collect(),
                ),
                distinct: false,
            },
            dataset: None,
            pattern,
        }
    }

    pub fn select_all(pattern: GraphPattern) -> Self {
        Query {
            form: QueryForm::Select {
                variables: None,
                distinct: false,
            },
            dataset: None,
            pattern,
        }
    }

    pub fn ask(pattern: GraphPattern) -> Self {
        Query {
            form: QueryForm::Ask,
            dataset: None,
            pattern,
        }
    }

    pub fn construct(template: Vec<TriplePattern>, pattern: GraphPattern) -> Self {
        Query {
            form: QueryForm::Construct { template },
            dataset: None,
            pattern,
        }
    }

    pub fn with_dataset(mut self, graphs: Vec<Iri>) -> Self {
        self.dataset = Some(graphs);
        self
    }

    pub fn distinct(mut self) -> Self {
        if let QueryForm::Select { distinct, .. } = &mut self.form {
            *distinct = true;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Boolean(bool),
    Solutions(SolutionSet),
    Graph(Graph),
}

impl QueryResult {
    pub fn as_solutions(&self) -> Option<&SolutionSet> {
        match self {
            QueryResult::Solutions(solutions) => Some(solutions),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            QueryResult::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_graph(&self) -> Option<&Graph> {
        match self {
            QueryResult::Graph(graph) => Some(graph),
            _ => None,
        }
    }

    /// SPARQL JSON results; graphs are rendered as a list of s/p/o bindings.
    pub fn to_json(&self) -> JsonValue {
        match self {
            QueryResult::Boolean(value) => json!({ "head": {}, "boolean": value }),
            QueryResult::Solutions(solutions) => solutions.to_json(),
            QueryResult::Graph(graph) => {
                let bindings: Vec<JsonValue> = graph
                    .triples()
                    .map(|t| {
                        json!({
                            "subject": node_to_json(t.subject()),
                            "predicate": node_to_json(t.predicate()),
                            "object": node_to_json(t.object()),
                        })
                    })
                    .collect();
                json!({
                    "head": { "vars": ["subject", "predicate", "object"] },
                    "results": { "bindings": bindings },
                })
            }
        }
    }
}

/// Turns query text into algebra. Implemented outside this crate.
pub trait QueryParser {
    fn parse_query(&self, text: &str) -> Result<Query, ParseError>;
}
