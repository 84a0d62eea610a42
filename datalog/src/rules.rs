/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use shared::graph::Graph;
use shared::node::Node;
use shared::triple::Triple;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

// Single solution mapping: variable name -> node
pub type Bindings = HashMap<String, Node>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Variable(String),
    Constant(Node),
}

impl Term {
    pub fn var(name: &str) -> Self {
        Term::Variable(name.trim_start_matches('?').to_string())
    }

    fn resolve(&self, bindings: &Bindings) -> Option<Node> {
        match self {
            Term::Variable(v) => bindings.get(v).cloned(),
            Term::Constant(c) => Some(c.clone()),
        }
    }

    fn bind(&self, value: &Node, bindings: &mut Bindings) -> bool {
        match self {
            Term::Variable(v) => {
                if let Some(bound) = bindings.get(v) {
                    bound == value
                } else {
                    bindings.insert(v.clone(), value.clone());
                    true
                }
            }
            Term::Constant(c) => c == value,
        }
    }
}

impl From<Node> for Term {
    fn from(node: Node) -> Self {
        Term::Constant(node)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "?{}", v),
            Term::Constant(c) => write!(f, "{}", c),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriplePattern(pub Term, pub Term, pub Term);

impl TriplePattern {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        TriplePattern(subject, predicate, object)
    }

    pub fn variables(&self) -> BTreeSet<&str> {
        [&self.0, &self.1, &self.2]
            .into_iter()
            .filter_map(|t| match t {
                Term::Variable(v) => Some(v.as_str()),
                Term::Constant(_) => None,
            })
            .collect()
    }
}

impl fmt::Display for TriplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub premise: Vec<TriplePattern>,
    pub conclusion: Vec<TriplePattern>,
}

impl Rule {
    pub fn new(name: &str, premise: Vec<TriplePattern>, conclusion: Vec<TriplePattern>) -> Self {
        Rule {
            name: name.to_string(),
            premise,
            conclusion,
        }
    }

    /// Conclusion variables that no premise binds.
    pub fn unbound_conclusion_variables(&self) -> BTreeSet<&str> {
        let bound: BTreeSet<&str> = self.premise.iter().flat_map(|p| p.variables()).collect();
        self.conclusion
            .iter()
            .flat_map(|c| c.variables())
            .filter(|v| !bound.contains(v))
            .collect()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |patterns: &[TriplePattern]| {
            patterns
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "{}: {} => {}", self.name, join(&self.premise), join(&self.conclusion))
    }
}

/// Extends `variable_bindings` if the fact matches the pattern; leaves them untouched otherwise.
pub fn matches_rule_pattern(
    pattern: &TriplePattern,
    fact: &Triple,
    variable_bindings: &mut Bindings,
) -> bool {
    // rollback on failure
    let mut temp_bindings = variable_bindings.clone();

    let matched = pattern.0.bind(fact.subject(), &mut temp_bindings)
        && pattern.1.bind(fact.predicate(), &mut temp_bindings)
        && pattern.2.bind(fact.object(), &mut temp_bindings);

    if matched {
        *variable_bindings = temp_bindings;
    }
    matched
}

/// Joins one premise against the graph for every binding produced so far.
pub fn join_premise(pattern: &TriplePattern, graph: &Graph, current: Vec<Bindings>) -> Vec<Bindings> {
    let mut results = Vec::new();
    for binding in current {
        let s = pattern.0.resolve(&binding);
        let p = pattern.1.resolve(&binding);
        let o = pattern.2.resolve(&binding);
        for fact in graph.find(s.as_ref(), p.as_ref(), o.as_ref()) {
            let mut extended = binding.clone();
            if matches_rule_pattern(pattern, &fact, &mut extended) {
                results.push(extended);
            }
        }
    }
    results
}

/// All bindings satisfying every premise of the rule.
pub fn evaluate_rule(rule: &Rule, graph: &Graph) -> Vec<Bindings> {
    if rule.premise.is_empty() {
        return Vec::new();
    }
    let mut current_bindings = vec![Bindings::new()];
    for premise in &rule.premise {
        current_bindings = join_premise(premise, graph, current_bindings);
        if current_bindings.is_empty() {
            break;
        }
    }
    current_bindings
}

/// Instantiates a conclusion; `None` when a variable is unbound or the result
/// is not a valid RDF triple (literal subject, non-IRI predicate).
pub fn replace_variables_with_bound_values(conclusion: &TriplePattern, binding: &Bindings) -> Option<Triple> {
    let s = conclusion.0.resolve(binding)?;
    let p = conclusion.1.resolve(binding)?;
    let o = conclusion.2.resolve(binding)?;
    if !(s.is_iri() || s.is_blank()) || !p.is_iri() || o.is_variable() {
        return None;
    }
    Some(Triple::new(s, p, o))
}
