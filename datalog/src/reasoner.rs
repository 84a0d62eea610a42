/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::rules::{evaluate_rule, replace_variables_with_bound_values, Rule, Term, TriplePattern};
use log::debug;
use rayon::prelude::*;
use shared::error::ReasonerError;
use shared::graph::Graph;
use shared::inference::InferenceEngine;
use shared::node::{vocab, Iri, Node};
use shared::triple::Triple;
use std::collections::BTreeSet;

const DEFAULT_MAX_ROUNDS: usize = 10_000;

/// Naive forward chaining over a list of rules, run to a fixpoint.
#[derive(Debug, Clone)]
pub struct RuleReasoner {
    name: String,
    rules: Vec<Rule>,
    max_rounds: usize,
}

impl RuleReasoner {
    pub fn new(name: &str) -> Self {
        RuleReasoner {
            name: name.to_string(),
            rules: Vec::new(),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Subclass and subproperty transitivity, type propagation, domain and range.
    pub fn rdfs() -> Self {
        let node = |iri: &str| Term::Constant(Node::Iri(Iri::new_unchecked(iri)));
        let pattern = |s: Term, p: Term, o: Term| TriplePattern::new(s, p, o);
        let (x, y, p, q, r, c, d, e) = (
            Term::var("x"),
            Term::var("y"),
            Term::var("p"),
            Term::var("q"),
            Term::var("r"),
            Term::var("c"),
            Term::var("d"),
            Term::var("e"),
        );
        let rdf_type = node(vocab::RDF_TYPE);
        let sub_class = node(vocab::RDFS_SUB_CLASS_OF);
        let sub_property = node(vocab::RDFS_SUB_PROPERTY_OF);

        let rules = vec![
            Rule::new(
                "rdfs11",
                vec![
                    pattern(c.clone(), sub_class.clone(), d.clone()),
                    pattern(d.clone(), sub_class.clone(), e.clone()),
                ],
                vec![pattern(c.clone(), sub_class.clone(), e)],
            ),
            Rule::new(
                "rdfs9",
                vec![
                    pattern(c.clone(), sub_class, d.clone()),
                    pattern(x.clone(), rdf_type.clone(), c.clone()),
                ],
                vec![pattern(x.clone(), rdf_type.clone(), d)],
            ),
            Rule::new(
                "rdfs5",
                vec![
                    pattern(p.clone(), sub_property.clone(), q.clone()),
                    pattern(q.clone(), sub_property.clone(), r.clone()),
                ],
                vec![pattern(p.clone(), sub_property.clone(), r)],
            ),
            Rule::new(
                "rdfs7",
                vec![
                    pattern(p.clone(), sub_property, q.clone()),
                    pattern(x.clone(), p.clone(), y.clone()),
                ],
                vec![pattern(x.clone(), q, y.clone())],
            ),
            Rule::new(
                "rdfs2",
                vec![
                    pattern(p.clone(), node(vocab::RDFS_DOMAIN), c.clone()),
                    pattern(x.clone(), p.clone(), y.clone()),
                ],
                vec![pattern(x.clone(), rdf_type.clone(), c.clone())],
            ),
            Rule::new(
                "rdfs3",
                vec![
                    pattern(p.clone(), node(vocab::RDFS_RANGE), c.clone()),
                    pattern(x, p, y.clone()),
                ],
                vec![pattern(y, rdf_type, c)],
            ),
        ];

        RuleReasoner {
            name: "rdfs".to_string(),
            rules,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Rejects rules whose conclusion uses a variable the premise never binds.
    pub fn add_rule(&mut self, rule: Rule) -> Result<(), ReasonerError> {
        if rule.premise.is_empty() {
            return Err(ReasonerError::InvalidRule(format!("{} has no premise", rule.name)));
        }
        let unbound = rule.unbound_conclusion_variables();
        if !unbound.is_empty() {
            let names: Vec<String> = unbound.iter().map(|v| format!("?{}", v)).collect();
            return Err(ReasonerError::InvalidRule(format!(
                "{} concludes unbound variables {}",
                rule.name,
                names.join(", ")
            )));
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    fn infer_round(&self, facts: &Graph) -> BTreeSet<Triple> {
        let per_rule: Vec<Vec<Triple>> = self
            .rules
            .par_iter()
            .map(|rule| {
                evaluate_rule(rule, facts)
                    .iter()
                    .flat_map(|binding| {
                        rule.conclusion
                            .iter()
                            .filter_map(move |conclusion| replace_variables_with_bound_values(conclusion, binding))
                    })
                    .filter(|fact| !facts.contains(fact))
                    .collect()
            })
            .collect();
        per_rule.into_iter().flatten().collect()
    }

    /// Adds every derivable triple to `facts`; returns how many were new.
    fn infer_to_fixpoint(&self, facts: &mut Graph) -> Result<usize, ReasonerError> {
        let mut inferred = 0;
        let mut rounds = 0;
        loop {
            let inferred_this_round = self.infer_round(facts);
            if inferred_this_round.is_empty() {
                break;
            }
            rounds += 1;
            if rounds > self.max_rounds {
                return Err(ReasonerError::failed(
                    &self.name,
                    format!("no fixpoint after {} rounds", self.max_rounds),
                ));
            }
            inferred += facts.assert_all(inferred_this_round);
        }
        debug!("{}: {} triples inferred in {} rounds", self.name, inferred, rounds);
        Ok(inferred)
    }
}

impl InferenceEngine for RuleReasoner {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, graph: &mut Graph) -> Result<(), ReasonerError> {
        self.infer_to_fixpoint(graph).map(|_| ())
    }

    fn apply_to(&self, input: &Graph, output: &mut Graph) -> Result<(), ReasonerError> {
        let mut facts = input.clone();
        facts.merge(output);
        self.infer_to_fixpoint(&mut facts)?;
        let new_facts: Vec<Triple> = facts
            .triples()
            .filter(|t| !input.contains(t) && !output.contains(t))
            .cloned()
            .collect();
        output.assert_all(new_facts);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(local: &str) -> Node {
        Node::iri(&format!("http://example.org/{}", local)).unwrap()
    }

    fn vocab_node(iri: &str) -> Node {
        Node::Iri(Iri::new_unchecked(iri))
    }

    fn schema() -> Graph {
        vec![
            Triple::new(iri("Cat"), vocab_node(vocab::RDFS_SUB_CLASS_OF), iri("Mammal")),
            Triple::new(iri("Mammal"), vocab_node(vocab::RDFS_SUB_CLASS_OF), iri("Animal")),
            Triple::new(iri("tom"), vocab_node(vocab::RDF_TYPE), iri("Cat")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_rdfs_derives_subclass_types() {
        let mut graph = schema();
        RuleReasoner::rdfs().apply(&mut graph).unwrap();
        let rdf_type = vocab_node(vocab::RDF_TYPE);
        assert!(graph.contains(&Triple::new(iri("tom"), rdf_type.clone(), iri("Mammal"))));
        assert!(graph.contains(&Triple::new(iri("tom"), rdf_type, iri("Animal"))));
        assert!(graph.contains(&Triple::new(
            iri("Cat"),
            vocab_node(vocab::RDFS_SUB_CLASS_OF),
            iri("Animal")
        )));
    }

    #[test]
    fn test_apply_to_leaves_input_untouched() {
        let input = schema();
        let mut output = Graph::new();
        RuleReasoner::rdfs().apply_to(&input, &mut output).unwrap();
        assert_eq!(input, schema());
        assert_eq!(output.len(), 3);
        assert!(output.triples().all(|t| !input.contains(t)));
    }

    #[test]
    fn test_range_on_literal_is_skipped() {
        let mut graph: Graph = vec![
            Triple::new(iri("name"), vocab_node(vocab::RDFS_RANGE), iri("Text")),
            Triple::new(iri("tom"), iri("name"), Node::literal("Tom")),
        ]
        .into_iter()
        .collect();
        RuleReasoner::rdfs().apply(&mut graph).unwrap();
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_unsafe_rule_is_rejected() {
        let mut reasoner = RuleReasoner::new("custom");
        let rule = Rule::new(
            "bad",
            vec![TriplePattern::new(Term::var("x"), iri("p").into(), Term::var("y"))],
            vec![TriplePattern::new(Term::var("x"), iri("q").into(), Term::var("z"))],
        );
        assert!(matches!(reasoner.add_rule(rule), Err(ReasonerError::InvalidRule(_))));
        assert!(reasoner.rules().is_empty());
    }

    #[test]
    fn test_round_limit_fails() {
        let mut reasoner = RuleReasoner::new("chain").with_max_rounds(1);
        reasoner
            .add_rule(Rule::new(
                "step",
                vec![TriplePattern::new(Term::var("x"), iri("next").into(), Term::var("y"))],
                vec![TriplePattern::new(Term::var("y"), iri("next").into(), Term::var("x"))],
            ))
            .unwrap();
        reasoner
            .add_rule(Rule::new(
                "close",
                vec![
                    TriplePattern::new(Term::var("x"), iri("next").into(), Term::var("y")),
                    TriplePattern::new(Term::var("y"), iri("next").into(), Term::var("z")),
                ],
                vec![TriplePattern::new(Term::var("x"), iri("next").into(), Term::var("z"))],
            ))
            .unwrap();
        let mut graph: Graph = vec![
            Triple::new(iri("a"), iri("next"), iri("b")),
            Triple::new(iri("b"), iri("next"), iri("c")),
        ]
        .into_iter()
        .collect();
        let err = reasoner.apply(&mut graph).unwrap_err();
        assert!(matches!(err, ReasonerError::Failed { .. }));
    }
}
