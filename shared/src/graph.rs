/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::index_manager::TripleIndex;
use crate::node::{Iri, Node};
use crate::triple::Triple;
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A graph as shared between the store, its scopes and its reasoners.
pub type GraphRef = Arc<RwLock<Graph>>;

/// A set of triples, optionally named by an IRI. `None` is the default graph.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    name: Option<Iri>,
    triples: BTreeSet<Triple>,
    index: TripleIndex,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: Iri) -> Self {
        Graph {
            name: Some(name),
            ..Self::default()
        }
    }

    pub fn with_name(name: Option<Iri>) -> Self {
        Graph {
            name,
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&Iri> {
        self.name.as_ref()
    }

    /// Wraps the graph for sharing with a store.
    pub fn share(self) -> GraphRef {
        Arc::new(RwLock::new(self))
    }

    /// Adds a triple; returns `false` when an equal triple is already present.
    pub fn assert(&mut self, triple: Triple) -> bool {
        if !self.index.insert(&triple) {
            return false;
        }
        self.triples.insert(triple)
    }

    /// Returns how many of the triples were new.
    pub fn assert_all<I: IntoIterator<Item = Triple>>(&mut self, triples: I) -> usize {
        triples.into_iter().filter(|t| self.assert(t.clone())).count()
    }

    pub fn retract(&mut self, triple: &Triple) -> bool {
        self.index.delete(triple);
        self.triples.remove(triple)
    }

    pub fn retract_all<'a, I: IntoIterator<Item = &'a Triple>>(&mut self, triples: I) -> usize {
        triples.into_iter().filter(|t| self.retract(t)).count()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn clear(&mut self) {
        self.triples.clear();
        self.index.clear();
    }

    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn triple_set(&self) -> &BTreeSet<Triple> {
        &self.triples
    }

    /// Distinct subjects and objects.
    pub fn nodes(&self) -> BTreeSet<Node> {
        self.index
            .subjects()
            .chain(self.index.objects())
            .cloned()
            .collect()
    }

    pub fn with_subject(&self, subject: &Node) -> Vec<Triple> {
        self.index.query(Some(subject), None, None)
    }

    pub fn with_predicate(&self, predicate: &Node) -> Vec<Triple> {
        self.index.query(None, Some(predicate), None)
    }

    pub fn with_object(&self, object: &Node) -> Vec<Triple> {
        self.index.query(None, None, Some(object))
    }

    pub fn with_subject_predicate(&self, subject: &Node, predicate: &Node) -> Vec<Triple> {
        self.index.query(Some(subject), Some(predicate), None)
    }

    pub fn with_predicate_object(&self, predicate: &Node, object: &Node) -> Vec<Triple> {
        self.index.query(None, Some(predicate), Some(object))
    }

    pub fn with_subject_object(&self, subject: &Node, object: &Node) -> Vec<Triple> {
        self.index.query(Some(subject), None, Some(object))
    }

    /// Indexed lookup with any combination of bound positions.
    pub fn find(&self, s: Option<&Node>, p: Option<&Node>, o: Option<&Node>) -> Vec<Triple> {
        if s.is_none() && p.is_none() && o.is_none() {
            return self.triples.iter().cloned().collect();
        }
        self.index.query(s, p, o)
    }

    /// Triple-set union; the name of `self` is kept.
    pub fn merge(&mut self, other: &Graph) -> usize {
        other.triples().filter(|t| self.assert((*t).clone())).count()
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.triples == other.triples
    }
}

impl Eq for Graph {}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Graph::new();
        graph.assert_all(iter);
        graph
    }
}

/// Read access that survives a panicked writer.
pub fn read_graph(graph: &GraphRef) -> RwLockReadGuard<'_, Graph> {
    graph.read().unwrap_or_else(PoisonError::into_inner)
}

pub fn write_graph(graph: &GraphRef) -> RwLockWriteGuard<'_, Graph> {
    graph.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(local: &str) -> Node {
        Node::iri(&format!("http://example.org/{}", local)).unwrap()
    }

    #[test]
    fn test_assert_is_idempotent() {
        let mut graph = Graph::new();
        let triple = Triple::new(iri("a"), iri("p"), iri("b"));
        assert!(graph.assert(triple.clone()));
        assert!(!graph.assert(triple.clone()));
        assert_eq!(graph.len(), 1);
        assert!(graph.retract(&triple));
        assert!(graph.is_empty());
        assert!(graph.with_subject(&iri("a")).is_empty());
    }

    #[test]
    fn test_nodes_are_subjects_and_objects() {
        let graph: Graph = vec![
            Triple::new(iri("a"), iri("p"), iri("b")),
            Triple::new(iri("b"), iri("p"), Node::literal("x")),
        ]
        .into_iter()
        .collect();
        let nodes = graph.nodes();
        assert_eq!(nodes.len(), 3);
        assert!(!nodes.contains(&iri("p")));
    }

    #[test]
    fn test_merge_is_union() {
        let mut g1: Graph = vec![Triple::new(iri("a"), iri("p"), iri("b"))].into_iter().collect();
        let g2: Graph = vec![
            Triple::new(iri("a"), iri("p"), iri("b")),
            Triple::new(iri("c"), iri("p"), iri("d")),
        ]
        .into_iter()
        .collect();
        assert_eq!(g1.merge(&g2), 1);
        assert_eq!(g1.len(), 2);
        assert_eq!(g1.with_predicate_object(&iri("p"), &iri("d")).len(), 1);
    }
}
