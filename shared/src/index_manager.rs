/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::node::Node;
use crate::triple::Triple;
use rustc_hash::{FxHashMap, FxHashSet};

type Permutation = FxHashMap<Node, FxHashMap<Node, FxHashSet<Node>>>;

/// Three-way permutation index over the triples of one graph.
#[derive(Debug, Clone, Default)]
pub struct TripleIndex {
    spo: Permutation,
    pos: Permutation,
    osp: Permutation,
}

impl TripleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a single triple into all three permutations
    pub fn insert(&mut self, triple: &Triple) -> bool {
        let (s, p, o) = (triple.subject(), triple.predicate(), triple.object());
        if self.contains(triple) {
            return false;
        }
        self.spo
            .entry(s.clone())
            .or_default()
            .entry(p.clone())
            .or_default()
            .insert(o.clone());
        self.pos
            .entry(p.clone())
            .or_default()
            .entry(o.clone())
            .or_default()
            .insert(s.clone());
        self.osp
            .entry(o.clone())
            .or_default()
            .entry(s.clone())
            .or_default()
            .insert(p.clone());
        true
    }

    /// Delete a single triple from all three permutations
    pub fn delete(&mut self, triple: &Triple) -> bool {
        if !self.contains(triple) {
            return false;
        }
        let (s, p, o) = (triple.subject(), triple.predicate(), triple.object());
        remove_from_index(&mut self.spo, s, p, o);
        remove_from_index(&mut self.pos, p, o, s);
        remove_from_index(&mut self.osp, o, s, p);
        true
    }

    pub fn clear(&mut self) {
        self.spo.clear();
        self.pos.clear();
        self.osp.clear();
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.spo
            .get(triple.subject())
            .and_then(|pred_map| pred_map.get(triple.predicate()))
            .map_or(false, |objects| objects.contains(triple.object()))
    }

    /// Query the index; `None` positions are wildcards. Result order is unspecified.
    pub fn query(&self, s: Option<&Node>, p: Option<&Node>, o: Option<&Node>) -> Vec<Triple> {
        let mut results = Vec::new();

        match (s, p, o) {
            (Some(ss), Some(pp), Some(oo)) => {
                let triple = Triple::new(ss.clone(), pp.clone(), oo.clone());
                if self.contains(&triple) {
                    results.push(triple);
                }
            }
            // (S, P, -)
            (Some(ss), Some(pp), None) => {
                if let Some(objects) = self.spo.get(ss).and_then(|m| m.get(pp)) {
                    for obj in objects {
                        results.push(Triple::new(ss.clone(), pp.clone(), obj.clone()));
                    }
                }
            }
            // (S, -, O)
            (Some(ss), None, Some(oo)) => {
                if let Some(predicates) = self.osp.get(oo).and_then(|m| m.get(ss)) {
                    for pred in predicates {
                        results.push(Triple::new(ss.clone(), pred.clone(), oo.clone()));
                    }
                }
            }
            // (-, P, O)
            (None, Some(pp), Some(oo)) => {
                if let Some(subjects) = self.pos.get(pp).and_then(|m| m.get(oo)) {
                    for subj in subjects {
                        results.push(Triple::new(subj.clone(), pp.clone(), oo.clone()));
                    }
                }
            }
            // (S, -, -)
            (Some(ss), None, None) => {
                if let Some(pred_map) = self.spo.get(ss) {
                    for (pred, objects) in pred_map {
                        for obj in objects {
                            results.push(Triple::new(ss.clone(), pred.clone(), obj.clone()));
                        }
                    }
                }
            }
            // (-, P, -)
            (None, Some(pp), None) => {
                if let Some(obj_map) = self.pos.get(pp) {
                    for (obj, subjects) in obj_map {
                        for subj in subjects {
                            results.push(Triple::new(subj.clone(), pp.clone(), obj.clone()));
                        }
                    }
                }
            }
            // (-, -, O)
            (None, None, Some(oo)) => {
                if let Some(subj_map) = self.osp.get(oo) {
                    for (subj, predicates) in subj_map {
                        for pred in predicates {
                            results.push(Triple::new(subj.clone(), pred.clone(), oo.clone()));
                        }
                    }
                }
            }
            (None, None, None) => {
                for (subj, pred_map) in &self.spo {
                    for (pred, objects) in pred_map {
                        for obj in objects {
                            results.push(Triple::new(subj.clone(), pred.clone(), obj.clone()));
                        }
                    }
                }
            }
        }

        results
    }

    /// Objects reachable from a subject through a predicate
    pub fn scan_sp(&self, s: &Node, p: &Node) -> Option<&FxHashSet<Node>> {
        self.spo.get(s).and_then(|pred_map| pred_map.get(p))
    }

    /// Subjects linked to an object through a predicate
    pub fn scan_po(&self, p: &Node, o: &Node) -> Option<&FxHashSet<Node>> {
        self.pos.get(p).and_then(|obj_map| obj_map.get(o))
    }

    /// Predicates linking a subject to an object
    pub fn scan_so(&self, s: &Node, o: &Node) -> Option<&FxHashSet<Node>> {
        self.osp.get(o).and_then(|subj_map| subj_map.get(s))
    }

    pub fn subjects(&self) -> impl Iterator<Item = &Node> {
        self.spo.keys()
    }

    pub fn objects(&self) -> impl Iterator<Item = &Node> {
        self.osp.keys()
    }
}

fn remove_from_index(index: &mut Permutation, a: &Node, b: &Node, c: &Node) {
    if let Some(inner) = index.get_mut(a) {
        if let Some(set) = inner.get_mut(b) {
            set.remove(c);
            if set.is_empty() {
                inner.remove(b);
            }
        }
        if inner.is_empty() {
            index.remove(a);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn iri(local: &str) -> Node {
        Node::iri(&format!("http://example.org/{}", local)).unwrap()
    }

    fn sample() -> (TripleIndex, Vec<Triple>) {
        let triples = vec![
            Triple::new(iri("alice"), iri("knows"), iri("bob")),
            Triple::new(iri("alice"), iri("knows"), iri("carol")),
            Triple::new(iri("bob"), iri("knows"), iri("carol")),
            Triple::new(iri("alice"), iri("likes"), iri("carol")),
            Triple::new(iri("carol"), iri("name"), Node::literal("Carol")),
        ];
        let mut index = TripleIndex::new();
        for triple in &triples {
            assert!(index.insert(triple));
        }
        (index, triples)
    }

    fn as_set(triples: Vec<Triple>) -> BTreeSet<Triple> {
        triples.into_iter().collect()
    }

    #[test]
    fn test_duplicate_insert_is_noop() {
        let (mut index, triples) = sample();
        assert!(!index.insert(&triples[0]));
        assert_eq!(index.query(None, None, None).len(), triples.len());
    }

    #[test]
    fn test_lookups_agree_with_full_scan() {
        let (index, triples) = sample();
        let alice = iri("alice");
        let knows = iri("knows");
        let carol = iri("carol");

        let expected = |f: &dyn Fn(&Triple) -> bool| -> BTreeSet<Triple> {
            triples.iter().filter(|t| f(t)).cloned().collect()
        };

        assert_eq!(
            as_set(index.query(Some(&alice), None, None)),
            expected(&|t| t.has_subject(&alice))
        );
        assert_eq!(
            as_set(index.query(None, Some(&knows), None)),
            expected(&|t| t.has_predicate(&knows))
        );
        assert_eq!(
            as_set(index.query(None, None, Some(&carol))),
            expected(&|t| t.has_object(&carol))
        );
        assert_eq!(
            as_set(index.query(Some(&alice), None, Some(&carol))),
            expected(&|t| t.has_subject(&alice) && t.has_object(&carol))
        );
        assert_eq!(
            as_set(index.query(None, Some(&knows), Some(&carol))),
            expected(&|t| t.has_predicate(&knows) && t.has_object(&carol))
        );
        assert_eq!(
            as_set(index.query(Some(&alice), Some(&knows), None)),
            expected(&|t| t.has_subject(&alice) && t.has_predicate(&knows))
        );
    }

    #[test]
    fn test_delete_prunes_empty_entries() {
        let (mut index, triples) = sample();
        assert!(index.delete(&triples[4]));
        assert!(!index.delete(&triples[4]));
        assert!(index.query(Some(&iri("carol")), None, None).is_empty());
        assert!(!index.subjects().any(|s| s == &iri("carol")));
    }
}
