/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

extern crate kestrel;
use kestrel::selector::*;
use kestrel::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn iri(local: &str) -> Iri {
        Iri::parse(&format!("http://example.org/{}", local)).unwrap()
    }

    fn node(local: &str) -> Node {
        Node::Iri(iri(local))
    }

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(node(s), node(p), node(o))
    }

    fn graph(name: &str, triples: &[Triple]) -> Graph {
        let mut graph = Graph::named(iri(name));
        graph.assert_all(triples.iter().cloned());
        graph
    }

    /// a knows b, b knows c, c knows d in "social"; labels in "labels".
    fn setup_store() -> TripleStore {
        let store = TripleStore::default();
        store
            .add_graph(
                graph(
                    "social",
                    &[triple("a", "knows", "b"), triple("b", "knows", "c"), triple("c", "knows", "d")],
                ),
                false,
            )
            .unwrap();
        let mut labels = Graph::named(iri("labels"));
        labels.assert(Triple::new(node("a"), node("label"), Node::literal("Alice")));
        labels.assert(Triple::new(node("b"), node("label"), Node::literal("Bob")));
        store.add_graph(labels, false).unwrap();
        store
    }

    fn as_set(triples: Vec<Triple>) -> BTreeSet<Triple> {
        triples.into_iter().collect()
    }

    #[test]
    fn test_dependent_chain_follows_paths() {
        let store = setup_store();
        let from_a = TriplePatternSelector::new(Some(node("a")), Some(node("knows")), None);
        let mut hop = FollowObjectSelector::new();
        let mut second_hop = FollowObjectSelector::new();
        let mut chain: [&mut dyn DependentSelector<Triple>; 2] = [&mut hop, &mut second_hop];
        let result = store.get_triples_chained(&from_a, &mut chain);
        assert_eq!(result, vec![triple("c", "knows", "d")]);
        assert!(hop.is_initialised());
    }

    #[test]
    fn test_dependent_chain_rescans_the_base() {
        let store = setup_store();
        let from_a = TriplePatternSelector::new(Some(node("a")), Some(node("knows")), None);
        let mut seen = SubjectSeenSelector::new();
        // The second stage finds a's label, which the first stage never returned.
        let mut chain: [&mut dyn DependentSelector<Triple>; 1] = [&mut seen];
        let result = store.get_triples_chained(&from_a, &mut chain);
        assert_eq!(result.len(), 2);
        assert!(result.contains(&Triple::new(node("a"), node("label"), Node::literal("Alice"))));
    }

    #[test]
    fn test_empty_dependent_list_is_first_selector() {
        let store = setup_store();
        let knows = TriplePatternSelector::new(None, Some(node("knows")), None);
        let result = store.get_triples_chained(&knows, &mut []);
        assert_eq!(as_set(result), as_set(store.get_triples(&knows)));
    }

    #[test]
    fn test_independent_chain_only_narrows() {
        let store = setup_store();
        let knows = TriplePatternSelector::new(None, Some(node("knows")), None);
        let involves_b = InvolvesSelector(node("b"));
        let first_only = store.get_triples_chain(&[&knows as &dyn Selector<Triple>]);
        let narrowed = store.get_triples_chain(&[&knows as &dyn Selector<Triple>, &involves_b]);
        assert_eq!(as_set(first_only.clone()), as_set(store.get_triples(&knows)));
        assert!(narrowed.len() <= first_only.len());
        assert_eq!(narrowed.len(), 2);
        assert!(store.get_triples_chain(&[]).is_empty());
    }

    #[test]
    fn test_node_selection() {
        let store = setup_store();
        let literals = store.get_nodes(&LiteralSelector);
        assert_eq!(literals, {
            let mut expected = vec![Node::literal("Alice"), Node::literal("Bob")];
            expected.sort();
            expected
        });
        assert_eq!(store.get_nodes_in(&[iri("social")], &IriSelector).len(), 4);
        assert!(store.get_nodes_in(&[iri("nowhere")], &AnySelector).is_empty());
    }

    #[test]
    fn test_indexed_lookups_agree_with_scans() {
        let store = setup_store();
        let by_index = store.get_triples_with_predicate_object(&node("knows"), &node("c"));
        let by_scan = store.get_triples(&|t: &Triple| t.has_predicate(&node("knows")) && t.has_object(&node("c")));
        assert_eq!(by_index, by_scan);
        assert_eq!(
            as_set(store.get_triples_with_subject_selector(&NodeSelector(node("b")))),
            as_set(store.get_triples_with_subject(&node("b")))
        );
        assert!(store.triples_exist(&InvolvesSelector(node("d"))));
        assert!(!store.triples_exist_in(&[iri("labels")], &InvolvesSelector(node("d"))));
    }

    #[test]
    fn test_node_selectors_over_graph_subset() {
        let store = setup_store();
        let both = [iri("social"), iri("labels")];
        assert_eq!(
            store.get_triples_with_subject_selector_in(&[iri("labels")], &NodeSelector(node("a"))),
            vec![Triple::new(node("a"), node("label"), Node::literal("Alice"))]
        );
        assert_eq!(
            as_set(store.get_triples_with_subject_selector_in(&both, &NodeSelector(node("a")))),
            as_set(store.get_triples_with_subject(&node("a")))
        );
        assert_eq!(store.get_triples_with_predicate_selector_in(&[iri("social")], &IriSelector).len(), 3);
        assert_eq!(store.get_triples_with_object_selector_in(&both, &LiteralSelector).len(), 2);
        assert!(store
            .get_triples_with_object_selector_in(&[iri("social")], &LiteralSelector)
            .is_empty());
        assert!(store
            .get_triples_with_object_selector_in(&[iri("nowhere")], &AnySelector)
            .is_empty());
    }

    #[test]
    fn test_scope_stack_push_pop() {
        let mut store = setup_store();
        store.set_active_graph_iri(&iri("social")).unwrap();
        store.set_active_graph_iri(&iri("labels")).unwrap();
        assert_eq!(store.query_triples().len(), 2);
        store.reset_active_graph().unwrap();
        assert_eq!(store.query_triples().len(), 3);
        store.reset_active_graph().unwrap();
        assert_eq!(store.query_triples().len(), 5);
        assert_eq!(store.reset_active_graph(), Err(ScopeError::EmptyScopeStack));
    }

    #[test]
    fn test_missing_graph_does_not_touch_stack() {
        let mut store = setup_store();
        store.set_active_graph_iri(&iri("social")).unwrap();
        let error = store.set_active_graph_iri(&iri("absent")).unwrap_err();
        assert_eq!(error, ScopeError::GraphNotFound(iri("absent")));
        assert_eq!(store.scope_depth(), 1);
        assert_eq!(store.query_triples().len(), 3);
    }

    #[test]
    fn test_merged_scope_is_ephemeral() {
        let mut store = TripleStore::default();
        let shared_triple = triple("x", "p", "y");
        store.add_graph(graph("g1", &[triple("a", "p", "b"), shared_triple.clone()]), false).unwrap();
        store.add_graph(graph("g2", &[triple("c", "p", "d"), shared_triple.clone()]), false).unwrap();

        store.set_active_graph_iris(&[iri("g1"), iri("g2")]).unwrap();
        let selected = store.get_triples(&AnySelector);
        assert_eq!(selected.len(), 3);
        assert_eq!(
            as_set(selected),
            as_set(vec![triple("a", "p", "b"), triple("c", "p", "d"), shared_triple])
        );
        store.reset_active_graph().unwrap();

        assert_eq!(store.graph_count(), 2);
        assert_eq!(store.graph(&Some(iri("g1"))).map(|g| read_graph(&g).len()), Some(2));
        assert_eq!(store.graph(&Some(iri("g2"))).map(|g| read_graph(&g).len()), Some(2));
    }

    #[test]
    fn test_fork_scopes_are_independent() {
        let mut store = setup_store();
        let mut fork = store.fork();
        store.set_active_graph_iri(&iri("labels")).unwrap();
        fork.set_active_graph_iri(&iri("social")).unwrap();
        assert_eq!(store.query_triples().len(), 2);
        assert_eq!(fork.query_triples().len(), 3);
    }
}
