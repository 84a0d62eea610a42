/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::error::CollectionError;
use crate::graph::{write_graph, Graph, GraphRef};
use crate::node::Iri;
use crossbeam::channel::{unbounded, Receiver, Sender};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// `None` names the default graph.
pub type GraphName = Option<Iri>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphEvent {
    Added(GraphName),
    Merged(GraphName),
    Removed(GraphName),
}

/// Map from graph name to graph with at most one graph per name.
#[derive(Debug, Default)]
pub struct GraphCollection {
    graphs: RwLock<BTreeMap<GraphName, GraphRef>>,
    subscribers: Mutex<Vec<Sender<GraphEvent>>>,
}

impl GraphCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the graph. When a graph with the same name exists its triples are
    /// merged into it if `merge_if_exists`, otherwise the call fails.
    pub fn add(&self, graph: Graph, merge_if_exists: bool) -> Result<GraphRef, CollectionError> {
        let name = graph.name().cloned();
        let (graph_ref, event) = {
            let mut graphs = self.graphs.write().unwrap_or_else(PoisonError::into_inner);
            match graphs.get(&name) {
                Some(existing) if merge_if_exists => {
                    write_graph(existing).merge(&graph);
                    (Arc::clone(existing), GraphEvent::Merged(name))
                }
                Some(_) => return Err(CollectionError::GraphExists(display_name(&name))),
                None => {
                    let graph_ref = graph.share();
                    graphs.insert(name.clone(), Arc::clone(&graph_ref));
                    (graph_ref, GraphEvent::Added(name))
                }
            }
        };
        self.notify(event);
        Ok(graph_ref)
    }

    /// Returns the graph with this name, creating an empty one atomically if absent.
    pub fn get_or_create(&self, name: &GraphName) -> GraphRef {
        let created = {
            let mut graphs = self.graphs.write().unwrap_or_else(PoisonError::into_inner);
            if let Some(existing) = graphs.get(name) {
                return Arc::clone(existing);
            }
            let graph_ref = Graph::with_name(name.clone()).share();
            graphs.insert(name.clone(), Arc::clone(&graph_ref));
            graph_ref
        };
        self.notify(GraphEvent::Added(name.clone()));
        created
    }

    pub fn remove(&self, name: &GraphName) -> Option<GraphRef> {
        let removed = self
            .graphs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
        if removed.is_some() {
            self.notify(GraphEvent::Removed(name.clone()));
        }
        removed
    }

    pub fn contains(&self, name: &GraphName) -> bool {
        self.graphs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn get(&self, name: &GraphName) -> Option<GraphRef> {
        self.graphs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn names(&self) -> Vec<GraphName> {
        self.graphs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Copy of the reference list, safe to iterate while the collection changes.
    pub fn snapshot(&self) -> Vec<GraphRef> {
        self.graphs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// The subset of graphs whose name is in `names`, in collection order.
    pub fn snapshot_named(&self, names: &[Iri]) -> Vec<GraphRef> {
        self.graphs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(name, _)| name.as_ref().map_or(false, |n| names.contains(n)))
            .map(|(_, graph)| Arc::clone(graph))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.graphs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe(&self) -> Receiver<GraphEvent> {
        let (sender, receiver) = unbounded();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        receiver
    }

    fn notify(&self, event: GraphEvent) {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|sender| sender.send(event.clone()).is_ok());
    }
}

fn display_name(name: &GraphName) -> String {
    match name {
        Some(iri) => format!("<{}>", iri),
        None => "the default graph".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::read_graph;
    use crate::node::Node;
    use crate::triple::Triple;

    fn named(local: &str, triples: &[(&str, &str, &str)]) -> Graph {
        let iri = |l: &str| Node::iri(&format!("http://example.org/{}", l)).unwrap();
        let mut graph = Graph::named(Iri::parse(&format!("http://example.org/{}", local)).unwrap());
        for (s, p, o) in triples {
            graph.assert(Triple::new(iri(s), iri(p), iri(o)));
        }
        graph
    }

    #[test]
    fn test_add_existing_without_merge_fails() {
        let collection = GraphCollection::new();
        collection.add(named("g", &[("a", "p", "b")]), false).unwrap();
        let err = collection.add(named("g", &[("c", "p", "d")]), false).unwrap_err();
        assert!(matches!(err, CollectionError::GraphExists(_)));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_add_existing_with_merge_unions() {
        let collection = GraphCollection::new();
        let first = collection.add(named("g", &[("a", "p", "b")]), false).unwrap();
        let merged = collection.add(named("g", &[("c", "p", "d")]), true).unwrap();
        assert!(Arc::ptr_eq(&first, &merged));
        assert_eq!(read_graph(&first).len(), 2);
    }

    #[test]
    fn test_events_are_delivered() {
        let collection = GraphCollection::new();
        let events = collection.subscribe();
        let graph = named("g", &[("a", "p", "b")]);
        let name = graph.name().cloned();
        collection.add(graph.clone(), false).unwrap();
        collection.add(graph, true).unwrap();
        collection.remove(&name);
        collection.remove(&name);
        let received: Vec<GraphEvent> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                GraphEvent::Added(name.clone()),
                GraphEvent::Merged(name.clone()),
                GraphEvent::Removed(name),
            ]
        );
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let collection = GraphCollection::new();
        drop(collection.subscribe());
        collection.get_or_create(&None);
        assert!(collection.subscribers.lock().unwrap().is_empty());
    }

    #[test]
    fn test_get_or_create_is_lazy() {
        let collection = GraphCollection::new();
        let a = collection.get_or_create(&None);
        let b = collection.get_or_create(&None);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(collection.names(), vec![None]);
    }
}
