/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::algebra::{Query, QueryParser, QueryResult};
use crate::config::{InferenceMode, StoreConfig, DEFAULT_INFERENCE_GRAPH, STANDARD_ENGINE};
use crate::context::EvaluationContext;
use crate::error::{ConfigError, ScopeError, StoreError, StoreResult};
use crate::query_engine::{QueryProcessor, StandardEngine};
use crate::update::{self, UpdateCommand, UpdateCommandSet, UpdateParser};
use crossbeam::channel::Receiver;
use log::{debug, info, warn};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use shared::graph::{read_graph, write_graph, Graph, GraphRef};
use shared::graph_collection::{GraphCollection, GraphEvent, GraphName};
use shared::inference::InferenceEngine;
use shared::node::{Iri, Node};
use shared::selector::{dependent_chain, independent_chain, DependentSelector, Selector};
use shared::triple::Triple;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// What selection ranges over at a given moment.
#[derive(Clone)]
pub enum ActiveGraph {
    /// Every graph in the collection.
    WholeStore,
    Graph(GraphRef),
}

impl fmt::Debug for ActiveGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveGraph::WholeStore => f.write_str("WholeStore"),
            ActiveGraph::Graph(graph) => match read_graph(graph).name() {
                Some(name) => write!(f, "Graph(<{}>)", name),
                None => f.write_str("Graph(default)"),
            },
        }
    }
}

/// Argument of [`TripleStore::with_active_graph`].
#[derive(Clone)]
pub enum ScopeTarget {
    /// The configured default graph, or the whole store when there is none.
    DefaultGraph,
    Graph(GraphRef),
    Iri(Iri),
    /// An ephemeral merge of several named graphs.
    Iris(Vec<Iri>),
}

struct StoreShared {
    graphs: GraphCollection,
    reasoners: RwLock<Vec<Arc<dyn InferenceEngine>>>,
    engines: RwLock<FxHashMap<String, Arc<dyn QueryProcessor>>>,
    config: StoreConfig,
    inference_graph: Iri,
    base_iri: Option<Iri>,
}

/// An in-memory collection of named graphs with a scoped selection engine.
///
/// The graph collection, the reasoners and the query engines are shared by
/// every handle obtained through [`TripleStore::fork`]. The active-graph stack
/// belongs to one handle; scope changes take `&mut self`.
pub struct TripleStore {
    shared: Arc<StoreShared>,
    current: ActiveGraph,
    stack: Vec<ActiveGraph>,
    default_graph: Option<GraphRef>,
}

impl TripleStore {
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let inference_graph = config.inference_graph_iri()?;
        let base_iri = config.base()?;
        Ok(Self::build(config, inference_graph, base_iri))
    }

    fn build(config: StoreConfig, inference_graph: Iri, base_iri: Option<Iri>) -> Self {
        let mut engines: FxHashMap<String, Arc<dyn QueryProcessor>> = FxHashMap::default();
        engines.insert(STANDARD_ENGINE.to_string(), Arc::new(StandardEngine::new()));
        TripleStore {
            shared: Arc::new(StoreShared {
                graphs: GraphCollection::new(),
                reasoners: RwLock::new(Vec::new()),
                engines: RwLock::new(engines),
                config,
                inference_graph,
                base_iri,
            }),
            current: ActiveGraph::WholeStore,
            stack: Vec::new(),
            default_graph: None,
        }
    }

    /// A new handle on the same graphs with its own, empty scope stack.
    pub fn fork(&self) -> TripleStore {
        TripleStore {
            shared: Arc::clone(&self.shared),
            current: ActiveGraph::WholeStore,
            stack: Vec::new(),
            default_graph: self.default_graph.clone(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.shared.config
    }

    pub fn base_iri(&self) -> Option<&Iri> {
        self.shared.base_iri.as_ref()
    }

    pub fn inference_graph_iri(&self) -> &Iri {
        &self.shared.inference_graph
    }

    // ------------------------------------------------------------------
    // Graph management

    /// Adds a graph. Registered reasoners run over it before it becomes visible.
    pub fn add_graph(&self, mut graph: Graph, merge_if_exists: bool) -> StoreResult<GraphRef> {
        if let Some(name) = graph.name() {
            if name == &self.shared.inference_graph {
                return Err(StoreError::ReservedGraphIri(name.clone()));
            }
        }
        let name = graph.name().cloned();
        // Inferences stay local until the graph itself is accepted.
        let mut inferred = None;
        match self.shared.config.inference_mode {
            InferenceMode::Inline => {
                for reasoner in self.inference_engines() {
                    reasoner.apply(&mut graph)?;
                }
            }
            InferenceMode::Externalized => {
                let reasoners = self.inference_engines();
                if !reasoners.is_empty() {
                    let mut scratch = Graph::with_name(Some(self.shared.inference_graph.clone()));
                    for reasoner in reasoners {
                        reasoner.apply_to(&graph, &mut scratch)?;
                    }
                    inferred = Some(scratch);
                }
            }
        }
        let graph_ref = self.shared.graphs.add(graph, merge_if_exists)?;
        if let Some(inferred) = inferred {
            let added = write_graph(&self.auxiliary_graph()).merge(&inferred);
            debug!("Merged {} inferred triples into {}", added, self.shared.inference_graph);
        }
        debug!("Added graph {}", display_name(&name));
        Ok(graph_ref)
    }

    pub fn remove_graph(&self, name: &GraphName) -> bool {
        let removed = self.shared.graphs.remove(name).is_some();
        if removed {
            debug!("Removed graph {}", display_name(name));
        }
        removed
    }

    pub fn has_graph(&self, name: &GraphName) -> bool {
        self.shared.graphs.contains(name)
    }

    pub fn graph(&self, name: &GraphName) -> Option<GraphRef> {
        self.shared.graphs.get(name)
    }

    pub fn graph_names(&self) -> Vec<GraphName> {
        self.shared.graphs.names()
    }

    pub fn graph_count(&self) -> usize {
        self.shared.graphs.len()
    }

    pub fn subscribe(&self) -> Receiver<GraphEvent> {
        self.shared.graphs.subscribe()
    }

    fn auxiliary_graph(&self) -> GraphRef {
        self.shared
            .graphs
            .get_or_create(&Some(self.shared.inference_graph.clone()))
    }

    // ------------------------------------------------------------------
    // Inference

    /// Appends a reasoner and applies it to every graph currently held.
    /// If that fails the reasoner is removed again and the error returned.
    pub fn add_inference_engine(&self, engine: Arc<dyn InferenceEngine>) -> StoreResult<()> {
        self.shared
            .reasoners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&engine));
        info!("Registered reasoner '{}'", engine.name());

        for graph in self.shared.graphs.snapshot() {
            if let Err(e) = self.apply_engine(engine.as_ref(), &graph) {
                self.remove_inference_engine(&engine);
                warn!("Reasoner '{}' removed after failing: {}", engine.name(), e);
                return Err(e);
            }
        }
        Ok(())
    }

    pub fn remove_inference_engine(&self, engine: &Arc<dyn InferenceEngine>) -> bool {
        let mut reasoners = self
            .shared
            .reasoners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = reasoners.len();
        reasoners.retain(|r| !Arc::ptr_eq(r, engine));
        before != reasoners.len()
    }

    pub fn clear_inference_engines(&self) {
        self.shared
            .reasoners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Registered reasoners in application order.
    pub fn inference_engines(&self) -> Vec<Arc<dyn InferenceEngine>> {
        self.shared
            .reasoners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs every registered reasoner over a graph held by the store.
    pub fn apply_inference(&self, graph: &GraphRef) -> StoreResult<()> {
        for reasoner in self.inference_engines() {
            self.apply_engine(reasoner.as_ref(), graph)?;
        }
        Ok(())
    }

    fn apply_engine(&self, engine: &dyn InferenceEngine, graph: &GraphRef) -> StoreResult<()> {
        debug!("Applying reasoner '{}'", engine.name());
        match self.shared.config.inference_mode {
            InferenceMode::Inline => engine.apply(&mut write_graph(graph))?,
            InferenceMode::Externalized => {
                let output = self.auxiliary_graph();
                if Arc::ptr_eq(graph, &output) {
                    let input = read_graph(graph).clone();
                    engine.apply_to(&input, &mut write_graph(&output))?;
                } else {
                    let input = read_graph(graph);
                    engine.apply_to(&input, &mut write_graph(&output))?;
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Active graph scope

    /// Pushes the current scope and makes `graph` active. `None` selects the
    /// default graph, or the whole store when no default graph is set.
    pub fn set_active_graph(&mut self, graph: Option<GraphRef>) {
        let next = match graph.or_else(|| self.default_graph.clone()) {
            Some(graph) => ActiveGraph::Graph(graph),
            None => ActiveGraph::WholeStore,
        };
        debug!("Entering scope {:?} at depth {}", next, self.stack.len() + 1);
        let previous = std::mem::replace(&mut self.current, next);
        self.stack.push(previous);
    }

    pub fn set_default_graph(&mut self, graph: Option<GraphRef>) {
        self.default_graph = graph;
    }

    pub fn default_graph(&self) -> Option<&GraphRef> {
        self.default_graph.as_ref()
    }

    /// Leaves the stack untouched when the graph does not exist.
    pub fn set_active_graph_iri(&mut self, iri: &Iri) -> Result<(), ScopeError> {
        let graph = self
            .shared
            .graphs
            .get(&Some(iri.clone()))
            .ok_or_else(|| ScopeError::GraphNotFound(iri.clone()))?;
        self.set_active_graph(Some(graph));
        Ok(())
    }

    /// Activates the union of several named graphs. The merge is not added to
    /// the collection and is gone once the scope is reset.
    pub fn set_active_graph_iris(&mut self, iris: &[Iri]) -> Result<(), ScopeError> {
        if let [iri] = iris {
            return self.set_active_graph_iri(iri);
        }
        let mut merged = Graph::new();
        for iri in iris {
            let graph = self
                .shared
                .graphs
                .get(&Some(iri.clone()))
                .ok_or_else(|| ScopeError::GraphNotFound(iri.clone()))?;
            merged.merge(&read_graph(&graph));
        }
        self.set_active_graph(Some(merged.share()));
        Ok(())
    }

    /// Restores the scope that was active before the last push.
    pub fn reset_active_graph(&mut self) -> Result<(), ScopeError> {
        let previous = self.stack.pop().ok_or(ScopeError::EmptyScopeStack)?;
        debug!("Leaving scope {:?}, back to depth {}", self.current, self.stack.len());
        self.current = previous;
        Ok(())
    }

    /// Runs `f` with `target` active and always restores the previous scope.
    pub fn with_active_graph<R, F>(&mut self, target: ScopeTarget, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut TripleStore) -> StoreResult<R>,
    {
        match target {
            ScopeTarget::DefaultGraph => self.set_active_graph(None),
            ScopeTarget::Graph(graph) => self.set_active_graph(Some(graph)),
            ScopeTarget::Iri(iri) => self.set_active_graph_iri(&iri)?,
            ScopeTarget::Iris(iris) => self.set_active_graph_iris(&iris)?,
        }
        let result = f(self);
        let popped = self.reset_active_graph();
        match (result, popped) {
            (Err(e), _) => Err(e),
            (Ok(_), Err(e)) => Err(e.into()),
            (Ok(value), Ok(())) => Ok(value),
        }
    }

    pub fn scope_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_scoped(&self) -> bool {
        matches!(self.current, ActiveGraph::Graph(_))
    }

    pub fn active_graph(&self) -> &ActiveGraph {
        &self.current
    }

    // ------------------------------------------------------------------
    // Selection over the current scope

    fn scope_graphs(&self) -> Vec<GraphRef> {
        match &self.current {
            ActiveGraph::WholeStore => self.shared.graphs.snapshot(),
            ActiveGraph::Graph(graph) => vec![Arc::clone(graph)],
        }
    }

    fn subset_graphs(&self, graphs: &[Iri]) -> Vec<GraphRef> {
        self.shared.graphs.snapshot_named(graphs)
    }

    /// All triples in the current scope.
    pub fn query_triples(&self) -> Vec<Triple> {
        collect_from(&self.scope_graphs(), |g| g.triples().cloned().collect())
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.scope_graphs()
            .par_iter()
            .any(|g| read_graph(g).contains(triple))
    }

    /// Indexed lookup with any combination of bound positions.
    pub fn find(&self, s: Option<&Node>, p: Option<&Node>, o: Option<&Node>) -> Vec<Triple> {
        collect_from(&self.scope_graphs(), |g| g.find(s, p, o))
    }

    pub fn get_nodes(&self, selector: &dyn Selector<Node>) -> Vec<Node> {
        nodes_from(&self.scope_graphs(), selector)
    }

    pub fn get_triples(&self, selector: &dyn Selector<Triple>) -> Vec<Triple> {
        scan(&self.scope_graphs(), selector)
    }

    pub fn get_triples_involving(&self, node: &Node) -> Vec<Triple> {
        involving(&self.scope_graphs(), node)
    }

    pub fn get_triples_with_subject(&self, subject: &Node) -> Vec<Triple> {
        collect_from(&self.scope_graphs(), |g| g.with_subject(subject))
    }

    pub fn get_triples_with_predicate(&self, predicate: &Node) -> Vec<Triple> {
        collect_from(&self.scope_graphs(), |g| g.with_predicate(predicate))
    }

    pub fn get_triples_with_object(&self, object: &Node) -> Vec<Triple> {
        collect_from(&self.scope_graphs(), |g| g.with_object(object))
    }

    pub fn get_triples_with_subject_selector(&self, selector: &dyn Selector<Node>) -> Vec<Triple> {
        self.get_triples(&|t: &Triple| selector.accepts(t.subject()))
    }

    pub fn get_triples_with_predicate_selector(&self, selector: &dyn Selector<Node>) -> Vec<Triple> {
        self.get_triples(&|t: &Triple| selector.accepts(t.predicate()))
    }

    pub fn get_triples_with_object_selector(&self, selector: &dyn Selector<Node>) -> Vec<Triple> {
        self.get_triples(&|t: &Triple| selector.accepts(t.object()))
    }

    pub fn get_triples_with_subject_predicate(&self, subject: &Node, predicate: &Node) -> Vec<Triple> {
        collect_from(&self.scope_graphs(), |g| g.with_subject_predicate(subject, predicate))
    }

    pub fn get_triples_with_predicate_object(&self, predicate: &Node, object: &Node) -> Vec<Triple> {
        collect_from(&self.scope_graphs(), |g| g.with_predicate_object(predicate, object))
    }

    pub fn get_triples_with_subject_object(&self, subject: &Node, object: &Node) -> Vec<Triple> {
        collect_from(&self.scope_graphs(), |g| g.with_subject_object(subject, object))
    }

    pub fn triples_exist(&self, selector: &dyn Selector<Triple>) -> bool {
        exists(&self.scope_graphs(), selector)
    }

    /// Dependent chain: each stage is initialised with the previous stage's
    /// output and then re-scans the whole scope.
    pub fn get_triples_chained(
        &self,
        first: &dyn Selector<Triple>,
        chain: &mut [&mut dyn DependentSelector<Triple>],
    ) -> Vec<Triple> {
        let graphs = self.scope_graphs();
        dependent_chain(|selector| scan(&graphs, selector), first, chain)
    }

    /// Independent chain: each stage narrows the previous stage's output.
    pub fn get_triples_chain(&self, chain: &[&dyn Selector<Triple>]) -> Vec<Triple> {
        let graphs = self.scope_graphs();
        independent_chain(|selector| scan(&graphs, selector), chain)
    }

    // ------------------------------------------------------------------
    // Selection over an explicit subset of named graphs. Unknown IRIs add nothing.

    pub fn get_nodes_in(&self, graphs: &[Iri], selector: &dyn Selector<Node>) -> Vec<Node> {
        nodes_from(&self.subset_graphs(graphs), selector)
    }

    pub fn get_triples_in(&self, graphs: &[Iri], selector: &dyn Selector<Triple>) -> Vec<Triple> {
        scan(&self.subset_graphs(graphs), selector)
    }

    pub fn get_triples_involving_in(&self, graphs: &[Iri], node: &Node) -> Vec<Triple> {
        involving(&self.subset_graphs(graphs), node)
    }

    pub fn get_triples_with_subject_in(&self, graphs: &[Iri], subject: &Node) -> Vec<Triple> {
        collect_from(&self.subset_graphs(graphs), |g| g.with_subject(subject))
    }

    pub fn get_triples_with_predicate_in(&self, graphs: &[Iri], predicate: &Node) -> Vec<Triple> {
        collect_from(&self.subset_graphs(graphs), |g| g.with_predicate(predicate))
    }

    pub fn get_triples_with_object_in(&self, graphs: &[Iri], object: &Node) -> Vec<Triple> {
        collect_from(&self.subset_graphs(graphs), |g| g.with_object(object))
    }

    pub fn get_triples_with_subject_selector_in(&self, graphs: &[Iri], selector: &dyn Selector<Node>) -> Vec<Triple> {
        self.get_triples_in(graphs, &|t: &Triple| selector.accepts(t.subject()))
    }

    pub fn get_triples_with_predicate_selector_in(&self, graphs: &[Iri], selector: &dyn Selector<Node>) -> Vec<Triple> {
        self.get_triples_in(graphs, &|t: &Triple| selector.accepts(t.predicate()))
    }

    pub fn get_triples_with_object_selector_in(&self, graphs: &[Iri], selector: &dyn Selector<Node>) -> Vec<Triple> {
        self.get_triples_in(graphs, &|t: &Triple| selector.accepts(t.object()))
    }

    pub fn triples_exist_in(&self, graphs: &[Iri], selector: &dyn Selector<Triple>) -> bool {
        exists(&self.subset_graphs(graphs), selector)
    }

    pub fn get_triples_chained_in(
        &self,
        graphs: &[Iri],
        first: &dyn Selector<Triple>,
        chain: &mut [&mut dyn DependentSelector<Triple>],
    ) -> Vec<Triple> {
        let graphs = self.subset_graphs(graphs);
        dependent_chain(|selector| scan(&graphs, selector), first, chain)
    }

    pub fn get_triples_chain_in(&self, graphs: &[Iri], chain: &[&dyn Selector<Triple>]) -> Vec<Triple> {
        let graphs = self.subset_graphs(graphs);
        independent_chain(|selector| scan(&graphs, selector), chain)
    }

    // ------------------------------------------------------------------
    // Query and update

    pub fn register_query_engine(&self, engine: Arc<dyn QueryProcessor>) {
        info!("Registered query engine '{}'", engine.name());
        self.shared
            .engines
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(engine.name().to_string(), engine);
    }

    /// The engine named by the configuration.
    pub fn query_engine(&self) -> StoreResult<Arc<dyn QueryProcessor>> {
        let name = &self.shared.config.query_engine;
        self.shared
            .engines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownQueryEngine(name.clone()).into())
    }

    pub fn execute_query(&mut self, query: &Query) -> StoreResult<QueryResult> {
        let engine = self.query_engine()?;
        debug!("Dispatching query to engine '{}'", engine.name());
        let mut context = EvaluationContext::new(self);
        engine.evaluate(query, &mut context)
    }

    pub fn execute_query_text(&mut self, parser: &dyn QueryParser, text: &str) -> StoreResult<QueryResult> {
        let query = parser.parse_query(text)?;
        self.execute_query(&query)
    }

    /// Runs the commands in order against one shared evaluation context.
    pub fn execute_update(&mut self, commands: &UpdateCommandSet) -> StoreResult<()> {
        let mut context = EvaluationContext::new(self);
        for command in commands.iter() {
            update::apply(command, &mut context)?;
        }
        Ok(())
    }

    pub fn execute_update_command(&mut self, command: &UpdateCommand) -> StoreResult<()> {
        let mut context = EvaluationContext::new(self);
        update::apply(command, &mut context)
    }

    pub fn execute_update_text(&mut self, parser: &dyn UpdateParser, text: &str) -> StoreResult<()> {
        let commands = parser.parse_update(text)?;
        self.execute_update(&commands)
    }
}

impl Default for TripleStore {
    fn default() -> Self {
        Self::build(
            StoreConfig::default(),
            Iri::new_unchecked(DEFAULT_INFERENCE_GRAPH),
            None,
        )
    }
}

impl fmt::Debug for TripleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripleStore")
            .field("graphs", &self.graph_count())
            .field("current", &self.current)
            .field("scope_depth", &self.stack.len())
            .finish()
    }
}

fn display_name(name: &GraphName) -> String {
    match name {
        Some(iri) => format!("<{}>", iri),
        None => "(default)".to_string(),
    }
}

/// Runs `f` over every graph in parallel and concatenates the results in graph order.
fn collect_from<F>(graphs: &[GraphRef], f: F) -> Vec<Triple>
where
    F: Fn(&Graph) -> Vec<Triple> + Sync + Send,
{
    graphs
        .par_iter()
        .map(|g| f(&read_graph(g)))
        .collect::<Vec<Vec<Triple>>>()
        .into_iter()
        .flatten()
        .collect()
}

fn scan(graphs: &[GraphRef], selector: &dyn Selector<Triple>) -> Vec<Triple> {
    collect_from(graphs, |g| g.triples().filter(|t| selector.accepts(t)).cloned().collect())
}

fn exists(graphs: &[GraphRef], selector: &dyn Selector<Triple>) -> bool {
    graphs
        .par_iter()
        .any(|g| read_graph(g).triples().any(|t| selector.accepts(t)))
}

fn involving(graphs: &[GraphRef], node: &Node) -> Vec<Triple> {
    collect_from(graphs, |g| {
        let mut found: BTreeSet<Triple> = g.with_subject(node).into_iter().collect();
        found.extend(g.with_predicate(node));
        found.extend(g.with_object(node));
        found.into_iter().collect()
    })
}

fn nodes_from(graphs: &[GraphRef], selector: &dyn Selector<Node>) -> Vec<Node> {
    let per_graph: Vec<BTreeSet<Node>> = graphs.par_iter().map(|g| read_graph(g).nodes()).collect();
    per_graph
        .into_iter()
        .flatten()
        .collect::<BTreeSet<Node>>()
        .into_iter()
        .filter(|n| selector.accepts(n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(local: &str) -> Iri {
        Iri::parse(&format!("http://example.org/{}", local)).unwrap()
    }

    fn node(local: &str) -> Node {
        Node::Iri(iri(local))
    }

    fn named(local: &str, triples: &[(&str, &str, &str)]) -> Graph {
        let mut graph = Graph::named(iri(local));
        for (s, p, o) in triples {
            graph.assert(Triple::new(node(s), node(p), node(o)));
        }
        graph
    }

    #[test]
    fn test_push_pop_restores_previous_scope() {
        let mut store = TripleStore::default();
        let a = store.add_graph(named("a", &[("s", "p", "o")]), false).unwrap();
        let b = store.add_graph(named("b", &[("x", "p", "y")]), false).unwrap();

        store.set_active_graph(Some(Arc::clone(&a)));
        store.set_active_graph(Some(Arc::clone(&b)));
        assert_eq!(store.scope_depth(), 2);
        store.reset_active_graph().unwrap();
        match store.active_graph() {
            ActiveGraph::Graph(g) => assert!(Arc::ptr_eq(g, &a)),
            other => panic!("unexpected scope {:?}", other),
        }
        store.reset_active_graph().unwrap();
        assert!(!store.is_scoped());
        assert_eq!(store.reset_active_graph(), Err(ScopeError::EmptyScopeStack));
    }

    #[test]
    fn test_missing_iri_leaves_stack_unchanged() {
        let mut store = TripleStore::default();
        store.add_graph(named("a", &[("s", "p", "o")]), false).unwrap();
        store.set_active_graph_iri(&iri("a")).unwrap();
        assert_eq!(
            store.set_active_graph_iri(&iri("missing")),
            Err(ScopeError::GraphNotFound(iri("missing")))
        );
        assert_eq!(
            store.set_active_graph_iris(&[iri("a"), iri("missing")]),
            Err(ScopeError::GraphNotFound(iri("missing")))
        );
        assert_eq!(store.scope_depth(), 1);
    }

    #[test]
    fn test_null_push_uses_default_graph() {
        let mut store = TripleStore::default();
        store.add_graph(named("a", &[("s", "p", "o")]), false).unwrap();
        let default = store.add_graph(named("b", &[("x", "p", "y")]), false).unwrap();

        store.set_active_graph(None);
        assert_eq!(store.query_triples().len(), 2);
        store.reset_active_graph().unwrap();

        store.set_default_graph(Some(default));
        store.set_active_graph(None);
        assert_eq!(store.query_triples(), vec![Triple::new(node("x"), node("p"), node("y"))]);
    }

    #[test]
    fn test_with_active_graph_pops_on_error() {
        let mut store = TripleStore::default();
        store.add_graph(named("a", &[("s", "p", "o")]), false).unwrap();
        let result: StoreResult<()> = store.with_active_graph(ScopeTarget::Iri(iri("a")), |store| {
            assert_eq!(store.scope_depth(), 1);
            Err(StoreError::Update("boom".to_string()))
        });
        assert_eq!(result, Err(StoreError::Update("boom".to_string())));
        assert_eq!(store.scope_depth(), 0);
    }

    #[test]
    fn test_reserved_inference_iri_is_rejected() {
        let store = TripleStore::default();
        let graph = Graph::named(store.inference_graph_iri().clone());
        assert!(matches!(
            store.add_graph(graph, false),
            Err(StoreError::ReservedGraphIri(_))
        ));
    }

    #[test]
    fn test_fork_has_independent_scope() {
        let mut store = TripleStore::default();
        store.add_graph(named("a", &[("s", "p", "o")]), false).unwrap();
        store.set_active_graph_iri(&iri("a")).unwrap();
        let fork = store.fork();
        assert_eq!(fork.scope_depth(), 0);
        assert_eq!(fork.graph_count(), 1);
    }

    #[test]
    fn test_involving_deduplicates_within_graph() {
        let store = TripleStore::default();
        store.add_graph(named("a", &[("s", "p", "s"), ("s", "q", "o")]), false).unwrap();
        assert_eq!(store.get_triples_involving(&node("s")).len(), 2);
        assert_eq!(store.get_triples_involving_in(&[iri("missing")], &node("s")).len(), 0);
    }
}
