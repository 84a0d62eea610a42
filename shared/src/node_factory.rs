/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::error::ModelError;
use crate::graph::Graph;
use crate::node::{BlankNode, GraphLiteral, Iri, Literal, Node, Variable};
use std::collections::{BTreeSet, HashMap};

// Factory for nodes; owns the textual blank node id table
#[derive(Debug, Default, Clone)]
pub struct NodeFactory {
    blank_nodes: HashMap<String, BlankNode>,
}

impl NodeFactory {
    pub fn new() -> Self {
        NodeFactory {
            blank_nodes: HashMap::new(),
        }
    }

    pub fn create_iri(&self, iri: &str) -> Result<Node, ModelError> {
        Iri::parse(iri).map(Node::Iri)
    }

    /// Always a new blank node.
    pub fn create_blank_node(&self) -> Node {
        Node::Blank(BlankNode::fresh())
    }

    /// The same textual id gives the same node for the lifetime of this factory.
    pub fn create_blank_node_with_id(&mut self, id: &str) -> Node {
        if let Some(&blank) = self.blank_nodes.get(id) {
            Node::Blank(blank)
        } else {
            let blank = BlankNode::fresh();
            self.blank_nodes.insert(id.to_string(), blank);
            Node::Blank(blank)
        }
    }

    pub fn create_literal(&self, value: &str) -> Node {
        Node::Literal(Literal::simple(value))
    }

    pub fn create_typed_literal(&self, value: &str, datatype: &str) -> Result<Node, ModelError> {
        Ok(Node::Literal(Literal::typed(value, Iri::parse(datatype)?)))
    }

    pub fn create_lang_literal(&self, value: &str, language: &str) -> Result<Node, ModelError> {
        Literal::language_tagged(value, language).map(Node::Literal)
    }

    pub fn create_variable(&self, name: &str) -> Result<Node, ModelError> {
        Variable::new(name).map(Node::Variable)
    }

    /// Snapshot of the graph's current triples.
    pub fn create_graph_literal(&self, graph: &Graph) -> Node {
        Node::GraphLiteral(GraphLiteral::new(graph.triple_set().clone()))
    }

    pub fn create_empty_graph_literal(&self) -> Node {
        Node::GraphLiteral(GraphLiteral::new(BTreeSet::new()))
    }

    pub fn known_blank_node_ids(&self) -> usize {
        self.blank_nodes.len()
    }
}
