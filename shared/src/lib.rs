/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod error;
pub mod graph;
pub mod graph_collection;
pub mod index_manager;
pub mod inference;
pub mod node;
pub mod node_factory;
pub mod selector;
pub mod triple;

pub use error::{CollectionError, ModelError, ReasonerError};
pub use graph::{read_graph, write_graph, Graph, GraphRef};
pub use graph_collection::{GraphCollection, GraphEvent, GraphName};
pub use inference::InferenceEngine;
pub use node::{vocab, BlankNode, GraphLiteral, Iri, Literal, LiteralKind, Node, Variable};
pub use node_factory::NodeFactory;
pub use triple::Triple;
