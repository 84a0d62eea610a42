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
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(PartialEq, Debug, Clone, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    subject: Node,
    predicate: Node,
    object: Node,
}

impl Triple {
    pub fn new(subject: Node, predicate: Node, object: Node) -> Self {
        Triple {
            subject,
            predicate,
            object,
        }
    }

    pub fn subject(&self) -> &Node {
        &self.subject
    }

    pub fn predicate(&self) -> &Node {
        &self.predicate
    }

    pub fn object(&self) -> &Node {
        &self.object
    }

    pub fn into_parts(self) -> (Node, Node, Node) {
        (self.subject, self.predicate, self.object)
    }

    /// True if the node occurs in any position.
    pub fn involves(&self, node: &Node) -> bool {
        &self.subject == node || &self.predicate == node || &self.object == node
    }

    pub fn has_subject(&self, node: &Node) -> bool {
        &self.subject == node
    }

    pub fn has_predicate(&self, node: &Node) -> bool {
        &self.predicate == node
    }

    pub fn has_object(&self, node: &Node) -> bool {
        &self.object == node
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
