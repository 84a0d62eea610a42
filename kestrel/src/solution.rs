/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};
use shared::node::{LiteralKind, Node};
use std::collections::BTreeMap;

/// One row of variable bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Solution(BTreeMap<String, Node>);

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, variable: &str) -> Option<&Node> {
        self.0.get(variable)
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.0.contains_key(variable)
    }

    pub fn insert(&mut self, variable: &str, node: Node) -> Option<Node> {
        self.0.insert(variable.to_string(), node)
    }

    pub fn with(mut self, variable: &str, node: Node) -> Self {
        self.insert(variable, node);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.0.iter()
    }

    /// True when every variable bound in both rows has the same value.
    pub fn is_compatible(&self, other: &Solution) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .iter()
            .all(|(k, v)| large.get(k).map_or(true, |other_v| other_v == v))
    }

    /// Union of two compatible rows; `None` if they disagree on a variable.
    pub fn merge(&self, other: &Solution) -> Option<Solution> {
        if !self.is_compatible(other) {
            return None;
        }
        let mut merged = self.clone();
        for (k, v) in other.iter() {
            merged.0.entry(k.clone()).or_insert_with(|| v.clone());
        }
        Some(merged)
    }

    pub fn project(&self, variables: &[String]) -> Solution {
        Solution(
            self.0
                .iter()
                .filter(|(k, _)| variables.contains(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl FromIterator<(String, Node)> for Solution {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Solution(iter.into_iter().collect())
    }
}

/// The table produced by a SELECT query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SolutionSet {
    pub variables: Vec<String>,
    pub rows: Vec<Solution>,
}

impl SolutionSet {
    pub fn new(variables: Vec<String>, rows: Vec<Solution>) -> Self {
        SolutionSet { variables, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values bound to one variable, row by row.
    pub fn column(&self, variable: &str) -> Vec<Option<&Node>> {
        self.rows.iter().map(|row| row.get(variable)).collect()
    }

    /// SPARQL 1.1 Query Results JSON layout.
    pub fn to_json(&self) -> JsonValue {
        let bindings: Vec<JsonValue> = self
            .rows
            .iter()
            .map(|row| {
                let mut object = Map::new();
                for (variable, node) in row.iter() {
                    object.insert(variable.clone(), node_to_json(node));
                }
                JsonValue::Object(object)
            })
            .collect();
        json!({
            "head": { "vars": self.variables },
            "results": { "bindings": bindings },
        })
    }
}

pub(crate) fn node_to_json(node: &Node) -> JsonValue {
    match node {
        Node::Iri(iri) => json!({ "type": "uri", "value": iri.as_str() }),
        Node::Blank(blank) => json!({ "type": "bnode", "value": format!("b{:x}", blank.id()) }),
        Node::Literal(literal) => match literal.kind() {
            LiteralKind::Simple => json!({ "type": "literal", "value": literal.value() }),
            LiteralKind::LanguageTagged(language) => {
                json!({ "type": "literal", "value": literal.value(), "xml:lang": language })
            }
            LiteralKind::Typed(datatype) => {
                json!({ "type": "literal", "value": literal.value(), "datatype": datatype.as_str() })
            }
        },
        other => json!({ "type": "literal", "value": other.to_string() }),
    }
}
