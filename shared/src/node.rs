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
use crate::triple::Triple;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Well-known vocabulary used by the model and the evaluator.
pub mod vocab {
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const XSD_INT: &str = "http://www.w3.org/2001/XMLSchema#int";
    pub const XSD_LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const XSD_FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    pub const RDFS_SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    pub const RDFS_SUB_PROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";
    pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
    pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
}

/// An absolute IRI, compared by its normalised text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iri(String);

impl Iri {
    /// Parses and normalises an IRI (lower-cased scheme and host, resolved dot segments).
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        let url = Url::parse(text.trim()).map_err(|e| ModelError::InvalidIri {
            iri: text.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Iri(url.to_string()))
    }

    /// Wraps text that is already known to be a normalised absolute IRI,
    /// such as the vocabulary constants.
    pub fn new_unchecked(text: impl Into<String>) -> Self {
        Iri(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Iri {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Iri::parse(&value)
    }
}

impl From<Iri> for String {
    fn from(iri: Iri) -> Self {
        iri.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A blank node. The identity is opaque and only meaningful inside this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlankNode(u128);

impl BlankNode {
    /// A blank node that is distinct from every other blank node created so far.
    pub fn fresh() -> Self {
        BlankNode(rand::random::<u128>())
    }

    pub fn id(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:b{:032x}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LiteralKind {
    Simple,
    Typed(Iri),
    LanguageTagged(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    value: String,
    kind: LiteralKind,
}

impl Literal {
    pub fn simple(value: impl Into<String>) -> Self {
        Literal {
            value: value.into(),
            kind: LiteralKind::Simple,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: Iri) -> Self {
        Literal {
            value: value.into(),
            kind: LiteralKind::Typed(datatype),
        }
    }

    pub fn language_tagged(value: impl Into<String>, language: &str) -> Result<Self, ModelError> {
        let valid = !language.is_empty()
            && language.split('-').all(|part| {
                !part.is_empty() && part.len() <= 8 && part.chars().all(|c| c.is_ascii_alphanumeric())
            });
        if !valid {
            return Err(ModelError::InvalidLanguageTag(language.to_string()));
        }
        Ok(Literal {
            value: value.into(),
            kind: LiteralKind::LanguageTagged(language.to_ascii_lowercase()),
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> &LiteralKind {
        &self.kind
    }

    pub fn datatype(&self) -> Option<&Iri> {
        match &self.kind {
            LiteralKind::Typed(datatype) => Some(datatype),
            _ => None,
        }
    }

    pub fn language(&self) -> Option<&str> {
        match &self.kind {
            LiteralKind::LanguageTagged(language) => Some(language),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let escaped = self
            .value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\r', "\\r");
        match &self.kind {
            LiteralKind::Simple => write!(f, "\"{}\"", escaped),
            LiteralKind::Typed(datatype) => write!(f, "\"{}\"^^<{}>", escaped, datatype),
            LiteralKind::LanguageTagged(language) => write!(f, "\"{}\"@{}", escaped, language),
        }
    }
}

/// A query variable, stored without its leading `?` or `$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable(String);

impl Variable {
    pub fn new(name: &str) -> Result<Self, ModelError> {
        let name = name.trim_start_matches(['?', '$']);
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(ModelError::InvalidVariable(name.to_string()));
        }
        Ok(Variable(name.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// A node whose value is itself a set of triples (N3 formulae).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GraphLiteral(Arc<BTreeSet<Triple>>);

impl GraphLiteral {
    pub fn new(triples: BTreeSet<Triple>) -> Self {
        GraphLiteral(Arc::new(triples))
    }

    pub fn triples(&self) -> &BTreeSet<Triple> {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Node {
    Iri(Iri),
    Blank(BlankNode),
    Literal(Literal),
    Variable(Variable),
    GraphLiteral(GraphLiteral),
}

impl Node {
    pub fn iri(text: &str) -> Result<Node, ModelError> {
        Iri::parse(text).map(Node::Iri)
    }

    pub fn literal(value: impl Into<String>) -> Node {
        Node::Literal(Literal::simple(value))
    }

    pub fn typed_literal(value: impl Into<String>, datatype: &str) -> Node {
        Node::Literal(Literal::typed(value, Iri::new_unchecked(datatype)))
    }

    pub fn integer(value: i64) -> Node {
        Node::typed_literal(value.to_string(), vocab::XSD_INTEGER)
    }

    pub fn double(value: f64) -> Node {
        let lexical = if value.is_nan() {
            "NaN".to_string()
        } else if value.is_infinite() {
            if value > 0.0 { "INF" } else { "-INF" }.to_string()
        } else {
            value.to_string()
        };
        Node::typed_literal(lexical, vocab::XSD_DOUBLE)
    }

    pub fn boolean(value: bool) -> Node {
        Node::typed_literal(value.to_string(), vocab::XSD_BOOLEAN)
    }

    pub fn variable(name: &str) -> Result<Node, ModelError> {
        Variable::new(name).map(Node::Variable)
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Node::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Node::Variable(_))
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Node::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

impl From<Iri> for Node {
    fn from(iri: Iri) -> Self {
        Node::Iri(iri)
    }
}

impl From<Literal> for Node {
    fn from(literal: Literal) -> Self {
        Node::Literal(literal)
    }
}

impl From<BlankNode> for Node {
    fn from(blank: BlankNode) -> Self {
        Node::Blank(blank)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "<{}>", iri),
            Node::Blank(blank) => write!(f, "{}", blank),
            Node::Literal(literal) => write!(f, "{}", literal),
            Node::Variable(variable) => write!(f, "?{}", variable.name()),
            Node::GraphLiteral(graph) => {
                f.write_str("{")?;
                for triple in graph.triples() {
                    write!(f, " {}", triple)?;
                }
                f.write_str(" }")
            }
        }
    }
}
