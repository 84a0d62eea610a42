/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use shared::node::Iri;

pub const STANDARD_ENGINE: &str = "standard";
pub const DEFAULT_INFERENCE_GRAPH: &str = "urn:kestrel:inference-graph";

/// Where reasoners write the triples they infer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferenceMode {
    /// Into the graph being reasoned over
    #[default]
    Inline,
    /// Into one auxiliary graph shared by every reasoner
    Externalized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub query_engine: String,
    pub inference_mode: InferenceMode,
    pub inference_graph: String,
    pub base_iri: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            query_engine: STANDARD_ENGINE.to_string(),
            inference_mode: InferenceMode::Inline,
            inference_graph: DEFAULT_INFERENCE_GRAPH.to_string(),
            base_iri: None,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_query_engine(mut self, name: &str) -> Self {
        self.query_engine = name.to_string();
        self
    }

    pub fn with_inference_mode(mut self, mode: InferenceMode) -> Self {
        self.inference_mode = mode;
        self
    }

    pub fn with_inference_graph(mut self, iri: &str) -> Self {
        self.inference_graph = iri.to_string();
        self
    }

    pub fn with_base_iri(mut self, iri: &str) -> Self {
        self.base_iri = Some(iri.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.query_engine.trim().is_empty() {
            return Err(ConfigError::Invalid("query engine name is empty".to_string()));
        }
        self.inference_graph_iri()?;
        self.base()?;
        Ok(())
    }

    pub fn inference_graph_iri(&self) -> Result<Iri, ConfigError> {
        Iri::parse(&self.inference_graph)
            .map_err(|e| ConfigError::Invalid(format!("inference graph: {}", e)))
    }

    pub fn base(&self) -> Result<Option<Iri>, ConfigError> {
        self.base_iri
            .as_deref()
            .map(|iri| Iri::parse(iri).map_err(|e| ConfigError::Invalid(format!("base IRI: {}", e))))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.query_engine, "standard");
        assert_eq!(config.inference_mode, InferenceMode::Inline);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_keeps_missing_defaults() {
        let config = StoreConfig::from_json(r#"{ "inference_mode": "externalized" }"#).unwrap();
        assert_eq!(config.inference_mode, InferenceMode::Externalized);
        assert_eq!(config.inference_graph, DEFAULT_INFERENCE_GRAPH);
    }

    #[test]
    fn test_invalid_configurations() {
        assert!(matches!(StoreConfig::from_json("{"), Err(ConfigError::Json(_))));
        assert!(matches!(
            StoreConfig::new().with_query_engine(" ").validate(),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            StoreConfig::new().with_inference_graph("no scheme").validate(),
            Err(ConfigError::Invalid(_))
        ));
    }
}
