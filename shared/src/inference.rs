/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::error::ReasonerError;
use crate::graph::Graph;
use std::fmt::Debug;

/// A reasoner that can be attached to a store.
///
/// `apply` adds the inferred triples to the graph it reads from. `apply_to`
/// leaves `input` untouched and writes the inferred triples into `output`.
pub trait InferenceEngine: Send + Sync + Debug {
    fn name(&self) -> &str;

    fn apply(&self, graph: &mut Graph) -> Result<(), ReasonerError>;

    fn apply_to(&self, input: &Graph, output: &mut Graph) -> Result<(), ReasonerError>;
}
