/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::algebra::{GraphPattern, GraphTarget, Query, QueryForm, QueryResult, TriplePattern};
use crate::context::EvaluationContext;
use crate::error::{ParseError, StoreError, StoreResult};
use crate::query_engine::construct;
use log::debug;
use shared::graph::{write_graph, Graph};
use shared::graph_collection::GraphName;
use shared::node::Iri;
use shared::triple::Triple;

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateCommand {
    /// `graph: None` is the default graph.
    InsertData { graph: GraphName, triples: Vec<Triple> },
    DeleteData { graph: GraphName, triples: Vec<Triple> },
    /// DELETE/INSERT ... WHERE. Every solution is computed before anything changes.
    Modify {
        graph: GraphName,
        delete: Vec<TriplePattern>,
        insert: Vec<TriplePattern>,
        pattern: GraphPattern,
    },
    Clear { graph: GraphName },
    Create { graph: Iri, silent: bool },
    Drop { graph: GraphName, silent: bool },
}

/// Commands applied in order; each one sees the effects of those before it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateCommandSet {
    commands: Vec<UpdateCommand>,
}

impl UpdateCommandSet {
    pub fn new(commands: Vec<UpdateCommand>) -> Self {
        UpdateCommandSet { commands }
    }

    pub fn push(&mut self, command: UpdateCommand) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UpdateCommand> {
        self.commands.iter()
    }
}

impl FromIterator<UpdateCommand> for UpdateCommandSet {
    fn from_iter<I: IntoIterator<Item = UpdateCommand>>(iter: I) -> Self {
        UpdateCommandSet::new(iter.into_iter().collect())
    }
}

/// Turns update text into commands. Implemented outside this crate.
pub trait UpdateParser {
    fn parse_update(&self, text: &str) -> Result<UpdateCommandSet, ParseError>;
}

pub(crate) fn apply(command: &UpdateCommand, context: &mut EvaluationContext<'_>) -> StoreResult<()> {
    match command {
        UpdateCommand::InsertData { graph, triples } => insert(context, graph, triples.iter().cloned()),
        UpdateCommand::DeleteData { graph, triples } => {
            delete(context, graph, triples);
            Ok(())
        }
        UpdateCommand::Modify {
            graph,
            delete: delete_template,
            insert: insert_template,
            pattern,
        } => {
            if !insert_template.is_empty() {
                writable(context, graph)?;
            }
            if graph.is_some() && !context.store.has_graph(graph) {
                debug!("Modify targets a missing graph, nothing to match");
                return Ok(());
            }
            let pattern = match graph {
                Some(iri) => GraphPattern::graph(GraphTarget::Named(iri.clone()), pattern.clone()),
                None => pattern.clone(),
            };
            let query = Query {
                form: QueryForm::Select {
                    variables: None,
                    distinct: false,
                },
                dataset: None,
                pattern,
            };
            let engine = context.store.query_engine()?;
            let solutions = match engine.evaluate(&query, context)? {
                QueryResult::Solutions(solutions) => solutions.rows,
                _ => return Err(StoreError::Update("WHERE clause did not produce solutions".to_string())),
            };
            let removed = construct(delete_template, &solutions);
            let added = construct(insert_template, &solutions);
            debug!(
                "Modify matched {} solution(s): -{} +{}",
                solutions.len(),
                removed.len(),
                added.len()
            );
            let removed: Vec<Triple> = removed.triples().cloned().collect();
            delete(context, graph, &removed);
            insert(context, graph, added.triples().cloned())
        }
        UpdateCommand::Clear { graph } => {
            if let Some(target) = context.store.graph(graph) {
                write_graph(&target).clear();
            }
            Ok(())
        }
        UpdateCommand::Create { graph, silent } => {
            let name = Some(graph.clone());
            if context.store.has_graph(&name) {
                return if *silent {
                    Ok(())
                } else {
                    Err(StoreError::Update(format!("graph <{}> already exists", graph)))
                };
            }
            context.store.add_graph(Graph::named(graph.clone()), false)?;
            Ok(())
        }
        UpdateCommand::Drop { graph, silent } => {
            if context.store.remove_graph(graph) || *silent {
                Ok(())
            } else {
                Err(StoreError::Update(match graph {
                    Some(iri) => format!("graph <{}> does not exist", iri),
                    None => "the default graph does not exist".to_string(),
                }))
            }
        }
    }
}

fn insert<I>(context: &mut EvaluationContext<'_>, graph: &GraphName, triples: I) -> StoreResult<()>
where
    I: IntoIterator<Item = Triple>,
{
    writable(context, graph)?;
    match context.store.graph(graph) {
        Some(target) => {
            write_graph(&target).assert_all(triples);
        }
        None => {
            let mut created = Graph::with_name(graph.clone());
            created.assert_all(triples);
            context.store.add_graph(created, true)?;
        }
    }
    Ok(())
}

/// The inference graph only receives triples from reasoners.
fn writable(context: &EvaluationContext<'_>, graph: &GraphName) -> StoreResult<()> {
    match graph {
        Some(name) if name == context.store.inference_graph_iri() => Err(StoreError::ReservedGraphIri(name.clone())),
        _ => Ok(()),
    }
}

fn delete(context: &mut EvaluationContext<'_>, graph: &GraphName, triples: &[Triple]) {
    if let Some(target) = context.store.graph(graph) {
        write_graph(&target).retract_all(triples);
    }
}
