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
use crate::triple::Triple;
use rustc_hash::FxHashSet;

/// A predicate over nodes or triples.
pub trait Selector<T>: Sync {
    fn accepts(&self, item: &T) -> bool;
}

impl<T, F> Selector<T> for F
where
    F: Fn(&T) -> bool + Sync,
{
    fn accepts(&self, item: &T) -> bool {
        self(item)
    }
}

/// A selector whose behaviour depends on the output of an upstream stage.
///
/// It must be initialised with the upstream candidates before it accepts anything.
pub trait DependentSelector<T>: Selector<T> {
    fn initialise(&mut self, candidates: &[T]);
    fn is_initialised(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnySelector;

impl<T> Selector<T> for AnySelector {
    fn accepts(&self, _item: &T) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoneSelector;

impl<T> Selector<T> for NoneSelector {
    fn accepts(&self, _item: &T) -> bool {
        false
    }
}

/// Exactly one node.
#[derive(Debug, Clone)]
pub struct NodeSelector(pub Node);

impl Selector<Node> for NodeSelector {
    fn accepts(&self, item: &Node) -> bool {
        item == &self.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IriSelector;

impl Selector<Node> for IriSelector {
    fn accepts(&self, item: &Node) -> bool {
        item.is_iri()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralSelector;

impl Selector<Node> for LiteralSelector {
    fn accepts(&self, item: &Node) -> bool {
        item.is_literal()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BlankNodeSelector;

impl Selector<Node> for BlankNodeSelector {
    fn accepts(&self, item: &Node) -> bool {
        item.is_blank()
    }
}

/// Matches triples position by position; `None` is a wildcard.
#[derive(Debug, Clone, Default)]
pub struct TriplePatternSelector {
    pub subject: Option<Node>,
    pub predicate: Option<Node>,
    pub object: Option<Node>,
}

impl TriplePatternSelector {
    pub fn new(subject: Option<Node>, predicate: Option<Node>, object: Option<Node>) -> Self {
        TriplePatternSelector {
            subject,
            predicate,
            object,
        }
    }
}

impl Selector<Triple> for TriplePatternSelector {
    fn accepts(&self, item: &Triple) -> bool {
        self.subject.as_ref().map_or(true, |s| item.has_subject(s))
            && self.predicate.as_ref().map_or(true, |p| item.has_predicate(p))
            && self.object.as_ref().map_or(true, |o| item.has_object(o))
    }
}

#[derive(Debug, Clone)]
pub struct InvolvesSelector(pub Node);

impl Selector<Triple> for InvolvesSelector {
    fn accepts(&self, item: &Triple) -> bool {
        item.involves(&self.0)
    }
}

#[derive(Debug, Clone, Default)]
enum SelectorState {
    #[default]
    Pending,
    Ready(FxHashSet<Node>),
}

impl SelectorState {
    fn seen(&self, node: &Node) -> bool {
        match self {
            SelectorState::Pending => false,
            SelectorState::Ready(nodes) => nodes.contains(node),
        }
    }

    fn is_ready(&self) -> bool {
        matches!(self, SelectorState::Ready(_))
    }
}

/// Accepts triples whose subject was a subject of an upstream triple.
#[derive(Debug, Clone, Default)]
pub struct SubjectSeenSelector {
    state: SelectorState,
}

impl SubjectSeenSelector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Selector<Triple> for SubjectSeenSelector {
    fn accepts(&self, item: &Triple) -> bool {
        self.state.seen(item.subject())
    }
}

impl DependentSelector<Triple> for SubjectSeenSelector {
    fn initialise(&mut self, candidates: &[Triple]) {
        self.state = SelectorState::Ready(candidates.iter().map(|t| t.subject().clone()).collect());
    }

    fn is_initialised(&self) -> bool {
        self.state.is_ready()
    }
}

/// Accepts triples whose subject was an object upstream: one hop along a path.
#[derive(Debug, Clone, Default)]
pub struct FollowObjectSelector {
    state: SelectorState,
}

impl FollowObjectSelector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Selector<Triple> for FollowObjectSelector {
    fn accepts(&self, item: &Triple) -> bool {
        self.state.seen(item.subject())
    }
}

impl DependentSelector<Triple> for FollowObjectSelector {
    fn initialise(&mut self, candidates: &[Triple]) {
        self.state = SelectorState::Ready(candidates.iter().map(|t| t.object().clone()).collect());
    }

    fn is_initialised(&self) -> bool {
        self.state.is_ready()
    }
}

/// Accepts triples whose subject or object was a subject or object upstream.
#[derive(Debug, Clone, Default)]
pub struct SharedNodeSelector {
    state: SelectorState,
}

impl SharedNodeSelector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Selector<Triple> for SharedNodeSelector {
    fn accepts(&self, item: &Triple) -> bool {
        self.state.seen(item.subject()) || self.state.seen(item.object())
    }
}

impl DependentSelector<Triple> for SharedNodeSelector {
    fn initialise(&mut self, candidates: &[Triple]) {
        let mut nodes = FxHashSet::default();
        for triple in candidates {
            nodes.insert(triple.subject().clone());
            nodes.insert(triple.object().clone());
        }
        self.state = SelectorState::Ready(nodes);
    }

    fn is_initialised(&self) -> bool {
        self.state.is_ready()
    }
}

/// Runs `first` over the base, then initialises every dependent stage with the
/// previous stage's output and scans the whole base again with it.
pub fn dependent_chain<T, F>(
    mut scan: F,
    first: &dyn Selector<T>,
    chain: &mut [&mut dyn DependentSelector<T>],
) -> Vec<T>
where
    F: FnMut(&dyn Selector<T>) -> Vec<T>,
{
    let mut results = scan(first);
    for stage in chain.iter_mut() {
        stage.initialise(&results);
        let stage: &dyn DependentSelector<T> = &**stage;
        results = scan(&|item: &T| stage.accepts(item));
    }
    results
}

/// Runs the first selector over the base; each later selector narrows the previous output.
pub fn independent_chain<T, F>(scan: F, chain: &[&dyn Selector<T>]) -> Vec<T>
where
    F: FnOnce(&dyn Selector<T>) -> Vec<T>,
{
    let Some((first, rest)) = chain.split_first() else {
        return Vec::new();
    };
    let mut results = scan(*first);
    for stage in rest {
        results.retain(|item| stage.accepts(item));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(local: &str) -> Node {
        Node::iri(&format!("http://example.org/{}", local)).unwrap()
    }

    fn base() -> Vec<Triple> {
        vec![
            Triple::new(iri("a"), iri("knows"), iri("b")),
            Triple::new(iri("b"), iri("knows"), iri("c")),
            Triple::new(iri("c"), iri("knows"), iri("d")),
            Triple::new(iri("a"), iri("age"), Node::integer(30)),
        ]
    }

    fn scan_of(base: &[Triple]) -> impl FnMut(&dyn Selector<Triple>) -> Vec<Triple> + '_ {
        move |selector: &dyn Selector<Triple>| base.iter().filter(|t| selector.accepts(t)).cloned().collect()
    }

    #[test]
    fn test_pending_dependent_selector_rejects_everything() {
        let selector = FollowObjectSelector::new();
        assert!(!selector.is_initialised());
        assert!(base().iter().all(|t| !selector.accepts(t)));
    }

    #[test]
    fn test_dependent_chain_follows_objects() {
        let base = base();
        let first = TriplePatternSelector::new(Some(iri("a")), Some(iri("knows")), None);
        let mut hop1 = FollowObjectSelector::new();
        let mut hop2 = FollowObjectSelector::new();
        let results = dependent_chain(scan_of(&base), &first, &mut [&mut hop1, &mut hop2]);
        assert_eq!(results, vec![Triple::new(iri("c"), iri("knows"), iri("d"))]);
        assert!(hop1.is_initialised());
    }

    #[test]
    fn test_dependent_chain_rescans_base() {
        let base = base();
        let first = TriplePatternSelector::new(None, Some(iri("knows")), Some(iri("b")));
        let mut same_subject = SubjectSeenSelector::new();
        let results = dependent_chain(scan_of(&base), &first, &mut [&mut same_subject]);
        // both triples about <a>, including the one the first stage did not select
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_empty_dependent_list_is_first_stage() {
        let base = base();
        let first = InvolvesSelector(iri("b"));
        let results = dependent_chain(scan_of(&base), &first, &mut []);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_independent_chain_narrows() {
        let base = base();
        let knows = TriplePatternSelector::new(None, Some(iri("knows")), None);
        let involves_b = InvolvesSelector(iri("b"));
        let stage1 = independent_chain(scan_of(&base), &[&knows]);
        let both = independent_chain(scan_of(&base), &[&knows, &involves_b]);
        assert_eq!(stage1.len(), 3);
        assert_eq!(both.len(), 2);
        assert!(both.len() <= stage1.len());
        assert!(independent_chain(scan_of(&base), &[]).is_empty());
    }

    #[test]
    fn test_closures_are_selectors() {
        let literal_object = |t: &Triple| t.object().is_literal();
        assert_eq!(base().iter().filter(|t| literal_object.accepts(*t)).count(), 1);
        assert!(IriSelector.accepts(&iri("a")));
        assert!(!LiteralSelector.accepts(&iri("a")));
        assert!(NodeSelector(iri("a")).accepts(&iri("a")));
        assert!(!Selector::<Node>::accepts(&NoneSelector, &iri("a")));
    }
}
