// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Working state collected for one distinct target while a merge runs.
//!
//! A [`TargetAccumulator`] exists per distinct [`Endpoint`] and owns a
//! [`QueryAccumulator`] holding one sink set per distinct [`Selector`]. Both
//! receive the merge-wide [`SinkRegistry`] on every call that may record a
//! sink, so that equal sinks collapse no matter which target or query
//! declared them.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::{
    model::{Endpoint, Query, Selector, Sink, Target},
    registry::SinkRegistry,
};

/// Union of sinks per distinct query selector, scoped to one target.
#[derive(Debug, Default,)]
pub struct QueryAccumulator
{
    queries: IndexMap<Selector, IndexSet<Arc<Sink,>,>,>,
}

impl QueryAccumulator
{
    /// Creates an empty accumulator.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Folds `query` into the accumulated state.
    ///
    /// A selector seen for the first time starts with an empty sink set.
    /// Every sink of the query is canonicalized before insertion.
    pub fn add(&mut self, query: &Query, registry: &mut SinkRegistry,)
    {
        let sinks = self.queries.entry(query.selector().clone(),).or_default();
        for sink in query.sinks() {
            sinks.insert(registry.canonicalize(Arc::clone(sink,),),);
        }
    }

    /// Number of distinct selectors collected so far.
    pub fn selector_count(&self,) -> usize
    {
        self.queries.len()
    }

    /// Emits one immutable query per selector in first-seen order.
    pub fn build(&self,) -> Vec<Query,>
    {
        self.queries
            .iter()
            .map(|(selector, sinks,)| {
                Query::builder(selector.clone(),).add_sinks(sinks.iter().cloned(),).build()
            },)
            .collect()
    }
}

/// Queries and top-level sinks collected for one endpoint.
#[derive(Debug,)]
pub struct TargetAccumulator
{
    endpoint: Endpoint,
    queries:  QueryAccumulator,
    sinks:    IndexSet<Arc<Sink,>,>,
}

impl TargetAccumulator
{
    /// Creates an empty accumulator for `endpoint`.
    pub fn new(endpoint: Endpoint,) -> Self
    {
        Self {
            endpoint,
            queries: QueryAccumulator::new(),
            sinks: IndexSet::new(),
        }
    }

    /// Endpoint this accumulator collects for.
    pub fn endpoint(&self,) -> &Endpoint
    {
        &self.endpoint
    }

    /// Merges `queries` into the per-selector sink sets.
    pub fn add_queries<'a, I,>(&mut self, queries: I, registry: &mut SinkRegistry,)
    where
        I: IntoIterator<Item = &'a Query,>,
    {
        for query in queries {
            self.queries.add(query, registry,);
        }
    }

    /// Adds canonicalized `sinks` to the top-level sink set.
    ///
    /// Re-adding a sink that is already present is a no-op.
    pub fn add_sinks<'a, I,>(&mut self, sinks: I, registry: &mut SinkRegistry,)
    where
        I: IntoIterator<Item = &'a Arc<Sink,>,>,
    {
        for sink in sinks {
            self.sinks.insert(registry.canonicalize(Arc::clone(sink,),),);
        }
    }

    /// Number of distinct queries collected so far.
    pub fn query_count(&self,) -> usize
    {
        self.queries.selector_count()
    }

    /// Number of distinct top-level sinks collected so far.
    pub fn sink_count(&self,) -> usize
    {
        self.sinks.len()
    }

    /// Emits the merged target.
    pub fn build(&self,) -> Target
    {
        Target::builder(self.endpoint.clone(),)
            .add_queries(self.queries.build(),)
            .add_sinks(self.sinks.iter().cloned(),)
            .build()
    }
}
