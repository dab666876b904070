// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Merge orchestration from parsed targets to the canonical target list.

use indexmap::{IndexMap, map::Entry};
use tracing::{debug, info};

use crate::{
    accumulator::TargetAccumulator,
    model::{Endpoint, Target},
    registry::SinkRegistry,
};

/// Collapses duplicate targets, queries and sinks into one canonical tree.
///
/// The builder runs in two phases. During accumulation [`add`](Self::add)
/// and [`add_all`](Self::add_all) fold targets into per-endpoint state. A
/// single call to [`build`](Self::build) then consumes the builder and emits
/// the immutable result, so accumulating after a build is rejected at
/// compile time.
///
/// Output order is the order in which each endpoint, selector and sink was
/// first seen, which makes the result deterministic for a given input.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use confmerge::{Endpoint, Sink, Target, TargetListBuilder};
///
/// let first = Target::builder(Endpoint::new("app-1", 9999,),).add_sink(Sink::new("stdout",),).build();
/// let second = Target::builder(Endpoint::new("app-1", 9999,),).add_sink(Sink::new("stdout",),).build();
///
/// let mut builder = TargetListBuilder::new();
/// builder.add_all([&first, &second,],);
/// let merged = builder.build();
///
/// assert_eq!(merged.len(), 1);
/// assert!(Arc::ptr_eq(&merged[0].sinks()[0], &first.sinks()[0]));
/// ```
#[derive(Debug, Default,)]
pub struct TargetListBuilder
{
    targets:  IndexMap<Endpoint, TargetAccumulator,>,
    registry: SinkRegistry,
}

impl TargetListBuilder
{
    /// Creates an empty builder.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Folds one target into the accumulated state.
    pub fn add(&mut self, target: &Target,)
    {
        let accumulator = match self.targets.entry(target.endpoint().clone(),) {
            Entry::Occupied(entry,) => {
                debug!("Merging duplicate target {}", target.endpoint());
                entry.into_mut()
            }
            Entry::Vacant(entry,) => {
                debug!("Registering target {}", target.endpoint());
                let endpoint = entry.key().clone();
                entry.insert(TargetAccumulator::new(endpoint,),)
            }
        };

        accumulator.add_queries(target.queries(), &mut self.registry,);
        accumulator.add_sinks(target.sinks(), &mut self.registry,);
    }

    /// Folds every target yielded by `targets`, in iteration order.
    pub fn add_all<'a, I,>(&mut self, targets: I,)
    where
        I: IntoIterator<Item = &'a Target,>,
    {
        for target in targets {
            self.add(target,);
        }
    }

    /// Number of distinct targets accumulated so far.
    pub fn len(&self,) -> usize
    {
        self.targets.len()
    }

    /// Returns `true` when nothing has been added.
    pub fn is_empty(&self,) -> bool
    {
        self.targets.is_empty()
    }

    /// Number of distinct sinks seen so far, at any scope.
    pub fn distinct_sinks(&self,) -> usize
    {
        self.registry.len()
    }

    /// Emits the merged targets in first-seen order.
    pub fn build(self,) -> Vec<Target,>
    {
        let mut queries = 0;
        let mut targets = Vec::with_capacity(self.targets.len(),);
        for accumulator in self.targets.values() {
            debug!(
                "Emitting target {} with {} queries and {} sinks",
                accumulator.endpoint(),
                accumulator.query_count(),
                accumulator.sink_count()
            );
            queries += accumulator.query_count();
            targets.push(accumulator.build(),);
        }

        info!(
            "Merged configuration into {} targets, {} queries and {} distinct sinks",
            targets.len(),
            queries,
            self.registry.len()
        );
        targets
    }
}
