// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Canonical sink instances shared across a merge.

use std::sync::Arc;

use indexmap::IndexSet;

use crate::model::Sink;

/// Maps every distinct sink value to one shared allocation.
///
/// The registry only grows. Lookups hash the sink value, so an incoming
/// `Arc` that is a different allocation of an already seen value is
/// replaced by the first one recorded.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use confmerge::{Sink, SinkRegistry};
///
/// let mut registry = SinkRegistry::new();
/// let first = registry.canonicalize(Arc::new(Sink::new("stdout",),),);
/// let second = registry.canonicalize(Arc::new(Sink::new("stdout",),),);
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Debug, Default,)]
pub struct SinkRegistry
{
    sinks: IndexSet<Arc<Sink,>,>,
}

impl SinkRegistry
{
    /// Creates an empty registry.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Returns the canonical instance for `sink`.
    ///
    /// The first sink seen for a given value becomes canonical and is
    /// returned unchanged; later equal values resolve to it.
    pub fn canonicalize(&mut self, sink: Arc<Sink,>,) -> Arc<Sink,>
    {
        if let Some(existing,) = self.sinks.get(sink.as_ref(),) {
            return Arc::clone(existing,);
        }
        self.sinks.insert(Arc::clone(&sink,),);
        sink
    }

    /// Number of distinct sinks recorded.
    pub fn len(&self,) -> usize
    {
        self.sinks.len()
    }

    /// Returns `true` when no sink has been recorded.
    pub fn is_empty(&self,) -> bool
    {
        self.sinks.is_empty()
    }

    /// Canonical sinks in first-seen order.
    pub fn iter(&self,) -> impl Iterator<Item = &Arc<Sink,>,>
    {
        self.sinks.iter()
    }
}
