//! Merging of monitoring target configurations into one canonical tree.
//!
//! Configuration for a fleet of monitored processes is usually spread over
//! many documents, and the same host, query or sink is often declared more
//! than once. The library collapses duplicates so that the merged output
//! holds every target exactly once, every query exactly once per target, and
//! every distinct sink as a single shared [`std::sync::Arc`] allocation that
//! downstream writers can use as a resource key.
//!
//! The merge core ([`TargetListBuilder`] and the accumulators beneath it)
//! is infallible and performs no I/O. Loader functions such as
//! [`load_merged`] read YAML or JSON documents and feed them through it.

mod accumulator;
mod builder;
mod config;
mod error;
mod loader;
mod model;
mod registry;

pub use accumulator::{QueryAccumulator, TargetAccumulator};
pub use builder::TargetListBuilder;
pub use config::{ConfigDocument, QueryEntry, TargetEntry};
pub use error::{Error, io_error, json_error, parse_error};
pub use loader::{
    Format, MergedDocument, collect_config_files, load_document, load_merged, merge_documents,
    parse_document,
};
pub use model::{
    Endpoint, Query, QueryBuilder, Selector, SettingValue, Sink, Target, TargetBuilder,
};
pub use registry::SinkRegistry;
