// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Configuration document types describing monitoring targets.
//!
//! The types in this module mirror the structure of the YAML and JSON
//! documents consumed by the CLI. Field aliases accept the camel-case
//! spelling common in existing monitoring configurations. Entries convert
//! into model [`Target`] values without checking the semantics of any field.

use serde::{Deserialize, Serialize};

use crate::model::{Endpoint, Query, Selector, Sink, Target};

/// Root configuration document listing monitoring targets.
///
/// # Examples
///
/// ```
/// use confmerge::ConfigDocument;
///
/// let yaml = r#"
/// servers:
///   - host: app-1
///     port: 9999
///     queries:
///       - obj: "java.lang:type=Memory"
///         attr: [HeapMemoryUsage]
///         outputWriters:
///           - type: stdout
/// "#;
/// let document: ConfigDocument = serde_yaml::from_str(yaml,).expect("valid configuration",);
/// assert_eq!(document.targets.len(), 1);
/// assert_eq!(document.targets[0].queries[0].sinks.len(), 1);
/// ```
#[derive(Debug, Deserialize, Serialize, Default, Clone,)]
pub struct ConfigDocument
{
    /// Targets declared by the document.
    #[serde(default, alias = "servers")]
    pub targets: Vec<TargetEntry,>,
}

impl ConfigDocument
{
    /// Converts every entry into a model target, preserving order.
    pub fn to_targets(&self,) -> Vec<Target,>
    {
        self.targets.iter().map(TargetEntry::to_target,).collect()
    }
}

/// Raw configuration entry describing a single target.
#[derive(Debug, Deserialize, Serialize, Clone,)]
pub struct TargetEntry
{
    /// Host name or address of the monitored process.
    pub host: String,

    /// Port of the management interface.
    pub port: u16,

    /// Optional logical name of the target.
    #[serde(default)]
    pub alias: Option<String,>,

    /// Optional full service URL.
    #[serde(default)]
    pub url: Option<String,>,

    /// Queries executed against the target.
    #[serde(default)]
    pub queries: Vec<QueryEntry,>,

    /// Sinks receiving results of every query of the target.
    #[serde(default, alias = "outputWriters", alias = "output_writers")]
    pub sinks: Vec<Sink,>,
}

impl TargetEntry
{
    /// Returns the identity of this entry.
    pub fn endpoint(&self,) -> Endpoint
    {
        Endpoint {
            host:  self.host.clone(),
            port:  self.port,
            alias: self.alias.clone(),
            url:   self.url.clone(),
        }
    }

    /// Builds the model target described by this entry.
    pub fn to_target(&self,) -> Target
    {
        Target::builder(self.endpoint(),)
            .add_queries(self.queries.iter().map(QueryEntry::to_query,),)
            .add_sinks(self.sinks.iter().cloned(),)
            .build()
    }
}

/// Raw configuration entry describing a query.
#[derive(Debug, Deserialize, Serialize, Clone,)]
pub struct QueryEntry
{
    /// Object name pattern.
    #[serde(alias = "obj")]
    pub object: String,

    /// Attributes to read; empty reads all of them.
    #[serde(default, alias = "attr")]
    pub attributes: Vec<String,>,

    /// Optional alias replacing the object name in emitted series.
    #[serde(default, alias = "resultAlias")]
    pub result_alias: Option<String,>,

    /// Object name keys appended to series names.
    #[serde(default, alias = "typeNames")]
    pub type_names: Vec<String,>,

    /// Sinks receiving results of this query only.
    #[serde(default, alias = "outputWriters", alias = "output_writers")]
    pub sinks: Vec<Sink,>,
}

impl QueryEntry
{
    /// Returns the identity of this entry.
    pub fn selector(&self,) -> Selector
    {
        let selector = Selector::new(self.object.clone(),)
            .with_attributes(self.attributes.iter().cloned(),)
            .with_type_names(self.type_names.iter().cloned(),);
        match self.result_alias.as_ref() {
            Some(alias,) => selector.with_result_alias(alias.clone(),),
            None => selector,
        }
    }

    /// Builds the model query described by this entry.
    pub fn to_query(&self,) -> Query
    {
        Query::builder(self.selector(),).add_sinks(self.sinks.iter().cloned(),).build()
    }
}

#[cfg(test)]
mod tests
{
    use super::{ConfigDocument, QueryEntry, TargetEntry};
    use crate::model::{Endpoint, Selector, Sink};

    fn query_entry() -> QueryEntry
    {
        QueryEntry {
            object:       "java.lang:type=GarbageCollector,name=*".to_owned(),
            attributes:   vec!["CollectionTime".to_owned(), "CollectionCount".to_owned()],
            result_alias: Some("gc".to_owned(),),
            type_names:   vec!["name".to_owned()],
            sinks:        vec![Sink::new("stdout",)],
        }
    }

    #[test]
    fn endpoint_carries_every_identity_field()
    {
        let entry = TargetEntry {
            host:    "app-1".to_owned(),
            port:    9999,
            alias:   Some("app".to_owned(),),
            url:     None,
            queries: Vec::new(),
            sinks:   Vec::new(),
        };

        assert_eq!(entry.endpoint(), Endpoint::new("app-1", 9999,).with_alias("app",));
    }

    #[test]
    fn selector_converts_lists_into_sets()
    {
        let selector = query_entry().selector();
        assert_eq!(
            selector,
            Selector::new("java.lang:type=GarbageCollector,name=*",)
                .with_attributes(["CollectionCount", "CollectionTime",],)
                .with_result_alias("gc",)
                .with_type_names(["name",],)
        );
    }

    #[test]
    fn to_target_keeps_queries_and_sinks_in_order()
    {
        let entry = TargetEntry {
            host:    "app-1".to_owned(),
            port:    9999,
            alias:   None,
            url:     None,
            queries: vec![query_entry()],
            sinks:   vec![Sink::new("graphite",), Sink::new("statsd",)],
        };

        let target = entry.to_target();
        assert_eq!(target.queries().len(), 1);
        assert_eq!(target.queries()[0].sinks().len(), 1);
        let kinds: Vec<&str,> = target.sinks().iter().map(|sink| sink.kind.as_str(),).collect();
        assert_eq!(kinds, ["graphite", "statsd"]);
    }

    #[test]
    fn missing_collections_default_to_empty()
    {
        let document: ConfigDocument =
            serde_yaml::from_str("targets:\n  - host: app-1\n    port: 9999\n",).expect("valid yaml",);

        let entry = &document.targets[0];
        assert!(entry.queries.is_empty());
        assert!(entry.sinks.is_empty());
        assert!(entry.alias.is_none());
    }

    #[test]
    fn empty_document_has_no_targets()
    {
        let document: ConfigDocument = serde_yaml::from_str("{}",).expect("valid yaml",);
        assert!(document.to_targets().is_empty());
    }

    #[test]
    fn json_aliases_are_accepted()
    {
        let json = r#"{
            "servers": [{
                "host": "app-1",
                "port": 9999,
                "queries": [{
                    "obj": "java.lang:type=Memory",
                    "attr": ["HeapMemoryUsage"],
                    "resultAlias": "memory",
                    "outputWriters": [{ "type": "graphite", "host": "metrics", "port": 2003 }]
                }]
            }]
        }"#;
        let document: ConfigDocument = serde_json::from_str(json,).expect("valid json",);

        let query = &document.targets[0].queries[0];
        assert_eq!(query.result_alias.as_deref(), Some("memory"));
        assert_eq!(query.sinks, vec![Sink::new("graphite").with_host("metrics").with_port(2003)]);
    }
}
