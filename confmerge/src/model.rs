// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Identity keys and immutable configuration entities.
//!
//! Three value types carry identity: [`Endpoint`] identifies a target,
//! [`Selector`] identifies a query within its target, and [`Sink`] is its own
//! key. All of them implement `Eq` and `Hash` over every field, which is what
//! the merge relies on to collapse duplicates. [`Query`] and [`Target`] are
//! assembled through builders and expose read-only accessors only.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    hash::{Hash, Hasher},
    mem,
    sync::Arc,
};

use serde::{Deserialize, Serialize};

/// Connection identity of a monitored target.
///
/// Two targets whose endpoints compare equal are the same target, whatever
/// queries or sinks they declare.
///
/// # Examples
///
/// ```
/// use confmerge::Endpoint;
///
/// let endpoint = Endpoint::new("app-1", 9999,).with_alias("app",);
/// assert_eq!(endpoint.to_string(), "app (app-1:9999)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize,)]
pub struct Endpoint
{
    /// Host name or address of the monitored process.
    pub host:  String,
    /// Port of the management interface.
    pub port:  u16,
    /// Optional logical name used by sinks when naming series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String,>,
    /// Optional full service URL overriding host and port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url:   Option<String,>,
}

impl Endpoint
{
    /// Creates an endpoint without alias or URL.
    pub fn new<H,>(host: H, port: u16,) -> Self
    where
        H: Into<String,>,
    {
        Self {
            host: host.into(),
            port,
            alias: None,
            url: None,
        }
    }

    /// Sets the logical alias.
    pub fn with_alias<A,>(mut self, alias: A,) -> Self
    where
        A: Into<String,>,
    {
        self.alias = Some(alias.into(),);
        self
    }

    /// Sets the service URL.
    pub fn with_url<U,>(mut self, url: U,) -> Self
    where
        U: Into<String,>,
    {
        self.url = Some(url.into(),);
        self
    }
}

impl fmt::Display for Endpoint
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        match self.alias.as_deref() {
            Some(alias,) => write!(f, "{alias} ({}:{})", self.host, self.port),
            None => write!(f, "{}:{}", self.host, self.port),
        }
    }
}

/// Selection criteria of a query; the identity of a query under its target.
///
/// Attribute and type-name lists are stored as ordered sets so that the
/// order in which a configuration lists them does not change identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize,)]
pub struct Selector
{
    /// Object name pattern the query resolves against.
    pub object:       String,
    /// Attributes read from every matched object. Empty means all.
    pub attributes:   BTreeSet<String,>,
    /// Optional alias replacing the object name in emitted series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_alias: Option<String,>,
    /// Object name keys whose values are appended to series names.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub type_names:   BTreeSet<String,>,
}

impl Selector
{
    /// Creates a selector matching `object` with every attribute.
    pub fn new<O,>(object: O,) -> Self
    where
        O: Into<String,>,
    {
        Self {
            object:       object.into(),
            attributes:   BTreeSet::new(),
            result_alias: None,
            type_names:   BTreeSet::new(),
        }
    }

    /// Restricts the selector to the given attributes.
    pub fn with_attributes<I, S,>(mut self, attributes: I,) -> Self
    where
        I: IntoIterator<Item = S,>,
        S: Into<String,>,
    {
        self.attributes.extend(attributes.into_iter().map(Into::into,),);
        self
    }

    /// Sets the result alias.
    pub fn with_result_alias<A,>(mut self, alias: A,) -> Self
    where
        A: Into<String,>,
    {
        self.result_alias = Some(alias.into(),);
        self
    }

    /// Adds type names appended to series names.
    pub fn with_type_names<I, S,>(mut self, type_names: I,) -> Self
    where
        I: IntoIterator<Item = S,>,
        S: Into<String,>,
    {
        self.type_names.extend(type_names.into_iter().map(Into::into,),);
        self
    }
}

/// Value of a free-form sink setting.
///
/// Any YAML or JSON value is accepted. Floats compare and hash by their bit
/// pattern, so `NaN` equals itself and `0.0` differs from `-0.0`; this keeps
/// equality and hashing total and consistent with each other.
#[derive(Debug, Clone, Serialize, Deserialize,)]
#[serde(untagged)]
pub enum SettingValue
{
    /// Explicit null.
    Null,
    /// Boolean flag.
    Bool(bool,),
    /// Signed integer.
    Integer(i64,),
    /// Unsigned integer larger than `i64::MAX`.
    Unsigned(u64,),
    /// Floating point number.
    Float(f64,),
    /// Free text.
    Text(String,),
    /// Sequence of values.
    List(Vec<SettingValue,>,),
    /// Nested options keyed by name.
    Map(BTreeMap<String, SettingValue,>,),
}

impl PartialEq for SettingValue
{
    fn eq(&self, other: &Self,) -> bool
    {
        match (self, other,) {
            (Self::Null, Self::Null,) => true,
            (Self::Bool(left,), Self::Bool(right,),) => left == right,
            (Self::Integer(left,), Self::Integer(right,),) => left == right,
            (Self::Unsigned(left,), Self::Unsigned(right,),) => left == right,
            (Self::Float(left,), Self::Float(right,),) => left.to_bits() == right.to_bits(),
            (Self::Text(left,), Self::Text(right,),) => left == right,
            (Self::List(left,), Self::List(right,),) => left == right,
            (Self::Map(left,), Self::Map(right,),) => left == right,
            _ => false,
        }
    }
}

impl Eq for SettingValue {}

impl Hash for SettingValue
{
    fn hash<H: Hasher,>(&self, state: &mut H,)
    {
        mem::discriminant(self,).hash(state,);
        match self {
            Self::Null => {}
            Self::Bool(value,) => value.hash(state,),
            Self::Integer(value,) => value.hash(state,),
            Self::Unsigned(value,) => value.hash(state,),
            Self::Float(value,) => value.to_bits().hash(state,),
            Self::Text(value,) => value.hash(state,),
            Self::List(values,) => values.hash(state,),
            Self::Map(values,) => values.hash(state,),
        }
    }
}

impl From<bool,> for SettingValue
{
    fn from(value: bool,) -> Self
    {
        Self::Bool(value,)
    }
}

impl From<i64,> for SettingValue
{
    fn from(value: i64,) -> Self
    {
        Self::Integer(value,)
    }
}

impl From<u64,> for SettingValue
{
    /// Values that fit `i64` become [`SettingValue::Integer`], matching what
    /// deserialization produces for the same number.
    fn from(value: u64,) -> Self
    {
        i64::try_from(value,).map_or(Self::Unsigned(value,), Self::Integer,)
    }
}

impl From<f64,> for SettingValue
{
    fn from(value: f64,) -> Self
    {
        Self::Float(value,)
    }
}

impl From<&str,> for SettingValue
{
    fn from(value: &str,) -> Self
    {
        Self::Text(value.to_owned(),)
    }
}

impl From<String,> for SettingValue
{
    fn from(value: String,) -> Self
    {
        Self::Text(value,)
    }
}

impl From<Vec<SettingValue,>,> for SettingValue
{
    fn from(values: Vec<SettingValue,>,) -> Self
    {
        Self::List(values,)
    }
}

impl From<BTreeMap<String, SettingValue,>,> for SettingValue
{
    fn from(values: BTreeMap<String, SettingValue,>,) -> Self
    {
        Self::Map(values,)
    }
}

/// Destination that receives query results.
///
/// The whole value is the sink's identity: two sinks are the same sink only
/// when every field, including free-form settings, compares equal. Keys not
/// recognised as dedicated fields are collected into [`Sink::settings`].
///
/// # Examples
///
/// ```
/// use confmerge::Sink;
///
/// let graphite = Sink::new("graphite",).with_host("metrics",).with_port(2003,);
/// assert_eq!(graphite, Sink::new("graphite",).with_port(2003,).with_host("metrics",));
/// assert_ne!(graphite, graphite.clone().with_setting("prefix", "prod",));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,)]
pub struct Sink
{
    /// Writer implementation name, e.g. `graphite` or `stdout`.
    #[serde(rename = "type")]
    pub kind:       String,
    /// Optional destination host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host:       Option<String,>,
    /// Optional destination port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port:       Option<u16,>,
    /// Object name keys this writer appends to series names.
    #[serde(default, alias = "typeNames", skip_serializing_if = "BTreeSet::is_empty")]
    pub type_names: BTreeSet<String,>,
    /// Remaining writer-specific options.
    #[serde(flatten)]
    pub settings:   BTreeMap<String, SettingValue,>,
}

impl Sink
{
    /// Creates a sink of the given kind with no options.
    pub fn new<K,>(kind: K,) -> Self
    where
        K: Into<String,>,
    {
        Self {
            kind:       kind.into(),
            host:       None,
            port:       None,
            type_names: BTreeSet::new(),
            settings:   BTreeMap::new(),
        }
    }

    /// Sets the destination host.
    pub fn with_host<H,>(mut self, host: H,) -> Self
    where
        H: Into<String,>,
    {
        self.host = Some(host.into(),);
        self
    }

    /// Sets the destination port.
    pub fn with_port(mut self, port: u16,) -> Self
    {
        self.port = Some(port,);
        self
    }

    /// Adds a type name.
    pub fn with_type_name<T,>(mut self, type_name: T,) -> Self
    where
        T: Into<String,>,
    {
        self.type_names.insert(type_name.into(),);
        self
    }

    /// Sets a writer-specific option, replacing any previous value.
    pub fn with_setting<K, V,>(mut self, key: K, value: V,) -> Self
    where
        K: Into<String,>,
        V: Into<SettingValue,>,
    {
        self.settings.insert(key.into(), value.into(),);
        self
    }
}

/// Immutable query together with the sinks attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct Query
{
    #[serde(flatten)]
    selector: Selector,
    sinks:    Vec<Arc<Sink,>,>,
}

impl Query
{
    /// Starts building a query for `selector`.
    pub fn builder(selector: Selector,) -> QueryBuilder
    {
        QueryBuilder {
            selector,
            sinks: Vec::new(),
        }
    }

    /// Identity of the query.
    pub fn selector(&self,) -> &Selector
    {
        &self.selector
    }

    /// Sinks receiving results of this query.
    pub fn sinks(&self,) -> &[Arc<Sink,>]
    {
        &self.sinks
    }
}

/// Incremental constructor for [`Query`].
#[derive(Debug, Clone,)]
pub struct QueryBuilder
{
    selector: Selector,
    sinks:    Vec<Arc<Sink,>,>,
}

impl QueryBuilder
{
    /// Attaches one sink.
    pub fn add_sink<S,>(mut self, sink: S,) -> Self
    where
        S: Into<Arc<Sink,>,>,
    {
        self.sinks.push(sink.into(),);
        self
    }

    /// Attaches every sink yielded by `sinks`, preserving order.
    pub fn add_sinks<I,>(mut self, sinks: I,) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arc<Sink,>,>,
    {
        self.sinks.extend(sinks.into_iter().map(Into::into,),);
        self
    }

    /// Finishes the query.
    pub fn build(self,) -> Query
    {
        Query {
            selector: self.selector,
            sinks:    self.sinks,
        }
    }
}

/// Immutable monitored target: endpoint, queries and top-level sinks.
///
/// The same type describes parsed input and merged output. After a merge
/// every [`Sink`] reachable from the returned targets is shared: equal sinks
/// are the same allocation, so `Arc::ptr_eq` can be used as a resource key.
///
/// # Examples
///
/// ```
/// use confmerge::{Endpoint, Query, Selector, Sink, Target};
///
/// let target = Target::builder(Endpoint::new("app-1", 9999,),)
///     .add_query(
///         Query::builder(Selector::new("java.lang:type=Memory",),)
///             .add_sink(Sink::new("stdout",),)
///             .build(),
///     )
///     .add_sink(Sink::new("graphite",).with_port(2003,),)
///     .build();
/// assert_eq!(target.queries().len(), 1);
/// assert_eq!(target.sinks().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct Target
{
    #[serde(flatten)]
    endpoint: Endpoint,
    queries:  Vec<Query,>,
    sinks:    Vec<Arc<Sink,>,>,
}

impl Target
{
    /// Starts building a target for `endpoint`.
    pub fn builder(endpoint: Endpoint,) -> TargetBuilder
    {
        TargetBuilder {
            endpoint,
            queries: Vec::new(),
            sinks: Vec::new(),
        }
    }

    /// Identity of the target.
    pub fn endpoint(&self,) -> &Endpoint
    {
        &self.endpoint
    }

    /// Queries executed against the target.
    pub fn queries(&self,) -> &[Query]
    {
        &self.queries
    }

    /// Sinks receiving results of every query of the target.
    pub fn sinks(&self,) -> &[Arc<Sink,>]
    {
        &self.sinks
    }
}

/// Incremental constructor for [`Target`].
#[derive(Debug, Clone,)]
pub struct TargetBuilder
{
    endpoint: Endpoint,
    queries:  Vec<Query,>,
    sinks:    Vec<Arc<Sink,>,>,
}

impl TargetBuilder
{
    /// Adds one query.
    pub fn add_query(mut self, query: Query,) -> Self
    {
        self.queries.push(query,);
        self
    }

    /// Adds every query yielded by `queries`, preserving order.
    pub fn add_queries<I,>(mut self, queries: I,) -> Self
    where
        I: IntoIterator<Item = Query,>,
    {
        self.queries.extend(queries,);
        self
    }

    /// Attaches one top-level sink.
    pub fn add_sink<S,>(mut self, sink: S,) -> Self
    where
        S: Into<Arc<Sink,>,>,
    {
        self.sinks.push(sink.into(),);
        self
    }

    /// Attaches every top-level sink yielded by `sinks`, preserving order.
    pub fn add_sinks<I,>(mut self, sinks: I,) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arc<Sink,>,>,
    {
        self.sinks.extend(sinks.into_iter().map(Into::into,),);
        self
    }

    /// Finishes the target.
    pub fn build(self,) -> Target
    {
        Target {
            endpoint: self.endpoint,
            queries:  self.queries,
            sinks:    self.sinks,
        }
    }
}
