//! Domain nodes: caller-owned records displayed by the tree.
//!
//! A [`DomainNode`] is a bag of named attributes. One of those attributes
//! (configured by `children_key`) holds the node's children, either as a
//! concrete list or as a [`Producer`] computed on demand.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a domain node. Identity is pointer identity.
pub type NodeRef = Rc<DomainNode>;

/// Ordered, shared list of child nodes.
pub type ChildList = Rc<[NodeRef]>;

/// Lazily computes a node's children. Invoked with the owning node as receiver.
#[derive(Clone)]
pub struct Producer(Rc<dyn Fn(&DomainNode) -> ChildList>);

impl Producer {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&DomainNode) -> ChildList + 'static,
    {
        Self(Rc::new(f))
    }

    /// Run the producer against `receiver`. Never cached.
    pub fn produce(&self, receiver: &DomainNode) -> ChildList {
        (self.0)(receiver)
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Producer(..)")
    }
}

/// Attribute value of a domain node.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(ChildList),
    Producer(Producer),
}

impl Value {
    /// Values that count as "no children" when found under the children key.
    pub fn is_falsy(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Integer(i) => *i == 0,
            Value::Float(f) => *f == 0.0 || f.is_nan(),
            Value::String(s) => s.is_empty(),
            Value::List(_) | Value::Producer(_) => false,
        }
    }

    /// Short type name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Producer(_) => "producer",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::List(items) => write!(f, "[{} nodes]", items.len()),
            Value::Producer(_) => f.write_str("<producer>"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<ChildList> for Value {
    fn from(v: ChildList) -> Self {
        Value::List(v)
    }
}

impl From<Vec<NodeRef>> for Value {
    fn from(v: Vec<NodeRef>) -> Self {
        Value::List(v.into())
    }
}

impl From<Producer> for Value {
    fn from(v: Producer) -> Self {
        Value::Producer(v)
    }
}

/// Caller-owned data item shown in the tree. Never mutated by the view layer.
#[derive(Debug, Clone, Default)]
pub struct DomainNode {
    attributes: BTreeMap<String, Value>,
}

impl DomainNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// String attribute, `None` if absent or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_ref(self) -> NodeRef {
        Rc::new(self)
    }
}

/// Collect nodes into a shared child list.
pub fn child_list<I>(nodes: I) -> ChildList
where
    I: IntoIterator<Item = NodeRef>,
{
    nodes.into_iter().collect()
}
