//! Child resolution: reads a node's children attribute.

use std::rc::Rc;

use tracing::trace;

use crate::config::Settings;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::model::{ChildList, DomainNode, Value};

/// Outcome of resolving a node's children attribute.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// Attribute absent or falsy.
    NoChildren,
    /// Attribute held a concrete list (shared, not copied).
    Eager(ChildList),
    /// Attribute held a producer; this is what it returned.
    Produced(ChildList),
}

impl Resolved {
    pub fn list(&self) -> Option<&ChildList> {
        match self {
            Resolved::NoChildren => None,
            Resolved::Eager(list) | Resolved::Produced(list) => Some(list),
        }
    }

    pub fn len(&self) -> usize {
        self.list().map_or(0, |l| l.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_produced(&self) -> bool {
        matches!(self, Resolved::Produced(_))
    }

    /// The resolved list, empty for `NoChildren`.
    pub fn into_list(self) -> ChildList {
        match self {
            Resolved::NoChildren => Rc::from(Vec::new()),
            Resolved::Eager(list) | Resolved::Produced(list) => list,
        }
    }
}

/// Resolve the children of `node` under `settings.children_key`.
///
/// Producers are re-invoked on every call so lazy sources can return fresh data.
pub fn resolve_children(node: &DomainNode, settings: &Settings) -> TreeResult<Resolved> {
    let key = settings.children_key.as_str();
    let resolved = match node.get(key) {
        None => Resolved::NoChildren,
        Some(value) if value.is_falsy() => Resolved::NoChildren,
        Some(Value::List(list)) => Resolved::Eager(Rc::clone(list)),
        Some(Value::Producer(producer)) => Resolved::Produced(producer.produce(node)),
        Some(other) => {
            return Err(TreeError::InvalidChildrenSpecification {
                key: key.to_string(),
                found: other.kind(),
            })
        }
    };
    trace!(key, count = resolved.len(), produced = resolved.is_produced(), "resolved children");
    Ok(resolved)
}
