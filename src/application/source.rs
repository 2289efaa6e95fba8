//! Domain sources: TOML documents and lazily listed directories.

use std::path::Path;

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::application::{IoResultExt, SourceError};
use crate::config::Settings;
use crate::domain::{ChildList, DomainNode, NodeRef, Producer, Value};

/// Parse a TOML document into a domain node.
///
/// The top-level table is the root node. Arrays of tables become child lists;
/// other arrays and nested tables are rejected.
pub fn parse_document(content: &str, origin: &Path) -> Result<NodeRef, SourceError> {
    let table: toml::Table = toml::from_str(content).map_err(|e| SourceError::Parse {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })?;
    node_from_table(table)
}

/// Read and parse a TOML document from disk.
#[instrument(level = "debug")]
pub fn load_document(path: &Path) -> Result<NodeRef, SourceError> {
    let content = std::fs::read_to_string(path).with_path_context("read document", path)?;
    parse_document(&content, path)
}

fn node_from_table(table: toml::Table) -> Result<NodeRef, SourceError> {
    let mut node = DomainNode::new();
    for (key, value) in table {
        let value = value_from_toml(&key, value)?;
        node.set(key, value);
    }
    Ok(node.into_ref())
}

fn value_from_toml(key: &str, value: toml::Value) -> Result<Value, SourceError> {
    let value = match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Integer(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(d) => Value::String(d.to_string()),
        toml::Value::Array(items) => {
            let nodes = items
                .into_iter()
                .map(|item| match item {
                    toml::Value::Table(t) => node_from_table(t),
                    other => Err(SourceError::Unsupported {
                        key: key.to_string(),
                        found: format!("array of {}", other.type_str()),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Value::from(nodes)
        }
        toml::Value::Table(_) => {
            return Err(SourceError::Unsupported {
                key: key.to_string(),
                found: "table".to_string(),
            })
        }
    };
    Ok(value)
}

/// Domain node for a filesystem path.
///
/// Directories get a [`Producer`] under the children key that lists their
/// entries one level deep, sorted by name, each time it is invoked.
pub fn directory_node(path: &Path, settings: &Settings) -> NodeRef {
    path_node(path, path.is_dir(), settings)
}

fn path_node(path: &Path, is_dir: bool, settings: &Settings) -> NodeRef {
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut node = DomainNode::new()
        .with(settings.label_key.clone(), label)
        .with("path", path.display().to_string())
        .with("kind", if is_dir { "dir" } else { "file" });

    if is_dir {
        let settings = settings.clone();
        node.set(
            settings.children_key.clone(),
            Producer::new(move |me| list_directory(me, &settings)),
        );
    }
    node.into_ref()
}

fn list_directory(me: &DomainNode, settings: &Settings) -> ChildList {
    let Some(dir) = me.get_str("path") else {
        warn!("directory node without a path attribute");
        return ChildList::from(Vec::new());
    };
    debug!(dir, "listing directory");

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(path_node(entry.path(), entry.file_type().is_dir(), settings)),
            Err(e) => {
                warn!(dir, error = %e, "skipping unreadable entry");
                None
            }
        })
        .collect()
}
