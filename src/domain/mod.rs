//! Domain layer: domain nodes, child resolution and the view tree
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod error;
pub mod model;
pub mod resolver;
pub mod view;

pub use builder::ViewTreeBuilder;
pub use error::{TreeError, TreeResult};
pub use model::{child_list, ChildList, DomainNode, NodeRef, Producer, Value};
pub use resolver::{resolve_children, Resolved};
pub use view::{NodeId, ViewNode, ViewTree};
