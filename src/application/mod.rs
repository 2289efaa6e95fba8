//! Application layer: tree controller and domain sources
//!
//! This layer drives the domain view tree and loads domain nodes from the outside world.

pub mod controller;
pub mod error;
pub mod error_ext;
pub mod source;

pub use controller::{Callback, TreeContext, TreeController, TreeOptions, Transition};
pub use error::{ApplicationError, ApplicationResult, SourceError};
pub use error_ext::IoResultExt;
pub use source::{directory_node, load_document, parse_document};
