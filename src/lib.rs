//! Expandable tree view state.
//!
//! Wraps an arbitrary hierarchy of [`domain::DomainNode`]s into a parallel
//! view tree carrying presentation state (collapsed flag, selection, links),
//! without touching the original data.
//!
//! ```
//! use yatree::application::{TreeController, TreeOptions};
//! use yatree::domain::DomainNode;
//!
//! let root = DomainNode::new()
//!     .with("label", "parent1")
//!     .with("children", vec![DomainNode::new().with("label", "child").into_ref()])
//!     .into_ref();
//!
//! let mut ctl: TreeController<()> = TreeController::new(&root, TreeOptions::default())?;
//! let id = ctl.roots()[0];
//! ctl.expand(&(), id)?;
//! assert_eq!(ctl.visible().len(), 2);
//! # Ok::<(), yatree::domain::TreeError>(())
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
