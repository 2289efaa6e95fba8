//! CLI layer: argument parsing, command dispatch and tree rendering

pub mod args;
pub mod commands;
pub mod error;
pub mod output;
pub mod render;

pub use args::{Cli, Commands, NodePath, Script};
pub use error::{CliError, CliResult};
