//! CLI argument definitions using clap

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Expandable tree views over TOML documents and directories
#[derive(Parser, Debug)]
#[command(name = "yatree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Settings file applied on top of the global config
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Attribute holding a node's children
    #[arg(long, global = true)]
    pub children_key: Option<String>,

    /// Start with every node expanded
    #[arg(long, global = true)]
    pub expanded: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a TOML document as a tree
    Show {
        /// TOML document (top-level table is the root node)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        #[command(flatten)]
        script: Script,
    },

    /// Browse a directory, listing each level on first expansion
    Browse {
        /// Directory (default: cwd)
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,

        #[command(flatten)]
        script: Script,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Interactions applied before printing: expand, collapse, double-click, select.
#[derive(Args, Debug, Default, Clone)]
pub struct Script {
    /// Expand the node at PATH (e.g. 0.1), repeatable
    #[arg(short, long = "expand", value_name = "PATH")]
    pub expand: Vec<NodePath>,

    /// Collapse the node at PATH, repeatable
    #[arg(short, long = "collapse", value_name = "PATH")]
    pub collapse: Vec<NodePath>,

    /// Double-click the node at PATH, repeatable
    #[arg(short = 'x', long = "dbl-click", value_name = "PATH")]
    pub dbl_click: Vec<NodePath>,

    /// Select the node at PATH
    #[arg(short, long, value_name = "PATH")]
    pub select: Option<NodePath>,

    /// Expand everything first
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print a config template
    Template,
    /// Print the global config file location
    Path,
}

/// Position path into the view tree: `0.2.1` is root 0, child 2, grandchild 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath(pub Vec<usize>);

impl FromStr for NodePath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("empty node path".into());
        }
        s.split('.')
            .map(|part| {
                part.trim()
                    .parse::<usize>()
                    .map_err(|_| format!("invalid node path segment '{part}' in '{s}'"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(NodePath)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", vec![0])]
    #[case("0.2.1", vec![0, 2, 1])]
    #[case(" 3 . 4 ", vec![3, 4])]
    fn given_valid_path_when_parsing_then_segments_match(#[case] input: &str, #[case] expected: Vec<usize>) {
        assert_eq!(input.parse::<NodePath>(), Ok(NodePath(expected)));
    }

    #[rstest]
    #[case("")]
    #[case("0..1")]
    #[case("a")]
    #[case("-1")]
    fn given_invalid_path_when_parsing_then_errors(#[case] input: &str) {
        assert!(input.parse::<NodePath>().is_err());
    }

    #[test]
    fn given_path_when_displayed_then_dot_separated() {
        assert_eq!(NodePath(vec![1, 0, 4]).to_string(), "1.0.4");
    }

    #[test]
    fn given_show_with_script_when_parsing_then_collects_paths_in_order() {
        let cli = Cli::try_parse_from([
            "yatree", "show", "tree.toml", "-e", "0", "-e", "0.1", "-s", "0.1.0", "-x", "0",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Show { file, script }) => {
                assert_eq!(file, PathBuf::from("tree.toml"));
                assert_eq!(script.expand, vec![NodePath(vec![0]), NodePath(vec![0, 1])]);
                assert_eq!(script.select, Some(NodePath(vec![0, 1, 0])));
                assert_eq!(script.dbl_click, vec![NodePath(vec![0])]);
                assert!(!script.all);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
