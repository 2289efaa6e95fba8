//! Terminal rendering of a controller's visible rows via termtree.

use termtree::Tree;

use crate::application::TreeController;
use crate::config::Settings;
use crate::domain::{NodeId, ViewNode};

const UNNAMED: &str = "<unnamed>";

pub trait TreeNodeConvert {
    /// One termtree per root, containing only visible rows.
    fn to_tree_strings(&self) -> Vec<Tree<String>>;
}

impl<E> TreeNodeConvert for TreeController<E> {
    fn to_tree_strings(&self) -> Vec<Tree<String>> {
        // Rows arrive in pre-order; `open` holds the chain of ancestors of
        // the next row, one tree per depth.
        let mut roots = Vec::new();
        let mut open: Vec<Tree<String>> = Vec::new();
        for (id, depth, node) in self.tree().visible() {
            close_until(&mut open, &mut roots, depth);
            open.push(Tree::new(row_text(self, id, node)));
        }
        close_until(&mut open, &mut roots, 0);
        roots
    }
}

/// Attach finished subtrees to their parents until `depth` trees stay open.
fn close_until(open: &mut Vec<Tree<String>>, roots: &mut Vec<Tree<String>>, depth: usize) {
    while open.len() > depth {
        let Some(done) = open.pop() else {
            break;
        };
        match open.last_mut() {
            Some(parent) => {
                parent.push(done);
            }
            None => roots.push(done),
        }
    }
}

fn row_text<E>(ctl: &TreeController<E>, id: NodeId, node: &ViewNode) -> String {
    let marker = match (node.has_children(), node.collapsed()) {
        (false, _) => "·",
        (true, true) => "▸",
        (true, false) => "▾",
    };
    let label = node_label(ctl.settings(), node);
    if ctl.context().selected_node == Some(id) {
        format!("{marker} {label} ◂")
    } else {
        format!("{marker} {label}")
    }
}

/// The node's label attribute, or a placeholder.
pub fn node_label(settings: &Settings, node: &ViewNode) -> String {
    node.model()
        .get(&settings.label_key)
        .map(ToString::to_string)
        .unwrap_or_else(|| UNNAMED.to_string())
}
