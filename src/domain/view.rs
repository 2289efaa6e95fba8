//! Arena-backed view tree.
//!
//! View nodes live in a generational arena and refer to each other by
//! [`NodeId`]. An id whose slot has been freed simply stops resolving, which
//! is what makes ids usable as non-owning references (e.g. the selection).

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::model::NodeRef;

/// Handle to a view node inside a [`ViewTree`].
pub type NodeId = Index;

/// Presentation wrapper around one domain node.
#[derive(Debug)]
pub struct ViewNode {
    model: NodeRef,
    parent: Option<NodeRef>,
    has_children: bool,
    children: Vec<NodeId>,
    collapsed: bool,
    view_parent: Option<NodeId>,
}

impl ViewNode {
    pub(crate) fn new(
        model: NodeRef,
        parent: Option<NodeRef>,
        has_children: bool,
        collapsed: bool,
    ) -> Self {
        Self {
            model,
            parent,
            has_children,
            children: Vec::new(),
            collapsed,
            view_parent: None,
        }
    }

    /// The wrapped domain node.
    pub fn model(&self) -> &NodeRef {
        &self.model
    }

    /// The domain parent (not the view parent). `None` for roots.
    pub fn parent(&self) -> Option<&NodeRef> {
        self.parent.as_ref()
    }

    /// Whether the domain node had children at wrap time.
    pub fn has_children(&self) -> bool {
        self.has_children
    }

    /// Materialized child view nodes, in domain order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn is_expanded(&self) -> bool {
        !self.collapsed
    }

    /// The owning view node, `None` for roots.
    pub fn view_parent(&self) -> Option<NodeId> {
        self.view_parent
    }

    /// Children are known to exist but have not been built yet.
    pub fn is_pending(&self) -> bool {
        self.has_children && self.children.is_empty()
    }

    pub(crate) fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }
}

/// Storage for all view nodes of one tree (or forest).
#[derive(Debug, Default)]
pub struct ViewTree {
    arena: Arena<ViewNode>,
    roots: Vec<NodeId>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, attaching it under `view_parent` or as a new root.
    #[instrument(level = "trace", skip(self, node))]
    pub(crate) fn insert(&mut self, mut node: ViewNode, view_parent: Option<NodeId>) -> NodeId {
        node.view_parent = view_parent;
        let idx = self.arena.insert(node);

        match view_parent {
            Some(parent_idx) => {
                if let Some(parent) = self.arena.get_mut(parent_idx) {
                    parent.children.push(idx);
                }
            }
            None => self.roots.push(idx),
        }
        idx
    }

    /// Detach `idx` from its parent and free it together with all descendants.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn remove_subtree(&mut self, idx: NodeId) {
        let Some(node) = self.arena.get(idx) else {
            return;
        };
        match node.view_parent {
            Some(parent_idx) => {
                if let Some(parent) = self.arena.get_mut(parent_idx) {
                    parent.children.retain(|&c| c != idx);
                }
            }
            None => self.roots.retain(|&r| r != idx),
        }

        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(removed) = self.arena.remove(current) {
                stack.extend(removed.children);
            }
        }
    }

    pub fn get(&self, idx: NodeId) -> Option<&ViewNode> {
        self.arena.get(idx)
    }

    pub(crate) fn get_mut(&mut self, idx: NodeId) -> Option<&mut ViewNode> {
        self.arena.get_mut(idx)
    }

    pub fn contains(&self, idx: NodeId) -> bool {
        self.arena.contains(idx)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order walk over every materialized node.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Pre-order walk over the rows a renderer shows: roots plus the
    /// children of expanded nodes. Yields `(id, depth, node)`.
    pub fn visible(&self) -> VisibleIterator<'_> {
        VisibleIterator::new(self)
    }

    /// Number of view ancestors (roots have depth 0).
    pub fn depth(&self, idx: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.get(idx).and_then(ViewNode::view_parent);
        while let Some(parent_idx) = current {
            depth += 1;
            current = self.get(parent_idx).and_then(ViewNode::view_parent);
        }
        depth
    }

    /// Position path from the roots down to `idx`, e.g. `[0, 2]`.
    pub fn path_of(&self, idx: NodeId) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = idx;
        loop {
            let node = self.get(current)?;
            let siblings = match node.view_parent {
                Some(parent_idx) => self.get(parent_idx)?.children.as_slice(),
                None => self.roots.as_slice(),
            };
            path.push(siblings.iter().position(|&s| s == current)?);
            match node.view_parent {
                Some(parent_idx) => current = parent_idx,
                None => break,
            }
        }
        path.reverse();
        Some(path)
    }

    /// Follow a position path from the roots. Only materialized nodes are reachable.
    pub fn find_by_path(&self, path: &[usize]) -> Option<NodeId> {
        let (first, rest) = path.split_first()?;
        let mut current = *self.roots.get(*first)?;
        for &pos in rest {
            current = *self.get(current)?.children.get(pos)?;
        }
        Some(current)
    }
}

pub struct TreeIterator<'a> {
    tree: &'a ViewTree,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a ViewTree) -> Self {
        let stack = tree.roots.iter().rev().copied().collect();
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a ViewNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct VisibleIterator<'a> {
    tree: &'a ViewTree,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> VisibleIterator<'a> {
    fn new(tree: &'a ViewTree) -> Self {
        let stack = tree.roots.iter().rev().map(|&r| (r, 0)).collect();
        Self { tree, stack }
    }
}

impl<'a> Iterator for VisibleIterator<'a> {
    type Item = (NodeId, usize, &'a ViewNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, depth)) = self.stack.pop() {
            if let Some(node) = self.tree.get(current_idx) {
                if node.is_expanded() {
                    self.stack
                        .extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
                }
                return Some((current_idx, depth, node));
            }
        }
        None
    }
}
