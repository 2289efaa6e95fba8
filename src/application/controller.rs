//! Tree controller: owns a view tree and drives its state transitions.
//!
//! Every transition updates state first and then runs the configured
//! callback inline. Callbacks receive the controller itself, so they may
//! trigger further transitions.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, instrument, warn};

use crate::config::Settings;
use crate::domain::{
    resolve_children, NodeId, NodeRef, TreeResult, ViewNode, ViewTree, ViewTreeBuilder,
};

/// User callback: `(controller, event, node)`.
pub type Callback<E> = Rc<dyn Fn(&mut TreeController<E>, &E, NodeId)>;

/// The four user-visible state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Expand,
    Collapse,
    Select,
    DblClick,
}

/// Settings plus optional transition callbacks.
pub struct TreeOptions<E> {
    pub settings: Settings,
    on_expand: Option<Callback<E>>,
    on_collapse: Option<Callback<E>>,
    on_select: Option<Callback<E>>,
    on_dbl_click: Option<Callback<E>>,
}

impl<E> TreeOptions<E> {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            on_expand: None,
            on_collapse: None,
            on_select: None,
            on_dbl_click: None,
        }
    }

    pub fn on_expand<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut TreeController<E>, &E, NodeId) + 'static,
    {
        self.on_expand = Some(Rc::new(f));
        self
    }

    pub fn on_collapse<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut TreeController<E>, &E, NodeId) + 'static,
    {
        self.on_collapse = Some(Rc::new(f));
        self
    }

    pub fn on_select<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut TreeController<E>, &E, NodeId) + 'static,
    {
        self.on_select = Some(Rc::new(f));
        self
    }

    pub fn on_dbl_click<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut TreeController<E>, &E, NodeId) + 'static,
    {
        self.on_dbl_click = Some(Rc::new(f));
        self
    }

    pub fn callback(&self, transition: Transition) -> Option<&Callback<E>> {
        match transition {
            Transition::Expand => self.on_expand.as_ref(),
            Transition::Collapse => self.on_collapse.as_ref(),
            Transition::Select => self.on_select.as_ref(),
            Transition::DblClick => self.on_dbl_click.as_ref(),
        }
    }
}

impl<E> Default for TreeOptions<E> {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl<E> Clone for TreeOptions<E> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            on_expand: self.on_expand.clone(),
            on_collapse: self.on_collapse.clone(),
            on_select: self.on_select.clone(),
            on_dbl_click: self.on_dbl_click.clone(),
        }
    }
}

impl<E> fmt::Debug for TreeOptions<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeOptions")
            .field("settings", &self.settings)
            .field("on_expand", &self.on_expand.is_some())
            .field("on_collapse", &self.on_collapse.is_some())
            .field("on_select", &self.on_select.is_some())
            .field("on_dbl_click", &self.on_dbl_click.is_some())
            .finish()
    }
}

/// Per-tree interaction state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeContext {
    /// Non-owning: may refer to a node that no longer exists.
    pub selected_node: Option<NodeId>,
}

/// Owns the view tree built from one domain root (or a forest of roots).
pub struct TreeController<E> {
    tree: ViewTree,
    context: TreeContext,
    options: TreeOptions<E>,
}

impl<E> fmt::Debug for TreeController<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeController")
            .field("nodes", &self.tree.len())
            .field("context", &self.context)
            .field("options", &self.options)
            .finish()
    }
}

impl<E> TreeController<E> {
    /// Build the view tree for a single domain root.
    pub fn new(root: &NodeRef, options: TreeOptions<E>) -> TreeResult<Self> {
        Self::from_roots(std::slice::from_ref(root), options)
    }

    /// Build the view tree for a list of domain roots.
    #[instrument(level = "debug", skip_all, fields(roots = roots.len()))]
    pub fn from_roots(roots: &[NodeRef], options: TreeOptions<E>) -> TreeResult<Self> {
        let mut tree = ViewTree::new();
        ViewTreeBuilder::new(&options.settings).wrap_many(&mut tree, roots, None, None)?;
        debug!(nodes = tree.len(), "built view tree");
        Ok(Self {
            tree,
            context: TreeContext::default(),
            options,
        })
    }

    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    pub fn roots(&self) -> &[NodeId] {
        self.tree.roots()
    }

    pub fn node(&self, id: NodeId) -> Option<&ViewNode> {
        self.tree.get(id)
    }

    pub fn context(&self) -> &TreeContext {
        &self.context
    }

    pub fn settings(&self) -> &Settings {
        &self.options.settings
    }

    /// The selected node, if it still exists.
    pub fn selected_node(&self) -> Option<&ViewNode> {
        self.context.selected_node.and_then(|id| self.tree.get(id))
    }

    /// Rows a renderer shows, with their depth.
    pub fn visible(&self) -> Vec<(NodeId, usize)> {
        self.tree.visible().map(|(id, depth, _)| (id, depth)).collect()
    }

    pub fn find_by_path(&self, path: &[usize]) -> Option<NodeId> {
        self.tree.find_by_path(path)
    }

    /// Expand a collapsed node, building pending children first.
    ///
    /// Already expanded: no-op. If building children fails the node stays
    /// collapsed, its children stay empty and no callback runs.
    #[instrument(level = "debug", skip(self, event))]
    pub fn expand(&mut self, event: &E, id: NodeId) -> TreeResult<()> {
        let Some(node) = self.tree.get_mut(id) else {
            warn!(?id, "expand on unknown node");
            return Ok(());
        };
        if !node.collapsed() {
            return Ok(());
        }
        node.set_collapsed(false);

        if node.is_pending() {
            let model = Rc::clone(node.model());
            if let Err(e) = self.materialize(id, &model) {
                if let Some(node) = self.tree.get_mut(id) {
                    node.set_collapsed(true);
                }
                return Err(e);
            }
        }

        self.fire(Transition::Expand, event, id);
        Ok(())
    }

    /// Collapse an expanded node. Already collapsed: no-op.
    #[instrument(level = "debug", skip(self, event))]
    pub fn collapse(&mut self, event: &E, id: NodeId) {
        let Some(node) = self.tree.get_mut(id) else {
            warn!(?id, "collapse on unknown node");
            return;
        };
        if node.collapsed() {
            return;
        }
        node.set_collapsed(true);
        self.fire(Transition::Collapse, event, id);
    }

    /// Expand if collapsed, collapse otherwise.
    pub fn toggle(&mut self, event: &E, id: NodeId) -> TreeResult<()> {
        match self.tree.get(id).map(ViewNode::collapsed) {
            Some(true) => self.expand(event, id),
            Some(false) => {
                self.collapse(event, id);
                Ok(())
            }
            None => {
                warn!(?id, "toggle on unknown node");
                Ok(())
            }
        }
    }

    /// Select a node. Selecting the selected node fires the callback again.
    #[instrument(level = "debug", skip(self, event))]
    pub fn select_node(&mut self, event: &E, id: NodeId) {
        if !self.tree.contains(id) {
            warn!(?id, "select on unknown node");
            return;
        }
        self.context.selected_node = Some(id);
        self.fire(Transition::Select, event, id);
    }

    /// Forward a double click. No state change.
    #[instrument(level = "debug", skip(self, event))]
    pub fn dbl_click(&mut self, event: &E, id: NodeId) {
        if !self.tree.contains(id) {
            warn!(?id, "double click on unknown node");
            return;
        }
        self.fire(Transition::DblClick, event, id);
    }

    /// Expand every node with children, materializing pending ones on the way.
    pub fn expand_all(&mut self, event: &E) -> TreeResult<()> {
        let mut stack: Vec<NodeId> = self.tree.roots().iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            if node.has_children() && node.collapsed() {
                self.expand(event, id)?;
            }
            if let Some(node) = self.tree.get(id) {
                stack.extend(node.children().iter().rev());
            }
        }
        Ok(())
    }

    /// Collapse every expanded node.
    pub fn collapse_all(&mut self, event: &E) {
        let expanded: Vec<NodeId> = self
            .tree
            .iter()
            .filter(|(_, node)| node.is_expanded())
            .map(|(id, _)| id)
            .collect();
        for id in expanded {
            self.collapse(event, id);
        }
    }

    fn materialize(&mut self, id: NodeId, model: &NodeRef) -> TreeResult<()> {
        let children = resolve_children(model, &self.options.settings)?.into_list();
        let built = ViewTreeBuilder::new(&self.options.settings).wrap_many(
            &mut self.tree,
            &children,
            Some(model),
            Some(id),
        )?;
        debug!(?id, count = built.len(), "materialized children");
        Ok(())
    }

    fn fire(&mut self, transition: Transition, event: &E, id: NodeId) {
        debug!(?transition, ?id, "transition");
        if let Some(callback) = self.options.callback(transition).cloned() {
            callback(self, event, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainNode;

    fn controller() -> TreeController<()> {
        let root = DomainNode::new()
            .with("label", "root")
            .with(
                "children",
                vec![
                    DomainNode::new().with("label", "a").into_ref(),
                    DomainNode::new().with("label", "b").into_ref(),
                ],
            )
            .into_ref();
        TreeController::new(&root, TreeOptions::default()).unwrap()
    }

    #[test]
    fn given_selected_node_removed_when_reading_selection_then_resolves_to_none() {
        // Arrange
        let mut ctl = controller();
        let a = ctl.find_by_path(&[0, 0]).unwrap();
        ctl.select_node(&(), a);
        assert!(ctl.selected_node().is_some());

        // Act
        ctl.tree.remove_subtree(a);

        // Assert: the id is kept but no longer resolves
        assert!(ctl.selected_node().is_none());
        assert_eq!(ctl.context().selected_node, Some(a));
        assert_eq!(ctl.find_by_path(&[0, 0]).map(|id| id == a), Some(false));
    }

    #[test]
    fn given_stale_id_when_interacting_then_noop() {
        let mut ctl = controller();
        let b = ctl.find_by_path(&[0, 1]).unwrap();
        ctl.tree.remove_subtree(b);

        ctl.select_node(&(), b);
        ctl.dbl_click(&(), b);
        ctl.collapse(&(), b);

        assert!(ctl.expand(&(), b).is_ok());
        assert_eq!(ctl.context().selected_node, None);
    }
}
