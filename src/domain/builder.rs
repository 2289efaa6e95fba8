//! View-tree builder: wraps domain nodes into view nodes.

use std::rc::Rc;

use tracing::{debug, instrument};

use crate::config::{ProducerPolicy, Settings};
use crate::domain::error::TreeResult;
use crate::domain::model::{ChildList, NodeRef};
use crate::domain::resolver::{resolve_children, Resolved};
use crate::domain::view::{NodeId, ViewNode, ViewTree};

/// Domain child still to be wrapped: `(node, domain parent, view parent)`.
type Pending = (NodeRef, NodeRef, NodeId);

/// Builds view nodes into a [`ViewTree`] according to [`Settings`].
pub struct ViewTreeBuilder<'a> {
    settings: &'a Settings,
}

impl<'a> ViewTreeBuilder<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Wrap one domain node, attaching it under `view_parent` (or as a root).
    ///
    /// `parent` is the *domain* parent recorded on the view node. Eager
    /// children are wrapped now; producer children are wrapped now or on
    /// first expansion depending on [`ProducerPolicy`]. A node whose children
    /// are deferred always starts collapsed, whatever `collapse_by_default`
    /// says, so that expanding it is what loads them.
    ///
    /// Descendants are walked with an explicit stack, so depth is bounded
    /// by memory only. On error nothing inserted by this call remains in the
    /// tree.
    #[instrument(level = "trace", skip_all)]
    pub fn wrap(
        &self,
        tree: &mut ViewTree,
        node: &NodeRef,
        parent: Option<&NodeRef>,
        view_parent: Option<NodeId>,
    ) -> TreeResult<NodeId> {
        let (idx, children) = self.wrap_one(tree, node, parent, view_parent)?;

        let mut stack: Vec<Pending> = Vec::new();
        schedule(&mut stack, node, idx, children);
        while let Some((child, child_parent, child_view_parent)) = stack.pop() {
            match self.wrap_one(tree, &child, Some(&child_parent), Some(child_view_parent)) {
                Ok((child_idx, grandchildren)) => {
                    schedule(&mut stack, &child, child_idx, grandchildren)
                }
                Err(e) => {
                    tree.remove_subtree(idx);
                    return Err(e);
                }
            }
        }

        Ok(idx)
    }

    /// Wrap each node in order. Empty input yields an empty vec.
    ///
    /// On error the nodes already wrapped by this call are removed again.
    pub fn wrap_many(
        &self,
        tree: &mut ViewTree,
        nodes: &[NodeRef],
        parent: Option<&NodeRef>,
        view_parent: Option<NodeId>,
    ) -> TreeResult<Vec<NodeId>> {
        let mut wrapped = Vec::with_capacity(nodes.len());
        for node in nodes {
            match self.wrap(tree, node, parent, view_parent) {
                Ok(idx) => wrapped.push(idx),
                Err(e) => {
                    for idx in wrapped {
                        tree.remove_subtree(idx);
                    }
                    return Err(e);
                }
            }
        }
        Ok(wrapped)
    }

    /// Insert the view node for `node` alone; returns the children to wrap now.
    fn wrap_one(
        &self,
        tree: &mut ViewTree,
        node: &NodeRef,
        parent: Option<&NodeRef>,
        view_parent: Option<NodeId>,
    ) -> TreeResult<(NodeId, Option<ChildList>)> {
        let resolved = resolve_children(node, self.settings)?;
        let has_children = !resolved.is_empty();
        let build_now = match &resolved {
            Resolved::NoChildren => false,
            Resolved::Eager(_) => has_children,
            Resolved::Produced(_) => {
                has_children && self.settings.producer_policy == ProducerPolicy::Eager
            }
        };
        let deferred = has_children && !build_now;
        if deferred {
            debug!(count = resolved.len(), "deferring producer children");
        }

        let view = ViewNode::new(
            Rc::clone(node),
            parent.cloned(),
            has_children,
            self.settings.collapse_by_default || deferred,
        );
        let idx = tree.insert(view, view_parent);
        Ok((idx, build_now.then(|| resolved.into_list())))
    }
}

/// Push `children` so they pop in domain order.
fn schedule(stack: &mut Vec<Pending>, parent: &NodeRef, idx: NodeId, children: Option<ChildList>) {
    if let Some(children) = children {
        stack.extend(
            children
                .iter()
                .rev()
                .map(|child| (Rc::clone(child), Rc::clone(parent), idx)),
        );
    }
}
