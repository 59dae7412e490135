//! The basic tree module.
//! This module implements the boxed nodes that the balanced trees are built from.
//!
//! Every node keeps the summary of its subtree up to date, and may hold a pending
//! action that still has to be applied to its value and to its sons.
//! Before a node's sons or value are read or restructured, the node has to be
//! [`BasicNode::access`]ed, which pushes the action down one level.
//! After a node's sons change, the node has to be [`BasicNode::rebuild`]t.

mod deallocator;
mod iterators;

pub use deallocator::deallocate_iteratively;
pub use iterators::*;

use crate::config::Priority;
use crate::data::*;

/// A basic tree. might be empty.
pub enum BasicTree<D: Data> {
    /// An empty tree
    Empty,
    /// A non empty tree, with a root node
    Root(Box<BasicNode<D>>),
}
use BasicTree::*;

impl<D: Data> Default for BasicTree<D> {
    fn default() -> Self {
        Empty
    }
}

impl<D: Data> BasicTree<D> {
    /// Constructs a new non-empty tree from a node.
    pub fn from_node(node: BasicNode<D>) -> Self {
        Root(Box::new(node))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Empty)
    }

    /// Leaves an empty tree in place, and returns the previous tree.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Returns The inner node.
    pub fn node(&self) -> Option<&BasicNode<D>> {
        match self {
            Empty => None,
            Root(node) => Some(node),
        }
    }

    /// Returns The inner node.
    pub fn node_mut(&mut self) -> Option<&mut BasicNode<D>> {
        match self {
            Empty => None,
            Root(node) => Some(node),
        }
    }

    /// Returns The inner node with its box, so that it can be moved around
    /// without copying the node.
    pub fn into_node_boxed(self) -> Option<Box<BasicNode<D>>> {
        match self {
            Empty => None,
            Root(node) => Some(node),
        }
    }

    /// Returns the priority of the root, if there is one.
    pub fn priority(&self) -> Option<Priority> {
        Some(self.node()?.priority())
    }

    /// Returns the summary of all values in this tree.
    /// This is correct even if the root has a pending action.
    pub fn subtree_summary(&self) -> D::Summary {
        match self.node() {
            Some(node) => node.subtree_summary(),
            None => Default::default(),
        }
    }

    /// Remakes the summary stored at the root, based on its sons.
    pub fn rebuild(&mut self) {
        if let Some(node) = self.node_mut() {
            node.rebuild();
        }
    }

    /// Applies the action to the whole tree, lazily.
    pub fn act(&mut self, action: D::Action) {
        if let Some(node) = self.node_mut() {
            node.act(action);
        }
    }

    /// Pushes every pending action in the tree all the way down.
    /// Takes linear time.
    pub fn access_all(&mut self) {
        let mut stack = vec![self];
        while let Some(tree) = stack.pop() {
            if let Some(node) = tree.node_mut() {
                node.access();
                stack.push(&mut node.left);
                stack.push(&mut node.right);
            }
        }
    }

    /// Checks that every node's summary is the sum of its sons' summaries and its own value,
    /// and that priorities never increase going down the tree.
    /// Panics otherwise.
    pub fn assert_correctness(&self)
    where
        D::Summary: PartialEq + std::fmt::Debug,
    {
        let mut stack = vec![self];
        while let Some(tree) = stack.pop() {
            if let Some(node) = tree.node() {
                node.assert_correctness_locally();
                stack.push(&node.left);
                stack.push(&node.right);
            }
        }
    }
}

impl<D: Data> BasicTree<D>
where
    D::Summary: SizedSummary,
{
    /// The number of elements in the tree.
    pub fn size(&self) -> usize {
        self.subtree_summary().size()
    }
}

/// A basic node. can be viewed as a non-empty basic tree: it always has at least one value.
pub struct BasicNode<D: Data> {
    action: D::Action,
    subtree_summary: D::Summary,
    node_value: D::Value,
    priority: Priority,
    pub(crate) left: BasicTree<D>,
    pub(crate) right: BasicTree<D>,
}

impl<D: Data> BasicNode<D> {
    /// Creates a node with a single value and the given priority.
    pub fn new(value: D::Value, priority: Priority) -> Self {
        BasicNode {
            action: Default::default(),
            subtree_summary: D::to_summary(&value),
            node_value: value,
            priority,
            left: Empty,
            right: Empty,
        }
    }

    /// The priority is drawn once, when the node is created, and never changes.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the summary of all values in this node's subtree.
    pub fn subtree_summary(&self) -> D::Summary {
        self.subtree_summary
    }

    /// Returns a summary for the value in this node specifically,
    /// and not the subtree.
    pub fn node_summary(&self) -> D::Summary {
        self.action.act(D::to_summary(&self.node_value))
    }

    /// Returns a mutable reference to the value stored in this node specifically.
    /// The node has to be rebuilt after the value is modified.
    pub fn node_value_mut(&mut self) -> &mut D::Value {
        self.access();
        &mut self.node_value
    }

    /// Returns the value stored in this node specifically.
    /// Assumes that the node has been accessed.
    pub fn node_value_clean(&self) -> &D::Value {
        debug_assert!(self.action.is_identity());
        &self.node_value
    }

    pub(crate) fn into_value(self) -> D::Value {
        debug_assert!(self.action.is_identity());
        self.node_value
    }

    /// Pushes any actions stored in this node to its sons.
    /// Actions stored in nodes are supposed to be eventually applied to its
    /// whole subtree. Therefore, in order to access a node cleanly, without
    /// the still-unapplied action complicating things, you must `access()` the node.
    pub fn access(&mut self) {
        if self.action.is_identity() {
            return;
        }
        if self.action.to_reverse() {
            std::mem::swap(&mut self.left, &mut self.right);
        }
        self.left.act(self.action);
        self.right.act(self.action);
        self.action.act_inplace(&mut self.node_value);
        self.action = Default::default();
    }

    /// Remakes the summary that is stored in this node, based on its sons.
    /// This is necessary after the sons have changed.
    /// The node must not have a pending action.
    pub fn rebuild(&mut self) {
        debug_assert!(self.action.is_identity());
        self.subtree_summary = self.left.subtree_summary()
            + D::to_summary(&self.node_value)
            + self.right.subtree_summary();
    }

    /// This function applies the given action to its whole subtree.
    ///
    /// The summary is updated immediately, while the sons and the value
    /// are only updated when the node is accessed.
    pub fn act(&mut self, action: D::Action) {
        action.act_inplace(&mut self.subtree_summary);
        self.action = action + self.action;
    }

    /// Asserts that the summary and the priorities are correct at the current node.
    /// Otherwise, panics.
    pub fn assert_correctness_locally(&self)
    where
        D::Summary: PartialEq + std::fmt::Debug,
    {
        let expected = self.action.act(
            self.left.subtree_summary()
                + D::to_summary(&self.node_value)
                + self.right.subtree_summary(),
        );
        assert_eq!(self.subtree_summary, expected, "a node's summary is out of date");
        for son in [&self.left, &self.right].iter() {
            if let Some(priority) = son.priority() {
                assert!(self.priority >= priority, "heap order of priorities violated");
            }
        }
    }
}
