//! Iterators over basic trees.
//! Both iterate in order, and keep a stack of the nodes whose values are yet to come.

use super::*;

/// Iterates over the values of a tree whose actions have all been pushed down.
/// See [`BasicTree::access_all`].
pub struct Iter<'a, D: Data> {
    stack: Vec<&'a BasicNode<D>>,
}

impl<'a, D: Data> Iter<'a, D> {
    pub(crate) fn new(tree: &'a BasicTree<D>) -> Self {
        let mut res = Iter { stack: vec![] };
        res.push_left_spine(tree);
        res
    }

    fn push_left_spine(&mut self, mut tree: &'a BasicTree<D>) {
        while let Some(node) = tree.node() {
            self.stack.push(node);
            tree = &node.left;
        }
    }
}

impl<'a, D: Data> Iterator for Iter<'a, D> {
    type Item = &'a D::Value;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(&node.right);
        Some(node.node_value_clean())
    }
}

/// An owning iterator. Pushes actions down as it goes.
pub struct IntoIter<D: Data> {
    stack: Vec<Box<BasicNode<D>>>,
}

impl<D: Data> IntoIter<D> {
    pub(crate) fn new(tree: BasicTree<D>) -> Self {
        let mut res = IntoIter { stack: vec![] };
        res.push_left_spine(tree);
        res
    }

    fn push_left_spine(&mut self, mut tree: BasicTree<D>) {
        while let Some(mut node) = tree.into_node_boxed() {
            node.access();
            tree = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<D: Data> Iterator for IntoIter<D> {
    type Item = D::Value;

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        let right = node.right.take();
        self.push_left_spine(right);
        Some(node.into_value())
    }
}

impl<D: Data> Drop for IntoIter<D> {
    fn drop(&mut self) {
        for node in self.stack.iter_mut() {
            deallocate_iteratively(&mut node.right);
        }
    }
}
