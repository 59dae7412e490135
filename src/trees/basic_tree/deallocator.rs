use super::*;

/// Replaces the tree with an empty tree, and frees its nodes one at a time.
///
/// The generated drop code for [`BasicTree`] recurses once per level, and a treap
/// is only balanced in expectation. Detaching the sons of every node before it is
/// freed keeps the stack usage constant, whatever the shape of the tree.
/// Takes a reference so that it can be called from `Drop` implementations.
pub fn deallocate_iteratively<D: Data>(tree: &mut BasicTree<D>) {
    let mut pending: Vec<Box<BasicNode<D>>> = tree.take().into_node_boxed().into_iter().collect();
    while let Some(mut node) = pending.pop() {
        pending.extend(node.left.take().into_node_boxed());
        pending.extend(node.right.take().into_node_boxed());
    }
}
