//! Implementation of treaps
//!
//! It is a balanced tree algorithm that supports reversals, splitting and concatenation.
//! Every node gets a random priority when it is created, and the priorities are kept in
//! heap order: a node's priority is never smaller than its sons' priorities.
//!
//! Its operations take `O(log n)` expected time, probabilistically.
//! Each operation may take up to linear time, but the probability of any operation
//! taking more than `O(log n)` time is extremely low.
//!
//! [`Treap`] is the generic core that [`crate::SeqTree`] and [`crate::KeyTree`] wrap.
//! Its only structural primitives are [`Treap::split`] and [`Treap::concatenate_right`].

use super::basic_tree::*;
use crate::config::{Config, PriorityGenerator};
use crate::data::*;
use crate::locators::*;
use recursive_reference::RecRef;

#[derive(destructure)]
pub struct Treap<D: Data> {
    tree: BasicTree<D>,
    priorities: PriorityGenerator,
}

/// The result of searching the tree: a reference to the subtree that was found, together
/// with the references to its ancestors, and the summary of everything to its left.
pub(crate) struct Position<'a, D: Data> {
    pub rec_ref: RecRef<'a, BasicTree<D>>,
    /// If the position is a node, the summary of all the values left of the node itself.
    /// If the position is empty, the summary of all the values left of the position.
    pub left: D::Summary,
}

impl<'a, D: Data> Position<'a, D> {
    /// Rebuilds every node on the path from the root to the current position,
    /// not including the current position itself.
    pub fn rebuild_ancestors(mut self) {
        while RecRef::pop(&mut self.rec_ref).is_some() {
            self.rec_ref.rebuild();
        }
    }

    /// Removes the node at this position, and returns its value.
    /// The node is replaced by the concatenation of its sons.
    pub fn remove(mut self) -> Option<D::Value> {
        let mut node = self.rec_ref.take().into_node_boxed()?;
        let (left, right) = (node.left.take(), node.right.take());
        *self.rec_ref = concatenate(left, right);
        self.rebuild_ancestors();
        Some(node.into_value())
    }

    /// Returns the value at this position, if the position isn't empty.
    pub fn into_value(self) -> Option<&'a D::Value> {
        let tree: &'a BasicTree<D> = RecRef::into_ref(self.rec_ref);
        Some(tree.node()?.node_value_clean())
    }
}

impl<D: Data> Default for Treap<D> {
    fn default() -> Self {
        Treap::new()
    }
}

impl<D: Data> Drop for Treap<D> {
    fn drop(&mut self) {
        deallocate_iteratively(&mut self.tree);
    }
}

impl<D: Data> Treap<D> {
    pub fn new() -> Treap<D> {
        Treap::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Treap<D> {
        Treap {
            tree: BasicTree::Empty,
            priorities: PriorityGenerator::new(&config),
        }
    }

    /// An empty treap whose priority generator is forked from this treap's generator.
    fn new_sibling(&mut self) -> Treap<D> {
        Treap {
            tree: BasicTree::Empty,
            priorities: self.priorities.fork(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the summary of all values in this tree.
    pub fn subtree_summary(&self) -> D::Summary {
        self.tree.subtree_summary()
    }

    /// Creates a single node tree, with a freshly drawn priority.
    pub fn singleton(&mut self, value: D::Value) -> BasicTree<D> {
        let priority = self.priorities.next_priority();
        BasicTree::from_node(BasicNode::new(value, priority))
    }

    /// Adds a value after all the existing values.
    pub fn push_back(&mut self, value: D::Value) {
        let tree = self.singleton(value);
        self.tree = concatenate(self.tree.take(), tree);
    }

    /// Splits the tree using a splitting locator: the values left of the split point
    /// stay in this tree, and the rest move into the returned tree.
    /// If the locator accepts a value, that value goes into the returned tree.
    ///
    ///```
    /// use mergeable_treap::treap::Treap;
    /// use mergeable_treap::example_data::SeqNum;
    ///
    /// let mut tree: Treap<SeqNum<i32>> = (17..88).collect();
    /// let tree2 = tree.split(&(7..7));
    ///
    /// assert_eq!(tree.iter().cloned().collect::<Vec<_>>(), (17..24).collect::<Vec<_>>());
    /// # let mut tree2 = tree2;
    /// assert_eq!(tree2.iter().cloned().collect::<Vec<_>>(), (24..88).collect::<Vec<_>>());
    /// # tree.assert_correctness();
    ///```
    pub fn split<L: Locator<D>>(&mut self, locator: &L) -> Treap<D> {
        self.split_in_context(locator, Default::default(), Default::default())
    }

    /// Same as [`Treap::split`], but the locator sees the given summaries as
    /// being left and right of this tree. Used when this tree is a part of a bigger tree.
    fn split_in_context<L: Locator<D>>(
        &mut self,
        locator: &L,
        left: D::Summary,
        right: D::Summary,
    ) -> Treap<D> {
        let (tree_l, tree_r) = split(self.tree.take(), locator, left, right);
        self.tree = tree_l;
        let mut res = self.new_sibling();
        res.tree = tree_r;
        res
    }

    /// Concatenates the trees together, in place.
    /// All the values of `tree2` are placed after all the values of `self`.
    ///
    ///```
    /// use mergeable_treap::treap::Treap;
    /// use mergeable_treap::example_data::SeqNum;
    ///
    /// let mut tree: Treap<SeqNum<i32>> = (17..=89).collect();
    /// let tree2: Treap<SeqNum<i32>> = (13..=25).collect();
    /// tree.concatenate_right(tree2);
    ///
    /// assert_eq!(
    ///     tree.iter().cloned().collect::<Vec<_>>(),
    ///     (17..=89).chain(13..=25).collect::<Vec<_>>()
    /// );
    /// # tree.assert_correctness();
    ///```
    pub fn concatenate_right(&mut self, mut tree2: Treap<D>) {
        self.append(&mut tree2);
    }

    /// Moves all the values of `other` after the values of `self`, leaving `other` empty.
    pub fn append(&mut self, other: &mut Treap<D>) {
        self.tree = concatenate(self.tree.take(), other.tree.take());
    }

    /// Splits out the segment the locator accepts, calls `func` on it, and glues the tree back.
    fn with_segment<L, F, R>(&mut self, locator: L, func: F) -> R
    where
        L: Locator<D>,
        F: FnOnce(&mut BasicTree<D>) -> R,
    {
        let mut mid = self.split(&LeftEdgeOf(locator.clone()));
        let right = mid.split_in_context(
            &RightEdgeOf(locator),
            self.subtree_summary(),
            Default::default(),
        );
        let res = func(&mut mid.tree);
        mid.concatenate_right(right);
        self.concatenate_right(mid);
        res
    }

    /// Applies the action to the segment that the locator accepts.
    /// The segment is split out, marked with the action in `O(1)`, and merged back.
    pub fn act_segment<L: Locator<D>>(&mut self, action: D::Action, locator: L) {
        self.with_segment(locator, |tree| tree.act(action))
    }

    /// Returns the summary of the segment that the locator accepts.
    pub fn segment_summary<L: Locator<D>>(&mut self, locator: L) -> D::Summary {
        self.with_segment(locator, |tree| tree.subtree_summary())
    }

    /// Finds a node that the locator accepts, pushing down actions along the way.
    /// If there isn't any, it finds the empty position where that node would be instead.
    pub(crate) fn search<L: Locator<D>>(&mut self, locator: &L) -> Position<'_, D> {
        let mut rec_ref = RecRef::new(&mut self.tree);
        let mut left: D::Summary = Default::default();
        let mut right: D::Summary = Default::default();
        loop {
            let res = RecRef::extend_result(&mut rec_ref, |tree| {
                let node = tree.node_mut().ok_or(())?;
                node.access();
                let near_left = left + node.left.subtree_summary();
                let near_right = node.right.subtree_summary() + right;
                match locator.locate(near_left, node.node_value_clean(), near_right) {
                    LocResult::Accept => {
                        left = near_left;
                        Err(())
                    }
                    LocResult::GoRight => {
                        left = near_left + node.node_summary();
                        Ok(&mut node.right)
                    }
                    LocResult::GoLeft => {
                        right = node.node_summary() + near_right;
                        Ok(&mut node.left)
                    }
                }
            });
            if res.is_err() {
                break;
            }
        }
        Position { rec_ref, left }
    }

    /// Removes the node that the locator accepts, and returns its value.
    /// Returns `None` if the locator doesn't accept any node.
    pub fn delete<L: Locator<D>>(&mut self, locator: &L) -> Option<D::Value> {
        self.search(locator).remove()
    }

    /// Pushes all the pending actions down, and iterates over the whole tree.
    ///```
    /// use mergeable_treap::treap::Treap;
    /// use mergeable_treap::example_data::SeqNum;
    ///
    /// let mut tree: Treap<SeqNum<i32>> = (17..=89).collect();
    ///
    /// assert_eq!(tree.iter().cloned().collect::<Vec<_>>(), (17..=89).collect::<Vec<_>>());
    /// # tree.assert_correctness();
    ///```
    pub fn iter(&mut self) -> Iter<'_, D> {
        self.tree.access_all();
        Iter::new(&self.tree)
    }

    /// Checks that invariants remain correct. i.e., that every node's summary
    /// is the sum of the summaries of its children, and that the priorities are ordered.
    /// If it finds a violation, it panics.
    pub fn assert_correctness(&self)
    where
        D::Summary: PartialEq + std::fmt::Debug,
    {
        self.tree.assert_correctness();
    }
}

impl<D: Data> Treap<D>
where
    D::Summary: SizedSummary,
{
    /// The number of elements in the tree.
    pub fn len(&self) -> usize {
        self.tree.size()
    }
}

/// Splits a tree in two, at the point the splitting locator leads to.
/// `left` and `right` are the summaries of the values left and right of the tree.
fn split<D: Data, L: Locator<D>>(
    tree: BasicTree<D>,
    locator: &L,
    left: D::Summary,
    right: D::Summary,
) -> (BasicTree<D>, BasicTree<D>) {
    let mut node = match tree.into_node_boxed() {
        None => return (BasicTree::Empty, BasicTree::Empty),
        Some(node) => node,
    };
    node.access();
    let near_left = left + node.left.subtree_summary();
    let near_right = node.right.subtree_summary() + right;
    match locator.locate(near_left, node.node_value_clean(), near_right) {
        LocResult::GoRight => {
            let (a, b) = split(node.right.take(), locator, near_left + node.node_summary(), right);
            node.right = a;
            node.rebuild();
            (BasicTree::Root(node), b)
        }
        LocResult::GoLeft | LocResult::Accept => {
            let (a, b) = split(node.left.take(), locator, left, node.node_summary() + near_right);
            node.left = b;
            node.rebuild();
            (a, BasicTree::Root(node))
        }
    }
}

/// Concatenates two trees: all of the values of `left` precede all of the values of `right`.
/// The root with the bigger priority becomes the root, and ties go to the left tree.
pub(crate) fn concatenate<D: Data>(left: BasicTree<D>, right: BasicTree<D>) -> BasicTree<D> {
    match (left, right) {
        (BasicTree::Empty, tree) | (tree, BasicTree::Empty) => tree,
        (BasicTree::Root(mut a), BasicTree::Root(mut b)) => {
            if a.priority() == b.priority() {
                log::trace!("found equal priorities: {}", a.priority());
            }
            if a.priority() >= b.priority() {
                a.access();
                a.right = concatenate(a.right.take(), BasicTree::Root(b));
                a.rebuild();
                BasicTree::Root(a)
            } else {
                b.access();
                b.left = concatenate(BasicTree::Root(a), b.left.take());
                b.rebuild();
                BasicTree::Root(b)
            }
        }
    }
}

impl<D: Data> std::iter::FromIterator<D::Value> for Treap<D> {
    /// Builds the treap in `O(n)` time, since the values are already in order.
    /// The nodes on the right spine are kept on a stack, and every new node
    /// becomes the parent of the spine nodes with smaller priorities.
    fn from_iter<I: IntoIterator<Item = D::Value>>(iter: I) -> Self {
        let mut res = Treap::new();
        res.extend(iter);
        res
    }
}

impl<D: Data> Extend<D::Value> for Treap<D> {
    /// Appends the values after the existing values.
    fn extend<I: IntoIterator<Item = D::Value>>(&mut self, iter: I) {
        let mut spine: Vec<Box<BasicNode<D>>> = vec![];
        for value in iter {
            let priority = self.priorities.next_priority();
            let mut node = Box::new(BasicNode::new(value, priority));
            let mut below = BasicTree::Empty;
            while let Some(mut top) = pop_if(&mut spine, |top| top.priority() < priority) {
                top.right = below;
                top.rebuild();
                below = BasicTree::Root(top);
            }
            node.left = below;
            spine.push(node);
        }

        let mut tree = BasicTree::Empty;
        while let Some(mut top) = spine.pop() {
            top.right = tree;
            top.rebuild();
            tree = BasicTree::Root(top);
        }
        self.tree = concatenate(self.tree.take(), tree);
    }
}

fn pop_if<T, F: FnOnce(&T) -> bool>(stack: &mut Vec<T>, pred: F) -> Option<T> {
    if pred(stack.last()?) {
        stack.pop()
    } else {
        None
    }
}

impl<D: Data> IntoIterator for Treap<D> {
    type Item = D::Value;
    type IntoIter = IntoIter<D>;

    fn into_iter(self) -> Self::IntoIter {
        let (tree, _priorities) = self.destructure();
        IntoIter::new(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::example_data::*;

    type D = SeqNum<i32>;

    fn seeded(values: std::ops::Range<i32>, seed: u64) -> Treap<D> {
        let mut tree = Treap::with_config(Config::default().seed(seed));
        tree.extend(values);
        tree
    }

    #[test]
    fn treap_delete() {
        let arr: Vec<_> = (0..500).collect();
        for i in 0..arr.len() {
            let mut tree: Treap<D> = arr.iter().cloned().collect();
            let res = tree.delete(&(i..=i));
            assert_eq!(res, Some(arr[i]));
            tree.assert_correctness();
            assert_eq!(
                tree.into_iter().collect::<Vec<_>>(),
                arr[..i].iter().chain(arr[i + 1..].iter()).cloned().collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn split_and_concatenate_restore_the_sequence() {
        for at in 0..=100 {
            let mut tree = seeded(0..100, at as u64);
            let right = tree.split(&(at..at));
            assert_eq!(tree.len(), at);
            assert_eq!(right.len(), 100 - at);
            tree.assert_correctness();
            right.assert_correctness();
            tree.concatenate_right(right);
            tree.assert_correctness();
            assert_eq!(tree.iter().cloned().collect::<Vec<_>>(), (0..100).collect::<Vec<_>>());
        }
    }

    #[test]
    fn same_seed_same_shape() {
        fn shape(tree: &BasicTree<D>) -> String {
            match tree.node() {
                None => String::from("*"),
                Some(node) => format!("<{} {}>", shape(&node.left), shape(&node.right)),
            }
        }
        let tree1 = seeded(0..64, 99);
        let tree2 = seeded(0..64, 99);
        assert_eq!(shape(&tree1.tree), shape(&tree2.tree));
    }

    #[test]
    fn segment_actions() {
        let mut tree = seeded(0..10, 5);
        tree.act_segment(RevAdd { to_reverse: true, add: 100 }, 2..6);
        tree.assert_correctness();
        assert_eq!(
            tree.iter().cloned().collect::<Vec<_>>(),
            vec![0, 1, 105, 104, 103, 102, 6, 7, 8, 9]
        );
        assert_eq!(tree.segment_summary(1..4), SizedSum { size: 3, sum: 1 + 105 + 104 });
    }

    #[test]
    fn deep_trees_are_dropped() {
        // every priority is the same, so the tree degenerates into a path
        // the path is grown inside the treap, which frees it iteratively
        let mut tree: Treap<D> = Treap::new();
        for i in 0..200_000 {
            let mut node = BasicNode::new(i % 2, 0);
            node.left = tree.tree.take();
            node.rebuild();
            tree.tree = BasicTree::from_node(node);
        }
        assert_eq!(tree.len(), 200_000);
        assert_eq!(tree.subtree_summary().sum, 100_000);
        drop(tree);
    }
}
