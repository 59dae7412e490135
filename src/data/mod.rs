//! The data module.
//!
//! A tree is parameterized by a type implementing [`Data`], which names three types:
//! the values stored in the nodes, the summaries that are accumulated over subtrees,
//! and the actions that can be lazily applied to whole subtrees.
//!
//! Ready-made instances live in [`example_data`].

pub mod example_data;

use std::ops::Add;

/// This trait represents the data that will be stored inside the tree.
///
/// Every node stores a value of type [`Data::Value`], and a summary of its whole subtree
/// of type [`Data::Summary`]. The summary of a subtree is the sum of the summaries
/// of its values, from left to right. Summaries don't have to be commutative.
///
/// Every node may also store a pending [`Data::Action`], that still has to be applied
/// to the values of its subtree. The summary stored in a node is always up to date,
/// even when the node has a pending action.
pub trait Data {
    /// The values that reside in the tree.
    type Value;
    /// The values that can be queried about any segment of the tree.
    /// Adding summaries concatenates them: `a + b` is the summary of `a` followed by `b`.
    type Summary: Copy + Default + Add<Output = Self::Summary>;
    /// The actions that can be applied to segments of the tree.
    type Action: Action + Acts<Self::Value> + Acts<Self::Summary>;

    /// Creates the summary of a single value.
    fn to_summary(val: &Self::Value) -> Self::Summary;
}

/// Actions that can be applied lazily to whole subtrees.
///
/// Composition is written with `+`, and composes right to left:
/// `a + b` is the action that applies `b` first and then `a`.
/// `Default::default()` must be the identity action.
pub trait Action: Copy + Default + Add<Output = Self> {
    /// Returns whether this action is the identity action.
    fn is_identity(self) -> bool;

    /// Returns whether this action reverses the segment it is applied to.
    /// Actions that never reverse can rely on the default implementation.
    fn to_reverse(&self) -> bool {
        false
    }
}

/// Trait for actions that act on values of type `V`.
pub trait Acts<V> {
    /// Applies the action to the object, in place.
    fn act_inplace(&self, object: &mut V);

    /// Applies the action to the object, and returns the result.
    fn act(&self, mut object: V) -> V {
        self.act_inplace(&mut object);
        object
    }
}

/// Actions that include a pure reversal.
///
/// Reversal actions only make sense on position ordered trees, since reversing
/// a segment of a key ordered tree would break its ordering.
pub trait Reversible: Action {
    /// The action that reverses a segment and does nothing else.
    fn reversal() -> Self;
}

/// Actions that add a fixed delta to every value of a segment.
pub trait Additive: Action {
    type Delta;
    /// The action that adds `delta` to every value it is applied to.
    fn adding(delta: Self::Delta) -> Self;
}

/// Summaries that keep track of the number of elements in a segment.
pub trait SizedSummary {
    fn size(&self) -> usize;
}

/// Values that are ordered by a key.
/// The convention is that smaller keys go on the left.
pub trait Keyed {
    type Key: Ord;
    fn key(&self) -> &Self::Key;
}

/// Keyed values that stand for several equal elements at once.
///
/// Key ordered trees store a single node per key, and keep the number of
/// duplicates inside the value.
pub trait Counted: Keyed {
    /// The number of elements this value stands for. Always at least `1`.
    fn count(&self) -> usize;

    /// Merges another value with an equal key into this one.
    fn absorb(&mut self, other: Self);

    /// Removes one of the elements this value stands for.
    /// Returns `false` if this was the last one, in which case the value
    /// should be removed from the tree and is left unchanged.
    fn release_one(&mut self) -> bool;
}
