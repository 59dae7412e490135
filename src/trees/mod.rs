//! This module contains the tree implementations.
//!
//! [`treap::Treap`] is the generic mergeable tree. [`SeqTree`] and [`KeyTree`]
//! wrap it, ordering the values by position and by key respectively.

pub mod basic_tree;
pub mod treap;

mod ordered;
mod sequence;

pub use ordered::KeyTree;
pub use sequence::SeqTree;

/// The ordering of a tree. Fixed when the tree is created, by the choice of tree type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Mode {
    /// Values are ordered by their keys, and equal keys are counted in a single node.
    /// See [`KeyTree`].
    Key,
    /// Values are ordered by their position in a sequence, and duplicates are separate elements.
    /// See [`SeqTree`].
    Position,
}
