//! The locator module provides an interface for locating a specific value
//! or a segment, generalizing the search in a binary search tree.
//!
//! Locators are supposed to represent a segment of the tree. See [`Locator`].
//!
//! Splitting a tree expects a locator that doesn't accept any node, but leads
//! into a space between nodes, where the tree will be cut. Any segment locator
//! can be turned into such a locator with [`LeftEdgeOf`] and [`RightEdgeOf`].

use crate::data::*;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum LocResult {
    Accept,
    GoRight,
    GoLeft,
}
use LocResult::*;

/// Locators are types that represent a segment of the tree.
/// When the locator is used, we query the locator about the current node.
/// The locator has to reply:
/// * If the current node is to the left of the segment, return `GoRight`.
/// * If the current node is to the right of the segment, return `GoLeft`.
/// * If the current node is part of the segment, return `Accept`.
///
/// In each query, the locator receives as input the accumulated summary of everything
/// left of the current node, the current node's value, and the accumulated summary
/// of everything right of the current node. The value has already been accessed,
/// so every pending action has been applied to it.
pub trait Locator<D: Data>: Clone {
    fn locate(&self, left: D::Summary, node: &D::Value, right: D::Summary) -> LocResult;
}

/// Locator instance for [`std::ops::Range<usize>`] representing a range of 0-based indices.
impl<D: Data> Locator<D> for std::ops::Range<usize>
where
    D::Summary: SizedSummary,
{
    fn locate(&self, left: D::Summary, node: &D::Value, _right: D::Summary) -> LocResult {
        // find the index of the current node
        let s = left.size();

        if s >= self.end {
            GoLeft
        } else if s + D::to_summary(node).size() <= self.start {
            GoRight
        } else {
            Accept
        }
    }
}

/// Locator instance for [`std::ops::RangeInclusive<usize>`]
/// representing a range of 0-based indices.
/// Do not use with ranges that have been iterated on to exhaustion.
impl<D: Data> Locator<D> for std::ops::RangeInclusive<usize>
where
    D::Summary: SizedSummary,
{
    fn locate(&self, left: D::Summary, node: &D::Value, _right: D::Summary) -> LocResult {
        let s = left.size();

        if s > *self.end() {
            GoLeft
        } else if s + D::to_summary(node).size() <= *self.start() {
            GoRight
        } else {
            Accept
        }
    }
}

/// Locator for the values whose key equals the given key.
#[derive(Debug)]
pub struct ByKey<'a, K>(pub &'a K);

impl<'a, K> Clone for ByKey<'a, K> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<'a, K> Copy for ByKey<'a, K> {}

impl<'a, K: Ord, D: Data> Locator<D> for ByKey<'a, K>
where
    D::Value: Keyed<Key = K>,
{
    fn locate(&self, _left: D::Summary, node: &D::Value, _right: D::Summary) -> LocResult {
        match node.key().cmp(self.0) {
            std::cmp::Ordering::Less => GoRight,
            std::cmp::Ordering::Equal => Accept,
            std::cmp::Ordering::Greater => GoLeft,
        }
    }
}

/// Locator for the values whose key lies in `start..=end`.
#[derive(Debug)]
pub struct ByKeyRange<'a, K> {
    pub start: &'a K,
    pub end: &'a K,
}

impl<'a, K> Clone for ByKeyRange<'a, K> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<'a, K> Copy for ByKeyRange<'a, K> {}

impl<'a, K: Ord, D: Data> Locator<D> for ByKeyRange<'a, K>
where
    D::Value: Keyed<Key = K>,
{
    fn locate(&self, _left: D::Summary, node: &D::Value, _right: D::Summary) -> LocResult {
        let key = node.key();
        if key < self.start {
            GoRight
        } else if key > self.end {
            GoLeft
        } else {
            Accept
        }
    }
}

/// A Wrapper for other locators that will find exactly the left edge
/// of the previous locator. So, this is always a splitting locator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LeftEdgeOf<L>(pub L);

/// A Wrapper for other locators that will find exactly the right edge
/// of the previous locator. So, this is always a splitting locator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RightEdgeOf<L>(pub L);

impl<D: Data, L: Locator<D>> Locator<D> for LeftEdgeOf<L> {
    fn locate(&self, left: D::Summary, node: &D::Value, right: D::Summary) -> LocResult {
        match self.0.locate(left, node, right) {
            Accept => GoLeft,
            res => res,
        }
    }
}

impl<D: Data, L: Locator<D>> Locator<D> for RightEdgeOf<L> {
    fn locate(&self, left: D::Summary, node: &D::Value, right: D::Summary) -> LocResult {
        match self.0.locate(left, node, right) {
            Accept => GoRight,
            res => res,
        }
    }
}
