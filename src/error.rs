//! Errors returned by tree operations.
//!
//! A failed operation never leaves a tree in a partially modified state:
//! the sequence of values is the same as before the call.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A position outside of `1..=len` (or `1..=len + 1` for insertions).
    #[error("position {index} is out of range for a tree of {len} elements")]
    IndexOutOfRange { index: usize, len: usize },

    /// No element with the requested key, or no element on the requested side of it.
    #[error("no matching element in the tree")]
    NotFound,

    /// A range whose start is after its end, or that doesn't fit inside the tree.
    #[error("invalid range: its start is after its end, or it exceeds the tree")]
    InvalidRange,

    /// Two key ordered trees that can't be concatenated, because
    /// the left tree has a key that isn't smaller than every key of the right tree.
    #[error("the left tree's keys don't all precede the right tree's keys")]
    Unordered,
}

pub type Result<T> = std::result::Result<T, Error>;
