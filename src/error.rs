//! Errors that callers can cause.
//!
//! Broken tree invariants are not represented here: they are bugs in the
//! insertion algorithms, and they panic instead of returning an error.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An interval whose left endpoint lies right of its right endpoint,
    /// or a split point outside of the interval.
    #[error("range error: {0}")]
    Range(String),

    /// A union of two intervals that don't touch at exactly one endpoint.
    #[error("adjacency error: {0}")]
    Adjacency(String),

    /// A segment that can't be inserted into a segment treap:
    /// it has an infinite endpoint, or zero length.
    #[error("invalid segment: {0}")]
    InvalidSegment(String),

    /// The leaf sentinel was handed out as the priority of an inner node.
    #[error("the sentinel priority is reserved for leaves")]
    SentinelPriority,
}

pub type Result<T> = std::result::Result<T, Error>;
