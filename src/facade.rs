//! The segment treap itself: a set of segments, stored in the canonical subsets
//! of a treap over the segments' endpoints.

use std::fmt;

use log::debug;

use crate::error::{Error, Result};
use crate::interval::*;
use crate::priority::*;
use crate::trees::*;

/// A segment treap, built upon the treap engine `T`.
///
/// Every endpoint of an inserted segment is a breakpoint of the treap: a key of an inner
/// node, and the left endpoint of a leaf's elementary interval. Every node's interval is
/// the union of the elementary intervals below it, and every segment is stored at the
/// topmost nodes whose intervals it covers.
///
/// All engines build the same tree, given the same segments and priorities.
pub struct SegmentTreap<K, T> {
    treap: T,
    segments: Vec<Interval<K>>,
    priorities: Box<dyn PrioritySource>,
}

/// A segment treap that inserts by rotations.
pub type RotationSegmentTreap<K> = SegmentTreap<K, RotationTreap<K>>;
/// A segment treap that inserts by zipping, recomputing canonical subsets.
pub type ZipSegmentTreap<K> = SegmentTreap<K, ZipTreap<K>>;
/// A segment treap that inserts by zipping, moving canonical subsets around.
pub type ComplexZipSegmentTreap<K> = SegmentTreap<K, ComplexZipTreap<K>>;

impl<K: Key, T: SomeTreap<K>> SegmentTreap<K, T> {
    /// An empty segment treap with random priorities.
    pub fn new() -> Self {
        Self::with_priorities(RandomPriorities::new())
    }

    /// An empty segment treap that takes its priorities from `priorities`.
    pub fn with_priorities<P: PrioritySource + 'static>(priorities: P) -> Self {
        SegmentTreap {
            treap: T::new(),
            segments: vec![],
            priorities: Box::new(priorities),
        }
    }

    /// Inserts a segment, drawing a priority for each of its endpoints.
    ///
    /// Fails with [`Error::InvalidSegment`] if the segment has an infinite endpoint or zero length.
    /// In that case nothing changes, and no priorities are drawn.
    pub fn insert(&mut self, segment: Interval<K>) -> Result<()> {
        validate(&segment)?;
        let left_priority = self.priorities.next_priority();
        let right_priority = self.priorities.next_priority();
        self.insert_with_priorities(segment, left_priority, right_priority)
    }

    /// Inserts a segment, with the given priorities for its endpoints' inner nodes.
    ///
    /// An endpoint that is already a breakpoint doesn't create new nodes,
    /// and its priority goes unused.
    /// Fails with [`Error::InvalidSegment`] or [`Error::SentinelPriority`], without changing anything.
    pub fn insert_with_priorities(
        &mut self,
        segment: Interval<K>,
        left_priority: Priority,
        right_priority: Priority,
    ) -> Result<()> {
        validate(&segment)?;
        if left_priority.is_sentinel() || right_priority.is_sentinel() {
            return Err(Error::SentinelPriority);
        }
        debug!(
            "inserting segment {:?} with priorities {:?}, {:?}",
            segment, left_priority, right_priority
        );
        for (end, priority) in [(segment.left(), left_priority), (segment.right(), right_priority)] {
            let key = end.finite().expect("validated segments have finite endpoints");
            if self.treap.has_breakpoint(key) {
                debug!("{:?} is already a breakpoint, reusing its leaf", key);
                self.treap.reuse_endpoint(key, &segment);
            } else {
                self.treap.insert_endpoint(key.clone(), priority, &segment);
            }
        }
        self.treap.add_segment_to_cans(&segment);
        self.segments.push(segment);
        Ok(())
    }

    /// Returns every inserted segment `[l, r]` with `l <= point < r`.
    ///
    /// A segment inserted more than once is reported once.
    pub fn stab(&self, point: &K) -> Vec<&Interval<K>> {
        stab(self.treap.root(), &Point::Finite(point.clone()))
    }

    /// The inserted segments, in insertion order.
    pub fn segments(&self) -> &[Interval<K>] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        depth(self.treap.root())
    }

    /// The elementary intervals, left to right.
    pub fn elementary_intervals(&self) -> Vec<&Interval<K>> {
        traverse_intervals(self.treap.root())
    }

    pub fn treap(&self) -> &T {
        &self.treap
    }

    /// Checks every invariant of the tree, and that every inserted segment is stored
    /// exactly at the nodes of its canonical decomposition. If not, panics.
    pub fn assert_correctness(&self) {
        assert_correctness(self.treap.root());
        for segment in self.segments.iter() {
            assert_canonical_decomposition(self.treap.root(), segment);
        }
    }
}

impl<K: Key + fmt::Display, T: SomeTreap<K>> SegmentTreap<K, T> {
    /// Renders the tree as ascii art.
    pub fn display(&self) -> String {
        display::render(self.treap.root())
    }
}

fn validate<K: Key>(segment: &Interval<K>) -> Result<()> {
    if !segment.left().is_finite() || !segment.right().is_finite() {
        return Err(Error::InvalidSegment(format!("{:?} has an infinite endpoint", segment)));
    }
    if segment.is_degenerate() {
        return Err(Error::InvalidSegment(format!("{:?} has zero length", segment)));
    }
    Ok(())
}

impl<K: Key, T: SomeTreap<K>> Default for SegmentTreap<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Segment treaps are equal if their trees are structurally equal,
/// even if they are built upon different engines.
impl<K: Key, A: SomeTreap<K>, B: SomeTreap<K>> PartialEq<SegmentTreap<K, B>> for SegmentTreap<K, A> {
    fn eq(&self, other: &SegmentTreap<K, B>) -> bool {
        structurally_equal(self.treap.root(), other.treap.root())
    }
}

impl<K: Key + fmt::Display, T: SomeTreap<K>> fmt::Display for SegmentTreap<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
