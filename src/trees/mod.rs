//! The tree engines underneath a segment treap, and the algorithms they share.
//!
//! There are two node representations: boxed nodes without parent pointers, used
//! by the zipping treaps ([`zip_treap`]), and arena nodes with parent pointers,
//! used by the rotating treap ([`rotation_treap`]). Both are exposed through the
//! [`SomeNode`] trait, so that everything that only reads a tree (comparing,
//! checking, querying, printing) is written once, and can even compare a tree of
//! one kind against a tree of the other kind.

use std::collections::BTreeSet;

use crate::interval::*;
use crate::priority::Priority;

pub mod display;
pub mod node;
pub mod rotation_treap;
pub mod zip_treap;

pub use node::Node;
pub use rotation_treap::RotationTreap;
pub use zip_treap::{ComplexZipTreap, ZipTreap};

/// A canonical subset: the set of inserted segments stored at a node.
pub type Canonical<K> = BTreeSet<Interval<K>>;

pub(crate) const CHILD_ERROR: &str = "invariant violated: inner node without two children";
pub(crate) const EMPTY_TREE_ERROR: &str = "invariant violated: treap without a root";

/// Which son of a node. For zipping, the left side also names the spine
/// of nodes with smaller keys, and the right side the spine of larger keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn flip(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A read-only view of a segment treap node.
///
/// Implementors are cheap handles (`Copy`), borrowed from the tree for `'a`.
/// Inner nodes always have two sons, leaves have none.
pub trait SomeNode<'a, K: 'a>: Copy {
    fn key(self) -> &'a Point<K>;
    fn priority(self) -> Priority;
    /// The union of the elementary intervals of all the leaves of the subtree.
    fn interval(self) -> &'a Interval<K>;
    fn can(self) -> &'a Canonical<K>;
    fn left(self) -> Option<Self>;
    fn right(self) -> Option<Self>;

    fn is_leaf(self) -> bool {
        self.left().is_none() && self.right().is_none()
    }

    fn son(self, side: Side) -> Option<Self> {
        match side {
            Side::Left => self.left(),
            Side::Right => self.right(),
        }
    }
}

/// A treap engine that a [`crate::SegmentTreap`] can be built upon.
pub trait SomeTreap<K: Key> {
    type Node<'a>: SomeNode<'a, K>
    where
        Self: 'a,
        K: 'a;

    /// A tree with a single sentinel leaf, whose key is `-∞`
    /// and whose elementary interval is the whole line.
    fn new() -> Self;

    fn root(&self) -> Self::Node<'_>;

    /// Inserts `key` as a new inner node with priority `priority`, and as a new leaf.
    /// `key` must not already be a breakpoint of the tree.
    fn insert_endpoint(&mut self, key: K, priority: Priority, segment: &Interval<K>);

    /// Called instead of [`SomeTreap::insert_endpoint`] when `key` is already a breakpoint.
    fn reuse_endpoint(&mut self, _key: &K, _segment: &Interval<K>) {}

    /// Distributes `segment` into the canonical subsets, top-down.
    fn add_segment_to_cans(&mut self, segment: &Interval<K>);

    /// Returns the leaf whose elementary interval contains `key`.
    fn find_leaf(&self, key: &Point<K>) -> Self::Node<'_> {
        find_leaf(self.root(), key)
    }

    fn has_breakpoint(&self, key: &K) -> bool {
        match self.find_leaf(&Point::Finite(key.clone())).key() {
            Point::Finite(k) => k == key,
            _ => false,
        }
    }
}

/// Descends to the leaf whose elementary interval contains `key`.
/// Keys equal to a node's key go right.
pub fn find_leaf<'a, K: Key + 'a, N: SomeNode<'a, K>>(root: N, key: &Point<K>) -> N {
    let mut node = root;
    while !node.is_leaf() {
        node = if key < node.key() {
            node.left()
        } else {
            node.right()
        }
        .expect(CHILD_ERROR);
    }
    node
}

/// Compares two trees node by node: keys, priorities, associated intervals, canonical subsets.
/// The trees may be of different kinds.
pub fn structurally_equal<'a, 'b, K, A, B>(a: A, b: B) -> bool
where
    K: Key + 'a + 'b,
    A: SomeNode<'a, K>,
    B: SomeNode<'b, K>,
{
    if a.key() != b.key()
        || a.priority() != b.priority()
        || a.interval() != b.interval()
        || a.can() != b.can()
    {
        return false;
    }
    let sons_equal = |x: Option<A>, y: Option<B>| match (x, y) {
        (None, None) => true,
        (Some(x), Some(y)) => structurally_equal(x, y),
        _ => false,
    };
    sons_equal(a.left(), b.left()) && sons_equal(a.right(), b.right())
}

/// The number of nodes on the longest root to leaf path.
pub fn depth<'a, K: 'a, N: SomeNode<'a, K>>(node: N) -> usize {
    let left = node.left().map_or(0, depth);
    let right = node.right().map_or(0, depth);
    1 + std::cmp::max(left, right)
}

/// Returns every segment containing `point`, by collecting the canonical subsets
/// on the path from the root to the leaf containing `point`.
///
/// A segment `[l, r]` is reported for `l <= point < r`.
pub fn stab<'a, K: Key + 'a, N: SomeNode<'a, K>>(root: N, point: &Point<K>) -> Vec<&'a Interval<K>> {
    let mut res = vec![];
    let mut node = root;
    loop {
        res.extend(node.can().iter());
        if node.is_leaf() {
            return res;
        }
        node = if point < node.key() {
            node.left()
        } else {
            node.right()
        }
        .expect(CHILD_ERROR);
    }
}

/// The intervals of the leaves, left to right.
pub fn traverse_intervals<'a, K: Key + 'a, N: SomeNode<'a, K>>(root: N) -> Vec<&'a Interval<K>> {
    let mut res = vec![];
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        match (node.left(), node.right()) {
            (Some(left), Some(right)) => {
                stack.push(right);
                stack.push(left);
            }
            _ => res.push(node.interval()),
        }
    }
    res
}

/// The nodes whose canonical subset holds `segment`, left to right.
pub fn canonical_nodes<'a, K: Key + 'a, N: SomeNode<'a, K>>(root: N, segment: &Interval<K>) -> Vec<N> {
    let mut res = vec![];
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.can().contains(segment) {
            res.push(node);
        }
        // pushed in reverse, so that nodes are visited left to right
        if let Some(right) = node.right() {
            stack.push(right);
        }
        if let Some(left) = node.left() {
            stack.push(left);
        }
    }
    res
}

/// Checks that invariants remain correct: key order, heap order, that every inner node
/// has two sons, that every inner node's interval is the union of its sons' intervals,
/// and that every segment stored at a node covers the node but not its parent.
/// If it finds a violation, panics.
pub fn assert_correctness<'a, K: Key + 'a, N: SomeNode<'a, K>>(root: N) {
    assert!(root.interval().left() == &Point::NegInfinity && root.interval().right() == &Point::PosInfinity);
    assert_correctness_internal(root, None, &Point::NegInfinity, &Point::PosInfinity);
}

fn assert_correctness_internal<'a, K: Key + 'a, N: SomeNode<'a, K>>(
    node: N,
    parent: Option<N>,
    low: &Point<K>,
    high: &Point<K>,
) {
    // every key in the subtree is in `[low, high)`
    assert!(low <= node.key() && node.key() < high, "key {:?} out of order", node.key());
    for segment in node.can() {
        assert!(segment.covers(node.interval()), "{:?} doesn't cover {:?}", segment, node.interval());
        if let Some(parent) = parent {
            assert!(
                !segment.covers(parent.interval()),
                "{:?} also covers the parent of {:?}",
                segment,
                node.interval()
            );
        }
    }
    match (node.left(), node.right()) {
        (None, None) => {
            assert!(node.priority().is_sentinel());
            assert_eq!(node.interval().left(), node.key());
        }
        (Some(left), Some(right)) => {
            assert!(!node.priority().is_sentinel());
            assert!(node.priority() >= left.priority(), "heap order violated");
            assert!(node.priority() >= right.priority(), "heap order violated");
            let union = left
                .interval()
                .union(right.interval())
                .expect("sons' intervals don't touch");
            assert_eq!(&union, node.interval());
            assert_eq!(left.interval().right(), node.key());
            assert_correctness_internal(left, Some(node), low, node.key());
            // the right subtree starts with the leaf of this very key
            assert_correctness_internal(right, Some(node), node.key(), high);
        }
        _ => panic!("{}", CHILD_ERROR),
    }
}

/// Checks that the nodes holding `segment` form its canonical decomposition:
/// their intervals tile the segment exactly, and none of them is an ancestor of another.
/// If not, panics.
pub fn assert_canonical_decomposition<'a, K: Key + 'a, N: SomeNode<'a, K>>(root: N, segment: &Interval<K>) {
    assert_no_nested_holders(root, segment, false);
    let pieces = canonical_nodes(root, segment);
    assert!(!pieces.is_empty(), "{:?} isn't stored anywhere", segment);
    let mut end = segment.left();
    for piece in pieces {
        assert_eq!(piece.interval().left(), end, "gap or overlap in the decomposition of {:?}", segment);
        end = piece.interval().right();
    }
    assert_eq!(end, segment.right(), "the decomposition of {:?} is incomplete", segment);
}

fn assert_no_nested_holders<'a, K: Key + 'a, N: SomeNode<'a, K>>(node: N, segment: &Interval<K>, held_above: bool) {
    let holds = node.can().contains(segment);
    assert!(!(held_above && holds), "{:?} is stored at a node and at its ancestor", segment);
    for son in [node.left(), node.right()].into_iter().flatten() {
        assert_no_nested_holders(son, segment, held_above || holds);
    }
}
