//! Treaps without parent pointers, where insertion is done by zipping.
//!
//! To insert a key, we go down the search path until the first node whose priority
//! is smaller than the new priority. The subtree at that position is "unzipped":
//! its search path is cut into the spine of nodes with smaller keys (linked through
//! their right sons) and the spine of nodes with larger keys (linked through their left sons).
//! The new inner node takes the subtree's place, with the two spines as its sons, and the new
//! leaf hangs at the bottom of the larger spine.
//!
//! The intervals of the spine nodes shrink, so their canonical subsets, and the canonical
//! subsets of their sons that aren't on the spine, must be repaired. There are two ways:
//! * [`ZipTreap::insert_inner_and_leaf`] recomputes them from scratch, out of all the segments
//!   that have an endpoint in the unzipped subtree.
//! * [`ZipTreap::complex_insert_inner_and_leaf`] carries a collection of segments down the path,
//!   and only moves segments between neighboring nodes.
//!
//! Both build the exact same tree.

use log::{trace, warn};
use recursive_reference::RecRef;

use super::*;

const SPINE_ERROR: &str = "invariant violated: unzipping didn't end at the leaf containing the new key";

type Tree<K> = Option<Box<Node<K>>>;

/// A treap of boxed nodes without parent pointers.
///
/// Its [`SomeTreap`] implementation inserts with [`ZipTreap::insert_inner_and_leaf`];
/// see [`ComplexZipTreap`] for the other algorithm.
pub struct ZipTreap<K> {
    root: Tree<K>,
}

/// A [`ZipTreap`] whose [`SomeTreap`] implementation inserts with
/// [`ZipTreap::complex_insert_inner_and_leaf`].
pub struct ComplexZipTreap<K>(pub ZipTreap<K>);

/// How the canonical subsets are repaired while unzipping.
trait SpineRepair<K: Key> {
    /// Called for every node on the search path, top to bottom, after its interval shrank.
    /// `parent` is the interval of the node's new parent. `corner` is true if the
    /// previous node on the search path went to the other spine.
    fn step(&mut self, node: &mut Node<K>, side: Side, parent: &Interval<K>, corner: bool);

    /// Called for the new leaf, after the whole path is unzipped.
    fn finish(self, leaf: &mut Node<K>, parent: &Interval<K>);
}

/// Recomputes canonical subsets out of a fixed pool of candidates.
struct Recompute<K> {
    candidates: Canonical<K>,
}

impl<K: Key> SpineRepair<K> for Recompute<K> {
    fn step(&mut self, node: &mut Node<K>, side: Side, parent: &Interval<K>, _corner: bool) {
        node.find_can(parent, &self.candidates);
        // the son that stays off the spine. its own interval is unchanged, its parent's isn't.
        let interval = node.interval.clone();
        if let Some(son) = node.son_mut(side) {
            son.find_can(&interval, &self.candidates);
        }
    }

    fn finish(self, leaf: &mut Node<K>, parent: &Interval<K>) {
        leaf.find_can(parent, &self.candidates);
    }
}

/// Threads a collection of segments down the search path.
///
/// Invariant: when arriving at a node, the collection holds every segment that was stored at
/// the nodes between it and its new parent, on the other spine. Those are the only segments,
/// apart from its own and its off-spine son's, that can belong at a node whose parent changed.
struct Collect<K> {
    collection: Canonical<K>,
}

impl<K: Key> SpineRepair<K> for Collect<K> {
    fn step(&mut self, node: &mut Node<K>, side: Side, parent: &Interval<K>, corner: bool) {
        if corner {
            // The node's own segments start the collection for the next corner, and
            // the collection so far is what the node may now hold.
            std::mem::swap(&mut self.collection, &mut node.can);
            node.can.extend(self.collection.iter().cloned());
            node.update_can(parent);
        } else {
            // Same parent as before, as far as the node's own segments are concerned:
            // they all still belong here.
            self.collection.extend(node.can.iter().cloned());
        }
        node.pull_segments_from_child(side, parent);
    }

    fn finish(self, leaf: &mut Node<K>, parent: &Interval<K>) {
        leaf.can = self.collection;
        leaf.update_can(parent);
    }
}

impl<K: Key> ZipTreap<K> {
    pub fn new() -> Self {
        ZipTreap {
            root: Some(Box::new(Node::new_leaf(Interval::whole(), Canonical::new()))),
        }
    }

    pub fn root_node(&self) -> &Node<K> {
        self.root.as_deref().expect(EMPTY_TREE_ERROR)
    }

    /// Goes down the search path of `key`, and stops at the first node whose
    /// priority is smaller than `priority`. Returns the position of that node.
    ///
    /// Nodes of equal priority are passed, so that the new node ends up below them.
    fn find_node_to_be_replaced(&mut self, key: &Point<K>, priority: Priority) -> RecRef<'_, Tree<K>> {
        let mut rec_ref = RecRef::new(&mut self.root);
        loop {
            let res = RecRef::extend_result(&mut rec_ref, |tree| match tree {
                Some(node) if node.priority >= priority => {
                    if node.priority == priority {
                        warn!("found equal priorities {:?} at key {:?}", priority, node.key);
                    }
                    Ok(if key < &node.key {
                        &mut node.left
                    } else {
                        &mut node.right
                    })
                }
                _ => Err(()),
            });
            if res.is_err() {
                return rec_ref;
            }
        }
    }

    /// Inserts an endpoint, as an inner node and as a leaf, using classic zipping.
    /// The canonical subsets along the unzipped path are recomputed from all the segments
    /// with an endpoint inside the replaced subtree.
    ///
    /// `key` must not already be a breakpoint.
    pub fn insert_inner_and_leaf(&mut self, key: K, priority: Priority, segment: &Interval<K>) {
        let key = Point::Finite(key);
        let mut position = self.find_node_to_be_replaced(&key, priority);
        let replaced = position.take().expect(CHILD_ERROR);
        let repair = Recompute {
            candidates: replaced.traverse(),
        };
        *position = Some(unzip(replaced, key, priority, segment, repair));
    }

    /// Inserts an endpoint, as an inner node and as a leaf, using complex zipping.
    /// Only the canonical subsets on the unzipped path and of the path's sons are touched.
    ///
    /// `key` must not already be a breakpoint.
    pub fn complex_insert_inner_and_leaf(&mut self, key: K, priority: Priority, segment: &Interval<K>) {
        let key = Point::Finite(key);
        let mut position = self.find_node_to_be_replaced(&key, priority);
        let replaced = position.take().expect(CHILD_ERROR);
        let repair = Collect {
            collection: Canonical::new(),
        };
        *position = Some(unzip(replaced, key, priority, segment, repair));
    }

    /// Records `segment` at the existing leaf of `key`.
    fn record_endpoint(&mut self, key: &K, segment: &Interval<K>) {
        let key = Point::Finite(key.clone());
        let mut node = self.root.as_deref_mut().expect(EMPTY_TREE_ERROR);
        while !node.is_leaf() {
            node = if key < node.key {
                node.left.as_deref_mut()
            } else {
                node.right.as_deref_mut()
            }
            .expect(CHILD_ERROR);
        }
        debug_assert!(node.key == key);
        node.belonging.insert(segment.clone());
    }

    pub fn add_segment_to_cans(&mut self, segment: &Interval<K>) {
        self.root
            .as_deref_mut()
            .expect(EMPTY_TREE_ERROR)
            .add_segment_to_cans(segment);
    }
}

/// Replaces the subtree `replaced` by a new inner node of `key`, with the unzipped
/// subtree and a new leaf below it. Returns the new inner node.
fn unzip<K: Key, R: SpineRepair<K>>(
    mut replaced: Box<Node<K>>,
    key: Point<K>,
    priority: Priority,
    segment: &Interval<K>,
    mut repair: R,
) -> Box<Node<K>> {
    // The new node has the same interval and the same parent as the replaced node,
    // so it takes over its segments.
    let mut x = Box::new(Node::new_inner(key.clone(), priority, replaced.interval.clone()));
    x.can = std::mem::take(&mut replaced.can);

    // The spines, top to bottom. Each node is detached from its next node on the path.
    let mut smaller: Vec<Box<Node<K>>> = vec![];
    let mut larger: Vec<Box<Node<K>>> = vec![];
    // the spine of the previous node on the path. `None` stands for `x`.
    let mut prev_side: Option<Side> = None;
    let mut curr = Some(replaced);
    while let Some(mut node) = curr {
        let side = if node.key < key { Side::Left } else { Side::Right };
        // the off-spine son stays, the other son is the next node on the path
        let (spine, next) = match side {
            Side::Left => {
                node.interval = node.interval.with_right(key.clone());
                (&mut smaller, node.right.take())
            }
            Side::Right => {
                node.interval = node.interval.with_left(key.clone());
                (&mut larger, node.left.take())
            }
        };
        let corner = prev_side.map_or(false, |prev| prev != side);
        trace!("unzipping {:?} to the {:?}, corner: {}", node.key, side, corner);
        let parent = spine.last().map_or(&x.interval, |fix| &fix.interval);
        repair.step(&mut node, side, parent, corner);
        spine.push(node);
        prev_side = Some(side);
        curr = next;
    }

    // The path ends at the leaf whose elementary interval contains `key`, which now ends at `key`.
    // The new leaf covers the rest of that elementary interval.
    let terminal_is_leaf = smaller.last().map_or(false, |node| node.is_leaf());
    assert!(prev_side == Some(Side::Left) && terminal_is_leaf, "{}", SPINE_ERROR);
    let (leaf_end, leaf_parent) = match larger.last() {
        Some(fix) => (fix.key.clone(), &fix.interval),
        None => (x.interval.right().clone(), &x.interval),
    };
    let mut belonging = Canonical::new();
    belonging.insert(segment.clone());
    let leaf_interval = Interval::new(key, leaf_end).expect(SPINE_ERROR);
    let mut leaf = Box::new(Node::new_leaf(leaf_interval, belonging));
    repair.finish(&mut leaf, leaf_parent);

    // zip the spines back together, bottom to top
    let mut left: Tree<K> = None;
    for mut node in smaller.into_iter().rev() {
        node.right = left;
        left = Some(node);
    }
    let mut right: Tree<K> = Some(leaf);
    for mut node in larger.into_iter().rev() {
        node.left = right;
        right = Some(node);
    }
    x.left = left;
    x.right = right;
    x
}

impl<K> Drop for ZipTreap<K> {
    fn drop(&mut self) {
        deallocate_iteratively(&mut self.root);
    }
}

/// The auto-generated deallocation code for boxed trees is recursive, and treaps
/// can have arbitrary depth. Deallocates the tree iteratively instead, and leaves
/// `None` in its place.
fn deallocate_iteratively<K>(tree: &mut Tree<K>) {
    let mut stack: Vec<Box<Node<K>>> = tree.take().into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

impl<K: Key> Default for ZipTreap<K> {
    fn default() -> Self {
        ZipTreap::new()
    }
}

impl<K: Key> SomeTreap<K> for ZipTreap<K> {
    type Node<'a> = &'a Node<K>;

    fn new() -> Self {
        ZipTreap::new()
    }

    fn root(&self) -> &Node<K> {
        self.root_node()
    }

    fn insert_endpoint(&mut self, key: K, priority: Priority, segment: &Interval<K>) {
        self.insert_inner_and_leaf(key, priority, segment)
    }

    fn reuse_endpoint(&mut self, key: &K, segment: &Interval<K>) {
        self.record_endpoint(key, segment)
    }

    fn add_segment_to_cans(&mut self, segment: &Interval<K>) {
        ZipTreap::add_segment_to_cans(self, segment)
    }
}

impl<K: Key> SomeTreap<K> for ComplexZipTreap<K> {
    type Node<'a> = &'a Node<K>;

    fn new() -> Self {
        ComplexZipTreap(ZipTreap::new())
    }

    fn root(&self) -> &Node<K> {
        self.0.root_node()
    }

    fn insert_endpoint(&mut self, key: K, priority: Priority, segment: &Interval<K>) {
        self.0.complex_insert_inner_and_leaf(key, priority, segment)
    }

    fn reuse_endpoint(&mut self, key: &K, segment: &Interval<K>) {
        self.0.record_endpoint(key, segment)
    }

    fn add_segment_to_cans(&mut self, segment: &Interval<K>) {
        self.0.add_segment_to_cans(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(left: i32, right: i32) -> Interval<i32> {
        Interval::finite(left, right).unwrap()
    }

    fn insert_both(plain: &mut ZipTreap<i32>, complex: &mut ZipTreap<i32>, segment: Interval<i32>, priorities: (u64, u64)) {
        let ends = [segment.left().clone(), segment.right().clone()];
        for (end, p) in ends.iter().zip([priorities.0, priorities.1]) {
            let end = *end.finite().unwrap();
            plain.insert_inner_and_leaf(end, Priority::Drawn(p), &segment);
            complex.complex_insert_inner_and_leaf(end, Priority::Drawn(p), &segment);
            assert_correctness(plain.root_node());
            assert_correctness(complex.root_node());
        }
        plain.add_segment_to_cans(&segment);
        complex.add_segment_to_cans(&segment);
    }

    #[test]
    fn first_insertion_shape() {
        let mut treap = ZipTreap::new();
        let segment = iv(3, 7);
        treap.insert_inner_and_leaf(3, Priority::Drawn(10), &segment);
        let root = treap.root_node();
        assert_eq!(root.key, Point::Finite(3));
        assert_eq!(root.interval, Interval::whole());
        let left = root.left.as_deref().unwrap();
        let right = root.right.as_deref().unwrap();
        assert_eq!(left.key, Point::NegInfinity);
        assert_eq!(left.interval, Interval::new(Point::NegInfinity, Point::Finite(3)).unwrap());
        assert_eq!(right.key, Point::Finite(3));
        assert_eq!(right.interval, Interval::new(Point::Finite(3), Point::PosInfinity).unwrap());
        assert!(right.belonging.contains(&segment));
        assert_correctness(root);
    }

    #[test]
    fn smaller_priority_goes_below() {
        let mut treap = ZipTreap::new();
        let segment = iv(3, 7);
        treap.insert_inner_and_leaf(3, Priority::Drawn(10), &segment);
        treap.insert_inner_and_leaf(7, Priority::Drawn(5), &segment);
        treap.add_segment_to_cans(&segment);
        let root = treap.root_node();
        assert_eq!(root.key, Point::Finite(3));
        let right = root.right.as_deref().unwrap();
        assert_eq!(right.key, Point::Finite(7));
        assert_eq!(right.interval, Interval::new(Point::Finite(3), Point::PosInfinity).unwrap());
        // [3, 7] is exactly the left leaf under 7
        assert_eq!(right.left.as_deref().unwrap().can.iter().collect::<Vec<_>>(), vec![&segment]);
        assert_correctness(root);
        assert_canonical_decomposition(root, &segment);
    }

    #[test]
    fn larger_priority_goes_above() {
        let mut plain = ZipTreap::new();
        let mut complex = ZipTreap::new();
        insert_both(&mut plain, &mut complex, iv(3, 7), (10, 5));
        insert_both(&mut plain, &mut complex, iv(1, 5), (20, 1));
        assert_eq!(plain.root_node().key, Point::Finite(1));
        assert!(structurally_equal(plain.root_node(), complex.root_node()));
        for segment in [iv(3, 7), iv(1, 5)] {
            assert_canonical_decomposition(plain.root_node(), &segment);
        }
    }

    #[test]
    fn plain_and_complex_agree() {
        let segments = [
            (iv(10, 40), (50, 20)),
            (iv(20, 30), (90, 60)),
            (iv(5, 25), (30, 80)),
            (iv(35, 45), (70, 10)),
            (iv(1, 50), (40, 95)),
            (iv(12, 14), (15, 85)),
        ];
        let mut plain = ZipTreap::new();
        let mut complex = ZipTreap::new();
        for (segment, priorities) in segments.iter().cloned() {
            insert_both(&mut plain, &mut complex, segment, priorities);
            assert!(structurally_equal(plain.root_node(), complex.root_node()));
        }
        for (segment, _) in segments.iter() {
            assert_canonical_decomposition(plain.root_node(), segment);
            assert_canonical_decomposition(complex.root_node(), segment);
        }
    }

    #[test]
    fn reused_endpoint_is_recorded() {
        let mut treap = ZipTreap::new();
        let first = iv(3, 7);
        let second = iv(3, 9);
        treap.insert_inner_and_leaf(3, Priority::Drawn(10), &first);
        treap.record_endpoint(&3, &second);
        let leaf = find_leaf(treap.root_node(), &Point::Finite(3));
        assert_eq!(leaf.key, Point::Finite(3));
        assert!(leaf.belonging.contains(&first) && leaf.belonging.contains(&second));
        assert_eq!(treap.root_node().traverse().len(), 2);
    }

    #[test]
    fn deep_tree_drops_without_overflow() {
        let mut treap = ZipTreap::new();
        let segment = iv(0, 1);
        // every new key is larger and becomes the root, so the tree is a path to the left
        for i in 1..100_000u64 {
            treap.complex_insert_inner_and_leaf(i as i32, Priority::Drawn(i), &segment);
        }
        assert_eq!(treap.root_node().key, Point::Finite(99_999));
        drop(treap);
    }
}
