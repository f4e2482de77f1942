//! A treap with parent pointers, where insertion is done by rotations.
//!
//! The nodes live in an arena, and refer to each other by [`NodeId`]. A new key is first
//! inserted at the bottom of the tree, splitting the leaf that contains it, and then
//! rotated up until the heap order holds. Every rotation repairs the canonical subsets
//! of the two rotated nodes and of the three subtrees hanging from them.

use std::ops::{Index, IndexMut};

use log::{trace, warn};

use super::*;

/// A handle to a node in a [`RotationTreap`]'s arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
pub struct ArenaNode<K> {
    key: Point<K>,
    priority: Priority,
    interval: Interval<K>,
    can: Canonical<K>,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<K> ArenaNode<K> {
    fn son(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn son_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// A treap of arena nodes with parent pointers. Nodes are never removed.
#[derive(Debug)]
pub struct RotationTreap<K> {
    nodes: Vec<ArenaNode<K>>,
    root: NodeId,
}

impl<K> Index<NodeId> for RotationTreap<K> {
    type Output = ArenaNode<K>;

    fn index(&self, id: NodeId) -> &ArenaNode<K> {
        &self.nodes[id.0]
    }
}

impl<K> IndexMut<NodeId> for RotationTreap<K> {
    fn index_mut(&mut self, id: NodeId) -> &mut ArenaNode<K> {
        &mut self.nodes[id.0]
    }
}

/// A borrowed view of one node of a [`RotationTreap`].
pub struct ArenaRef<'a, K> {
    treap: &'a RotationTreap<K>,
    id: NodeId,
}

// derived impls would require `K: Clone`
impl<'a, K> Clone for ArenaRef<'a, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K> Copy for ArenaRef<'a, K> {}

impl<'a, K> ArenaRef<'a, K> {
    pub fn id(self) -> NodeId {
        self.id
    }

    pub fn parent(self) -> Option<Self> {
        self.view(self.treap[self.id].parent)
    }

    fn view(self, id: Option<NodeId>) -> Option<Self> {
        id.map(|id| ArenaRef {
            treap: self.treap,
            id,
        })
    }
}

impl<'a, K: Key> SomeNode<'a, K> for ArenaRef<'a, K> {
    fn key(self) -> &'a Point<K> {
        &self.treap[self.id].key
    }

    fn priority(self) -> Priority {
        self.treap[self.id].priority
    }

    fn interval(self) -> &'a Interval<K> {
        &self.treap[self.id].interval
    }

    fn can(self) -> &'a Canonical<K> {
        &self.treap[self.id].can
    }

    fn left(self) -> Option<Self> {
        self.view(self.treap[self.id].left)
    }

    fn right(self) -> Option<Self> {
        self.view(self.treap[self.id].right)
    }
}

impl<K: Key> RotationTreap<K> {
    pub fn new() -> Self {
        let root = ArenaNode {
            key: Point::NegInfinity,
            priority: Priority::Sentinel,
            interval: Interval::whole(),
            can: Canonical::new(),
            parent: None,
            left: None,
            right: None,
        };
        RotationTreap {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root_ref(&self) -> ArenaRef<'_, K> {
        ArenaRef {
            treap: self,
            id: self.root,
        }
    }

    fn push(&mut self, node: ArenaNode<K>) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn find_leaf_id(&self, key: &Point<K>) -> NodeId {
        find_leaf(self.root_ref(), key).id
    }

    fn side_of(&self, son: NodeId, parent: NodeId) -> Side {
        if self[parent].left == Some(son) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Inserts an endpoint: splits the leaf containing `key` into an inner node of `key`
    /// with two leaves, and rotates the inner node up into its place in the heap.
    ///
    /// `key` must not already be a breakpoint.
    pub fn insert_inner_and_leaf(&mut self, key: K, priority: Priority) {
        let key = Point::Finite(key);
        let leaf = self.find_leaf_id(&key);
        let (left_interval, right_interval) = self[leaf]
            .interval
            .split_at(&key)
            .expect("invariant violated: the found leaf doesn't contain the key");

        // The inner node takes the leaf's place: same interval, same parent,
        // so the same canonical subset.
        let interval = std::mem::replace(&mut self[leaf].interval, left_interval);
        let can = std::mem::take(&mut self[leaf].can);
        let parent = self[leaf].parent;
        let inner = self.push(ArenaNode {
            key: key.clone(),
            priority,
            interval,
            can,
            parent,
            left: Some(leaf),
            right: None,
        });
        let new_leaf = self.push(ArenaNode {
            key,
            priority: Priority::Sentinel,
            interval: right_interval,
            can: Canonical::new(),
            parent: Some(inner),
            left: None,
            right: None,
        });
        self[inner].right = Some(new_leaf);
        match parent {
            Some(parent) => {
                let side = self.side_of(leaf, parent);
                *self[parent].son_mut(side) = Some(inner);
            }
            None => self.root = inner,
        }
        self[leaf].parent = Some(inner);

        while let Some(parent) = self[inner].parent {
            if self[parent].priority == priority {
                warn!("found equal priorities {:?} at key {:?}", priority, self[parent].key);
            }
            if self[parent].priority >= priority {
                break;
            }
            self.rotate_up(inner);
        }
    }

    /// Rotates `y` above its parent `x`.
    ///
    /// With `y` the left son of `x` (the mirrored case is the same):
    /// ```text
    ///         x              y
    ///        / \            / \
    ///       y   C   ==>    A   x
    ///      / \                / \
    ///     A   B              B   C
    /// ```
    /// `A` is the outer subtree, `B` the inner one, and `C` the other one.
    fn rotate_up(&mut self, y: NodeId) {
        let x = self[y].parent.expect("invariant violated: rotating up the root");
        let side = self.side_of(y, x);
        let outer = self[y].son(side).expect(CHILD_ERROR);
        let inner = self[y].son(side.flip()).expect(CHILD_ERROR);
        let other = self[x].son(side.flip()).expect(CHILD_ERROR);
        trace!("rotating {:?} above {:?}", self[y].key, self[x].key);

        // links
        let grandparent = self[x].parent;
        *self[x].son_mut(side) = Some(inner);
        self[inner].parent = Some(x);
        *self[y].son_mut(side.flip()) = Some(x);
        self[x].parent = Some(y);
        self[y].parent = grandparent;
        match grandparent {
            Some(g) => {
                let x_side = self.side_of(x, g);
                *self[g].son_mut(x_side) = Some(y);
            }
            None => self.root = y,
        }

        // intervals
        self[y].interval = self[x].interval.clone();
        let (left, right) = (self[x].left.expect(CHILD_ERROR), self[x].right.expect(CHILD_ERROR));
        self[x].interval = self[left]
            .interval
            .union(&self[right].interval)
            .expect("invariant violated: sons' intervals don't touch");

        // canonical subsets
        let y_can = std::mem::take(&mut self[y].can);
        self[outer].can.extend(y_can.iter().cloned());
        self[inner].can.extend(y_can);
        self[y].can = std::mem::take(&mut self[x].can);
        let shared: Canonical<K> = self[inner]
            .can
            .intersection(&self[other].can)
            .cloned()
            .collect();
        self[inner].can.retain(|segment| !shared.contains(segment));
        self[other].can.retain(|segment| !shared.contains(segment));
        self[x].can = shared;
    }

    pub fn add_segment_to_cans(&mut self, segment: &Interval<K>) {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if segment.covers(&self[id].interval) {
                self[id].can.insert(segment.clone());
                continue;
            }
            for son in [self[id].left, self[id].right].into_iter().flatten() {
                if self[son].interval.intersects(segment) {
                    stack.push(son);
                }
            }
        }
    }

    /// Checks that every node is the parent of its sons. If not, panics.
    pub fn assert_parent_pointers(&self) {
        assert!(self[self.root].parent.is_none());
        for (i, node) in self.nodes.iter().enumerate() {
            for son in [node.left, node.right].into_iter().flatten() {
                assert_eq!(self[son].parent, Some(NodeId(i)), "broken parent pointer");
            }
        }
    }
}

impl<K: Key> Default for RotationTreap<K> {
    fn default() -> Self {
        RotationTreap::new()
    }
}

impl<K: Key> SomeTreap<K> for RotationTreap<K> {
    type Node<'a> = ArenaRef<'a, K>;

    fn new() -> Self {
        RotationTreap::new()
    }

    fn root(&self) -> ArenaRef<'_, K> {
        self.root_ref()
    }

    fn insert_endpoint(&mut self, key: K, priority: Priority, _segment: &Interval<K>) {
        self.insert_inner_and_leaf(key, priority)
    }

    fn add_segment_to_cans(&mut self, segment: &Interval<K>) {
        RotationTreap::add_segment_to_cans(self, segment)
    }
}
