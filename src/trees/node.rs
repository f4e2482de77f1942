//! The boxed node of the zipping treaps. It has no parent pointer: a node only
//! knows its sons, and algorithms that need the parent's interval get it passed in.

use super::*;

/// A segment treap node without a parent pointer.
#[derive(Debug)]
pub struct Node<K> {
    pub(crate) key: Point<K>,
    pub(crate) priority: Priority,
    pub(crate) interval: Interval<K>,
    pub(crate) can: Canonical<K>,
    /// Only used in leaves: the inserted segments that have this leaf's key as an endpoint.
    /// Used to recover which segments have breakpoints inside a subtree.
    pub(crate) belonging: Canonical<K>,
    pub(crate) left: Option<Box<Node<K>>>,
    pub(crate) right: Option<Box<Node<K>>>,
}

impl<'a, K: Key> SomeNode<'a, K> for &'a Node<K> {
    fn key(self) -> &'a Point<K> {
        &self.key
    }

    fn priority(self) -> Priority {
        self.priority
    }

    fn interval(self) -> &'a Interval<K> {
        &self.interval
    }

    fn can(self) -> &'a Canonical<K> {
        &self.can
    }

    fn left(self) -> Option<Self> {
        self.left.as_deref()
    }

    fn right(self) -> Option<Self> {
        self.right.as_deref()
    }
}

impl<K: Key> Node<K> {
    pub fn new_inner(key: Point<K>, priority: Priority, interval: Interval<K>) -> Node<K> {
        Node {
            key,
            priority,
            interval,
            can: Canonical::new(),
            belonging: Canonical::new(),
            left: None,
            right: None,
        }
    }

    /// A leaf's key is always the left endpoint of its elementary interval.
    pub fn new_leaf(interval: Interval<K>, belonging: Canonical<K>) -> Node<K> {
        Node {
            key: interval.left().clone(),
            priority: Priority::Sentinel,
            interval,
            can: Canonical::new(),
            belonging,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn son_mut(&mut self, side: Side) -> Option<&mut Node<K>> {
        match side {
            Side::Left => self.left.as_deref_mut(),
            Side::Right => self.right.as_deref_mut(),
        }
    }

    /// Returns every segment that has an endpoint among the keys of this subtree,
    /// by collecting the segments recorded at the subtree's leaves.
    pub fn traverse(&self) -> Canonical<K> {
        let mut res = Canonical::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                res.extend(node.belonging.iter().cloned());
            }
            stack.extend(node.left.as_deref());
            stack.extend(node.right.as_deref());
        }
        res
    }

    /// Recomputes the canonical subset from scratch: keeps exactly the `segments`
    /// that cover this node but not its parent.
    pub fn find_can(&mut self, parent: &Interval<K>, segments: &Canonical<K>) {
        let interval = &self.interval;
        self.can = segments
            .iter()
            .filter(|segment| segment.covers(interval) && !segment.covers(parent))
            .cloned()
            .collect();
    }

    /// Like [`Node::find_can`], where the candidates are the current canonical subset.
    pub fn update_can(&mut self, parent: &Interval<K>) {
        let interval = &self.interval;
        self.can
            .retain(|segment| segment.covers(interval) && !segment.covers(parent));
    }

    /// After this node's interval shrank, a segment stored at the son on `side` may cover
    /// this node as a whole. Such segments leave the son, and are stored here instead,
    /// unless they cover the parent as well.
    pub fn pull_segments_from_child(&mut self, side: Side, parent: &Interval<K>) {
        let son = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        let son = match son {
            Some(son) => son,
            None => return,
        };
        let interval = &self.interval;
        let can = &mut self.can;
        son.can.retain(|segment| {
            if !segment.covers(interval) {
                return true;
            }
            if !segment.covers(parent) {
                can.insert(segment.clone());
            }
            false
        });
    }

    pub fn is_covered_by(&self, segment: &Interval<K>) -> bool {
        segment.covers(&self.interval)
    }

    /// Stores `segment` at the topmost nodes it covers, i.e., at the nodes
    /// of its canonical decomposition.
    pub fn add_segment_to_cans(&mut self, segment: &Interval<K>) {
        if self.is_covered_by(segment) {
            self.can.insert(segment.clone());
            return;
        }
        for son in [self.left.as_deref_mut(), self.right.as_deref_mut()] {
            if let Some(son) = son {
                if son.interval.intersects(segment) {
                    son.add_segment_to_cans(segment);
                }
            }
        }
    }
}
