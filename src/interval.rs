//! Points of the extended line, and closed intervals over them.
//!
//! Intervals are plain values. A node that needs a different interval
//! gets a new one (see [`Interval::with_left`] and [`Interval::with_right`]);
//! nothing shares an interval with anything else.

use std::fmt;

use crate::error::{Error, Result};

/// The bounds every key type needs. Implemented for every fitting type.
///
/// Floats aren't `Ord`. Real valued keys go through a wrapper with a total order,
/// e.g. `ordered_float::OrderedFloat`, or a newtype ordered by `f64::total_cmp`.
pub trait Key: Ord + Clone + fmt::Debug + 'static {}
impl<K: Ord + Clone + fmt::Debug + 'static> Key for K {}

/// A point of the extended line: every key, plus the two infinities.
///
/// The derived order puts `NegInfinity` below every finite point
/// and `PosInfinity` above every finite point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Point<K> {
    NegInfinity,
    Finite(K),
    PosInfinity,
}
use Point::*;

impl<K> Point<K> {
    pub fn is_finite(&self) -> bool {
        matches!(self, Finite(_))
    }

    /// Returns the finite key, if there is one.
    pub fn finite(&self) -> Option<&K> {
        match self {
            Finite(k) => Some(k),
            _ => None,
        }
    }
}

impl<K> From<K> for Point<K> {
    fn from(key: K) -> Self {
        Finite(key)
    }
}

impl<K: fmt::Display> fmt::Display for Point<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NegInfinity => write!(f, "-∞"),
            Finite(k) => write!(f, "{}", k),
            PosInfinity => write!(f, "∞"),
        }
    }
}

/// A closed interval `[left, right]` of the extended line. Used both for
/// the inserted segments and for the intervals associated with tree nodes.
///
/// The derived order (by `left`, then by `right`) is only there so that
/// intervals can live in ordered sets.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval<K> {
    left: Point<K>,
    right: Point<K>,
}

impl<K: Ord + Clone + fmt::Debug> Interval<K> {
    /// Fails with [`Error::Range`] if `left > right`.
    pub fn new(left: Point<K>, right: Point<K>) -> Result<Interval<K>> {
        if left > right {
            return Err(Error::Range(format!("left endpoint {:?} is greater than right endpoint {:?}", left, right)));
        }
        Ok(Interval { left, right })
    }

    /// The interval between two finite keys.
    ///```
    /// use segment_treap::interval::*;
    ///
    /// let interval = Interval::finite(1, 4).unwrap();
    /// assert!(interval.contains(&Point::Finite(4)));
    /// assert!(Interval::finite(4, 1).is_err());
    ///```
    pub fn finite(left: K, right: K) -> Result<Interval<K>> {
        Interval::new(Finite(left), Finite(right))
    }

    /// Splits the interval at `point`: returns `[left, point]` and `[point, right]`.
    /// Fails with [`Error::Range`] if `point` is outside of the interval.
    /// Splitting at an endpoint is legal, and produces a degenerate interval.
    pub fn split_at(&self, point: &Point<K>) -> Result<(Interval<K>, Interval<K>)> {
        if !self.contains(point) {
            return Err(Error::Range(format!("can't split {:?} at {:?}, which is outside of it", self, point)));
        }
        Ok((
            Interval { left: self.left.clone(), right: point.clone() },
            Interval { left: point.clone(), right: self.right.clone() },
        ))
    }

    /// The union of two touching intervals, where `self` is on the left.
    /// Fails with [`Error::Adjacency`] unless `self.right == other.left`.
    pub fn union(&self, other: &Interval<K>) -> Result<Interval<K>> {
        if self.right != other.left {
            return Err(Error::Adjacency(format!("{:?} and {:?} don't touch", self, other)));
        }
        Ok(Interval { left: self.left.clone(), right: other.right.clone() })
    }
}

impl<K: Ord + Clone> Interval<K> {
    /// The whole extended line.
    pub fn whole() -> Interval<K> {
        Interval { left: NegInfinity, right: PosInfinity }
    }

    pub fn left(&self) -> &Point<K> {
        &self.left
    }

    pub fn right(&self) -> &Point<K> {
        &self.right
    }

    /// Returns true iff `self` contains `other`, not necessarily strictly.
    pub fn covers(&self, other: &Interval<K>) -> bool {
        self.left <= other.left && other.right <= self.right
    }

    /// Returns true iff the interiors of the intervals overlap.
    /// Intervals that only share an endpoint don't intersect.
    pub fn intersects(&self, other: &Interval<K>) -> bool {
        self.right > other.left && self.left < other.right
    }

    pub fn contains(&self, point: &Point<K>) -> bool {
        &self.left <= point && point <= &self.right
    }

    pub fn is_degenerate(&self) -> bool {
        self.left == self.right
    }

    // these two skip the `left <= right` check. The tree algorithms only
    // ever move an endpoint towards a key that lies inside the interval.
    pub(crate) fn with_left(&self, left: Point<K>) -> Interval<K> {
        debug_assert!(left <= self.right);
        Interval { left, right: self.right.clone() }
    }

    pub(crate) fn with_right(&self, right: Point<K>) -> Interval<K> {
        debug_assert!(self.left <= right);
        Interval { left: self.left.clone(), right }
    }
}

impl<K: fmt::Display> fmt::Display for Interval<K> {
    /// Infinite endpoints are left out: `1:4`, `:4`, `1:` and `:`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Finite(k) = &self.left {
            write!(f, "{}", k)?;
        }
        write!(f, ":")?;
        if let Finite(k) = &self.right {
            write!(f, "{}", k)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(left: i32, right: i32) -> Interval<i32> {
        Interval::finite(left, right).unwrap()
    }

    #[test]
    fn construction_rejects_reversed_endpoints() {
        assert!(matches!(Interval::finite(5, 1), Err(Error::Range(_))));
        assert!(Interval::finite(3, 3).unwrap().is_degenerate());
        assert!(Interval::new(NegInfinity, Finite(3)).is_ok());
        assert!(Interval::<i32>::new(PosInfinity, NegInfinity).is_err());
    }

    #[test]
    fn split_at_endpoint_and_outside() {
        let (a, b) = iv(1, 4).split_at(&Finite(4)).unwrap();
        assert_eq!(a, iv(1, 4));
        assert_eq!(b, iv(4, 4));
        assert!(matches!(iv(1, 4).split_at(&Finite(5)), Err(Error::Range(_))));
    }

    #[test]
    fn split_then_union_gives_back_the_interval() {
        let whole = Interval::<i32>::whole();
        for p in [-3, 0, 17] {
            let (a, b) = whole.split_at(&Finite(p)).unwrap();
            assert_eq!(a.right(), &Finite(p));
            assert_eq!(b.left(), &Finite(p));
            assert_eq!(a.left(), whole.left());
            assert_eq!(b.right(), whole.right());
            assert_eq!(a.union(&b).unwrap(), whole);
        }
    }

    #[test]
    fn union_needs_touching_intervals() {
        assert_eq!(iv(1, 3).union(&iv(3, 6)).unwrap(), iv(1, 6));
        assert!(matches!(iv(1, 3).union(&iv(4, 6)), Err(Error::Adjacency(_))));
        // overlapping isn't touching either
        assert!(matches!(iv(1, 4).union(&iv(3, 6)), Err(Error::Adjacency(_))));
        // the order matters
        assert!(iv(3, 6).union(&iv(1, 3)).is_err());
    }

    #[test]
    fn covers_and_intersects() {
        assert!(iv(1, 6).covers(&iv(1, 6)));
        assert!(iv(1, 6).covers(&iv(2, 3)));
        assert!(!iv(2, 3).covers(&iv(1, 6)));
        assert!(Interval::whole().covers(&iv(-100, 100)));

        assert!(iv(1, 3).intersects(&iv(2, 6)));
        assert!(!iv(1, 3).intersects(&iv(3, 6)));
        assert!(!iv(1, 3).intersects(&iv(4, 6)));
    }

    #[test]
    fn display_leaves_out_infinities() {
        assert_eq!(iv(1, 4).to_string(), "1:4");
        assert_eq!(Interval::new(NegInfinity, Finite(4)).unwrap().to_string(), ":4");
        assert_eq!(Interval::<i32>::whole().to_string(), ":");
    }
}
