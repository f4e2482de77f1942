//! Heap priorities, and where they come from.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The heap priority of a treap node.
///
/// Leaves always hold [`Priority::Sentinel`], which is smaller than every drawn priority,
/// so a leaf is a legal child of any inner node. Inner nodes always hold a drawn priority.
/// convention: a bigger priority goes higher up the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Sentinel,
    Drawn(u64),
}

impl Priority {
    pub fn is_sentinel(&self) -> bool {
        *self == Priority::Sentinel
    }
}

impl From<u64> for Priority {
    fn from(value: u64) -> Self {
        Priority::Drawn(value)
    }
}

impl fmt::Display for Priority {
    /// A single digit, enough to eyeball the heap order in a rendered tree.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Priority::Sentinel => write!(f, "-inf"),
            Priority::Drawn(p) => write!(f, "{}", p / (u64::MAX / 10 + 1)),
        }
    }
}

/// A source of priorities for newly inserted inner nodes.
///
/// The tree never draws priorities by itself, so that tests can feed the same
/// priorities into several trees.
pub trait PrioritySource {
    /// Must never return [`Priority::Sentinel`].
    fn next_priority(&mut self) -> Priority;
}

/// Uniformly random priorities.
pub struct RandomPriorities<R: Rng = StdRng> {
    rng: R,
}

impl RandomPriorities<StdRng> {
    pub fn new() -> Self {
        RandomPriorities {
            rng: StdRng::from_entropy(),
        }
    }

    /// A reproducible sequence of priorities.
    pub fn seeded(seed: u64) -> Self {
        RandomPriorities {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPriorities<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomPriorities<R> {
    pub fn from_rng(rng: R) -> Self {
        RandomPriorities { rng }
    }
}

impl<R: Rng> PrioritySource for RandomPriorities<R> {
    fn next_priority(&mut self) -> Priority {
        Priority::Drawn(self.rng.gen())
    }
}

/// Replays a fixed list of priorities. Panics once the list runs out.
pub struct FixedPriorities {
    priorities: std::vec::IntoIter<u64>,
}

impl FixedPriorities {
    pub fn new(priorities: Vec<u64>) -> Self {
        FixedPriorities {
            priorities: priorities.into_iter(),
        }
    }
}

impl PrioritySource for FixedPriorities {
    fn next_priority(&mut self) -> Priority {
        let p = self
            .priorities
            .next()
            .expect("fixed priority source ran out of priorities");
        Priority::Drawn(p)
    }
}

impl<P: PrioritySource + ?Sized> PrioritySource for Box<P> {
    fn next_priority(&mut self) -> Priority {
        (**self).next_priority()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_below_everything() {
        assert!(Priority::Sentinel < Priority::Drawn(0));
        assert!(Priority::Drawn(0) < Priority::Drawn(1));
        assert!(Priority::Sentinel.is_sentinel());
    }

    #[test]
    fn seeded_sources_repeat() {
        let mut a = RandomPriorities::seeded(7);
        let mut b = RandomPriorities::seeded(7);
        for _ in 0..100 {
            let p = a.next_priority();
            assert_eq!(p, b.next_priority());
            assert!(!p.is_sentinel());
        }
    }

    #[test]
    fn fixed_source_replays() {
        let mut source = FixedPriorities::new(vec![5, 3]);
        assert_eq!(source.next_priority(), Priority::Drawn(5));
        assert_eq!(source.next_priority(), Priority::Drawn(3));
    }

    #[test]
    #[should_panic]
    fn fixed_source_runs_out() {
        let mut source = FixedPriorities::new(vec![]);
        source.next_priority();
    }

    #[test]
    fn display_digit() {
        assert_eq!(Priority::Sentinel.to_string(), "-inf");
        assert_eq!(Priority::Drawn(0).to_string(), "0");
        assert_eq!(Priority::Drawn(u64::MAX).to_string(), "9");
    }
}
