#[cfg(feature = "bench")]
pub mod bench;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use segment_treap::*;

/// One segment treap of every engine, fed with the same segments and priorities.
pub struct TripleFeature {
    pub rotating: RotationSegmentTreap<i32>,
    pub zipping: ZipSegmentTreap<i32>,
    pub complex: ComplexZipSegmentTreap<i32>,
}

impl TripleFeature {
    pub fn new() -> Self {
        // the priorities are always passed in explicitly
        TripleFeature {
            rotating: SegmentTreap::with_priorities(FixedPriorities::new(vec![])),
            zipping: SegmentTreap::with_priorities(FixedPriorities::new(vec![])),
            complex: SegmentTreap::with_priorities(FixedPriorities::new(vec![])),
        }
    }

    /// Inserts into all three, and checks that they all agree on the result.
    pub fn insert(&mut self, segment: &Interval<i32>, priorities: (u64, u64)) -> Result<()> {
        let (p1, p2) = (Priority::Drawn(priorities.0), Priority::Drawn(priorities.1));
        let res1 = self.rotating.insert_with_priorities(segment.clone(), p1, p2);
        let res2 = self.zipping.insert_with_priorities(segment.clone(), p1, p2);
        let res3 = self.complex.insert_with_priorities(segment.clone(), p1, p2);
        assert_eq!(res1, res2);
        assert_eq!(res2, res3);
        res1
    }

    /// Checks that the trees are structurally equal. If not, prints them and panics.
    pub fn assert_equal(&self) {
        if !(self.rotating == self.zipping && self.zipping == self.complex) {
            panic!(
                "trees differ:\nrotations:\n{}\nzipping:\n{}\ncomplex zipping:\n{}",
                self.rotating, self.zipping, self.complex
            );
        }
    }

    /// Checks all the invariants of all three trees. Takes `O(n * segments)` time.
    pub fn assert_correctness(&self) {
        self.rotating.assert_correctness();
        self.zipping.assert_correctness();
        self.complex.assert_correctness();
        self.rotating.treap().assert_parent_pointers();
    }
}

/// `num_segments` segments, whose endpoints are all distinct, out of `0..2 * num_segments`.
pub fn distinct_segments(rng: &mut impl Rng, num_segments: usize) -> Vec<Interval<i32>> {
    let mut ends: Vec<i32> = (0..2 * num_segments as i32).collect();
    ends.shuffle(rng);
    ends.into_iter()
        .tuples()
        .map(|(a, b)| Interval::finite(a.min(b), a.max(b)).unwrap())
        .collect()
}

/// Segments with endpoints in `0..max_end`, so that endpoints repeat often.
/// Zero length segments are skipped.
pub fn crowded_segments(rng: &mut impl Rng, num_segments: usize, max_end: i32) -> Vec<Interval<i32>> {
    std::iter::repeat_with(|| (rng.gen_range(0..max_end), rng.gen_range(0..max_end)))
        .filter(|(a, b)| a != b)
        .take(num_segments)
        .map(|(a, b)| Interval::finite(a.min(b), a.max(b)).unwrap())
        .collect()
}

/// Inserts the segments into all three engines, with random priorities,
/// and compares the trees after every insertion.
pub fn check_consistency(rng: &mut impl Rng, segments: &[Interval<i32>], check_invariants: bool) -> TripleFeature {
    let mut triple = TripleFeature::new();
    for segment in segments {
        let priorities = (rng.gen(), rng.gen());
        triple.insert(segment, priorities).unwrap();
        triple.assert_equal();
        if check_invariants {
            triple.assert_correctness();
        }
    }
    triple
}

/// The stabbing query answered by brute force.
pub fn stab_naive<'a>(segments: &'a [Interval<i32>], point: i32) -> Vec<&'a Interval<i32>> {
    let point = Point::Finite(point);
    segments
        .iter()
        .filter(|segment| segment.left() <= &point && &point < segment.right())
        .sorted()
        .dedup()
        .collect()
}
