//! Segment treaps: segment trees over a dynamic set of breakpoints, balanced as treaps.
//!
//! Inserting a segment inserts both its endpoints as breakpoints, and then stores the
//! segment at the nodes of its canonical decomposition. A stabbing query collects the
//! canonical subsets along a single root to leaf path.
//!
//! The tree underneath can be one of three engines, which all build the exact same tree
//! given the same priorities:
//! * [`RotationTreap`]: parent pointers, insertion by rotations.
//! * [`ZipTreap`]: no parent pointers, insertion by zipping.
//! * [`ComplexZipTreap`]: zipping, with cheaper canonical subset maintenance.
//!
//!```
//! use segment_treap::*;
//!
//! let mut treap: ComplexZipSegmentTreap<i32> = SegmentTreap::new();
//! treap.insert(Interval::finite(2, 5).unwrap()).unwrap();
//! treap.insert(Interval::finite(4, 9).unwrap()).unwrap();
//! assert_eq!(treap.stab(&3), vec![&Interval::finite(2, 5).unwrap()]);
//! assert_eq!(treap.stab(&4).len(), 2);
//! assert!(treap.stab(&9).is_empty());
//!```

pub mod error;
pub mod facade;
pub mod interval;
pub mod priority;
pub mod trees;

pub use error::{Error, Result};
pub use facade::*;
pub use interval::{Interval, Key, Point};
pub use priority::{FixedPriorities, Priority, PrioritySource, RandomPriorities};
pub use trees::{Canonical, ComplexZipTreap, RotationTreap, SomeNode, SomeTreap, ZipTreap};
