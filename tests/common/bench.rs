use super::*;
extern crate test;
use test::Bencher;

const NUM_SEGMENTS: usize = 100;

/// Builds a segment treap of `NUM_SEGMENTS` random segments, every iteration.
pub fn bench_tree<T: SomeTreap<i32>>(b: &mut Bencher) {
    let mut rng = rand::thread_rng();
    b.iter(|| {
        let mut tree: SegmentTreap<i32, T> = SegmentTreap::new();
        for segment in distinct_segments(&mut rng, NUM_SEGMENTS) {
            tree.insert(segment).unwrap();
        }
        test::bench::black_box(tree.depth());
    });
}

#[bench]
fn bench_rotations(b: &mut Bencher) {
    bench_tree::<RotationTreap<_>>(b)
}

#[bench]
fn bench_zipping(b: &mut Bencher) {
    bench_tree::<ZipTreap<_>>(b)
}

#[bench]
fn bench_complex_zipping(b: &mut Bencher) {
    bench_tree::<ComplexZipTreap<_>>(b)
}
