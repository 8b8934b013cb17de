//! Sort-and-merge step of coordinate storage
//!
//! Triplets are appended in arbitrary order and may repeat a key. Sorting is
//! stable, so among equal keys the triplet appended last comes last and its
//! value wins the merge.

use tracing::trace;

use super::Triplets;

/// Sort triplets by `(major, minor)` and drop shadowed duplicates
///
/// Marks the triplets sorted. Runs a parallel sort when the `parallel`
/// feature is enabled and at least `parallel_threshold` triplets are stored.
pub(super) fn sort_and_compact<T: Copy>(
    triplets: &mut Triplets<T>,
    parallel_threshold: usize,
) {
    let filled = triplets.values.len();
    let order = sorted_order(&triplets.majors, &triplets.minors, parallel_threshold);

    let mut majors = Vec::with_capacity(triplets.majors.capacity());
    let mut minors = Vec::with_capacity(triplets.minors.capacity());
    let mut values = Vec::with_capacity(triplets.values.capacity());
    for i in order {
        let key = (triplets.majors[i], triplets.minors[i]);
        let value = triplets.values[i];
        let shadows_last = majors.last() == Some(&key.0) && minors.last() == Some(&key.1);
        match values.last_mut() {
            Some(last) if shadows_last => *last = value,
            _ => {
                majors.push(key.0);
                minors.push(key.1);
                values.push(value);
            }
        }
    }

    trace!(filled, compacted = values.len(), "coordinate compaction");
    triplets.majors = majors;
    triplets.minors = minors;
    triplets.values = values;
    triplets.sorted = true;
}

fn sorted_order(majors: &[usize], minors: &[usize], parallel_threshold: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..majors.len()).collect();
    let key = |&i: &usize| (majors[i], minors[i]);

    #[cfg(feature = "parallel")]
    {
        use rayon::slice::ParallelSliceMut;
        if order.len() >= parallel_threshold {
            order.par_sort_by_key(key);
            return order;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel_threshold;

    order.sort_by_key(key);
    order
}
