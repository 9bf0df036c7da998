//! Nearest-row assignment of event timestamps onto an ordered x-axis.
//!
//! Both inputs are positions on the same numeric axis (epoch millis in
//! practice). `axis` must be sorted ascending; `timestamps` may come in any
//! order and are sorted here before the scan. The scan keeps a single cursor
//! over adjacent row pairs that only ever moves forward, so one pass over
//! the axis serves every timestamp.

/// Return the bucket (row index) for each timestamp, in ascending timestamp order.
///
/// For the pair `(axis[i], axis[i + 1])` under the cursor:
///
/// - `t <= axis[i]` goes to `i` (left clamp)
/// - `t <= axis[i + 1]` goes to whichever neighbour is closer, ties to `i`
/// - past the last pair, `t` goes to the last row (right clamp)
///
/// Needs at least two rows; shorter axes yield no assignments.
pub fn assign_buckets(axis: &[f64], timestamps: &[f64]) -> Vec<usize> {
    if axis.len() < 2 {
        return Vec::new();
    }

    let mut sorted = timestamps.to_vec();
    sorted.sort_by(f64::total_cmp);

    let last = axis.len() - 1;
    let mut cursor = 0;
    let mut buckets = Vec::with_capacity(sorted.len());

    for t in sorted {
        loop {
            let lo = axis[cursor];
            let hi = axis[cursor + 1];

            if t <= lo {
                buckets.push(cursor);
            } else if t <= hi {
                let bucket = if (t - lo).abs() <= (t - hi).abs() {
                    cursor
                } else {
                    cursor + 1
                };
                buckets.push(bucket);
            } else if cursor + 1 == last {
                buckets.push(last);
            } else {
                cursor += 1;
                continue;
            }
            break;
        }
    }

    buckets
}

/// Per-row hit counts for `timestamps` binned onto `axis`.
///
/// The returned vector has one entry per row.
pub fn bucket_counts(axis: &[f64], timestamps: &[f64]) -> Vec<u64> {
    let mut counts = vec![0u64; axis.len()];
    for bucket in assign_buckets(axis, timestamps) {
        counts[bucket] += 1;
    }
    counts
}

/// Index of the first row whose x-value is lower than its predecessor's.
pub fn first_unsorted(axis: &[f64]) -> Option<usize> {
    axis.windows(2).position(|w| w[1] < w[0]).map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tie_goes_to_earlier_row() {
        assert_eq!(assign_buckets(&[100.0, 200.0], &[150.0]), vec![0]);
        assert_eq!(assign_buckets(&[100.0, 200.0], &[151.0]), vec![1]);
        assert_eq!(assign_buckets(&[100.0, 200.0], &[149.0]), vec![0]);
    }

    #[test]
    fn clamps_at_both_ends() {
        let axis = [10.0, 20.0, 30.0];
        assert_eq!(assign_buckets(&axis, &[-5.0]), vec![0]);
        assert_eq!(assign_buckets(&axis, &[10.0]), vec![0]);
        assert_eq!(assign_buckets(&axis, &[30.0]), vec![2]);
        assert_eq!(assign_buckets(&axis, &[1_000.0]), vec![2]);
    }

    #[test]
    fn scenario_three_rows() {
        assert_eq!(
            bucket_counts(&[0.0, 10.0, 20.0], &[1.0, 9.0, 25.0]),
            vec![1, 1, 1]
        );
    }

    #[test]
    fn unsorted_timestamps_are_sorted_first() {
        let axis = [0.0, 10.0, 20.0, 30.0];
        // Fed in reverse: the forward-only cursor must still see them ascending.
        assert_eq!(
            assign_buckets(&axis, &[31.0, 19.0, 11.0, -1.0]),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn accumulates_into_same_bucket() {
        assert_eq!(
            bucket_counts(&[0.0, 10.0, 20.0], &[11.0, 9.0, 10.0]),
            vec![0, 3, 0]
        );
    }

    #[test]
    fn cursor_skips_rows_without_hits() {
        let axis: Vec<f64> = (0..10).map(|i| (i * 100) as f64).collect();
        let counts = bucket_counts(&axis, &[40.0, 760.0, 790.0, 2_000.0]);
        assert_eq!(counts, vec![1, 0, 0, 0, 0, 0, 0, 0, 2, 1]);
    }

    #[test]
    fn duplicate_axis_values_resolve_left() {
        // Equal neighbours: the tie rule keeps everything on the earlier row.
        assert_eq!(bucket_counts(&[5.0, 5.0, 9.0], &[5.0, 5.0]), vec![2, 0, 0]);
    }

    #[test]
    fn short_axes_assign_nothing() {
        assert!(assign_buckets(&[], &[1.0]).is_empty());
        assert!(assign_buckets(&[1.0], &[1.0]).is_empty());
        assert_eq!(bucket_counts(&[1.0], &[1.0, 2.0]), vec![0]);
    }

    #[test]
    fn every_timestamp_gets_a_bucket() {
        let axis = [0.0, 3.0, 7.0, 8.0, 20.0];
        let ts: Vec<f64> = (-5..30).map(|v| v as f64 * 0.9).collect();
        let counts = bucket_counts(&axis, &ts);
        assert_eq!(counts.iter().sum::<u64>(), ts.len() as u64);
    }

    #[test]
    fn detects_unsorted_axis() {
        assert_eq!(first_unsorted(&[1.0, 2.0, 2.0, 3.0]), None);
        assert_eq!(first_unsorted(&[1.0, 3.0, 2.0]), Some(2));
        assert_eq!(first_unsorted(&[]), None);
    }
}
